//! EVE SSO login models.
//!
//! [`SsoState`] is the value carried through the OAuth2 redirect as the `state` parameter.
//! It is serialized to JSON and base64 encoded so it survives the round trip through EVE SSO
//! unchanged, and compared structurally against the copy stashed in the session on callback.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::server::error::auth::AuthError;

/// Context carried through the EVE SSO redirect.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SsoState {
    /// Unique per login attempt, makes every state token unguessable
    pub state_id: Uuid,
    /// Local path to send the user to once logged in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
    /// Account the logged in character should be linked to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<i32>,
}

impl SsoState {
    /// Creates a state with a new random state ID.
    pub fn new(redirect_url: Option<String>, account_id: Option<i32>) -> Self {
        Self {
            state_id: Uuid::new_v4(),
            redirect_url,
            account_id,
        }
    }

    /// Encodes the state as URL-safe base64 of its JSON form.
    pub fn encode(&self) -> Result<String, AuthError> {
        let json = serde_json::to_vec(self)?;

        Ok(URL_SAFE_NO_PAD.encode(json))
    }

    /// Decodes a state token produced by [`SsoState::encode`].
    ///
    /// # Returns
    /// - `Ok(SsoState)` - Token decoded into a complete state
    /// - `Err(AuthError::StateEncoding)` - Token is not valid base64
    /// - `Err(AuthError::StatePayload)` - Token is base64 but not a state payload
    pub fn decode(token: &str) -> Result<Self, AuthError> {
        let json = URL_SAFE_NO_PAD.decode(token)?;

        Ok(serde_json::from_slice(&json)?)
    }
}

/// Character identity confirmed by EVE SSO.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthenticatedCharacter {
    /// EVE Online character ID from the token's `sub` claim
    pub character_id: i64,
    /// Character name from the token's `name` claim
    pub character_name: String,
}

/// OAuth2 tokens issued by EVE SSO.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenGrant {
    /// JWT access token for authenticated ESI routes
    pub access_token: String,
    /// Refresh token, `None` when EVE SSO did not issue a new one
    pub refresh_token: Option<String>,
    /// When the access token expires, `None` if EVE SSO gave no usable lifetime
    pub expires_at: Option<DateTime<Utc>>,
}

/// Result of exchanging an authorization code.
#[derive(Debug, Clone, PartialEq)]
pub struct SsoLogin {
    /// Character that logged in
    pub character: AuthenticatedCharacter,
    /// Tokens issued for the character
    pub tokens: TokenGrant,
}

/// Where a session is in the login flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPhase {
    /// Nothing in the session
    Anonymous,
    /// Redirected to EVE SSO, waiting for the callback
    CallbackPending,
    /// A character is logged in
    Authenticated,
}
