//! Session storage for the SSO state token awaiting its callback.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::server::error::Error;

/// Session key for the encoded SSO state of the pending login.
pub const SESSION_SSO_STATE_KEY: &str = "capsuleer:auth:sso_state";

/// The encoded [`SsoState`](crate::server::model::auth::SsoState) sent to EVE SSO, stashed
/// until the callback compares it against the state EVE SSO returns.
#[derive(Default, Deserialize, Serialize, Debug)]
pub struct SessionSsoState(pub String);

impl SessionSsoState {
    /// Stashes the encoded state, replacing any earlier pending login.
    pub async fn insert(session: &Session, state: &str) -> Result<(), Error> {
        session
            .insert(SESSION_SSO_STATE_KEY, SessionSsoState(state.to_string()))
            .await?;

        Ok(())
    }

    /// Reads the stashed state without removing it.
    pub async fn get(session: &Session) -> Result<Option<String>, Error> {
        let state = session
            .get::<SessionSsoState>(SESSION_SSO_STATE_KEY)
            .await?
            .map(|SessionSsoState(state)| state);

        Ok(state)
    }

    /// Takes the stashed state out of the session so it can only be used once.
    pub async fn remove(session: &Session) -> Result<Option<String>, Error> {
        let state = session
            .remove::<SessionSsoState>(SESSION_SSO_STATE_KEY)
            .await?
            .map(|SessionSsoState(state)| state);

        Ok(state)
    }
}
