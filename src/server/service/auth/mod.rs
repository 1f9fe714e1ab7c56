//! EVE SSO login flow.
//!
//! A login stashes an encoded [`SsoState`](crate::server::model::auth::SsoState) in the
//! session and sends the user to EVE SSO with the same token as the OAuth2 `state`. The
//! callback only exchanges the authorization code once the returned state matches the
//! stashed one, then resolves the character through the entity cache, stores its tokens
//! and logs it in.

/// Completing a login on the EVE SSO callback
pub mod callback;
/// Starting a login
pub mod login;
/// Ending a session's login
pub mod logout;
/// Refreshing and revoking stored SSO tokens
pub mod token;

use sea_orm::DatabaseConnection;
use tower_sessions::Session;

use crate::server::{
    error::Error,
    esi::EntityFetcher,
    model::{
        auth::AuthPhase,
        session::{auth::SessionSsoState, character::SessionCharacter},
    },
    service::eve::{character::CharacterService, lock::EntityLocks},
    sso::AuthorizationProvider,
};

/// Drives the EVE SSO login flow for a session.
pub struct AuthService<'a, F: EntityFetcher, P: AuthorizationProvider> {
    db: &'a DatabaseConnection,
    fetcher: &'a F,
    locks: &'a EntityLocks,
    provider: &'a P,
    scopes: &'a [String],
}

impl<'a, F: EntityFetcher, P: AuthorizationProvider> AuthService<'a, F, P> {
    /// Creates a new instance of [`AuthService`] requesting `scopes` on login
    pub fn new(
        db: &'a DatabaseConnection,
        fetcher: &'a F,
        locks: &'a EntityLocks,
        provider: &'a P,
        scopes: &'a [String],
    ) -> Self {
        Self {
            db,
            fetcher,
            locks,
            provider,
            scopes,
        }
    }

    /// Reports where the session is in the login flow.
    ///
    /// A pending login takes precedence, a logged in character may start another login to
    /// add a character to its account.
    pub async fn phase(&self, session: &Session) -> Result<AuthPhase, Error> {
        if SessionSsoState::get(session).await?.is_some() {
            return Ok(AuthPhase::CallbackPending);
        }

        if SessionCharacter::get(session).await?.is_some() {
            return Ok(AuthPhase::Authenticated);
        }

        Ok(AuthPhase::Anonymous)
    }

    fn character_service(&self) -> CharacterService<'a, F> {
        CharacterService::new(self.db, self.fetcher, self.locks)
    }
}
