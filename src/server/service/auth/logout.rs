use tower_sessions::Session;

use crate::server::{
    error::Error,
    esi::EntityFetcher,
    model::session::{auth::SessionSsoState, character::SessionCharacter},
    service::auth::AuthService,
    sso::AuthorizationProvider,
};

impl<'a, F: EntityFetcher, P: AuthorizationProvider> AuthService<'a, F, P> {
    /// Logs the session's character out and drops any pending login. Stored tokens are kept.
    pub async fn logout(&self, session: &Session) -> Result<(), Error> {
        let character = SessionCharacter::remove(session).await?;
        SessionSsoState::remove(session).await?;

        if let Some(character) = character {
            tracing::info!(
                character_id = %character.character_id,
                account_id = %character.account_id,
                "Character logged out"
            );
        }

        Ok(())
    }
}
