use tower_sessions::Session;

use crate::server::{
    error::Error,
    esi::EntityFetcher,
    model::{
        auth::SsoState,
        session::{auth::SessionSsoState, character::SessionCharacter},
    },
    service::auth::AuthService,
    sso::AuthorizationProvider,
};

impl<'a, F: EntityFetcher, P: AuthorizationProvider> AuthService<'a, F, P> {
    /// Starts a login, returning the EVE SSO URL to send the user to.
    ///
    /// `redirect_url` is where the user lands after the callback; anything other than a
    /// local path is dropped. When a character is already logged in, its account is
    /// carried through the state so the new character is added to it.
    pub async fn login(
        &self,
        session: &Session,
        redirect_url: Option<String>,
    ) -> Result<String, Error> {
        let redirect_url = redirect_url.filter(|url| is_local_redirect(url));
        let account_id = SessionCharacter::get(session)
            .await?
            .map(|character| character.account_id);

        let state = SsoState::new(redirect_url, account_id);
        let token = state.encode()?;

        SessionSsoState::insert(session, &token).await?;

        tracing::debug!(
            state_id = %state.state_id,
            account_id = ?account_id,
            "Starting EVE SSO login"
        );

        Ok(self.provider.authorization_url(self.scopes, &token))
    }

    /// The state token of the login awaiting its callback, if any.
    pub async fn pending_state(&self, session: &Session) -> Result<Option<String>, Error> {
        SessionSsoState::get(session).await
    }
}

/// Only paths on this site, `//host` would leave it.
pub fn is_local_redirect(url: &str) -> bool {
    url.starts_with('/') && !url.starts_with("//") && !url.starts_with("/\\")
}
