use sea_orm::{ActiveValue, IntoActiveModel};
use tower_sessions::Session;

use crate::server::{
    data::account::AccountRepository,
    error::{auth::AuthError, eve::EveError, Error},
    esi::EntityFetcher,
    model::{
        auth::SsoState,
        session::{auth::SessionSsoState, character::SessionCharacter},
    },
    service::auth::AuthService,
    sso::AuthorizationProvider,
};

impl<'a, F: EntityFetcher, P: AuthorizationProvider> AuthService<'a, F, P> {
    /// Completes a login once EVE SSO redirects back, returning where to send the user.
    ///
    /// The stashed state is taken out of the session first so it can never be replayed,
    /// and `code` is only exchanged once `state` matches it.
    ///
    /// # Returns
    /// - `Ok(String)` - Local path to redirect to, `/` if the login did not ask for one
    /// - `Err(AuthError::CsrfMissingValue)` - No login is pending for this session
    /// - `Err(AuthError::StateEncoding | StatePayload)` - A state token is not decodable
    /// - `Err(AuthError::CsrfValidationFailed)` - `state` differs from the stashed state
    /// - `Err(EveError::CharacterNotFound)` - ESI does not know the logged in character
    /// - `Err(Error)` - Token exchange, ESI or database failure
    pub async fn callback(
        &self,
        session: &Session,
        code: &str,
        state: &str,
    ) -> Result<String, Error> {
        let Some(expected) = SessionSsoState::remove(session).await? else {
            return Err(AuthError::CsrfMissingValue.into());
        };

        let returned = SsoState::decode(state)?;
        let expected = SsoState::decode(&expected)?;

        if returned != expected {
            return Err(AuthError::CsrfValidationFailed.into());
        }

        let login = self.provider.exchange_code(code).await?;
        let character_id = login.character.character_id;

        let character_service = self.character_service();
        let Some(resolved) = character_service.resolve_character(character_id).await? else {
            return Err(EveError::CharacterNotFound(character_id).into());
        };

        let current_account_id = resolved.character.account_id;
        let mut character = resolved.character.into_active_model();
        character.access_token = ActiveValue::Set(Some(login.tokens.access_token));
        character.access_token_expires_at =
            ActiveValue::Set(login.tokens.expires_at.map(|expires_at| expires_at.naive_utc()));
        if let Some(refresh_token) = login.tokens.refresh_token {
            character.refresh_token = ActiveValue::Set(Some(refresh_token));
        }

        if let Some(account_id) = expected.account_id.filter(|id| *id != current_account_id) {
            if AccountRepository::new(self.db).get(account_id).await?.is_some() {
                tracing::info!(
                    character_id = %character_id,
                    from_account_id = %current_account_id,
                    to_account_id = %account_id,
                    "Linking character to logged in account"
                );

                character.account_id = ActiveValue::Set(account_id);
            } else {
                tracing::warn!(
                    character_id = %character_id,
                    account_id = %account_id,
                    "Account from SSO state no longer exists, keeping character's account"
                );
            }
        }

        let character = character_service.persist_character(character).await?;

        session.cycle_id().await?;
        SessionCharacter {
            character_id,
            character_name: character.name.clone(),
            account_id: character.account_id,
        }
        .insert(session)
        .await?;

        tracing::info!(
            character_id = %character_id,
            account_id = %character.account_id,
            "Character logged in with EVE SSO"
        );

        Ok(expected.redirect_url.unwrap_or_else(|| "/".to_string()))
    }
}
