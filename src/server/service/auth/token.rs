use sea_orm::{ActiveValue, IntoActiveModel};

use crate::server::{
    data::eve::character::CharacterRepository,
    error::{auth::AuthError, eve::EveError, Error},
    esi::EntityFetcher,
    service::auth::AuthService,
    sso::AuthorizationProvider,
};

impl<'a, F: EntityFetcher, P: AuthorizationProvider> AuthService<'a, F, P> {
    /// Exchanges a character's stored refresh token for new tokens and stores them.
    ///
    /// EVE SSO may rotate the refresh token; the stored one is kept when no new one is issued.
    pub async fn refresh_character_tokens(
        &self,
        character_id: i64,
    ) -> Result<entity::eve_character::Model, Error> {
        let Some(character) = CharacterRepository::new(self.db).get(character_id).await? else {
            return Err(EveError::CharacterNotFound(character_id).into());
        };
        let Some(refresh_token) = character.refresh_token.clone() else {
            return Err(AuthError::NoRefreshToken(character_id).into());
        };

        let grant = self.provider.refresh_token(&refresh_token).await?;

        let mut character = character.into_active_model();
        character.access_token = ActiveValue::Set(Some(grant.access_token));
        character.access_token_expires_at =
            ActiveValue::Set(grant.expires_at.map(|expires_at| expires_at.naive_utc()));
        character.refresh_token = ActiveValue::Set(Some(grant.refresh_token.unwrap_or(refresh_token)));

        let character = self.character_service().persist_character(character).await?;

        tracing::debug!(character_id = %character_id, "Refreshed character tokens");

        Ok(character)
    }

    /// Revokes a character's refresh token with EVE SSO and clears its stored tokens.
    pub async fn revoke_character_tokens(
        &self,
        character_id: i64,
    ) -> Result<entity::eve_character::Model, Error> {
        let Some(character) = CharacterRepository::new(self.db).get(character_id).await? else {
            return Err(EveError::CharacterNotFound(character_id).into());
        };

        if let Some(refresh_token) = &character.refresh_token {
            self.provider.revoke_token(refresh_token).await?;
        }

        let mut character = character.into_active_model();
        character.access_token = ActiveValue::Set(None);
        character.access_token_expires_at = ActiveValue::Set(None);
        character.refresh_token = ActiveValue::Set(None);

        let character = self.character_service().persist_character(character).await?;

        tracing::info!(character_id = %character_id, "Revoked character tokens");

        Ok(character)
    }
}
