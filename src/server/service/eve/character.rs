use chrono::Utc;
use sea_orm::{ActiveValue, DatabaseConnection, DbErr};

use crate::server::{
    data::{
        account::AccountRepository,
        eve::{alliance::AllianceRepository, character::CharacterRepository},
    },
    error::{eve::EveError, Error},
    esi::EntityFetcher,
    model::eve::{Character, Corporation, EsiFetch, Fetched},
    service::eve::{
        corporation::CorporationService,
        lock::{EntityKey, EntityLocks},
    },
    util::time::{cache_expiry, is_cache_fresh},
};

/// Keeps stored characters in sync with ESI.
pub struct CharacterService<'a, F: EntityFetcher> {
    db: &'a DatabaseConnection,
    fetcher: &'a F,
    locks: &'a EntityLocks,
}

impl<'a, F: EntityFetcher> CharacterService<'a, F> {
    /// Creates a new instance of [`CharacterService`]
    pub fn new(db: &'a DatabaseConnection, fetcher: &'a F, locks: &'a EntityLocks) -> Self {
        Self { db, fetcher, locks }
    }

    /// Gets a character with its corporation & alliance, refreshing the character from ESI
    /// once its cache has expired.
    ///
    /// A refreshed character's corporation is resolved before the character is written. A
    /// character seen for the first time is given a new account.
    ///
    /// # Returns
    /// - `Ok(Some(Character))` - Character with its corporation and optional alliance
    /// - `Ok(None)` - ESI reports the character does not exist
    /// - `Err(Error::EveError(EveError::CorporationUnresolved))` - ESI does not know the
    ///   character's corporation, nothing was written
    /// - `Err(Error)` - Database or ESI request failure
    pub async fn resolve_character(&self, character_id: i64) -> Result<Option<Character>, Error> {
        let _guard = self.locks.acquire(EntityKey::character(character_id)).await;

        let stored = self.get_stored(character_id).await?;
        let now = Utc::now();

        if let Some(stored) = &stored {
            if is_cache_fresh(stored.character.cached_until, now) {
                return Ok(Some(stored.clone()));
            }
        }

        let etag = stored
            .as_ref()
            .and_then(|stored| stored.character.etag.as_deref());
        let fetched = self.fetcher.fetch_character(character_id, etag).await?;

        let Fetched {
            model,
            etag,
            expires,
        } = match fetched {
            EsiFetch::NotModified => return Ok(stored),
            EsiFetch::NotFound => {
                tracing::debug!(character_id = %character_id, "Character not found on ESI");

                return Ok(None);
            }
            EsiFetch::Fresh(fetched) => fetched,
        };

        let corporation_id = model.corporation_id;
        let Some(corporation) = CorporationService::new(self.db, self.fetcher, self.locks)
            .resolve_corporation(corporation_id)
            .await?
        else {
            tracing::warn!(
                character_id = %character_id,
                corporation_id = %corporation_id,
                "Character's corporation not found on ESI"
            );

            return Err(EveError::CorporationUnresolved {
                character_id,
                corporation_id,
            }
            .into());
        };

        let account_id = match &stored {
            Some(stored) => stored.character.account_id,
            None => {
                let account = AccountRepository::new(self.db).create().await?;

                tracing::debug!(
                    character_id = %character_id,
                    account_id = %account.id,
                    "Created account for new character"
                );

                account.id
            }
        };

        let character = CharacterRepository::new(self.db)
            .upsert(
                character_id,
                model,
                account_id,
                etag,
                cache_expiry(expires, now),
            )
            .await?;

        Ok(Some(Character {
            character,
            corporation,
        }))
    }

    /// Writes changes made outside of ESI synchronization (tokens, owning account) to an
    /// existing character.
    ///
    /// # Returns
    /// - `Ok(Model)` - Character with the changes applied
    /// - `Err(Error::InvalidArgument)` - `character_id` is not set, nothing was written
    /// - `Err(Error::DbErr)` - Character does not exist or the update failed
    pub async fn persist_character(
        &self,
        character: entity::eve_character::ActiveModel,
    ) -> Result<entity::eve_character::Model, Error> {
        let character_id = match &character.character_id {
            ActiveValue::Set(id) | ActiveValue::Unchanged(id) => *id,
            ActiveValue::NotSet => {
                return Err(Error::InvalidArgument(
                    "character_id must be set to persist a character".to_string(),
                ))
            }
        };

        let _guard = self.locks.acquire(EntityKey::character(character_id)).await;

        Ok(CharacterRepository::new(self.db).update(character).await?)
    }

    async fn get_stored(&self, character_id: i64) -> Result<Option<Character>, Error> {
        let Some((character, corporation)) = CharacterRepository::new(self.db)
            .get_with_corporation(character_id)
            .await?
        else {
            return Ok(None);
        };

        let corporation = corporation.ok_or_else(|| {
            DbErr::RecordNotFound(format!(
                "Corporation {} of character {}",
                character.corporation_id, character_id
            ))
        })?;

        let alliance = match corporation.alliance_id {
            Some(alliance_id) => AllianceRepository::new(self.db).get(alliance_id).await?,
            None => None,
        };

        Ok(Some(Character {
            character,
            corporation: Corporation {
                corporation,
                alliance,
            },
        }))
    }
}

#[cfg(test)]
mod tests {
    use capsuleer_test_utils::prelude::*;
    use sea_orm::{ActiveValue, EntityTrait, IntoActiveModel, PaginatorTrait};

    use crate::server::{
        data::eve::character::CharacterRepository,
        error::{eve::EveError, Error},
        service::eve::{character::CharacterService, lock::EntityLocks},
        util::test::esi_client,
    };

    /// Expect the whole stored graph without any ESI request while the character is fresh
    #[tokio::test]
    async fn returns_fresh_character_without_request() -> Result<(), TestError> {
        let mut test = test_setup_with_eve_tables!()?;
        let alliance = test.eve().insert_mock_alliance(1, data::fresh_cache()).await?;
        let corporation = test
            .eve()
            .insert_mock_corporation(2, Some(1), data::fresh_cache())
            .await?;
        let character = test
            .eve()
            .insert_mock_character(3, 2, data::fresh_cache())
            .await?;
        let character_endpoint = test
            .eve()
            .create_character_endpoint(3, data::mock_character(2), 0);
        let corporation_endpoint =
            test.eve()
                .create_corporation_endpoint(2, data::mock_corporation(Some(1)), 0);
        let esi = esi_client(&test);
        let locks = EntityLocks::new();

        let result = CharacterService::new(&test.db, &esi, &locks)
            .resolve_character(3)
            .await
            .unwrap()
            .unwrap();

        character_endpoint.assert();
        corporation_endpoint.assert();
        assert_eq!(result.character, character);
        assert_eq!(result.corporation.corporation, corporation);
        assert_eq!(result.corporation.alliance, Some(alliance));

        Ok(())
    }

    /// Expect one conditional request carrying the stored ETag and the stored character
    /// returned with its timestamps unchanged
    #[tokio::test]
    async fn keeps_expired_character_when_not_modified() -> Result<(), TestError> {
        let mut test = test_setup_with_eve_tables!()?;
        test.eve()
            .insert_mock_corporation(2, None, data::fresh_cache())
            .await?;
        let stored = test
            .eve()
            .insert_mock_character(3, 2, data::expired_cache())
            .await?;
        let endpoint = test
            .eve()
            .create_not_modified_endpoint("/characters/3", MOCK_STORED_ETAG, 1);
        let esi = esi_client(&test);
        let locks = EntityLocks::new();

        let result = CharacterService::new(&test.db, &esi, &locks)
            .resolve_character(3)
            .await
            .unwrap()
            .unwrap();

        endpoint.assert();
        assert_eq!(result.character, stored);

        let persisted = CharacterRepository::new(&test.db).get(3).await?.unwrap();
        assert_eq!(persisted.cached_until, stored.cached_until);
        assert_eq!(persisted.updated_at, stored.updated_at);

        Ok(())
    }

    /// Expect None on 404 while the stored character is kept
    #[tokio::test]
    async fn returns_none_but_keeps_row_when_not_found() -> Result<(), TestError> {
        let mut test = test_setup_with_eve_tables!()?;
        test.eve()
            .insert_mock_corporation(2, None, data::fresh_cache())
            .await?;
        let stored = test
            .eve()
            .insert_mock_character(3, 2, data::expired_cache())
            .await?;
        let endpoint = test.eve().create_not_found_endpoint("/characters/3", 1);
        let esi = esi_client(&test);
        let locks = EntityLocks::new();

        let result = CharacterService::new(&test.db, &esi, &locks)
            .resolve_character(3)
            .await
            .unwrap();

        endpoint.assert();
        assert!(result.is_none());
        assert_eq!(CharacterRepository::new(&test.db).get(3).await?, Some(stored));

        Ok(())
    }

    /// Expect account, character and corporation created for a never seen character whose
    /// corporation is not in an alliance
    #[tokio::test]
    async fn creates_character_graph_on_first_resolve() -> Result<(), TestError> {
        let mut test = test_setup_with_eve_tables!()?;
        let character_endpoint =
            test.eve()
                .create_unconditional_endpoint("/characters/3", &data::mock_character(2), 1);
        let corporation_endpoint = test.eve().create_unconditional_endpoint(
            "/corporations/2",
            &data::mock_corporation(None),
            1,
        );
        let esi = esi_client(&test);
        let locks = EntityLocks::new();

        let result = CharacterService::new(&test.db, &esi, &locks)
            .resolve_character(3)
            .await
            .unwrap()
            .unwrap();

        character_endpoint.assert();
        corporation_endpoint.assert();
        assert_eq!(result.character.character_id, 3);
        assert_eq!(result.character.corporation_id, 2);
        assert_eq!(result.corporation.corporation.corporation_id, 2);
        assert!(result.corporation.alliance.is_none());

        let account = entity::prelude::Account::find_by_id(result.character.account_id)
            .one(&test.db)
            .await?;
        assert!(account.is_some());
        assert_eq!(entity::prelude::Account::find().count(&test.db).await?, 1);

        Ok(())
    }

    /// Expect the full character, corporation, alliance chain fetched in one resolve
    #[tokio::test]
    async fn creates_character_with_alliance_on_first_resolve() -> Result<(), TestError> {
        let mut test = test_setup_with_eve_tables!()?;
        let character_endpoint =
            test.eve()
                .create_unconditional_endpoint("/characters/3", &data::mock_character(2), 1);
        let corporation_endpoint = test.eve().create_unconditional_endpoint(
            "/corporations/2",
            &data::mock_corporation(Some(1)),
            1,
        );
        let alliance_endpoint =
            test.eve()
                .create_unconditional_endpoint("/alliances/1", &data::mock_alliance(), 1);
        let esi = esi_client(&test);
        let locks = EntityLocks::new();

        let result = CharacterService::new(&test.db, &esi, &locks)
            .resolve_character(3)
            .await
            .unwrap()
            .unwrap();

        character_endpoint.assert();
        corporation_endpoint.assert();
        alliance_endpoint.assert();
        assert_eq!(
            result.corporation.alliance.map(|alliance| alliance.alliance_id),
            Some(1)
        );

        Ok(())
    }

    /// Expect a refreshed character to keep its account & tokens and follow a corporation
    /// change
    #[tokio::test]
    async fn refresh_keeps_account_and_follows_corporation_change() -> Result<(), TestError> {
        let mut test = test_setup_with_eve_tables!()?;
        test.eve()
            .insert_mock_corporation(2, None, data::fresh_cache())
            .await?;
        let stored = test
            .eve()
            .insert_mock_character(3, 2, data::expired_cache())
            .await?;
        let mut with_token = stored.clone().into_active_model();
        with_token.refresh_token = ActiveValue::Set(Some("refresh".to_string()));
        CharacterRepository::new(&test.db).update(with_token).await?;

        let character_endpoint = test
            .eve()
            .create_character_endpoint(3, data::mock_character(4), 1);
        let corporation_endpoint = test
            .eve()
            .create_corporation_endpoint(4, data::mock_corporation(None), 1);
        let esi = esi_client(&test);
        let locks = EntityLocks::new();

        let result = CharacterService::new(&test.db, &esi, &locks)
            .resolve_character(3)
            .await
            .unwrap()
            .unwrap();

        character_endpoint.assert();
        corporation_endpoint.assert();
        assert_eq!(result.character.account_id, stored.account_id);
        assert_eq!(result.character.corporation_id, 4);
        assert_eq!(result.character.refresh_token.as_deref(), Some("refresh"));
        assert_eq!(result.character.name, data::mock_character(4).name);
        assert!(result.character.updated_at > stored.updated_at);

        Ok(())
    }

    /// Expect an error and nothing written when the character's corporation is unknown
    #[tokio::test]
    async fn fails_when_corporation_unresolved() -> Result<(), TestError> {
        let mut test = test_setup_with_eve_tables!()?;
        let character_endpoint = test
            .eve()
            .create_character_endpoint(3, data::mock_character(2), 1);
        let corporation_endpoint = test.eve().create_not_found_endpoint("/corporations/2", 1);
        let esi = esi_client(&test);
        let locks = EntityLocks::new();

        let result = CharacterService::new(&test.db, &esi, &locks)
            .resolve_character(3)
            .await;

        character_endpoint.assert();
        corporation_endpoint.assert();
        assert!(matches!(
            result,
            Err(Error::EveError(EveError::CorporationUnresolved {
                character_id: 3,
                corporation_id: 2
            }))
        ));
        assert!(CharacterRepository::new(&test.db).get(3).await?.is_none());
        assert_eq!(entity::prelude::Account::find().count(&test.db).await?, 0);

        Ok(())
    }

    /// Expect two concurrent first resolves of one character to share a single request
    #[tokio::test]
    async fn concurrent_resolves_make_one_request() -> Result<(), TestError> {
        let mut test = test_setup_with_eve_tables!()?;
        let character_endpoint = test
            .eve()
            .create_character_endpoint(3, data::mock_character(2), 1);
        let corporation_endpoint = test
            .eve()
            .create_corporation_endpoint(2, data::mock_corporation(None), 1);
        let esi = esi_client(&test);
        let locks = EntityLocks::new();
        let service = CharacterService::new(&test.db, &esi, &locks);

        let (first, second) = tokio::join!(
            service.resolve_character(3),
            service.resolve_character(3)
        );

        character_endpoint.assert();
        corporation_endpoint.assert();
        let first = first.unwrap().unwrap();
        let second = second.unwrap().unwrap();
        assert_eq!(first.character, second.character);
        assert_eq!(entity::prelude::Account::find().count(&test.db).await?, 1);
        assert!(locks.is_empty());

        Ok(())
    }

    /// Expect two new characters of one corporation to fetch that corporation once
    #[tokio::test]
    async fn concurrent_characters_share_corporation_request() -> Result<(), TestError> {
        let mut test = test_setup_with_eve_tables!()?;
        let first_endpoint =
            test.eve()
                .create_unconditional_endpoint("/characters/3", &data::mock_character(2), 1);
        let second_endpoint =
            test.eve()
                .create_unconditional_endpoint("/characters/4", &data::mock_character(2), 1);
        let corporation_endpoint = test.eve().create_unconditional_endpoint(
            "/corporations/2",
            &data::mock_corporation(None),
            1,
        );
        let esi = esi_client(&test);
        let locks = EntityLocks::new();
        let service = CharacterService::new(&test.db, &esi, &locks);

        let (first, second) = tokio::join!(
            service.resolve_character(3),
            service.resolve_character(4)
        );

        first_endpoint.assert();
        second_endpoint.assert();
        corporation_endpoint.assert();
        assert_eq!(first.unwrap().unwrap().character.corporation_id, 2);
        assert_eq!(second.unwrap().unwrap().character.corporation_id, 2);
        assert_eq!(entity::prelude::Account::find().count(&test.db).await?, 2);

        Ok(())
    }

    /// Expect tokens written to the stored character
    #[tokio::test]
    async fn persists_character_changes() -> Result<(), TestError> {
        let mut test = test_setup_with_eve_tables!()?;
        test.eve()
            .insert_mock_corporation(2, None, data::fresh_cache())
            .await?;
        let stored = test
            .eve()
            .insert_mock_character(3, 2, data::fresh_cache())
            .await?;
        let esi = esi_client(&test);
        let locks = EntityLocks::new();

        let mut character = stored.into_active_model();
        character.access_token = ActiveValue::Set(Some("access".to_string()));
        let result = CharacterService::new(&test.db, &esi, &locks)
            .persist_character(character)
            .await
            .unwrap();

        assert_eq!(result.access_token.as_deref(), Some("access"));
        assert_eq!(CharacterRepository::new(&test.db).get(3).await?, Some(result));

        Ok(())
    }

    /// Expect InvalidArgument for a character without an ID
    #[tokio::test]
    async fn persist_fails_without_character_id() -> Result<(), TestError> {
        let test = test_setup_with_eve_tables!()?;
        let esi = esi_client(&test);
        let locks = EntityLocks::new();

        let result = CharacterService::new(&test.db, &esi, &locks)
            .persist_character(entity::eve_character::ActiveModel {
                name: ActiveValue::Set("Nameless".to_string()),
                ..Default::default()
            })
            .await;

        assert!(matches!(result, Err(Error::InvalidArgument(_))));

        Ok(())
    }
}
