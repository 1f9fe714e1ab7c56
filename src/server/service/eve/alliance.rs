use chrono::Utc;
use sea_orm::DatabaseConnection;

use crate::server::{
    data::eve::alliance::AllianceRepository,
    error::Error,
    esi::EntityFetcher,
    model::eve::{EsiFetch, Fetched},
    service::eve::lock::{EntityKey, EntityLocks},
    util::time::{cache_expiry, is_cache_fresh},
};

/// Keeps stored alliances in sync with ESI.
pub struct AllianceService<'a, F: EntityFetcher> {
    db: &'a DatabaseConnection,
    fetcher: &'a F,
    locks: &'a EntityLocks,
}

impl<'a, F: EntityFetcher> AllianceService<'a, F> {
    /// Creates a new instance of [`AllianceService`]
    pub fn new(db: &'a DatabaseConnection, fetcher: &'a F, locks: &'a EntityLocks) -> Self {
        Self { db, fetcher, locks }
    }

    /// Gets an alliance, refreshing it from ESI once its cache has expired.
    ///
    /// # Returns
    /// - `Ok(Some(Model))` - Stored alliance, fresh or confirmed unchanged by ESI
    /// - `Ok(None)` - ESI reports the alliance does not exist
    /// - `Err(Error)` - Database or ESI request failure
    pub async fn resolve_alliance(
        &self,
        alliance_id: i64,
    ) -> Result<Option<entity::eve_alliance::Model>, Error> {
        let _guard = self.locks.acquire(EntityKey::alliance(alliance_id)).await;

        let alliance_repo = AllianceRepository::new(self.db);

        let stored = alliance_repo.get(alliance_id).await?;
        let now = Utc::now();

        if let Some(alliance) = &stored {
            if is_cache_fresh(alliance.cached_until, now) {
                return Ok(stored);
            }
        }

        let etag = stored.as_ref().and_then(|alliance| alliance.etag.as_deref());
        let fetched = self.fetcher.fetch_alliance(alliance_id, etag).await?;

        match fetched {
            EsiFetch::NotModified => Ok(stored),
            EsiFetch::NotFound => {
                tracing::debug!(alliance_id = %alliance_id, "Alliance not found on ESI");

                Ok(None)
            }
            EsiFetch::Fresh(Fetched {
                model,
                etag,
                expires,
            }) => {
                let alliance = alliance_repo
                    .upsert(alliance_id, model, etag, cache_expiry(expires, now))
                    .await?;

                Ok(Some(alliance))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use capsuleer_test_utils::prelude::*;
    use chrono::{Duration, Utc};

    use crate::server::{
        data::eve::alliance::AllianceRepository,
        service::eve::{alliance::AllianceService, lock::EntityLocks},
        util::test::esi_client,
    };

    /// Expect the stored alliance without any ESI request while its cache is fresh
    #[tokio::test]
    async fn returns_fresh_alliance_without_request() -> Result<(), TestError> {
        let mut test = test_setup_with_eve_tables!()?;
        let stored = test.eve().insert_mock_alliance(1, data::fresh_cache()).await?;
        let endpoint = test.eve().create_alliance_endpoint(1, data::mock_alliance(), 0);
        let esi = esi_client(&test);
        let locks = EntityLocks::new();

        let result = AllianceService::new(&test.db, &esi, &locks)
            .resolve_alliance(1)
            .await
            .unwrap();

        endpoint.assert();
        assert_eq!(result, Some(stored));

        Ok(())
    }

    /// Expect a conditional request and the stored alliance left untouched on 304
    #[tokio::test]
    async fn keeps_expired_alliance_when_not_modified() -> Result<(), TestError> {
        let mut test = test_setup_with_eve_tables!()?;
        let stored = test
            .eve()
            .insert_mock_alliance(1, data::expired_cache())
            .await?;
        let endpoint = test
            .eve()
            .create_not_modified_endpoint("/alliances/1", MOCK_STORED_ETAG, 1);
        let esi = esi_client(&test);
        let locks = EntityLocks::new();

        let result = AllianceService::new(&test.db, &esi, &locks)
            .resolve_alliance(1)
            .await
            .unwrap();

        endpoint.assert();
        assert_eq!(result.as_ref(), Some(&stored));

        let persisted = AllianceRepository::new(&test.db).get(1).await?.unwrap();
        assert_eq!(persisted.cached_until, stored.cached_until);
        assert_eq!(persisted.updated_at, stored.updated_at);
        assert_eq!(persisted.etag, stored.etag);

        Ok(())
    }

    /// Expect the expired alliance replaced with ESI's copy and its new cache headers
    #[tokio::test]
    async fn refreshes_expired_alliance() -> Result<(), TestError> {
        let mut test = test_setup_with_eve_tables!()?;
        test.eve()
            .insert_mock_alliance(1, data::expired_cache())
            .await?;
        let endpoint =
            test.eve()
                .create_unconditional_endpoint("/alliances/1", &data::mock_alliance(), 1);
        let esi = esi_client(&test);
        let locks = EntityLocks::new();

        let result = AllianceService::new(&test.db, &esi, &locks)
            .resolve_alliance(1)
            .await
            .unwrap()
            .unwrap();

        endpoint.assert();
        assert_eq!(result.name, data::mock_alliance().name);
        assert_eq!(result.etag.as_deref(), Some(MOCK_FRESH_ETAG));
        assert!(result.cached_until > Utc::now().naive_utc());

        Ok(())
    }

    /// Expect a one day cache when ESI sends no Expires header
    #[tokio::test]
    async fn defaults_cache_expiry_without_expires_header() -> Result<(), TestError> {
        let mut test = test_setup_with_eve_tables!()?;
        let endpoint = test.eve().create_fresh_endpoint(
            "/alliances/1",
            &data::mock_alliance(),
            Some(MOCK_FRESH_ETAG),
            None,
            1,
        );
        let esi = esi_client(&test);
        let locks = EntityLocks::new();

        let before = Utc::now();
        let result = AllianceService::new(&test.db, &esi, &locks)
            .resolve_alliance(1)
            .await
            .unwrap()
            .unwrap();

        endpoint.assert();
        assert!(result.cached_until >= (before + Duration::hours(24)).naive_utc());
        assert!(result.cached_until <= (Utc::now() + Duration::hours(24)).naive_utc());

        Ok(())
    }

    /// Expect None on 404 while the stored row is kept
    #[tokio::test]
    async fn returns_none_but_keeps_row_when_not_found() -> Result<(), TestError> {
        let mut test = test_setup_with_eve_tables!()?;
        let stored = test
            .eve()
            .insert_mock_alliance(1, data::expired_cache())
            .await?;
        let endpoint = test.eve().create_not_found_endpoint("/alliances/1", 1);
        let esi = esi_client(&test);
        let locks = EntityLocks::new();

        let result = AllianceService::new(&test.db, &esi, &locks)
            .resolve_alliance(1)
            .await
            .unwrap();

        endpoint.assert();
        assert!(result.is_none());
        assert_eq!(AllianceRepository::new(&test.db).get(1).await?, Some(stored));

        Ok(())
    }

    /// Expect an unconditional request and a new row for an alliance never seen before
    #[tokio::test]
    async fn creates_alliance_on_first_resolve() -> Result<(), TestError> {
        let mut test = test_setup_with_eve_tables!()?;
        let endpoint =
            test.eve()
                .create_unconditional_endpoint("/alliances/1", &data::mock_alliance(), 1);
        let esi = esi_client(&test);
        let locks = EntityLocks::new();

        let result = AllianceService::new(&test.db, &esi, &locks)
            .resolve_alliance(1)
            .await
            .unwrap();

        endpoint.assert();
        let alliance = result.unwrap();
        assert_eq!(alliance.alliance_id, 1);
        assert_eq!(AllianceRepository::new(&test.db).get(1).await?, Some(alliance));

        Ok(())
    }
}
