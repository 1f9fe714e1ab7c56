use chrono::Utc;
use sea_orm::DatabaseConnection;

use crate::server::{
    data::eve::corporation::CorporationRepository,
    error::Error,
    esi::EntityFetcher,
    model::eve::{Corporation, EsiFetch, Fetched},
    service::eve::{
        alliance::AllianceService,
        lock::{EntityKey, EntityLocks},
    },
    util::time::{cache_expiry, is_cache_fresh},
};

/// Keeps stored corporations in sync with ESI.
pub struct CorporationService<'a, F: EntityFetcher> {
    db: &'a DatabaseConnection,
    fetcher: &'a F,
    locks: &'a EntityLocks,
}

impl<'a, F: EntityFetcher> CorporationService<'a, F> {
    /// Creates a new instance of [`CorporationService`]
    pub fn new(db: &'a DatabaseConnection, fetcher: &'a F, locks: &'a EntityLocks) -> Self {
        Self { db, fetcher, locks }
    }

    /// Gets a corporation and its alliance, refreshing the corporation from ESI once its
    /// cache has expired.
    ///
    /// A refreshed corporation's alliance is resolved before the corporation is written. An
    /// alliance ESI does not know is logged and the corporation stored without one.
    pub async fn resolve_corporation(
        &self,
        corporation_id: i64,
    ) -> Result<Option<Corporation>, Error> {
        let _guard = self
            .locks
            .acquire(EntityKey::corporation(corporation_id))
            .await;

        let corporation_repo = CorporationRepository::new(self.db);

        let stored = corporation_repo
            .get_with_alliance(corporation_id)
            .await?
            .map(|(corporation, alliance)| Corporation {
                corporation,
                alliance,
            });
        let now = Utc::now();

        if let Some(stored) = &stored {
            if is_cache_fresh(stored.corporation.cached_until, now) {
                return Ok(Some(stored.clone()));
            }
        }

        let etag = stored
            .as_ref()
            .and_then(|stored| stored.corporation.etag.as_deref());
        let fetched = self.fetcher.fetch_corporation(corporation_id, etag).await?;

        let Fetched {
            model,
            etag,
            expires,
        } = match fetched {
            EsiFetch::NotModified => return Ok(stored),
            EsiFetch::NotFound => {
                tracing::debug!(corporation_id = %corporation_id, "Corporation not found on ESI");

                return Ok(None);
            }
            EsiFetch::Fresh(fetched) => fetched,
        };

        let alliance = match model.alliance_id {
            Some(alliance_id) => {
                let alliance = AllianceService::new(self.db, self.fetcher, self.locks)
                    .resolve_alliance(alliance_id)
                    .await?;

                if alliance.is_none() {
                    tracing::warn!(
                        corporation_id = %corporation_id,
                        alliance_id = %alliance_id,
                        "Corporation's alliance not found on ESI, saving corporation without alliance"
                    );
                }

                alliance
            }
            None => None,
        };

        let corporation = corporation_repo
            .upsert(
                corporation_id,
                model,
                alliance.as_ref().map(|alliance| alliance.alliance_id),
                etag,
                cache_expiry(expires, now),
            )
            .await?;

        Ok(Some(Corporation {
            corporation,
            alliance,
        }))
    }
}
