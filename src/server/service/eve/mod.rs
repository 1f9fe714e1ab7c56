//! Cache-aside synchronization of EVE Online entities with ESI.
//!
//! Resolving an entity serves the stored copy while its `cached_until` is in the future.
//! Once it lapses ESI is asked for a new copy, conditionally on the stored ETag. A 304
//! keeps the stored copy as is and a 404 resolves to nothing without touching the stored
//! row. A fresh copy has the entities it references resolved first (a corporation's
//! alliance, a character's corporation) and is then written with its new ETag and
//! expiry.
//!
//! Every resolution holds the [`lock::EntityLocks`] lock of its entity from load to write,
//! so concurrent callers resolving the same entity make a single ESI request.

/// Alliance synchronization
pub mod alliance;
/// Character synchronization, including the character's corporation and alliance
pub mod character;
/// Corporation synchronization, including the corporation's alliance
pub mod corporation;
pub mod lock;

use sea_orm::DatabaseConnection;

use crate::server::{
    error::Error,
    esi::EntityFetcher,
    model::eve::{EntityKind, ResolvedEntity},
    service::eve::{
        alliance::AllianceService, character::CharacterService,
        corporation::CorporationService, lock::EntityLocks,
    },
};

/// Resolves entities by kind, dispatching to the per-kind services.
pub struct EveService<'a, F: EntityFetcher> {
    db: &'a DatabaseConnection,
    fetcher: &'a F,
    locks: &'a EntityLocks,
}

impl<'a, F: EntityFetcher> EveService<'a, F> {
    /// Creates a new instance of [`EveService`]
    pub fn new(db: &'a DatabaseConnection, fetcher: &'a F, locks: &'a EntityLocks) -> Self {
        Self { db, fetcher, locks }
    }

    /// Resolves an entity of any kind, `None` if ESI does not know it.
    pub async fn resolve(
        &self,
        kind: EntityKind,
        id: i64,
    ) -> Result<Option<ResolvedEntity>, Error> {
        let resolved = match kind {
            EntityKind::Alliance => AllianceService::new(self.db, self.fetcher, self.locks)
                .resolve_alliance(id)
                .await?
                .map(ResolvedEntity::Alliance),
            EntityKind::Corporation => CorporationService::new(self.db, self.fetcher, self.locks)
                .resolve_corporation(id)
                .await?
                .map(ResolvedEntity::Corporation),
            EntityKind::Character => CharacterService::new(self.db, self.fetcher, self.locks)
                .resolve_character(id)
                .await?
                .map(ResolvedEntity::Character),
        };

        Ok(resolved)
    }
}
