//! Cached EVE Online alliances.

use chrono::{NaiveDateTime, Utc};
use eve_esi::model::alliance::Alliance;
use sea_orm::{
    sea_query::OnConflict, ActiveValue, ConnectionTrait, DbErr, EntityTrait,
};

/// Repository for the `eve_alliance` table.
pub struct AllianceRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> AllianceRepository<'a, C> {
    /// Creates a repository over the given connection or transaction.
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Gets an alliance by its EVE Online alliance ID.
    ///
    /// # Arguments
    /// - `alliance_id` - EVE Online ID of the alliance
    ///
    /// # Returns
    /// - `Ok(Some(Model))` - The alliance is cached
    /// - `Ok(None)` - The alliance has never been stored
    /// - `Err(DbErr)` - The query failed
    pub async fn get(
        &self,
        alliance_id: i64,
    ) -> Result<Option<entity::eve_alliance::Model>, DbErr> {
        entity::prelude::EveAlliance::find_by_id(alliance_id)
            .one(self.db)
            .await
    }

    /// Inserts the alliance or updates the existing row with ESI's latest copy.
    ///
    /// # Arguments
    /// - `alliance_id` - EVE Online ID of the alliance
    /// - `alliance` - Alliance as returned by ESI
    /// - `etag` - ETag of the ESI response, if it carried one
    /// - `cached_until` - Time until which the row is considered fresh
    ///
    /// # Returns
    /// - `Ok(Model)` - The inserted or updated alliance
    /// - `Err(DbErr)` - The write failed
    pub async fn upsert(
        &self,
        alliance_id: i64,
        alliance: Alliance,
        etag: Option<String>,
        cached_until: NaiveDateTime,
    ) -> Result<entity::eve_alliance::Model, DbErr> {
        let alliance = entity::eve_alliance::ActiveModel {
            alliance_id: ActiveValue::Set(alliance_id),
            name: ActiveValue::Set(alliance.name),
            ticker: ActiveValue::Set(alliance.ticker),
            etag: ActiveValue::Set(etag),
            updated_at: ActiveValue::Set(Utc::now().naive_utc()),
            cached_until: ActiveValue::Set(cached_until),
        };

        entity::prelude::EveAlliance::insert_many([alliance])
            .on_conflict(
                OnConflict::column(entity::eve_alliance::Column::AllianceId)
                    .update_columns([
                        entity::eve_alliance::Column::Name,
                        entity::eve_alliance::Column::Ticker,
                        entity::eve_alliance::Column::Etag,
                        entity::eve_alliance::Column::UpdatedAt,
                        entity::eve_alliance::Column::CachedUntil,
                    ])
                    .to_owned(),
            )
            .exec_with_returning(self.db)
            .await?
            .into_iter()
            .next()
            .ok_or(DbErr::RecordNotInserted)
    }
}

#[cfg(test)]
mod tests {
    use capsuleer_test_utils::prelude::*;

    use crate::server::data::eve::alliance::AllianceRepository;

    #[tokio::test]
    async fn creates_new_alliance() -> Result<(), TestError> {
        let test = test_setup_with_tables!(entity::prelude::EveAlliance)?;
        let repo = AllianceRepository::new(&test.db);
        let cached_until = data::fresh_cache();

        let created = repo
            .upsert(1, data::mock_alliance(), Some(MOCK_FRESH_ETAG.to_string()), cached_until)
            .await?;

        assert_eq!(created.alliance_id, 1);
        assert_eq!(created.name, data::mock_alliance().name);
        assert_eq!(created.ticker, data::mock_alliance().ticker);
        assert_eq!(created.etag.as_deref(), Some(MOCK_FRESH_ETAG));
        assert_eq!(created.cached_until, cached_until);

        Ok(())
    }

    #[tokio::test]
    async fn updates_existing_alliance() -> Result<(), TestError> {
        let mut test = test_setup_with_tables!(entity::prelude::EveAlliance)?;
        let stored = test.eve().insert_mock_alliance(1, data::expired_cache()).await?;
        let repo = AllianceRepository::new(&test.db);
        let cached_until = data::fresh_cache();

        let updated = repo
            .upsert(1, data::mock_alliance(), Some(MOCK_FRESH_ETAG.to_string()), cached_until)
            .await?;

        assert_eq!(updated.alliance_id, stored.alliance_id);
        assert_ne!(updated.name, stored.name);
        assert_eq!(updated.etag.as_deref(), Some(MOCK_FRESH_ETAG));
        assert_eq!(updated.cached_until, cached_until);
        assert_eq!(repo.get(1).await?, Some(updated));

        Ok(())
    }

    #[tokio::test]
    async fn get_returns_none_for_unknown_alliance() -> Result<(), TestError> {
        let test = test_setup_with_tables!(entity::prelude::EveAlliance)?;

        let result = AllianceRepository::new(&test.db).get(1).await?;

        assert!(result.is_none());

        Ok(())
    }
}
