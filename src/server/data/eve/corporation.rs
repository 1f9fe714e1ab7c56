//! Cached EVE Online corporations.

use chrono::{NaiveDateTime, Utc};
use eve_esi::model::corporation::Corporation;
use sea_orm::{sea_query::OnConflict, ActiveValue, ConnectionTrait, DbErr, EntityTrait};

/// Repository for the `eve_corporation` table.
pub struct CorporationRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> CorporationRepository<'a, C> {
    /// Creates a repository over the given connection or transaction.
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Gets a corporation along with the alliance it belongs to, if any.
    pub async fn get_with_alliance(
        &self,
        corporation_id: i64,
    ) -> Result<
        Option<(
            entity::eve_corporation::Model,
            Option<entity::eve_alliance::Model>,
        )>,
        DbErr,
    > {
        entity::prelude::EveCorporation::find_by_id(corporation_id)
            .find_also_related(entity::prelude::EveAlliance)
            .one(self.db)
            .await
    }

    /// Inserts the corporation or updates the existing row with ESI's latest copy.
    ///
    /// `alliance_id` is passed separately from the ESI model as it must name a stored
    /// alliance, `None` when the corporation's alliance could not be resolved.
    ///
    /// # Returns
    /// - `Ok(Model)` - The inserted or updated corporation
    /// - `Err(DbErr)` - The write failed, including a missing alliance row
    pub async fn upsert(
        &self,
        corporation_id: i64,
        corporation: Corporation,
        alliance_id: Option<i64>,
        etag: Option<String>,
        cached_until: NaiveDateTime,
    ) -> Result<entity::eve_corporation::Model, DbErr> {
        let corporation = entity::eve_corporation::ActiveModel {
            corporation_id: ActiveValue::Set(corporation_id),
            alliance_id: ActiveValue::Set(alliance_id),
            name: ActiveValue::Set(corporation.name),
            ticker: ActiveValue::Set(corporation.ticker),
            etag: ActiveValue::Set(etag),
            updated_at: ActiveValue::Set(Utc::now().naive_utc()),
            cached_until: ActiveValue::Set(cached_until),
        };

        entity::prelude::EveCorporation::insert_many([corporation])
            .on_conflict(
                OnConflict::column(entity::eve_corporation::Column::CorporationId)
                    .update_columns([
                        entity::eve_corporation::Column::AllianceId,
                        entity::eve_corporation::Column::Name,
                        entity::eve_corporation::Column::Ticker,
                        entity::eve_corporation::Column::Etag,
                        entity::eve_corporation::Column::UpdatedAt,
                        entity::eve_corporation::Column::CachedUntil,
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
