//! Database row fixtures for the entity cache tables.
//!
//! Rows are inserted directly through sea-orm active models so tests can choose the
//! `cached_until` a row starts with. Stored rows carry [`MOCK_STORED_ETAG`].

use chrono::{NaiveDateTime, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, DbErr};

use crate::{constant::MOCK_STORED_ETAG, fixtures::eve::EveFixtures};

impl<'a> EveFixtures<'a> {
    pub async fn insert_mock_account(&self) -> Result<entity::account::Model, DbErr> {
        entity::account::ActiveModel {
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        }
        .insert(&self.setup.db)
        .await
    }

    pub async fn insert_mock_alliance(
        &self,
        alliance_id: i64,
        cached_until: NaiveDateTime,
    ) -> Result<entity::eve_alliance::Model, DbErr> {
        entity::eve_alliance::ActiveModel {
            alliance_id: ActiveValue::Set(alliance_id),
            name: ActiveValue::Set("Stored Alliance".to_string()),
            ticker: ActiveValue::Set("STORE".to_string()),
            etag: ActiveValue::Set(Some(MOCK_STORED_ETAG.to_string())),
            updated_at: ActiveValue::Set(Utc::now().naive_utc()),
            cached_until: ActiveValue::Set(cached_until),
        }
        .insert(&self.setup.db)
        .await
    }

    /// Insert a corporation row; the alliance row, if any, must already exist.
    pub async fn insert_mock_corporation(
        &self,
        corporation_id: i64,
        alliance_id: Option<i64>,
        cached_until: NaiveDateTime,
    ) -> Result<entity::eve_corporation::Model, DbErr> {
        entity::eve_corporation::ActiveModel {
            corporation_id: ActiveValue::Set(corporation_id),
            alliance_id: ActiveValue::Set(alliance_id),
            name: ActiveValue::Set("Stored Corporation".to_string()),
            ticker: ActiveValue::Set("STCRP".to_string()),
            etag: ActiveValue::Set(Some(MOCK_STORED_ETAG.to_string())),
            updated_at: ActiveValue::Set(Utc::now().naive_utc()),
            cached_until: ActiveValue::Set(cached_until),
        }
        .insert(&self.setup.db)
        .await
    }

    /// Insert a character row owned by a freshly created account; the corporation row
    /// must already exist.
    pub async fn insert_mock_character(
        &self,
        character_id: i64,
        corporation_id: i64,
        cached_until: NaiveDateTime,
    ) -> Result<entity::eve_character::Model, DbErr> {
        let account = self.insert_mock_account().await?;

        entity::eve_character::ActiveModel {
            character_id: ActiveValue::Set(character_id),
            account_id: ActiveValue::Set(account.id),
            corporation_id: ActiveValue::Set(corporation_id),
            name: ActiveValue::Set("Stored Character".to_string()),
            access_token: ActiveValue::Set(None),
            access_token_expires_at: ActiveValue::Set(None),
            refresh_token: ActiveValue::Set(None),
            etag: ActiveValue::Set(Some(MOCK_STORED_ETAG.to_string())),
            updated_at: ActiveValue::Set(Utc::now().naive_utc()),
            cached_until: ActiveValue::Set(cached_until),
        }
        .insert(&self.setup.db)
        .await
    }
}
