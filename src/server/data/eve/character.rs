//! Cached EVE Online characters along with their stored SSO tokens.

use chrono::{NaiveDateTime, Utc};
use eve_esi::model::character::Character;
use sea_orm::{
    sea_query::OnConflict, ActiveModelTrait, ActiveValue, ConnectionTrait, DbErr, EntityTrait,
};

/// Repository for the `eve_character` table.
pub struct CharacterRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> CharacterRepository<'a, C> {
    /// Creates a repository over the given connection or transaction.
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Gets a character by its EVE Online character ID.
    ///
    /// # Arguments
    /// - `character_id` - EVE Online ID of the character
    ///
    /// # Returns
    /// - `Ok(Some(Model))` - The character is cached
    /// - `Ok(None)` - The character has never been stored
    /// - `Err(DbErr)` - The query failed
    pub async fn get(
        &self,
        character_id: i64,
    ) -> Result<Option<entity::eve_character::Model>, DbErr> {
        entity::prelude::EveCharacter::find_by_id(character_id)
            .one(self.db)
            .await
    }

    /// Gets a character along with its corporation.
    pub async fn get_with_corporation(
        &self,
        character_id: i64,
    ) -> Result<
        Option<(
            entity::eve_character::Model,
            Option<entity::eve_corporation::Model>,
        )>,
        DbErr,
    > {
        entity::prelude::EveCharacter::find_by_id(character_id)
            .find_also_related(entity::prelude::EveCorporation)
            .one(self.db)
            .await
    }

    /// Inserts the character or updates the existing row with ESI's latest copy.
    ///
    /// `account_id` is only written when the character is inserted; the owning account and
    /// stored tokens of an existing character are left as they are.
    ///
    /// # Arguments
    /// - `character_id` - EVE Online ID of the character
    /// - `character` - Character as returned by ESI
    /// - `account_id` - Account to own the character if it is new
    /// - `etag` - ETag of the ESI response, if it carried one
    /// - `cached_until` - Time until which the row is considered fresh
    ///
    /// # Returns
    /// - `Ok(Model)` - The inserted or updated character
    /// - `Err(DbErr)` - The write failed, including a missing corporation row
    pub async fn upsert(
        &self,
        character_id: i64,
        character: Character,
        account_id: i32,
        etag: Option<String>,
        cached_until: NaiveDateTime,
    ) -> Result<entity::eve_character::Model, DbErr> {
        let character = entity::eve_character::ActiveModel {
            character_id: ActiveValue::Set(character_id),
            account_id: ActiveValue::Set(account_id),
            corporation_id: ActiveValue::Set(character.corporation_id),
            name: ActiveValue::Set(character.name),
            access_token: ActiveValue::Set(None),
            access_token_expires_at: ActiveValue::Set(None),
            refresh_token: ActiveValue::Set(None),
            etag: ActiveValue::Set(etag),
            updated_at: ActiveValue::Set(Utc::now().naive_utc()),
            cached_until: ActiveValue::Set(cached_until),
        };

        entity::prelude::EveCharacter::insert_many([character])
            .on_conflict(
                OnConflict::column(entity::eve_character::Column::CharacterId)
                    .update_columns([
                        entity::eve_character::Column::CorporationId,
                        entity::eve_character::Column::Name,
                        entity::eve_character::Column::Etag,
                        entity::eve_character::Column::UpdatedAt,
                        entity::eve_character::Column::CachedUntil,
                    ])
                    .to_owned(),
            )
            .exec_with_returning(self.db)
            .await?
            .into_iter()
            .next()
            .ok_or(DbErr::RecordNotInserted)
    }

    /// Writes the set fields of an existing character.
    pub async fn update(
        &self,
        character: entity::eve_character::ActiveModel,
    ) -> Result<entity::eve_character::Model, DbErr> {
        character.update(self.db).await
    }
}
