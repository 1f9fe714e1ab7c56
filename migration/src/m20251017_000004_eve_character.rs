use sea_orm_migration::{prelude::*, schema::*};

use crate::{
    m20251017_000001_account::Account, m20251017_000003_eve_corporation::EveCorporation,
};

static IDX_EVE_CHARACTER_ACCOUNT_ID: &str = "idx-eve_character-account_id";
static IDX_EVE_CHARACTER_CORPORATION_ID: &str = "idx-eve_character-corporation_id";
static FK_EVE_CHARACTER_ACCOUNT_ID: &str = "fk-eve_character-account_id";
static FK_EVE_CHARACTER_CORPORATION_ID: &str = "fk-eve_character-corporation_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(EveCharacter::Table)
                    .if_not_exists()
                    .col(big_integer(EveCharacter::CharacterId).primary_key())
                    .col(integer(EveCharacter::AccountId))
                    .col(big_integer(EveCharacter::CorporationId))
                    .col(string(EveCharacter::Name))
                    .col(text_null(EveCharacter::AccessToken))
                    .col(timestamp_null(EveCharacter::AccessTokenExpiresAt))
                    .col(text_null(EveCharacter::RefreshToken))
                    .col(string_null(EveCharacter::Etag))
                    .col(timestamp(EveCharacter::UpdatedAt))
                    .col(timestamp(EveCharacter::CachedUntil))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_EVE_CHARACTER_ACCOUNT_ID)
                            .from(EveCharacter::Table, EveCharacter::AccountId)
                            .to(Account::Table, Account::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_EVE_CHARACTER_CORPORATION_ID)
                            .from(EveCharacter::Table, EveCharacter::CorporationId)
                            .to(EveCorporation::Table, EveCorporation::CorporationId)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_EVE_CHARACTER_ACCOUNT_ID)
                    .table(EveCharacter::Table)
                    .col(EveCharacter::AccountId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_EVE_CHARACTER_CORPORATION_ID)
                    .table(EveCharacter::Table)
                    .col(EveCharacter::CorporationId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(IDX_EVE_CHARACTER_CORPORATION_ID)
                    .table(EveCharacter::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(IDX_EVE_CHARACTER_ACCOUNT_ID)
                    .table(EveCharacter::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(EveCharacter::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum EveCharacter {
    Table,
    CharacterId,
    AccountId,
    CorporationId,
    Name,
    AccessToken,
    AccessTokenExpiresAt,
    RefreshToken,
    Etag,
    UpdatedAt,
    CachedUntil,
}
