use sea_orm_migration::{prelude::*, schema::*};

use crate::m20251017_000002_eve_alliance::EveAlliance;

static IDX_EVE_CORPORATION_ALLIANCE_ID: &str = "idx-eve_corporation-alliance_id";
static FK_EVE_CORPORATION_ALLIANCE_ID: &str = "fk-eve_corporation-alliance_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(EveCorporation::Table)
                    .if_not_exists()
                    .col(big_integer(EveCorporation::CorporationId).primary_key())
                    .col(big_integer_null(EveCorporation::AllianceId))
                    .col(string(EveCorporation::Name))
                    .col(string(EveCorporation::Ticker))
                    .col(string_null(EveCorporation::Etag))
                    .col(timestamp(EveCorporation::UpdatedAt))
                    .col(timestamp(EveCorporation::CachedUntil))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_EVE_CORPORATION_ALLIANCE_ID)
                            .from(EveCorporation::Table, EveCorporation::AllianceId)
                            .to(EveAlliance::Table, EveAlliance::AllianceId)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_EVE_CORPORATION_ALLIANCE_ID)
                    .table(EveCorporation::Table)
                    .col(EveCorporation::AllianceId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(IDX_EVE_CORPORATION_ALLIANCE_ID)
                    .table(EveCorporation::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(EveCorporation::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum EveCorporation {
    Table,
    CorporationId,
    AllianceId,
    Name,
    Ticker,
    Etag,
    UpdatedAt,
    CachedUntil,
}
