use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(EveAlliance::Table)
                    .if_not_exists()
                    .col(big_integer(EveAlliance::AllianceId).primary_key())
                    .col(string(EveAlliance::Name))
                    .col(string(EveAlliance::Ticker))
                    .col(string_null(EveAlliance::Etag))
                    .col(timestamp(EveAlliance::UpdatedAt))
                    .col(timestamp(EveAlliance::CachedUntil))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EveAlliance::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum EveAlliance {
    Table,
    AllianceId,
    Name,
    Ticker,
    Etag,
    UpdatedAt,
    CachedUntil,
}
