pub use sea_orm_migration::prelude::*;

mod m20251017_000001_account;
mod m20251017_000002_eve_alliance;
mod m20251017_000003_eve_corporation;
mod m20251017_000004_eve_character;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20251017_000001_account::Migration),
            Box::new(m20251017_000002_eve_alliance::Migration),
            Box::new(m20251017_000003_eve_corporation::Migration),
            Box::new(m20251017_000004_eve_character::Migration),
        ]
    }
}
