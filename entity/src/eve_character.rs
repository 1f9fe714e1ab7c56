use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "eve_character")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub character_id: i64,
    pub account_id: i32,
    pub corporation_id: i64,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub access_token: Option<String>,
    pub access_token_expires_at: Option<DateTime>,
    #[sea_orm(column_type = "Text", nullable)]
    pub refresh_token: Option<String>,
    pub etag: Option<String>,
    pub updated_at: DateTime,
    pub cached_until: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::AccountId",
        to = "super::account::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Account,
    #[sea_orm(
        belongs_to = "super::eve_corporation::Entity",
        from = "Column::CorporationId",
        to = "super::eve_corporation::Column::CorporationId",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    EveCorporation,
}

impl Related<super::account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl Related<super::eve_corporation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EveCorporation.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
