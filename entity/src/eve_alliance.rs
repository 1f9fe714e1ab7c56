use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "eve_alliance")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub alliance_id: i64,
    pub name: String,
    pub ticker: String,
    pub etag: Option<String>,
    pub updated_at: DateTime,
    pub cached_until: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::eve_corporation::Entity")]
    EveCorporation,
}

impl Related<super::eve_corporation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EveCorporation.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
