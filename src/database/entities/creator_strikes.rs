use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Append-only violation record. Rows are never updated or deleted.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "creator_strikes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub creator_id: i32,
    pub reason: String,
    pub issued_by: i32,
    pub issued_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::creator_profiles::Entity",
        from = "Column::CreatorId",
        to = "super::creator_profiles::Column::Id"
    )]
    CreatorProfiles,
}

impl Related<super::creator_profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CreatorProfiles.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
