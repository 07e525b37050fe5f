use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Per-creator, per-calendar-day usage counters. A day with no uploads has no row.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "daily_upload_tracking")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub creator_id: i32,
    pub tracking_date: ChronoDate,
    pub uploads_today: i32,
    pub storage_used_today_gb: f64,
    pub updated_at: ChronoDateTimeUtc,
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
