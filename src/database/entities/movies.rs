use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Canonical catalog movie. `title` and `slug` are unique across the catalog.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "movies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub title: String,
    #[sea_orm(unique)]
    pub slug: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub genre: String,
    pub year: Option<i32>,
    pub thumbnail_url: String,
    pub banner_url: Option<String>,
    pub video_url: String,
    pub duration_minutes: Option<i32>,
    pub creator_id: i32,
    pub created_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
