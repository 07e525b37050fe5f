use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "submission_episodes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub submission_id: i32,
    pub season_number: i32,
    pub episode_number: i32,
    pub title: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub video_url: String,
    pub thumbnail_url: Option<String>,
    pub duration_minutes: Option<i32>,
    pub file_size_gb: f64,
    pub created_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::content_submissions::Entity",
        from = "Column::SubmissionId",
        to = "super::content_submissions::Column::Id",
        on_delete = "Cascade"
    )]
    ContentSubmissions,
}

impl Related<super::content_submissions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ContentSubmissions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
