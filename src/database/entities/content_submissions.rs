use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

pub use super::common_types::{ContentType, SubmissionStatus};

/// A creator's proposed movie or series awaiting (or past) moderation.
///
/// `series_data` holds the serialised series summary (see
/// [`crate::services::submission_types::SeriesData`]); it is kept as text so a
/// malformed value can be degraded to a default instead of failing the row load.
///
/// `published_movie_id` / `published_series_id` are written once, by the
/// publisher, in the same transaction that creates the catalog entity.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "content_submissions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub creator_id: i32,
    pub content_type: ContentType,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub genre: String,
    pub year: Option<i32>,
    pub thumbnail_url: String,
    pub video_url: Option<String>,
    pub banner_url: Option<String>,
    pub duration_minutes: Option<i32>,
    pub status: SubmissionStatus,
    pub rejection_reason: Option<String>,
    pub reviewed_by: Option<i32>,
    pub reviewed_at: Option<ChronoDateTimeUtc>,
    #[sea_orm(column_type = "Text", nullable)]
    pub series_data: Option<String>,
    pub published_movie_id: Option<i32>,
    pub published_series_id: Option<i32>,
    pub file_size_gb: f64,
    pub created_at: ChronoDateTimeUtc,
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
    #[sea_orm(has_many = "super::submission_episodes::Entity")]
    SubmissionEpisodes,
}

impl Related<super::creator_profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CreatorProfiles.def()
    }
}

impl Related<super::submission_episodes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SubmissionEpisodes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn is_published(&self) -> bool {
        self.published_movie_id.is_some() || self.published_series_id.is_some()
    }
}
