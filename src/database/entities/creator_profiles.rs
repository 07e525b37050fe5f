use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, Set};
use serde::{Deserialize, Serialize};

pub use super::common_types::CreatorStatus;

/// A user's creator identity: standing, daily quota caps and running totals.
///
/// Exactly one row exists per user (`user_id` is unique). Rows are never deleted;
/// suspension and bans are expressed through `status`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "creator_profiles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub user_id: i32,
    pub status: CreatorStatus,
    pub suspension_reason: Option<String>,
    pub daily_upload_limit: i32,
    pub daily_storage_limit_gb: f64,
    pub is_auto_approve_enabled: bool,
    pub total_uploads: i32,
    pub total_views: i64,
    pub created_at: ChronoDateTimeUtc,
    pub updated_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    Users,
    #[sea_orm(has_many = "super::content_submissions::Entity")]
    ContentSubmissions,
    #[sea_orm(has_many = "super::creator_strikes::Entity")]
    CreatorStrikes,
    #[sea_orm(has_many = "super::daily_upload_tracking::Entity")]
    DailyUploadTracking,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::content_submissions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ContentSubmissions.def()
    }
}

impl Related<super::creator_strikes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CreatorStrikes.def()
    }
}

impl Related<super::daily_upload_tracking::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DailyUploadTracking.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    /// New active profile for `user_id` with the given quota caps.
    pub fn new(
        user_id: i32,
        daily_upload_limit: i32,
        daily_storage_limit_gb: f64,
        is_auto_approve_enabled: bool,
    ) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: ActiveValue::NotSet,
            user_id: Set(user_id),
            status: Set(CreatorStatus::Active),
            suspension_reason: Set(None),
            daily_upload_limit: Set(daily_upload_limit),
            daily_storage_limit_gb: Set(daily_storage_limit_gb),
            is_auto_approve_enabled: Set(is_auto_approve_enabled),
            total_uploads: Set(0),
            total_views: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
        }
    }
}

impl Model {
    pub fn is_active(&self) -> bool {
        self.status == CreatorStatus::Active
    }
}
