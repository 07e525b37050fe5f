use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::{debug, warn};

use crate::database::entities::notifications;
use crate::errors::{StudioError, StudioResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationKind {
    CreatorRequestApproved,
    CreatorRequestRejected,
    SubmissionReceived,
    SubmissionPublished,
    SubmissionRejected,
    StrikeIssued,
    AccountSuspended,
    AccountReinstated,
    AccountBanned,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::CreatorRequestApproved => "creator_request_approved",
            NotificationKind::CreatorRequestRejected => "creator_request_rejected",
            NotificationKind::SubmissionReceived => "submission_received",
            NotificationKind::SubmissionPublished => "submission_published",
            NotificationKind::SubmissionRejected => "submission_rejected",
            NotificationKind::StrikeIssued => "strike_issued",
            NotificationKind::AccountSuspended => "account_suspended",
            NotificationKind::AccountReinstated => "account_reinstated",
            NotificationKind::AccountBanned => "account_banned",
        }
    }
}

/// Writes notification records for an external delivery system to pick up.
///
/// [`NotificationService::notify`] never fails its caller: the triggering
/// operation has already committed by the time a notification is written.
#[derive(Clone)]
pub struct NotificationService {
    db: DatabaseConnection,
}

impl NotificationService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn notify(
        &self,
        user_id: i32,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
        submission_id: Option<i32>,
    ) {
        let record = notifications::ActiveModel {
            user_id: Set(user_id),
            notification_type: Set(kind.as_str().to_string()),
            title: Set(title.into()),
            message: Set(message.into()),
            submission_id: Set(submission_id),
            is_read: Set(false),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        match record.insert(&self.db).await {
            Ok(saved) => debug!(
                "Queued {} notification {} for user {}",
                kind.as_str(),
                saved.id,
                user_id
            ),
            Err(e) => warn!(
                "Failed to record {} notification for user {}: {}",
                kind.as_str(),
                user_id,
                e
            ),
        }
    }

    pub async fn list_for_user(&self, user_id: i32) -> StudioResult<Vec<notifications::Model>> {
        let records = notifications::Entity::find()
            .filter(notifications::Column::UserId.eq(user_id))
            .order_by_desc(notifications::Column::CreatedAt)
            .order_by_desc(notifications::Column::Id)
            .all(&self.db)
            .await?;
        Ok(records)
    }

    pub async fn mark_read(
        &self,
        user_id: i32,
        notification_id: i32,
    ) -> StudioResult<notifications::Model> {
        let record = notifications::Entity::find_by_id(notification_id)
            .filter(notifications::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
            .ok_or_else(|| StudioError::not_found("notification", notification_id))?;

        if record.is_read {
            return Ok(record);
        }

        let mut active: notifications::ActiveModel = record.into();
        active.is_read = Set(true);
        Ok(active.update(&self.db).await?)
    }
}
