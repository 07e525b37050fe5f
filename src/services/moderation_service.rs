use std::sync::Arc;

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::Serialize;
use tracing::{info, warn};

use super::catalog_cache::{CatalogCache, CatalogScope};
use super::notification_service::{NotificationKind, NotificationService};
use super::publisher_service::{CatalogEntry, Publisher};
use crate::database::entities::{content_submissions, creator_profiles, SubmissionStatus};
use crate::errors::{StudioError, StudioResult};

/// Result of a successful approval: the linked submission and what was published.
#[derive(Clone, Debug, Serialize)]
pub struct ApprovalOutcome {
    pub submission: content_submissions::Model,
    pub catalog: CatalogEntry,
}

async fn load_submission<C: ConnectionTrait>(
    conn: &C,
    submission_id: i32,
) -> StudioResult<content_submissions::Model> {
    content_submissions::Entity::find_by_id(submission_id)
        .one(conn)
        .await?
        .ok_or_else(|| StudioError::not_found("submission", submission_id))
}

/// Claim an approved, unpublished submission for publishing.
///
/// Must be the first statement of the publishing transaction: SQLite only waits
/// for the write lock when a transaction opens with a write, so reading first
/// would fail with `database is locked` under concurrent publishers.
async fn claim_for_publish<C: ConnectionTrait>(
    conn: &C,
    submission_id: i32,
) -> StudioResult<content_submissions::Model> {
    let result = content_submissions::Entity::update_many()
        .col_expr(content_submissions::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(content_submissions::Column::Id.eq(submission_id))
        .filter(content_submissions::Column::Status.eq(SubmissionStatus::Approved))
        .filter(content_submissions::Column::PublishedMovieId.is_null())
        .filter(content_submissions::Column::PublishedSeriesId.is_null())
        .exec(conn)
        .await?;

    let submission = load_submission(conn, submission_id).await?;
    if result.rows_affected == 0 {
        return Err(if submission.is_published() {
            StudioError::publish(format!(
                "Submission {} has already been published",
                submission_id
            ))
        } else {
            StudioError::publish(format!(
                "Submission {} is {}, not approved",
                submission_id, submission.status
            ))
        });
    }
    Ok(submission)
}

/// Publish an approved submission on `conn`, the caller's transaction or savepoint.
pub async fn publish_approved<C>(conn: &C, submission_id: i32) -> StudioResult<CatalogEntry>
where
    C: ConnectionTrait + TransactionTrait,
{
    let submission = claim_for_publish(conn, submission_id).await?;
    Publisher::publish(conn, &submission).await
}

pub async fn invalidate_catalog(catalog_cache: &dyn CatalogCache, entry: &CatalogEntry) {
    let scope = match entry {
        CatalogEntry::Movie { movie } => CatalogScope::Movie(movie.id),
        CatalogEntry::Series { series, .. } => CatalogScope::Series(series.id),
    };
    catalog_cache.invalidate(scope).await;
}

/// Undo step one of the saga: put an approved, unpublished submission back in the queue.
async fn compensate(db: &DatabaseConnection, submission_id: i32) -> StudioResult<()> {
    let result = content_submissions::Entity::update_many()
        .set(content_submissions::ActiveModel {
            status: Set(SubmissionStatus::Pending),
            reviewed_by: Set(None),
            reviewed_at: Set(None),
            updated_at: Set(Utc::now()),
            ..Default::default()
        })
        .filter(content_submissions::Column::Id.eq(submission_id))
        .filter(content_submissions::Column::Status.eq(SubmissionStatus::Approved))
        .filter(content_submissions::Column::PublishedMovieId.is_null())
        .filter(content_submissions::Column::PublishedSeriesId.is_null())
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        warn!(
            "Compensation found submission {} no longer approved-and-unpublished",
            submission_id
        );
    }
    Ok(())
}

/// Steps two and three of the approval saga.
///
/// Publishes the already-approved submission in its own transaction. If that
/// fails the submission is returned to `pending` and a `Publish` error is
/// reported; on success the catalog cache is invalidated.
async fn publish_or_compensate(
    db: &DatabaseConnection,
    catalog_cache: &dyn CatalogCache,
    submission_id: i32,
) -> StudioResult<(content_submissions::Model, CatalogEntry)> {
    let txn = db.begin().await?;
    let published = match publish_approved(&txn, submission_id).await {
        Ok(entry) => txn.commit().await.map(|_| entry).map_err(StudioError::from),
        Err(e) => {
            if let Err(rollback) = txn.rollback().await {
                warn!(
                    "Rollback of failed publish for submission {} failed: {}",
                    submission_id, rollback
                );
            }
            Err(e)
        }
    };

    let entry = match published {
        Ok(entry) => entry,
        Err(e) => {
            warn!(
                "Publishing submission {} failed, compensating to pending: {}",
                submission_id, e
            );
            compensate(db, submission_id).await?;
            return Err(match e {
                StudioError::Publish(_) => e,
                other => StudioError::publish(other.to_string()),
            });
        }
    };

    invalidate_catalog(catalog_cache, &entry).await;

    let submission = load_submission(db, submission_id).await?;
    Ok((submission, entry))
}

/// Moves submissions from `pending` to a terminal decision.
#[derive(Clone)]
pub struct ModerationService {
    db: DatabaseConnection,
    notifications: NotificationService,
    catalog_cache: Arc<dyn CatalogCache>,
}

impl ModerationService {
    pub fn new(
        db: DatabaseConnection,
        notifications: NotificationService,
        catalog_cache: Arc<dyn CatalogCache>,
    ) -> Self {
        Self {
            db,
            notifications,
            catalog_cache,
        }
    }

    /// Conditionally flip `pending` to `status`; losing a race is a conflict.
    async fn decide(
        &self,
        submission_id: i32,
        admin_id: i32,
        status: SubmissionStatus,
        rejection_reason: Option<String>,
    ) -> StudioResult<content_submissions::Model> {
        let submission = load_submission(&self.db, submission_id).await?;
        if submission.status != SubmissionStatus::Pending {
            return Err(StudioError::conflict(format!(
                "Submission {} has already been {}",
                submission_id, submission.status
            )));
        }

        let now = Utc::now();
        let result = content_submissions::Entity::update_many()
            .set(content_submissions::ActiveModel {
                status: Set(status),
                rejection_reason: Set(rejection_reason),
                reviewed_by: Set(Some(admin_id)),
                reviewed_at: Set(Some(now)),
                updated_at: Set(now),
                ..Default::default()
            })
            .filter(content_submissions::Column::Id.eq(submission_id))
            .filter(content_submissions::Column::Status.eq(SubmissionStatus::Pending))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(StudioError::conflict(format!(
                "Submission {} is no longer pending",
                submission_id
            )));
        }

        load_submission(&self.db, submission_id).await
    }

    async fn creator_user_id(&self, creator_id: i32) -> Option<i32> {
        match creator_profiles::Entity::find_by_id(creator_id)
            .one(&self.db)
            .await
        {
            Ok(Some(profile)) => Some(profile.user_id),
            Ok(None) => {
                warn!("Creator profile {} missing, skipping notification", creator_id);
                None
            }
            Err(e) => {
                warn!("Could not load creator profile {}: {}", creator_id, e);
                None
            }
        }
    }

    pub async fn approve_submission(
        &self,
        submission_id: i32,
        admin_id: i32,
    ) -> StudioResult<ApprovalOutcome> {
        self.decide(submission_id, admin_id, SubmissionStatus::Approved, None)
            .await?;
        info!("Submission {} approved by {}", submission_id, admin_id);

        let (submission, catalog) =
            publish_or_compensate(&self.db, self.catalog_cache.as_ref(), submission_id).await?;

        if let Some(user_id) = self.creator_user_id(submission.creator_id).await {
            self.notifications
                .notify(
                    user_id,
                    NotificationKind::SubmissionPublished,
                    "Your content is live",
                    format!(
                        "'{}' was approved and published as '{}'.",
                        submission.title,
                        catalog.title()
                    ),
                    Some(submission.id),
                )
                .await;
        }

        Ok(ApprovalOutcome {
            submission,
            catalog,
        })
    }

    /// Reject with a reason. Quota already charged is kept and no strike is issued.
    pub async fn reject_submission(
        &self,
        submission_id: i32,
        admin_id: i32,
        reason: &str,
    ) -> StudioResult<content_submissions::Model> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(StudioError::validation("A rejection reason is required"));
        }

        let submission = self
            .decide(
                submission_id,
                admin_id,
                SubmissionStatus::Rejected,
                Some(reason.to_string()),
            )
            .await?;
        info!("Submission {} rejected by {}", submission_id, admin_id);

        if let Some(user_id) = self.creator_user_id(submission.creator_id).await {
            self.notifications
                .notify(
                    user_id,
                    NotificationKind::SubmissionRejected,
                    "Submission not approved",
                    format!("'{}' was rejected: {}", submission.title, reason),
                    Some(submission.id),
                )
                .await;
        }

        Ok(submission)
    }

    /// Oldest first.
    pub async fn list_pending_submissions(&self) -> StudioResult<Vec<content_submissions::Model>> {
        Ok(content_submissions::Entity::find()
            .filter(content_submissions::Column::Status.eq(SubmissionStatus::Pending))
            .order_by_asc(content_submissions::Column::CreatedAt)
            .order_by_asc(content_submissions::Column::Id)
            .all(&self.db)
            .await?)
    }
}
