use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::{info, warn};

use super::catalog_cache::CatalogCache;
use super::moderation_service::{invalidate_catalog, publish_approved};
use super::notification_service::{NotificationKind, NotificationService};
use super::publisher_service::CatalogEntry;
use super::quota_service::{quota_day, QuotaService};
use super::submission_types::{
    validate_episodes, ContentPayload, EpisodeInput, SeriesData, SubmissionDetails,
    SubmissionOutcome, SubmissionPayload,
};
use crate::database::entities::{
    content_submissions, creator_profiles, submission_episodes, ContentType, SubmissionStatus,
};
use crate::errors::{StudioError, StudioResult};

/// Refuse anything from a creator that is not `active`.
pub fn ensure_active(profile: &creator_profiles::Model) -> StudioResult<()> {
    if profile.is_active() {
        return Ok(());
    }
    let reason = profile
        .suspension_reason
        .as_deref()
        .map(|r| format!(": {}", r))
        .unwrap_or_default();
    Err(StudioError::Suspension(format!(
        "creator account is {}{}",
        profile.status, reason
    )))
}

/// Accepts creator content into the submission store.
#[derive(Clone)]
pub struct SubmissionService {
    db: DatabaseConnection,
    notifications: NotificationService,
    catalog_cache: Arc<dyn CatalogCache>,
}

impl SubmissionService {
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

    async fn profile_for_user<C: ConnectionTrait>(
        conn: &C,
        user_id: i32,
    ) -> StudioResult<creator_profiles::Model> {
        creator_profiles::Entity::find()
            .filter(creator_profiles::Column::UserId.eq(user_id))
            .one(conn)
            .await?
            .ok_or_else(|| StudioError::not_found("creator profile for user", user_id))
    }

    async fn episodes_of<C: ConnectionTrait>(
        conn: &C,
        submission_id: i32,
    ) -> StudioResult<Vec<submission_episodes::Model>> {
        Ok(submission_episodes::Entity::find()
            .filter(submission_episodes::Column::SubmissionId.eq(submission_id))
            .order_by_asc(submission_episodes::Column::SeasonNumber)
            .order_by_asc(submission_episodes::Column::EpisodeNumber)
            .all(conn)
            .await?)
    }

    async fn insert_episodes<C: ConnectionTrait>(
        conn: &C,
        submission_id: i32,
        episodes: &[EpisodeInput],
    ) -> StudioResult<Vec<submission_episodes::Model>> {
        let mut saved = Vec::with_capacity(episodes.len());
        for episode in episodes {
            let row = submission_episodes::ActiveModel {
                submission_id: Set(submission_id),
                season_number: Set(episode.season_number),
                episode_number: Set(episode.episode_number),
                title: Set(episode.title.clone()),
                description: Set(episode.description.clone()),
                video_url: Set(episode.video_url.clone().unwrap_or_default()),
                thumbnail_url: Set(episode.thumbnail_url.clone()),
                duration_minutes: Set(episode.duration_minutes),
                file_size_gb: Set(episode.file_size_gb),
                created_at: Set(Utc::now()),
                ..Default::default()
            }
            .insert(conn)
            .await?;
            saved.push(row);
        }
        Ok(saved)
    }

    async fn bump_total_uploads<C: ConnectionTrait>(
        conn: &C,
        creator_id: i32,
        uploads: i32,
    ) -> StudioResult<()> {
        creator_profiles::Entity::update_many()
            .col_expr(
                creator_profiles::Column::TotalUploads,
                Expr::col(creator_profiles::Column::TotalUploads).add(uploads),
            )
            .col_expr(creator_profiles::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(creator_profiles::Column::Id.eq(creator_id))
            .exec(conn)
            .await?;
        Ok(())
    }

    pub async fn submit_content(
        &self,
        user_id: i32,
        payload: SubmissionPayload,
    ) -> StudioResult<SubmissionOutcome> {
        let profile = Self::profile_for_user(&self.db, user_id).await?;
        ensure_active(&profile)?;
        payload.validate()?;

        let total_size_gb = payload.total_size_gb();
        let auto_approve = profile.is_auto_approve_enabled;
        let day = quota_day();
        let now = Utc::now();

        let (video_url, episodes, series_data) = match &payload.content {
            ContentPayload::Movie { video_url } => (video_url.clone(), Vec::new(), None),
            ContentPayload::Series {
                episodes,
                series_status,
            } => {
                let data = SeriesData::from_episode_keys(
                    episodes.iter().map(|e| (e.season_number, e.episode_number)),
                    series_status.as_deref(),
                );
                (None, episodes.clone(), Some(data.to_json()))
            }
        };

        let txn = self.db.begin().await?;

        QuotaService::check(&txn, &profile, day, 1, total_size_gb).await?;

        let submission = content_submissions::ActiveModel {
            creator_id: Set(profile.id),
            content_type: Set(payload.content.content_type()),
            title: Set(payload.title.trim().to_string()),
            description: Set(payload.description.trim().to_string()),
            genre: Set(payload.genre.clone().unwrap_or_default()),
            year: Set(payload.year),
            thumbnail_url: Set(payload.thumbnail_url.clone().unwrap_or_default()),
            video_url: Set(video_url),
            banner_url: Set(payload.banner_url.clone()),
            duration_minutes: Set(payload.duration_minutes),
            status: Set(SubmissionStatus::Pending),
            rejection_reason: Set(None),
            reviewed_by: Set(None),
            reviewed_at: Set(None),
            series_data: Set(series_data),
            published_movie_id: Set(None),
            published_series_id: Set(None),
            file_size_gb: Set(payload.file_size_gb),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let episodes = Self::insert_episodes(&txn, submission.id, &episodes).await?;
        QuotaService::commit(&txn, &profile, day, 1, total_size_gb).await?;
        Self::bump_total_uploads(&txn, profile.id, 1).await?;

        let published = if auto_approve {
            Self::auto_approve(&txn, submission.id).await?
        } else {
            None
        };

        txn.commit().await?;

        info!(
            "Submission {} ({} '{}', {:.2} GB, {} episodes) accepted from creator {}",
            submission.id,
            submission.content_type,
            submission.title,
            total_size_gb,
            episodes.len(),
            profile.id
        );

        let submission = content_submissions::Entity::find_by_id(submission.id)
            .one(&self.db)
            .await?
            .ok_or_else(|| StudioError::not_found("submission", submission.id))?;

        if let Some(entry) = published {
            invalidate_catalog(self.catalog_cache.as_ref(), &entry).await;
            self.notifications
                .notify(
                    user_id,
                    NotificationKind::SubmissionPublished,
                    "Your content is live",
                    format!("'{}' was approved automatically and published.", entry.title()),
                    Some(submission.id),
                )
                .await;
            return Ok(SubmissionOutcome {
                submission,
                episodes,
                auto_approved: true,
            });
        }

        self.notifications
            .notify(
                user_id,
                NotificationKind::SubmissionReceived,
                "Submission received",
                format!("'{}' was submitted and is pending review.", submission.title),
                Some(submission.id),
            )
            .await;

        Ok(SubmissionOutcome {
            submission,
            episodes,
            auto_approved: false,
        })
    }

    /// Approve and publish a fresh submission under a savepoint of the intake
    /// transaction. A failed publish rolls the savepoint back, leaving the
    /// submission `pending` for manual review.
    async fn auto_approve(
        txn: &DatabaseTransaction,
        submission_id: i32,
    ) -> StudioResult<Option<CatalogEntry>> {
        let savepoint = txn.begin().await?;

        let now = Utc::now();
        content_submissions::Entity::update_many()
            .set(content_submissions::ActiveModel {
                status: Set(SubmissionStatus::Approved),
                reviewed_at: Set(Some(now)),
                updated_at: Set(now),
                ..Default::default()
            })
            .filter(content_submissions::Column::Id.eq(submission_id))
            .exec(&savepoint)
            .await?;

        match publish_approved(&savepoint, submission_id).await {
            Ok(entry) => {
                savepoint.commit().await?;
                Ok(Some(entry))
            }
            Err(e) => {
                savepoint.rollback().await?;
                warn!(
                    "Auto-approval of submission {} failed, left pending for review: {}",
                    submission_id, e
                );
                Ok(None)
            }
        }
    }

    /// Append episodes to a series the caller owns, charging one upload each.
    pub async fn add_episodes_to_submission(
        &self,
        user_id: i32,
        submission_id: i32,
        new_episodes: Vec<EpisodeInput>,
    ) -> StudioResult<SubmissionDetails> {
        let profile = Self::profile_for_user(&self.db, user_id).await?;
        ensure_active(&profile)?;

        let day = quota_day();
        let txn = self.db.begin().await?;

        // Touch before reading so SQLite grants the write lock up front
        let touched = content_submissions::Entity::update_many()
            .col_expr(content_submissions::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(content_submissions::Column::Id.eq(submission_id))
            .filter(content_submissions::Column::CreatorId.eq(profile.id))
            .exec(&txn)
            .await?;
        if touched.rows_affected == 0 {
            return Err(StudioError::not_found("submission", submission_id));
        }

        let submission = content_submissions::Entity::find_by_id(submission_id)
            .one(&txn)
            .await?
            .ok_or_else(|| StudioError::not_found("submission", submission_id))?;

        if submission.content_type != ContentType::Series {
            return Err(StudioError::validation(
                "Episodes can only be added to a series submission",
            ));
        }
        if submission.is_published() {
            return Err(StudioError::conflict(format!(
                "Submission {} has already been published",
                submission_id
            )));
        }
        if submission.status == SubmissionStatus::Rejected {
            return Err(StudioError::conflict(format!(
                "Submission {} was rejected",
                submission_id
            )));
        }

        let existing = Self::episodes_of(&txn, submission_id).await?;
        let existing_keys: HashSet<(i32, i32)> = existing
            .iter()
            .map(|e| (e.season_number, e.episode_number))
            .collect();
        validate_episodes(&new_episodes, &existing_keys)?;

        let uploads = new_episodes.len() as i32;
        let storage_gb: f64 = new_episodes.iter().map(|e| e.file_size_gb).sum();

        QuotaService::check(&txn, &profile, day, uploads, storage_gb).await?;
        Self::insert_episodes(&txn, submission_id, &new_episodes).await?;
        QuotaService::commit(&txn, &profile, day, uploads, storage_gb).await?;
        Self::bump_total_uploads(&txn, profile.id, uploads).await?;

        let episodes = Self::episodes_of(&txn, submission_id).await?;
        let status = SeriesData::parse_or_default(submission.series_data.as_deref()).status;
        let series_data = SeriesData::from_episode_keys(
            episodes.iter().map(|e| (e.season_number, e.episode_number)),
            Some(&status),
        );

        let mut active: content_submissions::ActiveModel = submission.into();
        active.series_data = Set(Some(series_data.to_json()));
        active.updated_at = Set(Utc::now());
        let submission = active.update(&txn).await?;

        txn.commit().await?;

        info!(
            "Added {} episodes ({:.2} GB) to submission {}; now {} episodes over {} seasons",
            uploads, storage_gb, submission_id, series_data.total_episodes, series_data.total_seasons
        );
        Ok(SubmissionDetails {
            submission,
            episodes,
        })
    }

    /// A submission as its owner sees it; anyone else's is `NotFound`.
    pub async fn get_own_submission(
        &self,
        user_id: i32,
        submission_id: i32,
    ) -> StudioResult<SubmissionDetails> {
        let profile = Self::profile_for_user(&self.db, user_id).await?;
        let submission = content_submissions::Entity::find_by_id(submission_id)
            .filter(content_submissions::Column::CreatorId.eq(profile.id))
            .one(&self.db)
            .await?
            .ok_or_else(|| StudioError::not_found("submission", submission_id))?;
        let episodes = Self::episodes_of(&self.db, submission_id).await?;
        Ok(SubmissionDetails {
            submission,
            episodes,
        })
    }

    /// Moderator view of any submission.
    pub async fn get_submission(&self, submission_id: i32) -> StudioResult<SubmissionDetails> {
        let submission = content_submissions::Entity::find_by_id(submission_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| StudioError::not_found("submission", submission_id))?;
        let episodes = Self::episodes_of(&self.db, submission_id).await?;
        Ok(SubmissionDetails {
            submission,
            episodes,
        })
    }

    pub async fn list_for_user(&self, user_id: i32) -> StudioResult<Vec<content_submissions::Model>> {
        let profile = Self::profile_for_user(&self.db, user_id).await?;
        Ok(content_submissions::Entity::find()
            .filter(content_submissions::Column::CreatorId.eq(profile.id))
            .order_by_desc(content_submissions::Column::CreatedAt)
            .order_by_desc(content_submissions::Column::Id)
            .all(&self.db)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::entities::CreatorStatus;

    fn profile(status: CreatorStatus, reason: Option<&str>) -> creator_profiles::Model {
        let now = Utc::now();
        creator_profiles::Model {
            id: 7,
            user_id: 3,
            status,
            suspension_reason: reason.map(str::to_string),
            daily_upload_limit: 5,
            daily_storage_limit_gb: 10.0,
            is_auto_approve_enabled: false,
            total_uploads: 0,
            total_views: 0,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_active_creator_passes() {
        assert!(ensure_active(&profile(CreatorStatus::Active, None)).is_ok());
    }

    #[test]
    fn test_suspended_creator_refused_with_reason() {
        let err = ensure_active(&profile(
            CreatorStatus::Suspended,
            Some("Automatically suspended after 3 strikes"),
        ))
        .unwrap_err();
        assert_eq!(err.error_code(), "SUSPENSION_ERROR");
        assert!(err.to_string().contains("3 strikes"));
    }

    #[test]
    fn test_banned_creator_refused() {
        let err = ensure_active(&profile(CreatorStatus::Banned, None)).unwrap_err();
        assert!(err.to_string().contains("banned"));
    }
}
