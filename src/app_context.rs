use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tracing::instrument;

use crate::database::entities::{
    content_submissions, creator_profiles, creator_requests, creator_strikes, notifications,
};
use crate::errors::{OperationResult, StudioError, StudioResult};
use crate::services::quota_service::quota_day;
use crate::services::{
    ApprovalOutcome, CatalogCache, CreatorSettings, DatabaseIdentityProvider, EligibilityService,
    EpisodeInput, IdentityProvider, LoggingCatalogCache, ModerationService, NotificationService,
    QuotaService, QuotaStatus, SettingsService, SettingsUpdate, StrikeOutcome, StrikeService,
    SubmissionDetails, SubmissionOutcome, SubmissionPayload, SubmissionService,
};

/// Caller-facing entry point to the creator pipeline.
///
/// Every operation returns an [`OperationResult`] envelope; errors are reported
/// in it rather than propagated.
#[derive(Clone)]
pub struct CreatorStudio {
    settings: SettingsService,
    notifications: NotificationService,
    quota: QuotaService,
    eligibility: Arc<EligibilityService>,
    submissions: Arc<SubmissionService>,
    moderation: Arc<ModerationService>,
    strikes: Arc<StrikeService>,
}

impl CreatorStudio {
    /// Wire the pipeline with the `users` table as identity source and no catalog cache.
    pub fn new(db: DatabaseConnection) -> Self {
        let identity = Arc::new(DatabaseIdentityProvider::new(db.clone()));
        Self::with_collaborators(db, identity, Arc::new(LoggingCatalogCache))
    }

    pub fn with_collaborators(
        db: DatabaseConnection,
        identity: Arc<dyn IdentityProvider>,
        catalog_cache: Arc<dyn CatalogCache>,
    ) -> Self {
        let settings = SettingsService::new(db.clone());
        let notifications = NotificationService::new(db.clone());
        let quota = QuotaService::new(db.clone());
        let eligibility = Arc::new(EligibilityService::new(
            db.clone(),
            identity,
            settings.clone(),
            notifications.clone(),
        ));
        let submissions = Arc::new(SubmissionService::new(
            db.clone(),
            notifications.clone(),
            catalog_cache.clone(),
        ));
        let moderation = Arc::new(ModerationService::new(
            db.clone(),
            notifications.clone(),
            catalog_cache,
        ));
        let strikes = Arc::new(StrikeService::new(
            db.clone(),
            settings.clone(),
            notifications.clone(),
        ));

        Self {
            settings,
            notifications,
            quota,
            eligibility,
            submissions,
            moderation,
            strikes,
        }
    }

    // ----- Eligibility ------------------------------------------------------
    #[instrument(skip(self))]
    pub async fn request_access(&self, user_id: i32) -> OperationResult<creator_requests::Model> {
        self.eligibility.request_access(user_id).await.into()
    }

    #[instrument(skip(self))]
    pub async fn approve_request(
        &self,
        request_id: i32,
        admin_id: i32,
    ) -> OperationResult<creator_profiles::Model> {
        self.eligibility
            .approve_request(request_id, admin_id)
            .await
            .into()
    }

    #[instrument(skip(self))]
    pub async fn reject_request(
        &self,
        request_id: i32,
        admin_id: i32,
        reason: &str,
    ) -> OperationResult<creator_requests::Model> {
        self.eligibility
            .reject_request(request_id, admin_id, reason)
            .await
            .into()
    }

    #[instrument(skip(self))]
    pub async fn grant_creator_access(
        &self,
        user_id: i32,
        admin_id: i32,
    ) -> OperationResult<creator_profiles::Model> {
        self.eligibility
            .grant_creator_access(user_id, admin_id)
            .await
            .into()
    }

    pub async fn list_pending_requests(&self) -> OperationResult<Vec<creator_requests::Model>> {
        self.eligibility.list_pending_requests().await.into()
    }

    pub async fn creator_profile(&self, user_id: i32) -> OperationResult<creator_profiles::Model> {
        self.eligibility.get_profile_for_user(user_id).await.into()
    }

    // ----- Quota ------------------------------------------------------------
    pub async fn quota_status(&self, user_id: i32) -> OperationResult<QuotaStatus> {
        let status: StudioResult<QuotaStatus> = async {
            let profile = self.eligibility.get_profile_for_user(user_id).await?;
            self.quota.quota_status(&profile, quota_day()).await
        }
        .await;
        status.into()
    }

    // ----- Submissions ------------------------------------------------------
    #[instrument(skip(self, payload), fields(title = %payload.title))]
    pub async fn submit_content(
        &self,
        user_id: i32,
        payload: SubmissionPayload,
    ) -> OperationResult<SubmissionOutcome> {
        self.submissions.submit_content(user_id, payload).await.into()
    }

    #[instrument(skip(self, episodes), fields(count = episodes.len()))]
    pub async fn add_episodes_to_submission(
        &self,
        user_id: i32,
        submission_id: i32,
        episodes: Vec<EpisodeInput>,
    ) -> OperationResult<SubmissionDetails> {
        self.submissions
            .add_episodes_to_submission(user_id, submission_id, episodes)
            .await
            .into()
    }

    pub async fn get_my_submission(
        &self,
        user_id: i32,
        submission_id: i32,
    ) -> OperationResult<SubmissionDetails> {
        self.submissions
            .get_own_submission(user_id, submission_id)
            .await
            .into()
    }

    /// Any creator's submission, for moderators.
    pub async fn get_submission(&self, submission_id: i32) -> OperationResult<SubmissionDetails> {
        self.submissions.get_submission(submission_id).await.into()
    }

    pub async fn list_my_submissions(
        &self,
        user_id: i32,
    ) -> OperationResult<Vec<content_submissions::Model>> {
        self.submissions.list_for_user(user_id).await.into()
    }

    // ----- Moderation -------------------------------------------------------
    #[instrument(skip(self))]
    pub async fn approve_submission(
        &self,
        submission_id: i32,
        admin_id: i32,
    ) -> OperationResult<ApprovalOutcome> {
        self.moderation
            .approve_submission(submission_id, admin_id)
            .await
            .into()
    }

    #[instrument(skip(self))]
    pub async fn reject_submission(
        &self,
        submission_id: i32,
        admin_id: i32,
        reason: &str,
    ) -> OperationResult<content_submissions::Model> {
        self.moderation
            .reject_submission(submission_id, admin_id, reason)
            .await
            .into()
    }

    pub async fn list_pending_submissions(
        &self,
    ) -> OperationResult<Vec<content_submissions::Model>> {
        self.moderation.list_pending_submissions().await.into()
    }

    // ----- Strikes ----------------------------------------------------------
    #[instrument(skip(self))]
    pub async fn add_strike(
        &self,
        creator_id: i32,
        reason: &str,
        issued_by: i32,
    ) -> OperationResult<StrikeOutcome> {
        self.strikes
            .add_strike(creator_id, reason, issued_by)
            .await
            .into()
    }

    #[instrument(skip(self))]
    pub async fn suspend_creator(
        &self,
        creator_id: i32,
        admin_id: i32,
        reason: &str,
    ) -> OperationResult<creator_profiles::Model> {
        self.strikes
            .suspend_creator(creator_id, admin_id, reason)
            .await
            .into()
    }

    #[instrument(skip(self))]
    pub async fn unsuspend_creator(
        &self,
        creator_id: i32,
        admin_id: i32,
    ) -> OperationResult<creator_profiles::Model> {
        self.strikes
            .unsuspend_creator(creator_id, admin_id)
            .await
            .into()
    }

    #[instrument(skip(self))]
    pub async fn ban_creator(
        &self,
        creator_id: i32,
        admin_id: i32,
        reason: &str,
    ) -> OperationResult<creator_profiles::Model> {
        self.strikes
            .ban_creator(creator_id, admin_id, reason)
            .await
            .into()
    }

    pub async fn list_strikes(&self, creator_id: i32) -> OperationResult<Vec<creator_strikes::Model>> {
        self.strikes.list_strikes(creator_id).await.into()
    }

    // ----- Notifications ----------------------------------------------------
    pub async fn notifications(&self, user_id: i32) -> OperationResult<Vec<notifications::Model>> {
        self.notifications.list_for_user(user_id).await.into()
    }

    pub async fn mark_notification_read(
        &self,
        user_id: i32,
        notification_id: i32,
    ) -> OperationResult<notifications::Model> {
        self.notifications
            .mark_read(user_id, notification_id)
            .await
            .into()
    }

    // ----- Settings ---------------------------------------------------------
    pub async fn settings(&self) -> OperationResult<CreatorSettings> {
        self.settings.load().await.into()
    }

    #[instrument(skip(self))]
    pub async fn update_settings(&self, patch: SettingsUpdate) -> OperationResult<CreatorSettings> {
        self.settings.update(patch).await.into()
    }

    pub async fn seed_settings(&self) -> OperationResult<CreatorSettings> {
        self.settings.seed_defaults().await.into()
    }

    /// Envelope for a caller that could not be identified.
    pub fn unauthenticated<T>() -> OperationResult<T> {
        OperationResult::failure(&StudioError::AuthenticationRequired)
    }
}
