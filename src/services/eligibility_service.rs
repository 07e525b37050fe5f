use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::info;

use super::identity::{account_age_days, IdentityProvider};
use super::notification_service::{NotificationKind, NotificationService};
use super::settings_service::{CreatorSettings, SettingsService};
use crate::database::entities::{creator_profiles, creator_requests, RequestStatus};
use crate::errors::{StudioError, StudioResult};

/// Verify `age_days` lies inside the self-service window.
///
/// Once an account is older than `max_account_age_days` the window is closed for
/// good; only [`EligibilityService::grant_creator_access`] can still create a profile.
pub fn check_account_age(settings: &CreatorSettings, age_days: i64) -> StudioResult<()> {
    if age_days < settings.min_account_age_days {
        return Err(StudioError::validation(format!(
            "Account must be at least {} days old to request creator access (current age: {} days)",
            settings.min_account_age_days, age_days
        )));
    }
    if age_days > settings.max_account_age_days {
        return Err(StudioError::validation(format!(
            "Creator access can only be requested within {} days of account creation (current age: {} days)",
            settings.max_account_age_days, age_days
        )));
    }
    Ok(())
}

/// Decides who may become a creator and turns approved requests into profiles.
#[derive(Clone)]
pub struct EligibilityService {
    db: DatabaseConnection,
    identity: Arc<dyn IdentityProvider>,
    settings: SettingsService,
    notifications: NotificationService,
}

impl EligibilityService {
    pub fn new(
        db: DatabaseConnection,
        identity: Arc<dyn IdentityProvider>,
        settings: SettingsService,
        notifications: NotificationService,
    ) -> Self {
        Self {
            db,
            identity,
            settings,
            notifications,
        }
    }

    async fn find_profile<C: ConnectionTrait>(
        conn: &C,
        user_id: i32,
    ) -> StudioResult<Option<creator_profiles::Model>> {
        Ok(creator_profiles::Entity::find()
            .filter(creator_profiles::Column::UserId.eq(user_id))
            .one(conn)
            .await?)
    }

    fn new_profile(settings: &CreatorSettings, user_id: i32) -> creator_profiles::ActiveModel {
        creator_profiles::ActiveModel::new(
            user_id,
            settings.default_daily_upload_limit,
            settings.default_daily_storage_limit_gb,
            settings.auto_approve_new_creators,
        )
    }

    pub async fn request_access(&self, user_id: i32) -> StudioResult<creator_requests::Model> {
        let settings = self.settings.load().await?;
        if !settings.is_creator_system_enabled {
            return Err(StudioError::conflict(
                "The creator program is not accepting requests",
            ));
        }

        let created_at = self
            .identity
            .account_created_at(user_id)
            .await?
            .ok_or_else(|| StudioError::not_found("user", user_id))?;
        let age_days = account_age_days(created_at, Utc::now());

        // Insert first so SQLite hands this transaction the write lock before
        // the duplicate checks read; concurrent requests then run one at a time.
        let txn = self.db.begin().await?;

        let request = creator_requests::ActiveModel {
            user_id: Set(user_id),
            status: Set(RequestStatus::Pending),
            account_age_days: Set(age_days),
            rejection_reason: Set(None),
            reviewed_by: Set(None),
            reviewed_at: Set(None),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        if Self::find_profile(&txn, user_id).await?.is_some() {
            return Err(StudioError::conflict(format!(
                "User {} is already a creator",
                user_id
            )));
        }

        let pending = creator_requests::Entity::find()
            .filter(creator_requests::Column::UserId.eq(user_id))
            .filter(creator_requests::Column::Status.eq(RequestStatus::Pending))
            .filter(creator_requests::Column::Id.ne(request.id))
            .count(&txn)
            .await?;
        if pending > 0 {
            return Err(StudioError::conflict(format!(
                "User {} already has a pending creator request",
                user_id
            )));
        }

        check_account_age(&settings, age_days)?;

        txn.commit().await?;

        info!(
            "Creator request {} filed by user {} (account age {} days)",
            request.id, user_id, age_days
        );
        Ok(request)
    }

    /// Flip a pending request to its terminal state. Only one reviewer can win.
    async fn close_request<C: ConnectionTrait>(
        conn: &C,
        request_id: i32,
        admin_id: i32,
        status: RequestStatus,
        rejection_reason: Option<String>,
    ) -> StudioResult<creator_requests::Model> {
        let result = creator_requests::Entity::update_many()
            .set(creator_requests::ActiveModel {
                status: Set(status),
                rejection_reason: Set(rejection_reason),
                reviewed_by: Set(Some(admin_id)),
                reviewed_at: Set(Some(Utc::now())),
                ..Default::default()
            })
            .filter(creator_requests::Column::Id.eq(request_id))
            .filter(creator_requests::Column::Status.eq(RequestStatus::Pending))
            .exec(conn)
            .await?;

        let request = creator_requests::Entity::find_by_id(request_id)
            .one(conn)
            .await?
            .ok_or_else(|| StudioError::not_found("creator request", request_id))?;

        if result.rows_affected == 0 {
            return Err(StudioError::conflict(format!(
                "Creator request {} has already been {}",
                request_id, request.status
            )));
        }
        Ok(request)
    }

    pub async fn approve_request(
        &self,
        request_id: i32,
        admin_id: i32,
    ) -> StudioResult<creator_profiles::Model> {
        let settings = self.settings.load().await?;
        let txn = self.db.begin().await?;

        let request =
            Self::close_request(&txn, request_id, admin_id, RequestStatus::Approved, None).await?;

        if Self::find_profile(&txn, request.user_id).await?.is_some() {
            return Err(StudioError::conflict(format!(
                "User {} is already a creator",
                request.user_id
            )));
        }

        let profile = Self::new_profile(&settings, request.user_id)
            .insert(&txn)
            .await?;

        txn.commit().await?;

        info!(
            "Creator request {} approved by {}; profile {} created",
            request_id, admin_id, profile.id
        );
        self.notifications
            .notify(
                request.user_id,
                NotificationKind::CreatorRequestApproved,
                "Creator access approved",
                format!(
                    "You can now submit content. Daily limits: {} uploads, {} GB.",
                    profile.daily_upload_limit, profile.daily_storage_limit_gb
                ),
                None,
            )
            .await;

        Ok(profile)
    }

    pub async fn reject_request(
        &self,
        request_id: i32,
        admin_id: i32,
        reason: &str,
    ) -> StudioResult<creator_requests::Model> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(StudioError::validation("A rejection reason is required"));
        }

        let txn = self.db.begin().await?;
        let request = Self::close_request(
            &txn,
            request_id,
            admin_id,
            RequestStatus::Rejected,
            Some(reason.to_string()),
        )
        .await?;
        txn.commit().await?;

        info!("Creator request {} rejected by {}", request_id, admin_id);
        self.notifications
            .notify(
                request.user_id,
                NotificationKind::CreatorRequestRejected,
                "Creator access request declined",
                format!("Your request was declined: {}", reason),
                None,
            )
            .await;

        Ok(request)
    }

    /// Administrative override: create a profile regardless of account age.
    pub async fn grant_creator_access(
        &self,
        user_id: i32,
        admin_id: i32,
    ) -> StudioResult<creator_profiles::Model> {
        if self.identity.account_created_at(user_id).await?.is_none() {
            return Err(StudioError::not_found("user", user_id));
        }

        let settings = self.settings.load().await?;
        let txn = self.db.begin().await?;

        // Any open request is settled by the grant; this write also comes first
        // so the transaction holds the write lock before the profile check.
        creator_requests::Entity::update_many()
            .set(creator_requests::ActiveModel {
                status: Set(RequestStatus::Approved),
                reviewed_by: Set(Some(admin_id)),
                reviewed_at: Set(Some(Utc::now())),
                ..Default::default()
            })
            .filter(creator_requests::Column::UserId.eq(user_id))
            .filter(creator_requests::Column::Status.eq(RequestStatus::Pending))
            .exec(&txn)
            .await?;

        if Self::find_profile(&txn, user_id).await?.is_some() {
            return Err(StudioError::conflict(format!(
                "User {} is already a creator",
                user_id
            )));
        }

        let profile = Self::new_profile(&settings, user_id).insert(&txn).await?;

        txn.commit().await?;

        info!(
            "Creator access granted to user {} by {} (profile {})",
            user_id, admin_id, profile.id
        );
        self.notifications
            .notify(
                user_id,
                NotificationKind::CreatorRequestApproved,
                "Creator access granted",
                "An administrator enabled creator access on your account.",
                None,
            )
            .await;

        Ok(profile)
    }

    pub async fn list_pending_requests(&self) -> StudioResult<Vec<creator_requests::Model>> {
        Ok(creator_requests::Entity::find()
            .filter(creator_requests::Column::Status.eq(RequestStatus::Pending))
            .order_by_asc(creator_requests::Column::CreatedAt)
            .order_by_asc(creator_requests::Column::Id)
            .all(&self.db)
            .await?)
    }

    pub async fn get_profile_for_user(
        &self,
        user_id: i32,
    ) -> StudioResult<creator_profiles::Model> {
        Self::find_profile(&self.db, user_id)
            .await?
            .ok_or_else(|| StudioError::not_found("creator profile for user", user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(min: i64, max: i64) -> CreatorSettings {
        CreatorSettings {
            min_account_age_days: min,
            max_account_age_days: max,
            ..Default::default()
        }
    }

    #[test]
    fn test_age_inside_window_passes() {
        assert!(check_account_age(&window(7, 30), 7).is_ok());
        assert!(check_account_age(&window(7, 30), 30).is_ok());
    }

    #[test]
    fn test_too_young_reports_minimum_and_age() {
        let err = check_account_age(&window(7, 30), 2).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("at least 7 days"));
        assert!(message.contains("current age: 2 days"));
    }

    #[test]
    fn test_window_closed_after_maximum() {
        let err = check_account_age(&window(0, 30), 31).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("within 30 days"));
        assert!(message.contains("current age: 31 days"));
    }
}
