use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::Serialize;
use tracing::info;

use super::notification_service::{NotificationKind, NotificationService};
use super::settings_service::SettingsService;
use crate::database::entities::{creator_profiles, creator_strikes, CreatorStatus};
use crate::errors::{StudioError, StudioResult};

pub fn auto_suspension_reason(total_strikes: u64) -> String {
    format!("Automatically suspended after {} strikes", total_strikes)
}

#[derive(Clone, Debug, Serialize)]
pub struct StrikeOutcome {
    pub strike: creator_strikes::Model,
    pub total_strikes: u64,
    pub suspended: bool,
}

/// Records violations and governs creator standing.
#[derive(Clone)]
pub struct StrikeService {
    db: DatabaseConnection,
    settings: SettingsService,
    notifications: NotificationService,
}

impl StrikeService {
    pub fn new(
        db: DatabaseConnection,
        settings: SettingsService,
        notifications: NotificationService,
    ) -> Self {
        Self {
            db,
            settings,
            notifications,
        }
    }

    async fn load_profile<C: ConnectionTrait>(
        conn: &C,
        creator_id: i32,
    ) -> StudioResult<creator_profiles::Model> {
        creator_profiles::Entity::find_by_id(creator_id)
            .one(conn)
            .await?
            .ok_or_else(|| StudioError::not_found("creator profile", creator_id))
    }

    /// Touch the profile row and return it. Opens a transaction with a write so
    /// SQLite takes the write lock up front instead of failing a later upgrade.
    async fn lock_profile<C: ConnectionTrait>(
        conn: &C,
        creator_id: i32,
    ) -> StudioResult<creator_profiles::Model> {
        let touched = creator_profiles::Entity::update_many()
            .col_expr(creator_profiles::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(creator_profiles::Column::Id.eq(creator_id))
            .exec(conn)
            .await?;
        if touched.rows_affected == 0 {
            return Err(StudioError::not_found("creator profile", creator_id));
        }
        Self::load_profile(conn, creator_id).await
    }

    /// Move a profile from one of `from` to `to`. A profile in any other state
    /// (or one changed concurrently) is a conflict.
    async fn transition<C: ConnectionTrait>(
        conn: &C,
        creator_id: i32,
        from: &[CreatorStatus],
        to: CreatorStatus,
        reason: Option<String>,
    ) -> StudioResult<creator_profiles::Model> {
        let profile = Self::load_profile(conn, creator_id).await?;
        if !from.contains(&profile.status) {
            return Err(StudioError::conflict(format!(
                "Creator {} is {} and cannot become {}",
                creator_id, profile.status, to
            )));
        }

        let result = creator_profiles::Entity::update_many()
            .set(creator_profiles::ActiveModel {
                status: Set(to),
                suspension_reason: Set(reason),
                updated_at: Set(Utc::now()),
                ..Default::default()
            })
            .filter(creator_profiles::Column::Id.eq(creator_id))
            .filter(creator_profiles::Column::Status.is_in(from.iter().copied()))
            .exec(conn)
            .await?;

        if result.rows_affected == 0 {
            return Err(StudioError::conflict(format!(
                "Creator {} changed state concurrently",
                creator_id
            )));
        }

        Self::load_profile(conn, creator_id).await
    }

    pub async fn add_strike(
        &self,
        creator_id: i32,
        reason: &str,
        issued_by: i32,
    ) -> StudioResult<StrikeOutcome> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(StudioError::validation("A strike reason is required"));
        }

        let settings = self.settings.load().await?;
        let threshold = settings.max_strikes_before_suspension.max(1) as u64;

        let txn = self.db.begin().await?;
        let profile = Self::lock_profile(&txn, creator_id).await?;

        let strike = creator_strikes::ActiveModel {
            creator_id: Set(creator_id),
            reason: Set(reason.to_string()),
            issued_by: Set(issued_by),
            issued_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let total_strikes = creator_strikes::Entity::find()
            .filter(creator_strikes::Column::CreatorId.eq(creator_id))
            .count(&txn)
            .await?;

        let suspended = if total_strikes >= threshold && profile.status == CreatorStatus::Active {
            Self::transition(
                &txn,
                creator_id,
                &[CreatorStatus::Active],
                CreatorStatus::Suspended,
                Some(auto_suspension_reason(total_strikes)),
            )
            .await?;
            true
        } else {
            false
        };

        txn.commit().await?;

        info!(
            "Strike {} issued to creator {} by {} ({} of {}){}",
            strike.id,
            creator_id,
            issued_by,
            total_strikes,
            threshold,
            if suspended { ", creator suspended" } else { "" }
        );

        self.notifications
            .notify(
                profile.user_id,
                NotificationKind::StrikeIssued,
                "You received a strike",
                format!(
                    "Reason: {}. You now have {} of {} strikes.",
                    reason, total_strikes, threshold
                ),
                None,
            )
            .await;
        if suspended {
            self.notifications
                .notify(
                    profile.user_id,
                    NotificationKind::AccountSuspended,
                    "Creator account suspended",
                    auto_suspension_reason(total_strikes),
                    None,
                )
                .await;
        }

        Ok(StrikeOutcome {
            strike,
            total_strikes,
            suspended,
        })
    }

    pub async fn suspend_creator(
        &self,
        creator_id: i32,
        admin_id: i32,
        reason: &str,
    ) -> StudioResult<creator_profiles::Model> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(StudioError::validation("A suspension reason is required"));
        }

        let profile = Self::transition(
            &self.db,
            creator_id,
            &[CreatorStatus::Active],
            CreatorStatus::Suspended,
            Some(reason.to_string()),
        )
        .await?;
        info!("Creator {} suspended by {}: {}", creator_id, admin_id, reason);

        self.notifications
            .notify(
                profile.user_id,
                NotificationKind::AccountSuspended,
                "Creator account suspended",
                reason,
                None,
            )
            .await;
        Ok(profile)
    }

    /// Lifts a suspension. Strikes stay on record, and a ban cannot be lifted here.
    pub async fn unsuspend_creator(
        &self,
        creator_id: i32,
        admin_id: i32,
    ) -> StudioResult<creator_profiles::Model> {
        let profile = Self::transition(
            &self.db,
            creator_id,
            &[CreatorStatus::Suspended],
            CreatorStatus::Active,
            None,
        )
        .await?;
        info!("Creator {} reinstated by {}", creator_id, admin_id);

        self.notifications
            .notify(
                profile.user_id,
                NotificationKind::AccountReinstated,
                "Creator account reinstated",
                "You can submit content again.",
                None,
            )
            .await;
        Ok(profile)
    }

    pub async fn ban_creator(
        &self,
        creator_id: i32,
        admin_id: i32,
        reason: &str,
    ) -> StudioResult<creator_profiles::Model> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(StudioError::validation("A ban reason is required"));
        }

        let profile = Self::transition(
            &self.db,
            creator_id,
            &[CreatorStatus::Active, CreatorStatus::Suspended],
            CreatorStatus::Banned,
            Some(reason.to_string()),
        )
        .await?;
        info!("Creator {} banned by {}: {}", creator_id, admin_id, reason);

        self.notifications
            .notify(
                profile.user_id,
                NotificationKind::AccountBanned,
                "Creator account banned",
                reason,
                None,
            )
            .await;
        Ok(profile)
    }

    pub async fn list_strikes(&self, creator_id: i32) -> StudioResult<Vec<creator_strikes::Model>> {
        Self::load_profile(&self.db, creator_id).await?;
        Ok(creator_strikes::Entity::find()
            .filter(creator_strikes::Column::CreatorId.eq(creator_id))
            .order_by_asc(creator_strikes::Column::IssuedAt)
            .order_by_asc(creator_strikes::Column::Id)
            .all(&self.db)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_suspension_reason_names_count() {
        assert_eq!(
            auto_suspension_reason(3),
            "Automatically suspended after 3 strikes"
        );
    }
}
