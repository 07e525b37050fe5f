use chrono::{NaiveDate, Utc};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};
use serde::Serialize;
use tracing::debug;

use crate::database::entities::{creator_profiles, daily_upload_tracking};
use crate::errors::{StudioError, StudioResult};

/// Slack for floating-point storage sums so that e.g. 0.1 + 0.2 GB fits a 0.3 GB cap.
const STORAGE_EPSILON_GB: f64 = 1e-9;

/// Calendar day used as the quota key.
pub fn quota_day() -> NaiveDate {
    Utc::now().date_naive()
}

/// Snapshot of a creator's usage for one day.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct QuotaStatus {
    pub creator_id: i32,
    pub date: NaiveDate,
    pub uploads_today: i32,
    pub daily_upload_limit: i32,
    pub uploads_remaining: i32,
    pub storage_used_today_gb: f64,
    pub daily_storage_limit_gb: f64,
    pub storage_remaining_gb: f64,
}

impl QuotaStatus {
    fn new(
        profile: &creator_profiles::Model,
        date: NaiveDate,
        uploads_today: i32,
        storage_used_today_gb: f64,
    ) -> Self {
        Self {
            creator_id: profile.id,
            date,
            uploads_today,
            daily_upload_limit: profile.daily_upload_limit,
            uploads_remaining: (profile.daily_upload_limit - uploads_today).max(0),
            storage_used_today_gb,
            daily_storage_limit_gb: profile.daily_storage_limit_gb,
            storage_remaining_gb: (profile.daily_storage_limit_gb - storage_used_today_gb).max(0.0),
        }
    }
}

/// Fail with `QuotaExceeded` when adding the request to today's usage would pass
/// either of the profile's caps.
pub fn check_quota(
    profile: &creator_profiles::Model,
    uploads_today: i32,
    storage_used_today_gb: f64,
    requested_uploads: i32,
    requested_storage_gb: f64,
) -> StudioResult<()> {
    if uploads_today + requested_uploads > profile.daily_upload_limit {
        return Err(StudioError::QuotaExceeded(format!(
            "daily upload limit reached ({} of {} uploads used today, {} requested)",
            uploads_today, profile.daily_upload_limit, requested_uploads
        )));
    }
    if storage_used_today_gb + requested_storage_gb
        > profile.daily_storage_limit_gb + STORAGE_EPSILON_GB
    {
        return Err(StudioError::QuotaExceeded(format!(
            "daily storage limit exceeded ({:.2} GB used today + {:.2} GB requested > {:.2} GB)",
            storage_used_today_gb, requested_storage_gb, profile.daily_storage_limit_gb
        )));
    }
    Ok(())
}

/// Per-creator, per-day upload and storage accounting.
///
/// Charging is a single conditional `UPDATE`, so two concurrent submissions can
/// never both squeeze under the cap. Quota is charged at intake and never
/// refunded.
#[derive(Clone)]
pub struct QuotaService {
    db: DatabaseConnection,
}

impl QuotaService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Today's counter row for `creator_id`, inserting a zeroed row if absent.
    pub async fn get_or_create_daily_tracking<C: ConnectionTrait>(
        conn: &C,
        creator_id: i32,
        day: NaiveDate,
    ) -> StudioResult<daily_upload_tracking::Model> {
        let row = daily_upload_tracking::ActiveModel {
            creator_id: Set(creator_id),
            tracking_date: Set(day),
            uploads_today: Set(0),
            storage_used_today_gb: Set(0.0),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };

        // A concurrent first upload may have created the row already
        match daily_upload_tracking::Entity::insert(row)
            .on_conflict(
                OnConflict::columns([
                    daily_upload_tracking::Column::CreatorId,
                    daily_upload_tracking::Column::TrackingDate,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec(conn)
            .await
        {
            Ok(_) | Err(DbErr::RecordNotInserted) => {}
            Err(e) => return Err(e.into()),
        }

        Self::find_tracking(conn, creator_id, day)
            .await?
            .ok_or_else(|| StudioError::not_found("daily upload tracking", creator_id))
    }

    async fn find_tracking<C: ConnectionTrait>(
        conn: &C,
        creator_id: i32,
        day: NaiveDate,
    ) -> StudioResult<Option<daily_upload_tracking::Model>> {
        Ok(daily_upload_tracking::Entity::find()
            .filter(daily_upload_tracking::Column::CreatorId.eq(creator_id))
            .filter(daily_upload_tracking::Column::TrackingDate.eq(day))
            .one(conn)
            .await?)
    }

    /// Pre-check used to produce a descriptive error before any row is written.
    pub async fn check<C: ConnectionTrait>(
        conn: &C,
        profile: &creator_profiles::Model,
        day: NaiveDate,
        requested_uploads: i32,
        requested_storage_gb: f64,
    ) -> StudioResult<daily_upload_tracking::Model> {
        let tracking = Self::get_or_create_daily_tracking(conn, profile.id, day).await?;
        check_quota(
            profile,
            tracking.uploads_today,
            tracking.storage_used_today_gb,
            requested_uploads,
            requested_storage_gb,
        )?;
        Ok(tracking)
    }

    /// Atomically charge `uploads` and `storage_gb` against today's counters.
    ///
    /// The cap test is part of the `UPDATE` itself; if no row qualifies the
    /// charge is refused with `QuotaExceeded` and nothing changes.
    pub async fn commit<C: ConnectionTrait>(
        conn: &C,
        profile: &creator_profiles::Model,
        day: NaiveDate,
        uploads: i32,
        storage_gb: f64,
    ) -> StudioResult<daily_upload_tracking::Model> {
        use daily_upload_tracking::Column;

        let result = daily_upload_tracking::Entity::update_many()
            .col_expr(
                Column::UploadsToday,
                Expr::col(Column::UploadsToday).add(uploads),
            )
            .col_expr(
                Column::StorageUsedTodayGb,
                Expr::col(Column::StorageUsedTodayGb).add(storage_gb),
            )
            .col_expr(Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(Column::CreatorId.eq(profile.id))
            .filter(Column::TrackingDate.eq(day))
            .filter(
                Expr::expr(Expr::col(Column::UploadsToday).add(uploads))
                    .lte(profile.daily_upload_limit),
            )
            .filter(
                Expr::expr(Expr::col(Column::StorageUsedTodayGb).add(storage_gb))
                    .lte(profile.daily_storage_limit_gb + STORAGE_EPSILON_GB),
            )
            .exec(conn)
            .await?;

        let tracking = Self::find_tracking(conn, profile.id, day).await?;

        if result.rows_affected == 0 {
            let (used, stored) = tracking
                .map(|t| (t.uploads_today, t.storage_used_today_gb))
                .unwrap_or((0, 0.0));
            check_quota(profile, used, stored, uploads, storage_gb)?;
            return Err(StudioError::QuotaExceeded(format!(
                "daily quota could not be charged for creator {}",
                profile.id
            )));
        }

        let tracking = tracking
            .ok_or_else(|| StudioError::not_found("daily upload tracking", profile.id))?;
        debug!(
            "Charged creator {}: +{} uploads, +{:.2} GB (now {}/{} uploads, {:.2}/{:.2} GB)",
            profile.id,
            uploads,
            storage_gb,
            tracking.uploads_today,
            profile.daily_upload_limit,
            tracking.storage_used_today_gb,
            profile.daily_storage_limit_gb
        );
        Ok(tracking)
    }

    /// Usage for `day` without creating a tracking row.
    pub async fn quota_status(
        &self,
        profile: &creator_profiles::Model,
        day: NaiveDate,
    ) -> StudioResult<QuotaStatus> {
        let tracking = Self::find_tracking(&self.db, profile.id, day).await?;
        let (uploads, storage) = tracking
            .map(|t| (t.uploads_today, t.storage_used_today_gb))
            .unwrap_or((0, 0.0));
        Ok(QuotaStatus::new(profile, day, uploads, storage))
    }
}
