use chrono::Utc;
use sea_orm::{ActiveModelTrait, ConnectionTrait, DatabaseConnection, EntityTrait, Set};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::database::entities::creator_settings::{self, SETTINGS_ROW_ID};
use crate::errors::{StudioError, StudioResult};

pub const DEFAULT_MIN_ACCOUNT_AGE_DAYS: i64 = 0;
pub const DEFAULT_MAX_ACCOUNT_AGE_DAYS: i64 = 30;
pub const DEFAULT_DAILY_UPLOAD_LIMIT: i32 = 5;
pub const DEFAULT_DAILY_STORAGE_LIMIT_GB: f64 = 10.0;
pub const DEFAULT_MAX_STRIKES_BEFORE_SUSPENSION: i32 = 3;

/// Global creator-program configuration.
///
/// Loaded once at the start of every operation and passed down explicitly.
/// When no row has been stored, [`CreatorSettings::default`] applies.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CreatorSettings {
    pub min_account_age_days: i64,
    pub max_account_age_days: i64,
    pub default_daily_upload_limit: i32,
    pub default_daily_storage_limit_gb: f64,
    pub max_strikes_before_suspension: i32,
    pub auto_approve_new_creators: bool,
    pub is_creator_system_enabled: bool,
}

impl Default for CreatorSettings {
    fn default() -> Self {
        Self {
            min_account_age_days: DEFAULT_MIN_ACCOUNT_AGE_DAYS,
            max_account_age_days: DEFAULT_MAX_ACCOUNT_AGE_DAYS,
            default_daily_upload_limit: DEFAULT_DAILY_UPLOAD_LIMIT,
            default_daily_storage_limit_gb: DEFAULT_DAILY_STORAGE_LIMIT_GB,
            max_strikes_before_suspension: DEFAULT_MAX_STRIKES_BEFORE_SUSPENSION,
            auto_approve_new_creators: false,
            is_creator_system_enabled: true,
        }
    }
}

impl From<creator_settings::Model> for CreatorSettings {
    fn from(model: creator_settings::Model) -> Self {
        Self {
            min_account_age_days: model.min_account_age_days,
            max_account_age_days: model.max_account_age_days,
            default_daily_upload_limit: model.default_daily_upload_limit,
            default_daily_storage_limit_gb: model.default_daily_storage_limit_gb,
            max_strikes_before_suspension: model.max_strikes_before_suspension,
            auto_approve_new_creators: model.auto_approve_new_creators,
            is_creator_system_enabled: model.is_creator_system_enabled,
        }
    }
}

fn env_override<T: std::str::FromStr>(key: &str, fallback: T) -> T {
    match std::env::var(key).ok().filter(|value| !value.is_empty()) {
        Some(raw) => match raw.parse::<T>() {
            Ok(value) => value,
            Err(_) => {
                warn!("Ignoring unparsable value for {}: {:?}", key, raw);
                fallback
            }
        },
        None => fallback,
    }
}

impl CreatorSettings {
    /// Defaults with any `CREATOR_*` environment overrides applied. Used when
    /// seeding the settings row.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            min_account_age_days: env_override(
                "CREATOR_MIN_ACCOUNT_AGE_DAYS",
                defaults.min_account_age_days,
            ),
            max_account_age_days: env_override(
                "CREATOR_MAX_ACCOUNT_AGE_DAYS",
                defaults.max_account_age_days,
            ),
            default_daily_upload_limit: env_override(
                "CREATOR_DAILY_UPLOAD_LIMIT",
                defaults.default_daily_upload_limit,
            ),
            default_daily_storage_limit_gb: env_override(
                "CREATOR_DAILY_STORAGE_LIMIT_GB",
                defaults.default_daily_storage_limit_gb,
            ),
            max_strikes_before_suspension: env_override(
                "CREATOR_MAX_STRIKES",
                defaults.max_strikes_before_suspension,
            ),
            auto_approve_new_creators: env_override(
                "CREATOR_AUTO_APPROVE",
                defaults.auto_approve_new_creators,
            ),
            is_creator_system_enabled: env_override(
                "CREATOR_SYSTEM_ENABLED",
                defaults.is_creator_system_enabled,
            ),
        }
    }

    pub fn validate(&self) -> StudioResult<()> {
        if self.min_account_age_days < 0 {
            return Err(StudioError::validation(
                "min_account_age_days cannot be negative",
            ));
        }
        if self.min_account_age_days > self.max_account_age_days {
            return Err(StudioError::validation(format!(
                "min_account_age_days ({}) exceeds max_account_age_days ({})",
                self.min_account_age_days, self.max_account_age_days
            )));
        }
        if self.default_daily_upload_limit < 1 {
            return Err(StudioError::validation(
                "default_daily_upload_limit must be at least 1",
            ));
        }
        if !self.default_daily_storage_limit_gb.is_finite()
            || self.default_daily_storage_limit_gb <= 0.0
        {
            return Err(StudioError::validation(
                "default_daily_storage_limit_gb must be a positive number",
            ));
        }
        if self.max_strikes_before_suspension < 1 {
            return Err(StudioError::validation(
                "max_strikes_before_suspension must be at least 1",
            ));
        }
        Ok(())
    }

    fn apply(mut self, patch: SettingsUpdate) -> Self {
        if let Some(value) = patch.min_account_age_days {
            self.min_account_age_days = value;
        }
        if let Some(value) = patch.max_account_age_days {
            self.max_account_age_days = value;
        }
        if let Some(value) = patch.default_daily_upload_limit {
            self.default_daily_upload_limit = value;
        }
        if let Some(value) = patch.default_daily_storage_limit_gb {
            self.default_daily_storage_limit_gb = value;
        }
        if let Some(value) = patch.max_strikes_before_suspension {
            self.max_strikes_before_suspension = value;
        }
        if let Some(value) = patch.auto_approve_new_creators {
            self.auto_approve_new_creators = value;
        }
        if let Some(value) = patch.is_creator_system_enabled {
            self.is_creator_system_enabled = value;
        }
        self
    }
}

/// Partial settings change; `None` keeps the stored value.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct SettingsUpdate {
    pub min_account_age_days: Option<i64>,
    pub max_account_age_days: Option<i64>,
    pub default_daily_upload_limit: Option<i32>,
    pub default_daily_storage_limit_gb: Option<f64>,
    pub max_strikes_before_suspension: Option<i32>,
    pub auto_approve_new_creators: Option<bool>,
    pub is_creator_system_enabled: Option<bool>,
}

#[derive(Clone)]
pub struct SettingsService {
    db: DatabaseConnection,
}

impl SettingsService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn load(&self) -> StudioResult<CreatorSettings> {
        Self::load_with(&self.db).await
    }

    /// Read the settings row through any connection, including an open transaction.
    pub async fn load_with<C: ConnectionTrait>(conn: &C) -> StudioResult<CreatorSettings> {
        let record = creator_settings::Entity::find_by_id(SETTINGS_ROW_ID)
            .one(conn)
            .await?;
        Ok(record.map(CreatorSettings::from).unwrap_or_default())
    }

    /// Store the environment-derived defaults unless a row already exists.
    pub async fn seed_defaults(&self) -> StudioResult<CreatorSettings> {
        if let Some(existing) = creator_settings::Entity::find_by_id(SETTINGS_ROW_ID)
            .one(&self.db)
            .await?
        {
            return Ok(existing.into());
        }

        let settings = CreatorSettings::from_env();
        settings.validate()?;
        self.store(&settings).await?;
        info!("Seeded creator settings: {:?}", settings);
        Ok(settings)
    }

    pub async fn update(&self, patch: SettingsUpdate) -> StudioResult<CreatorSettings> {
        let settings = self.load().await?.apply(patch);
        settings.validate()?;
        self.store(&settings).await?;
        info!("Updated creator settings");
        Ok(settings)
    }

    async fn store(&self, settings: &CreatorSettings) -> StudioResult<()> {
        let existing = creator_settings::Entity::find_by_id(SETTINGS_ROW_ID)
            .one(&self.db)
            .await?;

        let is_new = existing.is_none();
        let mut active = match existing {
            Some(record) => record.into(),
            None => creator_settings::ActiveModel {
                id: Set(SETTINGS_ROW_ID),
                ..Default::default()
            },
        };
        active.min_account_age_days = Set(settings.min_account_age_days);
        active.max_account_age_days = Set(settings.max_account_age_days);
        active.default_daily_upload_limit = Set(settings.default_daily_upload_limit);
        active.default_daily_storage_limit_gb = Set(settings.default_daily_storage_limit_gb);
        active.max_strikes_before_suspension = Set(settings.max_strikes_before_suspension);
        active.auto_approve_new_creators = Set(settings.auto_approve_new_creators);
        active.is_creator_system_enabled = Set(settings.is_creator_system_enabled);
        active.updated_at = Set(Utc::now());

        if is_new {
            active.insert(&self.db).await?;
        } else {
            active.update(&self.db).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_valid() {
        assert!(CreatorSettings::default().validate().is_ok());
    }

    #[test]
    fn test_inverted_age_window_rejected() {
        let settings = CreatorSettings {
            min_account_age_days: 10,
            max_account_age_days: 5,
            ..Default::default()
        };
        let err = settings.validate().unwrap_err();
        assert!(err.is_validation_error());
    }

    #[test]
    fn test_patch_only_touches_given_fields() {
        let patched = CreatorSettings::default().apply(SettingsUpdate {
            max_strikes_before_suspension: Some(5),
            ..Default::default()
        });
        assert_eq!(patched.max_strikes_before_suspension, 5);
        assert_eq!(patched.default_daily_upload_limit, DEFAULT_DAILY_UPLOAD_LIMIT);
    }
}
