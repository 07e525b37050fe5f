use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Identifier of the single global settings row.
pub const SETTINGS_ROW_ID: i32 = 1;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "creator_settings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    pub min_account_age_days: i64,
    pub max_account_age_days: i64,
    pub default_daily_upload_limit: i32,
    pub default_daily_storage_limit_gb: f64,
    pub max_strikes_before_suspension: i32,
    pub auto_approve_new_creators: bool,
    pub is_creator_system_enabled: bool,
    pub updated_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
