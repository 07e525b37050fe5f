use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{DatabaseConnection, EntityTrait};

use crate::database::entities::users;
use crate::errors::StudioResult;

/// Source of the two identity facts the pipeline consumes: that a user exists,
/// and when their account was created.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn account_created_at(&self, user_id: i32) -> StudioResult<Option<DateTime<Utc>>>;
}

/// Reads the local `users` snapshot.
#[derive(Clone)]
pub struct DatabaseIdentityProvider {
    db: DatabaseConnection,
}

impl DatabaseIdentityProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl IdentityProvider for DatabaseIdentityProvider {
    async fn account_created_at(&self, user_id: i32) -> StudioResult<Option<DateTime<Utc>>> {
        let user = users::Entity::find_by_id(user_id).one(&self.db).await?;
        Ok(user.map(|u| u.created_at))
    }
}

/// Whole days elapsed between account creation and `now`.
pub fn account_age_days(created_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - created_at).num_days()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_account_age_truncates_partial_days() {
        let now = Utc::now();
        assert_eq!(account_age_days(now - Duration::hours(47), now), 1);
        assert_eq!(account_age_days(now - Duration::days(31), now), 31);
        assert_eq!(account_age_days(now, now), 0);
    }
}
