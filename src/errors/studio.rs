//! Error taxonomy for the creator pipeline
//!
//! Every operation in the pipeline fails with a [`StudioError`]. The variants map
//! one-to-one onto the categories callers can react to: who is calling, what is
//! missing, what is invalid, which quota or state rule was hit, and whether the
//! publisher could produce a catalog entry.
//!
//! # Examples
//!
//! ```rust
//! use creator_studio::errors::StudioError;
//!
//! let err = StudioError::not_found("submission", 42);
//! assert_eq!(err.error_code(), "NOT_FOUND");
//! assert_eq!(err.http_status_code(), 404);
//!
//! let err = StudioError::QuotaExceeded("daily upload limit of 4 reached".to_string());
//! assert!(err.is_quota_error());
//! ```

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StudioError {
    /// The caller could not be identified
    #[error("Authentication required")]
    AuthenticationRequired,

    /// A referenced request, submission, profile or user is absent
    #[error("{entity} {id} not found")]
    NotFound { entity: String, id: String },

    /// Field constraints unmet
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The daily upload count or storage cap would be exceeded
    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),

    /// The entity is not in the state the operation requires
    #[error("State conflict: {0}")]
    StateConflict(String),

    /// Slug/title dedup exhausted, or a catalog insert failed
    #[error("Publish failed: {0}")]
    Publish(String),

    /// The creator is not active
    #[error("Creator is not active: {0}")]
    Suspension(String),

    /// Persistence layer failure
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl StudioError {
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        StudioError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        StudioError::Validation(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        StudioError::StateConflict(message.into())
    }

    pub fn publish(message: impl Into<String>) -> Self {
        StudioError::Publish(message.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StudioError::NotFound { .. })
    }

    pub fn is_validation_error(&self) -> bool {
        matches!(self, StudioError::Validation(_))
    }

    pub fn is_quota_error(&self) -> bool {
        matches!(self, StudioError::QuotaExceeded(_))
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, StudioError::StateConflict(_))
    }

    pub fn is_publish_error(&self) -> bool {
        matches!(self, StudioError::Publish(_))
    }

    /// Get HTTP status code for this error
    pub fn http_status_code(&self) -> u16 {
        match self {
            StudioError::AuthenticationRequired => 401,
            StudioError::Suspension(_) => 403,
            StudioError::NotFound { .. } => 404,
            StudioError::Validation(_) => 400,
            StudioError::StateConflict(_) => 409,
            StudioError::QuotaExceeded(_) => 429,
            StudioError::Publish(_) | StudioError::Database(_) => 500,
        }
    }

    /// Get error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            StudioError::AuthenticationRequired => "AUTHENTICATION_ERROR",
            StudioError::NotFound { .. } => "NOT_FOUND",
            StudioError::Validation(_) => "VALIDATION_ERROR",
            StudioError::QuotaExceeded(_) => "QUOTA_EXCEEDED",
            StudioError::StateConflict(_) => "STATE_CONFLICT",
            StudioError::Publish(_) => "PUBLISH_ERROR",
            StudioError::Suspension(_) => "SUSPENSION_ERROR",
            StudioError::Database(_) => "DATABASE_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found() {
        let err = StudioError::not_found("submission", 7);
        assert_eq!(err.to_string(), "submission 7 not found");
        assert!(err.is_not_found());
        assert_eq!(err.http_status_code(), 404);
        assert_eq!(err.error_code(), "NOT_FOUND");
    }

    #[test]
    fn test_quota_exceeded() {
        let err = StudioError::QuotaExceeded("daily upload limit of 4 reached".to_string());
        assert_eq!(
            err.to_string(),
            "Quota exceeded: daily upload limit of 4 reached"
        );
        assert!(err.is_quota_error());
        assert_eq!(err.http_status_code(), 429);
        assert_eq!(err.error_code(), "QUOTA_EXCEEDED");
    }

    #[test]
    fn test_state_conflict() {
        let err = StudioError::conflict("submission 3 is already approved");
        assert!(err.is_conflict());
        assert_eq!(err.http_status_code(), 409);
        assert_eq!(err.error_code(), "STATE_CONFLICT");
    }

    #[test]
    fn test_suspension() {
        let err = StudioError::Suspension("suspended".to_string());
        assert_eq!(err.http_status_code(), 403);
        assert_eq!(err.error_code(), "SUSPENSION_ERROR");
    }

    #[test]
    fn test_database_error_conversion() {
        let err: StudioError = sea_orm::DbErr::Custom("boom".to_string()).into();
        assert_eq!(err.error_code(), "DATABASE_ERROR");
        assert_eq!(err.http_status_code(), 500);
    }
}
