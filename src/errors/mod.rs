//! Error types for the creator pipeline
//!
//! - **StudioError**: the single error taxonomy shared by every service
//! - **OperationResult**: the `{success, data|error}` envelope returned at the
//!   caller boundary

pub mod response;
pub mod studio;

pub use response::{ErrorBody, OperationResult};
pub use studio::StudioError;

/// Result type alias for pipeline operations
pub type StudioResult<T> = Result<T, StudioError>;
