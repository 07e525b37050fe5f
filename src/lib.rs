pub mod app_context;
pub mod database;
pub mod errors;
pub mod server;
pub mod services;

pub use app_context::CreatorStudio;
pub use errors::{OperationResult, StudioError, StudioResult};
