pub mod common_types;

// Creator identity and standing
pub mod creator_profiles;
pub mod creator_requests;
pub mod creator_settings;
pub mod creator_strikes;
pub mod daily_upload_tracking;
pub mod users;

// Submission store
pub mod content_submissions;
pub mod submission_episodes;

// Canonical catalog
pub mod episodes;
pub mod movies;
pub mod seasons;
pub mod series;

pub mod notifications;

pub use common_types::{ContentType, CreatorStatus, RequestStatus, SubmissionStatus};
