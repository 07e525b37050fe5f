pub mod catalog_cache;
pub mod eligibility_service;
pub mod identity;
pub mod moderation_service;
pub mod notification_service;
pub mod publisher_service;
pub mod quota_service;
pub mod settings_service;
pub mod strike_service;
pub mod submission_service;
pub mod submission_types;

pub use catalog_cache::{CatalogCache, CatalogScope, LoggingCatalogCache};
pub use eligibility_service::EligibilityService;
pub use identity::{DatabaseIdentityProvider, IdentityProvider};
pub use moderation_service::{ApprovalOutcome, ModerationService};
pub use notification_service::{NotificationKind, NotificationService};
pub use publisher_service::{CatalogEntry, Publisher};
pub use quota_service::{QuotaService, QuotaStatus};
pub use settings_service::{CreatorSettings, SettingsService, SettingsUpdate};
pub use strike_service::{StrikeOutcome, StrikeService};
pub use submission_service::SubmissionService;
pub use submission_types::{
    ContentPayload, EpisodeInput, SeriesData, SubmissionDetails, SubmissionOutcome,
    SubmissionPayload,
};
