//! Core domain logic for the job application tracker.
//! This crate is the single source of truth for business invariants.

pub mod analytics;
pub mod config;
pub mod db;
pub mod export;
pub mod logging;
pub mod model;
pub mod notes;
pub mod notify;
pub mod reminder;
pub mod repo;
pub mod service;
pub mod view;

pub use analytics::{
    compute_admin_overview, compute_stats, AdminOverview, ApplicationStats, CompanyCount,
};
pub use config::{ConfigError, TrackerConfig};
pub use db::{open_db, open_db_in_memory, DbError};
pub use export::json::{parse_json_export, StructuredExport};
pub use export::{
    build_export, filter_by_range, DateRange, DirectorySink, ExportError, ExportFormat,
    ExportPayload, ExportSink,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::application::{
    ApplicationDraft, ApplicationId, ApplicationPatch, ApplicationRecord, ApplicationStatus,
    ValidationError,
};
pub use model::caller::{Caller, ListScope, Role};
pub use model::notification::{InAppNotification, NotificationKind};
pub use notify::email::{EmailCategory, EmailSender, LogEmailSender, NotificationEmail, NotifyError};
pub use notify::events::{ChangeEvent, ChangeKind, ChangeListener};
pub use reminder::completion::{CompletionSet, COMPLETION_SET_LIMIT};
pub use reminder::{generate_reminders, Priority, Reminder, ReminderKind};
pub use repo::application_repo::{ApplicationStore, RepoError, RepoResult, SqliteApplicationStore};
pub use repo::completion_repo::{CompletionStore, SqliteCompletionStore};
pub use repo::notification_repo::{NotificationRepository, SqliteNotificationRepository};
pub use service::application_service::{
    ApplicationService, ExportReceipt, ServiceError, ServiceResult,
};
pub use service::reminder_service::{CompletionOutcome, ReminderService};
pub use view::{filter_and_sort, SortKey, StatusFilter, ViewQuery};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
