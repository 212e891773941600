//! Application use-case service.
//!
//! # Responsibility
//! - Validated CRUD over the record store, scoped to the caller.
//! - Derived views (filtered list, stats, admin overview, exports).
//! - Side notifications: in-app rows, change events, e-mails.
//!
//! # Invariants
//! - Validation runs before any store call; a rejected input writes nothing.
//! - Rows the caller cannot access are reported as `NotFound`.
//! - In-app notifications, e-mails and listeners never fail the write.

use crate::analytics::{compute_admin_overview, compute_stats, AdminOverview, ApplicationStats};
use crate::export::{build_export, DateRange, ExportError, ExportFormat, ExportSink};
use crate::model::application::{
    ApplicationDraft, ApplicationId, ApplicationPatch, ApplicationRecord, ValidationError,
};
use crate::model::caller::Caller;
use crate::model::notification::{InAppNotification, NotificationKind};
use crate::notify::email::{EmailCategory, EmailSender, LogEmailSender, NotificationEmail};
use crate::notify::events::{ChangeEvent, ChangeKind, ChangeListener};
use crate::repo::application_repo::{ApplicationStore, RepoError};
use crate::repo::notification_repo::NotificationRepository;
use crate::view::{filter_and_sort, ViewQuery};
use chrono::{DateTime, NaiveDate, Utc};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use uuid::Uuid;

/// Caller-facing error for every service operation.
#[derive(Debug)]
pub enum ServiceError {
    Validation(ValidationError),
    /// Missing, or not visible to the caller.
    NotFound(ApplicationId),
    /// The caller lacks the privilege for this operation.
    Forbidden(&'static str),
    /// A reminder id that does not follow `{kind}-{uuid}`.
    InvalidReminderId(String),
    /// The reminder's rule does not currently fire for its record.
    ReminderNotPending(String),
    Store(RepoError),
    Export(ExportError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "application not found: {id}"),
            Self::Forbidden(what) => write!(f, "forbidden: {what}"),
            Self::InvalidReminderId(value) => write!(f, "invalid reminder id: `{value}`"),
            Self::ReminderNotPending(value) => write!(f, "reminder is not pending: `{value}`"),
            Self::Store(err) => write!(f, "{err}"),
            Self::Export(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::Export(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id),
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Store(other),
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<ExportError> for ServiceError {
    fn from(value: ExportError) -> Self {
        Self::Export(value)
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Where an export went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReceipt {
    pub filename: String,
    pub mime_type: &'static str,
    pub record_count: usize,
    pub location: Option<PathBuf>,
}

/// Application service facade over store and notification implementations.
pub struct ApplicationService<S: ApplicationStore, N: NotificationRepository> {
    store: S,
    notifications: N,
    email: Box<dyn EmailSender>,
    notification_email: Option<String>,
    listeners: Vec<Box<dyn ChangeListener>>,
}

impl<S: ApplicationStore, N: NotificationRepository> ApplicationService<S, N> {
    /// Creates a service that logs (but does not deliver) e-mails.
    pub fn new(store: S, notifications: N) -> Self {
        Self {
            store,
            notifications,
            email: Box::new(LogEmailSender),
            notification_email: None,
            listeners: Vec::new(),
        }
    }

    /// Replaces the e-mail sender.
    pub fn with_email_sender(mut self, sender: Box<dyn EmailSender>) -> Self {
        self.email = sender;
        self
    }

    /// Sets the recipient of notification e-mails; `None` disables them.
    pub fn with_notification_email(mut self, recipient: Option<String>) -> Self {
        self.notification_email = recipient.filter(|value| !value.trim().is_empty());
        self
    }

    /// Registers a change listener.
    pub fn subscribe(&mut self, listener: Box<dyn ChangeListener>) {
        self.listeners.push(listener);
    }

    pub fn email_sender(&self) -> &dyn EmailSender {
        self.email.as_ref()
    }

    pub fn notification_email(&self) -> Option<&str> {
        self.notification_email.as_deref()
    }

    /// Lists every record visible to `caller`, newest applied first.
    pub fn list(&self, caller: &Caller) -> ServiceResult<Vec<ApplicationRecord>> {
        let records = self.store.list(&caller.scope())?;
        info!(
            "event=application_list module=service status=ok role={} count={}",
            caller.role,
            records.len()
        );
        Ok(records)
    }

    /// Lists through the filter/sort engine.
    pub fn view(&self, caller: &Caller, query: &ViewQuery) -> ServiceResult<Vec<ApplicationRecord>> {
        let records = self.list(caller)?;
        Ok(filter_and_sort(&records, query))
    }

    /// Gets one record visible to `caller`.
    pub fn get(&self, caller: &Caller, id: ApplicationId) -> ServiceResult<ApplicationRecord> {
        match self.store.get(id)? {
            Some(record) if caller.can_access(&record.user_id) => Ok(record),
            _ => Err(ServiceError::NotFound(id)),
        }
    }

    /// Creates a record owned by `caller`.
    pub fn create(
        &self,
        caller: &Caller,
        draft: ApplicationDraft,
    ) -> ServiceResult<ApplicationRecord> {
        let now = Utc::now();
        if let Err(err) = draft.validate() {
            warn!("event=application_create module=service status=rejected error={err}");
            return Err(err.into());
        }
        let record = draft.into_record(
            caller.user_id.as_str(),
            now.date_naive(),
            now.timestamp_millis(),
        )?;
        let created = self.store.create(&record)?;
        info!(
            "event=application_create module=service status=ok id={}",
            created.id
        );

        self.record_notification(InAppNotification::new(
            caller.user_id.as_str(),
            "New Job Application Added",
            format!("You applied to {} for {}", created.company, created.role),
            NotificationKind::Success,
            now.timestamp_millis(),
        ));
        self.send_email(
            "New Job Application Added",
            format!("You applied to {} for {}", created.company, created.role),
            EmailCategory::ApplicationAdded,
        );
        self.emit(ChangeKind::Insert, created.id, Some(&created));
        Ok(created)
    }

    /// Applies a partial update to a record visible to `caller`.
    pub fn update(
        &self,
        caller: &Caller,
        id: ApplicationId,
        patch: &ApplicationPatch,
    ) -> ServiceResult<ApplicationRecord> {
        patch.validate()?;
        self.get(caller, id)?;
        let updated = self.store.update(id, patch)?;
        info!(
            "event=application_update module=service status=ok id={} status_changed={}",
            updated.id,
            patch.status.is_some()
        );

        if let Some(status) = patch.status {
            let message = format!(
                "{} - {} status changed to {}",
                updated.company, updated.role, status
            );
            self.record_notification(InAppNotification::new(
                caller.user_id.as_str(),
                "Application Status Updated",
                message.clone(),
                NotificationKind::Info,
                Utc::now().timestamp_millis(),
            ));
            self.send_email(
                "Application Status Updated",
                message,
                EmailCategory::StatusChanged,
            );
        }
        self.emit(ChangeKind::Update, updated.id, Some(&updated));
        Ok(updated)
    }

    /// Deletes a record visible to `caller`.
    pub fn delete(&self, caller: &Caller, id: ApplicationId) -> ServiceResult<()> {
        self.get(caller, id)?;
        self.store.delete(id)?;
        info!("event=application_delete module=service status=ok id={id}");
        self.emit(ChangeKind::Delete, id, None);
        Ok(())
    }

    /// Dashboard statistics over the caller's visible records.
    pub fn stats(&self, caller: &Caller, today: NaiveDate) -> ServiceResult<ApplicationStats> {
        let records = self.list(caller)?;
        Ok(compute_stats(&records, today))
    }

    /// Cross-owner overview; admins only.
    pub fn admin_overview(&self, caller: &Caller, today: NaiveDate) -> ServiceResult<AdminOverview> {
        if !caller.is_admin() {
            return Err(ServiceError::Forbidden("admin privileges required"));
        }
        let records = self.list(caller)?;
        Ok(compute_admin_overview(&records, today))
    }

    /// Renders an export of the caller's records and hands it to `sink`.
    pub fn export(
        &self,
        caller: &Caller,
        format: ExportFormat,
        range: DateRange,
        now: DateTime<Utc>,
        sink: &mut dyn ExportSink,
    ) -> ServiceResult<ExportReceipt> {
        let records = self.list(caller)?;
        let payload = build_export(&records, format, range, now)?;
        let location = sink.deliver(&payload)?;
        Ok(ExportReceipt {
            filename: payload.filename,
            mime_type: payload.mime_type,
            record_count: payload.record_count,
            location,
        })
    }

    /// Newest in-app notifications for `caller`.
    pub fn notifications(
        &self,
        caller: &Caller,
        limit: Option<u32>,
    ) -> ServiceResult<Vec<InAppNotification>> {
        Ok(self
            .notifications
            .list_for_user(caller.user_id.as_str(), limit)?)
    }

    /// Marks one of the caller's notifications as read.
    pub fn mark_notification_read(&self, caller: &Caller, id: Uuid) -> ServiceResult<bool> {
        Ok(self
            .notifications
            .mark_read(caller.user_id.as_str(), id)?)
    }

    /// Sends one e-mail to the configured recipient, logging failures.
    pub(crate) fn send_email(&self, subject: &str, body: String, category: EmailCategory) {
        let Some(recipient) = self.notification_email.as_ref() else {
            return;
        };
        let email = NotificationEmail {
            recipient: recipient.clone(),
            subject: subject.to_string(),
            body,
            category,
        };
        if let Err(err) = self.email.send(&email) {
            warn!(
                "event=email_send module=service status=error category={} error={}",
                category.as_str(),
                err
            );
        }
    }

    fn record_notification(&self, notification: InAppNotification) {
        if let Err(err) = self.notifications.create(&notification) {
            warn!(
                "event=notification_create module=service status=error kind={} error={}",
                notification.kind.as_str(),
                err
            );
        }
    }

    fn emit(&self, kind: ChangeKind, record_id: ApplicationId, record: Option<&ApplicationRecord>) {
        if self.listeners.is_empty() {
            return;
        }
        let event = ChangeEvent {
            kind,
            record_id,
            record: record.cloned(),
        };
        for listener in &self.listeners {
            listener.on_change(&event);
        }
    }
}
