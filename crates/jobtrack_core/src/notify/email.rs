//! Notification e-mail boundary.

use log::info;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Why an e-mail is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmailCategory {
    ApplicationAdded,
    StatusChanged,
    FollowUpReminder,
}

impl EmailCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ApplicationAdded => "application_added",
            Self::StatusChanged => "status_changed",
            Self::FollowUpReminder => "follow_up_reminder",
        }
    }
}

/// One outbound notification e-mail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationEmail {
    pub recipient: String,
    pub subject: String,
    pub body: String,
    pub category: EmailCategory,
}

/// Delivery failure reported by an [`EmailSender`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyError {
    /// The sender has no usable configuration.
    NotConfigured(&'static str),
    /// The transport rejected or failed the message.
    Transport(String),
}

impl Display for NotifyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotConfigured(what) => write!(f, "email sender not configured: {what}"),
            Self::Transport(message) => write!(f, "email transport error: {message}"),
        }
    }
}

impl Error for NotifyError {}

/// Best-effort e-mail delivery. Callers log failures and move on.
pub trait EmailSender {
    fn send(&self, email: &NotificationEmail) -> Result<(), NotifyError>;
}

/// Default sender: records the attempt in the log and delivers nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogEmailSender;

impl EmailSender for LogEmailSender {
    fn send(&self, email: &NotificationEmail) -> Result<(), NotifyError> {
        info!(
            "event=email_send module=notify status=skipped category={} subject_chars={}",
            email.category.as_str(),
            email.subject.chars().count()
        );
        Ok(())
    }
}
