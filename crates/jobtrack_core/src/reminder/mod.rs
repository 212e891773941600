//! Reminder rule engine.
//!
//! # Responsibility
//! - Derive prioritized action items from records and the completion set.
//! - Define the reminder id scheme shared with the completion action.
//!
//! # Invariants
//! - Reminders are never persisted; every pass recomputes them.
//! - A reminder id is `{kind}-{record_id}` and is stable across passes.
//! - Output is stable-sorted by priority rank, high first.
//! - Marker tokens in notes suppress their rule even after the completion
//!   set was pruned.

pub mod completion;

use crate::model::application::{ApplicationId, ApplicationRecord, ApplicationStatus};
use crate::notes::{has_marker, Marker};
use chrono::NaiveDate;
use completion::CompletionSet;
use serde::Serialize;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Days in `Applied` before a stale reminder fires.
pub const STALE_AFTER_DAYS: i64 = 14;
/// Days in `Applied` before a stale reminder escalates to high priority.
pub const STALE_HIGH_PRIORITY_DAYS: i64 = 21;

/// Rule that produced a reminder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReminderKind {
    FollowUp,
    StaleApplication,
    InterviewPrep,
}

impl ReminderKind {
    pub const ALL: [ReminderKind; 3] = [Self::FollowUp, Self::StaleApplication, Self::InterviewPrep];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::FollowUp => "follow-up",
            Self::StaleApplication => "stale-application",
            Self::InterviewPrep => "interview-prep",
        }
    }
}

impl Display for ReminderKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reminder urgency. Ordering follows rank (`Low < Medium < High`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    /// Sort rank: high=3, medium=2, low=1.
    pub fn rank(self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One derived action item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reminder {
    pub id: String,
    pub kind: ReminderKind,
    pub priority: Priority,
    pub message: String,
    pub due_date: NaiveDate,
    pub source_record_id: ApplicationId,
}

/// Builds the reminder id for `kind` on `record_id`.
pub fn reminder_id(kind: ReminderKind, record_id: ApplicationId) -> String {
    format!("{}-{}", kind.as_str(), record_id)
}

/// Splits a reminder id back into kind and record id.
pub fn parse_reminder_id(value: &str) -> Option<(ReminderKind, ApplicationId)> {
    let value = value.trim();
    ReminderKind::ALL.into_iter().find_map(|kind| {
        value
            .strip_prefix(kind.as_str())
            .and_then(|rest| rest.strip_prefix('-'))
            .and_then(|uuid| Uuid::parse_str(uuid).ok())
            .map(|record_id| (kind, record_id))
    })
}

/// Whole calendar days from `applied` to `today` (negative for future dates).
pub fn days_since(applied: NaiveDate, today: NaiveDate) -> i64 {
    (today - applied).num_days()
}

/// Generates reminders for `records` as of `today`, hiding completed ids.
pub fn generate_reminders(
    records: &[ApplicationRecord],
    completed: &CompletionSet,
    today: NaiveDate,
) -> Vec<Reminder> {
    let mut reminders = records
        .iter()
        .flat_map(|record| evaluate_record(record, today))
        .filter(|reminder| !completed.contains(&reminder.id))
        .collect::<Vec<_>>();

    // `sort_by` is stable, so equal priorities keep encounter order.
    reminders.sort_by(|a, b| b.priority.rank().cmp(&a.priority.rank()));
    reminders
}

/// Evaluates the three rules for one record, in rule order.
pub fn evaluate_record(record: &ApplicationRecord, today: NaiveDate) -> Vec<Reminder> {
    let mut out = Vec::new();

    if let Some(follow_up) = follow_up_due(record, today) {
        out.push(Reminder {
            id: reminder_id(ReminderKind::FollowUp, record.id),
            kind: ReminderKind::FollowUp,
            priority: Priority::High,
            message: format!("Follow up with {} about {}", record.company, record.role),
            due_date: follow_up,
            source_record_id: record.id,
        });
    }

    if record.status == ApplicationStatus::Applied
        && !has_marker(&record.notes, Marker::StaleAddressed)
    {
        let days = days_since(record.applied_date, today);
        if days >= STALE_AFTER_DAYS {
            let priority = if days >= STALE_HIGH_PRIORITY_DAYS {
                Priority::High
            } else {
                Priority::Medium
            };
            out.push(Reminder {
                id: reminder_id(ReminderKind::StaleApplication, record.id),
                kind: ReminderKind::StaleApplication,
                priority,
                message: format!(
                    "No response from {} for {} days - consider following up",
                    record.company, days
                ),
                due_date: today,
                source_record_id: record.id,
            });
        }
    }

    if record.status == ApplicationStatus::Interview
        && !has_marker(&record.notes, Marker::PrepCompleted)
    {
        out.push(Reminder {
            id: reminder_id(ReminderKind::InterviewPrep, record.id),
            kind: ReminderKind::InterviewPrep,
            priority: Priority::High,
            message: format!("Prepare for interview at {} ({})", record.company, record.role),
            due_date: today,
            source_record_id: record.id,
        });
    }

    out
}

fn follow_up_due(record: &ApplicationRecord, today: NaiveDate) -> Option<NaiveDate> {
    let follow_up = record.follow_up_date?;
    let days_until = (follow_up - today).num_days();
    (days_until <= 0 && !record.status.is_closed()).then_some(follow_up)
}
