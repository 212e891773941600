//! Reminder use-case service.
//!
//! # Responsibility
//! - Compute pending reminders for a caller from records and the
//!   persisted completion set.
//! - Run the completion action: local set first, record mutation second.
//!
//! # Invariants
//! - Only reminders whose rule currently fires can be completed.
//! - The completion set is persisted before the record is mutated.
//! - If the record mutation fails, the id stays completed locally and the
//!   error is returned; nothing is rolled back.
//! - Record mutations go through `ApplicationService::update`, so they are
//!   scoped, validated and observed like any other update.

use crate::model::application::{ApplicationPatch, ApplicationRecord};
use crate::model::caller::Caller;
use crate::notes::{dated_line, Marker};
use crate::notify::email::EmailCategory;
use crate::reminder::{
    evaluate_record, generate_reminders, parse_reminder_id, Reminder, ReminderKind,
};
use crate::repo::application_repo::ApplicationStore;
use crate::repo::completion_repo::CompletionStore;
use crate::repo::notification_repo::NotificationRepository;
use crate::service::application_service::{ApplicationService, ServiceError, ServiceResult};
use chrono::{Duration, NaiveDate};
use log::{info, warn};

/// Days a completed follow-up is pushed forward.
pub const FOLLOW_UP_INTERVAL_DAYS: i64 = 7;

/// Result of completing one reminder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionOutcome {
    pub reminder_id: String,
    pub kind: ReminderKind,
    /// Source record after mutation.
    pub record: ApplicationRecord,
    /// Whether the completion set was reset to bound its size.
    pub pruned: bool,
}

/// Reminder service over an application service and a completion store.
pub struct ReminderService<'svc, S, N, C>
where
    S: ApplicationStore,
    N: NotificationRepository,
    C: CompletionStore,
{
    applications: &'svc ApplicationService<S, N>,
    completions: C,
}

impl<'svc, S, N, C> ReminderService<'svc, S, N, C>
where
    S: ApplicationStore,
    N: NotificationRepository,
    C: CompletionStore,
{
    pub fn new(applications: &'svc ApplicationService<S, N>, completions: C) -> Self {
        Self {
            applications,
            completions,
        }
    }

    /// Pending reminders for `caller` as of `today`, highest priority first.
    pub fn pending(&self, caller: &Caller, today: NaiveDate) -> ServiceResult<Vec<Reminder>> {
        let records = self.applications.list(caller)?;
        let completed = self.completions.load()?;
        let reminders = generate_reminders(&records, &completed, today);
        info!(
            "event=reminder_generate module=service status=ok records={} reminders={} completed={}",
            records.len(),
            reminders.len(),
            completed.len()
        );
        Ok(reminders)
    }

    /// Marks `reminder_id` done and applies its record mutation.
    pub fn complete(
        &self,
        caller: &Caller,
        reminder_id: &str,
        today: NaiveDate,
    ) -> ServiceResult<CompletionOutcome> {
        let (kind, record_id) = parse_reminder_id(reminder_id)
            .ok_or_else(|| ServiceError::InvalidReminderId(reminder_id.to_string()))?;
        let record = self.applications.get(caller, record_id)?;
        let reminder_id = reminder_id.trim().to_string();
        if !evaluate_record(&record, today)
            .iter()
            .any(|reminder| reminder.kind == kind)
        {
            warn!(
                "event=reminder_complete module=service status=rejected reason=not_pending kind={} record_id={}",
                kind, record_id
            );
            return Err(ServiceError::ReminderNotPending(reminder_id));
        }

        let mut completed = self.completions.load()?;
        let mark = completed.mark(reminder_id.clone());
        self.completions.save(&completed)?;
        if mark.pruned {
            info!("event=reminder_completion_prune module=service status=ok");
        }

        let patch = completion_patch(&record, kind, today);
        let updated = match self.applications.update(caller, record_id, &patch) {
            Ok(updated) => updated,
            Err(err) => {
                warn!(
                    "event=reminder_complete module=service status=partial kind={} record_id={} error={}",
                    kind, record_id, err
                );
                return Err(err);
            }
        };

        info!(
            "event=reminder_complete module=service status=ok kind={} record_id={}",
            kind, record_id
        );
        Ok(CompletionOutcome {
            reminder_id,
            kind,
            record: updated,
            pruned: mark.pruned,
        })
    }

    /// E-mails all pending follow-up reminders in one digest.
    ///
    /// Returns how many follow-ups were included; `0` sends nothing.
    pub fn send_follow_up_digest(&self, caller: &Caller, today: NaiveDate) -> ServiceResult<usize> {
        let follow_ups = self
            .pending(caller, today)?
            .into_iter()
            .filter(|reminder| reminder.kind == ReminderKind::FollowUp)
            .collect::<Vec<_>>();
        if follow_ups.is_empty() {
            return Ok(0);
        }

        let body = follow_ups
            .iter()
            .map(|reminder| format!("- {} (due {})", reminder.message, reminder.due_date))
            .collect::<Vec<_>>()
            .join("\n");
        self.applications.send_email(
            &format!("{} follow-up(s) due", follow_ups.len()),
            body,
            EmailCategory::FollowUpReminder,
        );
        Ok(follow_ups.len())
    }
}

/// Builds the record mutation for completing `kind` on `record`.
pub fn completion_patch(
    record: &ApplicationRecord,
    kind: ReminderKind,
    today: NaiveDate,
) -> ApplicationPatch {
    let mut next = record.clone();
    let mut patch = ApplicationPatch::default();
    match kind {
        ReminderKind::FollowUp => {
            next.append_note(&dated_line(today, "Followed up with company.", None));
            patch.follow_up_date = Some(Some(today + Duration::days(FOLLOW_UP_INTERVAL_DAYS)));
        }
        ReminderKind::StaleApplication => {
            next.append_note(&dated_line(
                today,
                "Addressed stale application.",
                Some(Marker::StaleAddressed),
            ));
        }
        ReminderKind::InterviewPrep => {
            next.append_note(&dated_line(
                today,
                "Completed interview preparation.",
                Some(Marker::PrepCompleted),
            ));
        }
    }
    patch.notes = Some(next.notes);
    patch
}

#[cfg(test)]
mod tests {
    use super::completion_patch;
    use crate::model::application::ApplicationDraft;
    use crate::reminder::ReminderKind;
    use chrono::NaiveDate;

    #[test]
    fn follow_up_patch_moves_date_a_week_out_and_appends_note() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let mut draft = ApplicationDraft::new("Acme", "Engineer");
        draft.notes = "Met at meetup".to_string();
        let record = draft.into_record("local", today, 0).unwrap();

        let patch = completion_patch(&record, ReminderKind::FollowUp, today);
        assert_eq!(
            patch.follow_up_date,
            Some(NaiveDate::from_ymd_opt(2026, 10, 26))
        );
        assert_eq!(
            patch.notes.as_deref(),
            Some("Met at meetup\n[2026-10-19] Followed up with company.")
        );
        assert_eq!(patch.status, None);
    }
}
