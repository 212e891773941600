//! Job application domain model.
//!
//! # Responsibility
//! - Define the canonical application record shared by every engine.
//! - Define create/patch inputs and the required-field validation contract.
//!
//! # Invariants
//! - `id` is stable and never reused for another application.
//! - `company` and `role` are non-empty (after trim) for persisted records.
//! - `status` is always one of the five lifecycle values.
//! - `notes` is append-only by convention; engines never truncate it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Stable identifier of one application record.
pub type ApplicationId = Uuid;

/// Lifecycle stage of an application.
///
/// Wire and storage labels are the variant names (`Applied`, `Interview`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ApplicationStatus {
    Applied,
    Interview,
    Offer,
    Rejected,
    Accepted,
}

impl ApplicationStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [ApplicationStatus; 5] = [
        Self::Applied,
        Self::Interview,
        Self::Offer,
        Self::Rejected,
        Self::Accepted,
    ];

    /// Stable label used by storage, exports and sorting.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Applied => "Applied",
            Self::Interview => "Interview",
            Self::Offer => "Offer",
            Self::Rejected => "Rejected",
            Self::Accepted => "Accepted",
        }
    }

    /// Parses an exact status label.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Applied" => Some(Self::Applied),
            "Interview" => Some(Self::Interview),
            "Offer" => Some(Self::Offer),
            "Rejected" => Some(Self::Rejected),
            "Accepted" => Some(Self::Accepted),
            _ => None,
        }
    }

    /// Whether the application reached a final outcome.
    pub fn is_closed(self) -> bool {
        matches!(self, Self::Rejected | Self::Accepted)
    }
}

impl Display for ApplicationStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = String;

    /// Case-insensitive parse for user input; storage reads use [`Self::parse`].
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(normalized))
            .ok_or_else(|| {
                format!(
                    "unsupported status `{normalized}`; expected Applied|Interview|Offer|Rejected|Accepted"
                )
            })
    }
}

/// Required-field violations rejected before any store call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    EmptyCompany,
    EmptyRole,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyCompany => write!(f, "company is required"),
            Self::EmptyRole => write!(f, "role is required"),
        }
    }
}

impl Error for ValidationError {}

/// Canonical job application record.
///
/// Serialized with camelCase names so structured exports keep the
/// established wire shape (`appliedDate`, `followUpDate`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRecord {
    pub id: ApplicationId,
    /// Owner key used for list scoping.
    pub user_id: String,
    pub company: String,
    pub role: String,
    pub status: ApplicationStatus,
    pub applied_date: NaiveDate,
    /// Free text; may embed reminder marker tokens.
    #[serde(default)]
    pub notes: String,
    pub location: Option<String>,
    pub salary: Option<String>,
    /// Employment type (full-time, contract, ...). Serialized as `type`.
    #[serde(rename = "type")]
    pub job_type: Option<String>,
    pub contact_person: Option<String>,
    pub follow_up_date: Option<NaiveDate>,
    pub job_url: Option<String>,
    /// Epoch milliseconds, maintained by the store.
    pub created_at: i64,
    /// Epoch milliseconds, maintained by the store.
    pub updated_at: i64,
}

impl ApplicationRecord {
    /// Validates required fields.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_required(&self.company, &self.role)
    }

    /// Appends one line to `notes`, never rewriting existing content.
    pub fn append_note(&mut self, line: &str) {
        if self.notes.is_empty() {
            self.notes.push_str(line);
        } else {
            self.notes.push('\n');
            self.notes.push_str(line);
        }
    }
}

/// Input for creating one application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationDraft {
    pub company: String,
    pub role: String,
    pub status: ApplicationStatus,
    /// Defaults to today at the service boundary when `None`.
    pub applied_date: Option<NaiveDate>,
    pub notes: String,
    pub location: Option<String>,
    pub salary: Option<String>,
    pub job_type: Option<String>,
    pub contact_person: Option<String>,
    pub follow_up_date: Option<NaiveDate>,
    pub job_url: Option<String>,
}

impl ApplicationDraft {
    /// Creates a draft with status `Applied` and no optional fields.
    pub fn new(company: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            company: company.into(),
            role: role.into(),
            status: ApplicationStatus::Applied,
            applied_date: None,
            notes: String::new(),
            location: None,
            salary: None,
            job_type: None,
            contact_person: None,
            follow_up_date: None,
            job_url: None,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_required(&self.company, &self.role)
    }

    /// Materializes a record with a fresh id.
    pub fn into_record(
        self,
        user_id: impl Into<String>,
        today: NaiveDate,
        now_epoch_ms: i64,
    ) -> Result<ApplicationRecord, ValidationError> {
        self.validate()?;
        Ok(ApplicationRecord {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            company: self.company.trim().to_string(),
            role: self.role.trim().to_string(),
            status: self.status,
            applied_date: self.applied_date.unwrap_or(today),
            notes: self.notes,
            location: normalize_optional(self.location),
            salary: normalize_optional(self.salary),
            job_type: normalize_optional(self.job_type),
            contact_person: normalize_optional(self.contact_person),
            follow_up_date: self.follow_up_date,
            job_url: normalize_optional(self.job_url),
            created_at: now_epoch_ms,
            updated_at: now_epoch_ms,
        })
    }
}

/// Partial update. `None` leaves a field unchanged; for optional record
/// fields `Some(None)` clears the value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationPatch {
    pub company: Option<String>,
    pub role: Option<String>,
    pub status: Option<ApplicationStatus>,
    pub applied_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub location: Option<Option<String>>,
    pub salary: Option<Option<String>>,
    pub job_type: Option<Option<String>>,
    pub contact_person: Option<Option<String>>,
    pub follow_up_date: Option<Option<NaiveDate>>,
    pub job_url: Option<Option<String>>,
}

impl ApplicationPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Rejects patches that would blank a required field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if matches!(&self.company, Some(value) if value.trim().is_empty()) {
            return Err(ValidationError::EmptyCompany);
        }
        if matches!(&self.role, Some(value) if value.trim().is_empty()) {
            return Err(ValidationError::EmptyRole);
        }
        Ok(())
    }

    /// Applies this patch onto `record` in place.
    pub fn apply_to(&self, record: &mut ApplicationRecord) {
        if let Some(company) = &self.company {
            record.company = company.trim().to_string();
        }
        if let Some(role) = &self.role {
            record.role = role.trim().to_string();
        }
        if let Some(status) = self.status {
            record.status = status;
        }
        if let Some(applied_date) = self.applied_date {
            record.applied_date = applied_date;
        }
        if let Some(notes) = &self.notes {
            record.notes = notes.clone();
        }
        if let Some(value) = &self.location {
            record.location = normalize_optional(value.clone());
        }
        if let Some(value) = &self.salary {
            record.salary = normalize_optional(value.clone());
        }
        if let Some(value) = &self.job_type {
            record.job_type = normalize_optional(value.clone());
        }
        if let Some(value) = &self.contact_person {
            record.contact_person = normalize_optional(value.clone());
        }
        if let Some(value) = self.follow_up_date {
            record.follow_up_date = value;
        }
        if let Some(value) = &self.job_url {
            record.job_url = normalize_optional(value.clone());
        }
    }
}

fn validate_required(company: &str, role: &str) -> Result<(), ValidationError> {
    if company.trim().is_empty() {
        return Err(ValidationError::EmptyCompany);
    }
    if role.trim().is_empty() {
        return Err(ValidationError::EmptyRole);
    }
    Ok(())
}

/// Blank optional strings are stored as absent.
fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|inner| inner.trim().to_string())
        .filter(|inner| !inner.is_empty())
}

#[cfg(test)]
mod tests {
    use super::{ApplicationDraft, ApplicationPatch, ApplicationStatus, ValidationError};
    use chrono::NaiveDate;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn status_parse_is_exact_but_from_str_is_lenient() {
        assert_eq!(ApplicationStatus::parse("Offer"), Some(ApplicationStatus::Offer));
        assert_eq!(ApplicationStatus::parse("offer"), None);
        assert_eq!(
            "offer".parse::<ApplicationStatus>().unwrap(),
            ApplicationStatus::Offer
        );
        assert!("ghosted".parse::<ApplicationStatus>().is_err());
    }

    #[test]
    fn draft_rejects_blank_required_fields() {
        let err = ApplicationDraft::new("  ", "Engineer").validate().unwrap_err();
        assert_eq!(err, ValidationError::EmptyCompany);
        let err = ApplicationDraft::new("Acme", "").validate().unwrap_err();
        assert_eq!(err, ValidationError::EmptyRole);
    }

    #[test]
    fn draft_defaults_applied_date_and_drops_blank_optionals() {
        let mut draft = ApplicationDraft::new(" Acme ", "Engineer");
        draft.location = Some("   ".to_string());
        draft.salary = Some("120k".to_string());
        let record = draft.into_record("local", day(2026, 3, 1), 42).unwrap();
        assert_eq!(record.company, "Acme");
        assert_eq!(record.applied_date, day(2026, 3, 1));
        assert_eq!(record.location, None);
        assert_eq!(record.salary.as_deref(), Some("120k"));
        assert_eq!(record.created_at, 42);
    }

    #[test]
    fn patch_can_clear_optional_fields() {
        let mut draft = ApplicationDraft::new("Acme", "Engineer");
        draft.follow_up_date = Some(day(2026, 3, 5));
        draft.location = Some("Remote".to_string());
        let mut record = draft.into_record("local", day(2026, 3, 1), 0).unwrap();

        let patch = ApplicationPatch {
            status: Some(ApplicationStatus::Interview),
            location: Some(None),
            follow_up_date: Some(None),
            ..ApplicationPatch::default()
        };
        patch.apply_to(&mut record);

        assert_eq!(record.status, ApplicationStatus::Interview);
        assert_eq!(record.location, None);
        assert_eq!(record.follow_up_date, None);
    }

    #[test]
    fn append_note_keeps_existing_text() {
        let mut record = ApplicationDraft::new("Acme", "Engineer")
            .into_record("local", day(2026, 3, 1), 0)
            .unwrap();
        record.append_note("first");
        record.append_note("second");
        assert_eq!(record.notes, "first\nsecond");
    }
}
