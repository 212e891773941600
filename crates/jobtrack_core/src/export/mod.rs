//! Export formatter: CSV, structured JSON and narrative text report.
//!
//! # Responsibility
//! - Serialize a (date-range filtered) record collection into the three
//!   export formats.
//! - Shape the payload (filename, MIME hint) handed to an [`ExportSink`].
//!
//! # Invariants
//! - The range cutoff is inclusive (`applied_date >= cutoff`).
//! - An empty filtered collection is `ExportError::NoData`; no payload is built.
//! - A failed export never yields a partial payload.

pub mod csv;
pub mod json;
pub mod report;
pub mod sink;

use crate::model::application::ApplicationRecord;
use chrono::{DateTime, Duration, Months, NaiveDate, Utc};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

pub use sink::{DirectorySink, ExportSink};

/// Export-layer error.
#[derive(Debug)]
pub enum ExportError {
    /// No record falls inside the selected range.
    NoData,
    Serialize(serde_json::Error),
    /// Structured payload could not be read back.
    Parse(serde_json::Error),
    /// The sink failed to deliver the payload.
    Sink(std::io::Error),
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoData => write!(f, "no applications found for the selected date range"),
            Self::Serialize(err) => write!(f, "failed to serialize export: {err}"),
            Self::Parse(err) => write!(f, "failed to parse structured export: {err}"),
            Self::Sink(err) => write!(f, "failed to deliver export: {err}"),
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NoData => None,
            Self::Serialize(err) | Self::Parse(err) => Some(err),
            Self::Sink(err) => Some(err),
        }
    }
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
    Report,
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "report" | "txt" | "pdf" => Ok(Self::Report),
            other => Err(format!(
                "unsupported export format `{other}`; expected csv|json|report"
            )),
        }
    }
}

/// Applied-date window shared by all formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateRange {
    #[default]
    All,
    Last30Days,
    Last90Days,
    LastYear,
}

impl DateRange {
    /// Inclusive cutoff date, `None` for `All`.
    pub fn cutoff(self, today: NaiveDate) -> Option<NaiveDate> {
        match self {
            Self::All => None,
            Self::Last30Days => Some(today - Duration::days(30)),
            Self::Last90Days => Some(today - Duration::days(90)),
            Self::LastYear => today.checked_sub_months(Months::new(12)),
        }
    }

    /// Label printed in the narrative report header.
    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All time",
            Self::Last30Days => "30days",
            Self::Last90Days => "90days",
            Self::LastYear => "year",
        }
    }
}

impl FromStr for DateRange {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "30days" => Ok(Self::Last30Days),
            "90days" => Ok(Self::Last90Days),
            "year" => Ok(Self::LastYear),
            other => Err(format!(
                "unsupported date range `{other}`; expected all|30days|90days|year"
            )),
        }
    }
}

/// Content plus delivery hints for one export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPayload {
    pub filename: String,
    pub mime_type: &'static str,
    pub content: String,
    pub record_count: usize,
}

/// Keeps records whose applied date is inside `range`, preserving order.
pub fn filter_by_range(
    records: &[ApplicationRecord],
    range: DateRange,
    today: NaiveDate,
) -> Vec<ApplicationRecord> {
    match range.cutoff(today) {
        None => records.to_vec(),
        Some(cutoff) => records
            .iter()
            .filter(|record| record.applied_date >= cutoff)
            .cloned()
            .collect(),
    }
}

/// Filters by range and renders `format`.
pub fn build_export(
    records: &[ApplicationRecord],
    format: ExportFormat,
    range: DateRange,
    now: DateTime<Utc>,
) -> Result<ExportPayload, ExportError> {
    let today = now.date_naive();
    let selected = filter_by_range(records, range, today);
    if selected.is_empty() {
        return Err(ExportError::NoData);
    }

    let stamp = today.format("%Y-%m-%d");
    let (filename, mime_type, content) = match format {
        ExportFormat::Csv => (
            format!("job-applications-{stamp}.csv"),
            "text/csv;charset=utf-8",
            csv::to_csv(&selected),
        ),
        ExportFormat::Json => (
            format!("job-applications-{stamp}.json"),
            "application/json",
            json::to_json(&selected, now)?,
        ),
        ExportFormat::Report => (
            format!("job-applications-report-{stamp}.txt"),
            "text/plain",
            report::to_report(&selected, range, today),
        ),
    };

    Ok(ExportPayload {
        filename,
        mime_type,
        content,
        record_count: selected.len(),
    })
}
