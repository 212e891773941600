//! Narrative plain-text report.

use super::DateRange;
use crate::analytics::percentage;
use crate::model::application::{ApplicationRecord, ApplicationStatus};
use chrono::NaiveDate;

const NOT_SPECIFIED: &str = "Not specified";
const NO_NOTES: &str = "No notes";

/// Renders the fixed-layout report for `records`.
pub fn to_report(records: &[ApplicationRecord], range: DateRange, today: NaiveDate) -> String {
    let total = records.len();
    let count = |status: ApplicationStatus| {
        records
            .iter()
            .filter(|record| record.status == status)
            .count()
    };
    let interview = count(ApplicationStatus::Interview);
    let offer = count(ApplicationStatus::Offer);
    let accepted = count(ApplicationStatus::Accepted);

    let mut lines = vec![
        "JOB APPLICATION TRACKER REPORT".to_string(),
        format!("Generated on: {}", display_date(today)),
        format!("Date Range: {}", range.label()),
        String::new(),
        "SUMMARY STATISTICS:".to_string(),
        format!("- Total Applications: {total}"),
        format!("- Applied: {}", count(ApplicationStatus::Applied)),
        format!("- Interview Stage: {interview}"),
        format!("- Offers Received: {offer}"),
        format!("- Accepted: {accepted}"),
        format!("- Rejected: {}", count(ApplicationStatus::Rejected)),
        String::new(),
        "SUCCESS RATES:".to_string(),
        format!("- Interview Rate: {}%", format_rate(interview, total)),
        format!("- Success Rate: {}%", format_rate(offer + accepted, total)),
        String::new(),
        "DETAILED APPLICATIONS:".to_string(),
    ];

    for (index, record) in records.iter().enumerate() {
        let notes = if record.notes.is_empty() {
            NO_NOTES
        } else {
            record.notes.as_str()
        };
        lines.push(String::new());
        lines.push(format!("{}. {} - {}", index + 1, record.company, record.role));
        lines.push(format!("   Status: {}", record.status));
        lines.push(format!("   Applied: {}", display_date(record.applied_date)));
        lines.push(format!(
            "   Location: {}",
            record.location.as_deref().unwrap_or(NOT_SPECIFIED)
        ));
        lines.push(format!(
            "   Salary: {}",
            record.salary.as_deref().unwrap_or(NOT_SPECIFIED)
        ));
        lines.push(format!("   Notes: {notes}"));
    }

    lines.join("\n")
}

/// One-decimal percentage, or bare `0` for an empty collection.
pub fn format_rate(part: usize, total: usize) -> String {
    if total == 0 {
        return "0".to_string();
    }
    format!("{:.1}", percentage(part, total))
}

/// `M/D/YYYY` without zero padding.
pub fn display_date(date: NaiveDate) -> String {
    date.format("%-m/%-d/%Y").to_string()
}
