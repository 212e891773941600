//! Tabular (CSV) export.

use crate::model::application::ApplicationRecord;

/// Fixed header row; column order matches [`record_fields`].
pub const CSV_HEADERS: [&str; 11] = [
    "Company",
    "Role",
    "Status",
    "Applied Date",
    "Location",
    "Salary",
    "Type",
    "Contact Person",
    "Follow-up Date",
    "Job URL",
    "Notes",
];

/// Renders the header plus one fully quoted row per record, `\n`-joined.
pub fn to_csv(records: &[ApplicationRecord]) -> String {
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(CSV_HEADERS.join(","));
    for record in records {
        let row = record_fields(record)
            .iter()
            .map(|field| quote(field))
            .collect::<Vec<_>>()
            .join(",");
        lines.push(row);
    }
    lines.join("\n")
}

fn record_fields(record: &ApplicationRecord) -> [String; 11] {
    let opt = |value: &Option<String>| value.clone().unwrap_or_default();
    [
        record.company.clone(),
        record.role.clone(),
        record.status.as_str().to_string(),
        record.applied_date.format("%Y-%m-%d").to_string(),
        opt(&record.location),
        opt(&record.salary),
        opt(&record.job_type),
        opt(&record.contact_person),
        record
            .follow_up_date
            .map(|date| date.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
        opt(&record.job_url),
        record.notes.clone(),
    ]
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}
