//! Dated note lines and reminder marker tokens.
//!
//! # Responsibility
//! - Format the dated lines appended by reminder completion.
//! - Detect marker tokens that keep reminder rules from re-firing.
//! - Parse notes back into dated entries for history views.
//!
//! # Invariants
//! - Marker tokens are part of the stored data contract; their text never changes.
//! - Parsing is lossless for undated lines (kept with `date = None`).

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

/// Appended when a stale-application reminder is completed.
pub const STALE_ADDRESSED_MARKER: &str = "[stale-addressed]";
/// Appended when an interview-prep reminder is completed.
pub const PREP_COMPLETED_MARKER: &str = "[interview-prep-completed]";

static DATED_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\[(\d{4}-\d{2}-\d{2})\]\s*(.*)$").expect("valid dated line regex")
});
static MARKER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[(stale-addressed|interview-prep-completed)\]").expect("valid marker regex")
});

/// Known marker tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    StaleAddressed,
    PrepCompleted,
}

impl Marker {
    pub fn token(self) -> &'static str {
        match self {
            Self::StaleAddressed => STALE_ADDRESSED_MARKER,
            Self::PrepCompleted => PREP_COMPLETED_MARKER,
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "stale-addressed" => Some(Self::StaleAddressed),
            "interview-prep-completed" => Some(Self::PrepCompleted),
            _ => None,
        }
    }
}

/// One line of a record's notes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteEntry {
    pub date: Option<NaiveDate>,
    /// Line text without the date prefix and without marker tokens.
    pub text: String,
    pub markers: Vec<Marker>,
}

/// Whether `notes` already carries `marker`.
pub fn has_marker(notes: &str, marker: Marker) -> bool {
    notes.contains(marker.token())
}

/// Builds `[YYYY-MM-DD] text` with an optional trailing marker.
pub fn dated_line(date: NaiveDate, text: &str, marker: Option<Marker>) -> String {
    let mut line = format!("[{}] {}", date.format("%Y-%m-%d"), text.trim());
    if let Some(marker) = marker {
        line.push(' ');
        line.push_str(marker.token());
    }
    line
}

/// Splits notes into entries, newest last (storage order).
pub fn note_entries(notes: &str) -> Vec<NoteEntry> {
    notes
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(parse_line)
        .collect()
}

fn parse_line(line: &str) -> NoteEntry {
    let (date, body) = match DATED_LINE_RE.captures(line) {
        Some(caps) => {
            let date = caps
                .get(1)
                .and_then(|m| NaiveDate::parse_from_str(m.as_str(), "%Y-%m-%d").ok());
            let body = caps.get(2).map_or("", |m| m.as_str());
            if date.is_some() {
                (date, body)
            } else {
                (None, line)
            }
        }
        None => (None, line),
    };

    let markers = MARKER_RE
        .captures_iter(body)
        .filter_map(|caps| caps.get(1).and_then(|m| Marker::from_name(m.as_str())))
        .collect();
    let text = MARKER_RE.replace_all(body, "").trim().to_string();

    NoteEntry {
        date,
        text,
        markers,
    }
}

#[cfg(test)]
mod tests {
    use super::{dated_line, has_marker, note_entries, Marker};
    use chrono::NaiveDate;

    #[test]
    fn dated_line_appends_marker_token() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let line = dated_line(date, "Addressed stale application.", Some(Marker::StaleAddressed));
        assert_eq!(line, "[2026-10-19] Addressed stale application. [stale-addressed]");
        assert!(has_marker(&line, Marker::StaleAddressed));
        assert!(!has_marker(&line, Marker::PrepCompleted));
    }

    #[test]
    fn note_entries_split_dates_and_markers() {
        let notes = "Referred by Sam\n\n[2026-10-01] Followed up with company.\n[2026-10-02] Completed interview preparation. [interview-prep-completed]";
        let entries = note_entries(notes);
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].date, None);
        assert_eq!(entries[0].text, "Referred by Sam");
        assert_eq!(entries[1].date, NaiveDate::from_ymd_opt(2026, 10, 1));
        assert!(entries[1].markers.is_empty());
        assert_eq!(entries[2].markers, vec![Marker::PrepCompleted]);
        assert_eq!(entries[2].text, "Completed interview preparation.");
    }

    #[test]
    fn invalid_calendar_date_is_kept_as_plain_text() {
        let entries = note_entries("[2026-13-40] typo");
        assert_eq!(entries[0].date, None);
        assert_eq!(entries[0].text, "[2026-13-40] typo");
    }
}
