//! Filter/sort engine for list views.
//!
//! # Invariants
//! - Filtering never reorders; sorting is stable.
//! - Search is a case-insensitive substring match on company OR role.

use crate::model::application::{ApplicationRecord, ApplicationStatus};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Status filter for list views.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(ApplicationStatus),
}

impl StatusFilter {
    pub fn matches(self, status: ApplicationStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(expected) => expected == status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        value.parse::<ApplicationStatus>().map(Self::Only)
    }
}

/// Ordering applied after filtering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    DateDesc,
    DateAsc,
    Company,
    Status,
}

impl SortKey {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DateDesc => "date-desc",
            Self::DateAsc => "date-asc",
            Self::Company => "company",
            Self::Status => "status",
        }
    }
}

impl Display for SortKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "date-desc" => Ok(Self::DateDesc),
            "date-asc" => Ok(Self::DateAsc),
            "company" => Ok(Self::Company),
            "status" => Ok(Self::Status),
            other => Err(format!(
                "unsupported sort key `{other}`; expected date-desc|date-asc|company|status"
            )),
        }
    }
}

/// Filter and sort options for one list view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewQuery {
    pub search: String,
    pub status: StatusFilter,
    pub sort: SortKey,
}

/// Returns the filtered, sorted view of `records`.
pub fn filter_and_sort(records: &[ApplicationRecord], query: &ViewQuery) -> Vec<ApplicationRecord> {
    let needle = query.search.trim().to_lowercase();
    let mut view = records
        .iter()
        .filter(|record| query.status.matches(record.status))
        .filter(|record| matches_search(record, &needle))
        .cloned()
        .collect::<Vec<_>>();

    match query.sort {
        SortKey::DateDesc => view.sort_by(|a, b| b.applied_date.cmp(&a.applied_date)),
        SortKey::DateAsc => view.sort_by(|a, b| a.applied_date.cmp(&b.applied_date)),
        SortKey::Company => view.sort_by(|a, b| a.company.cmp(&b.company)),
        SortKey::Status => view.sort_by(|a, b| a.status.as_str().cmp(b.status.as_str())),
    }
    view
}

fn matches_search(record: &ApplicationRecord, needle: &str) -> bool {
    needle.is_empty()
        || record.company.to_lowercase().contains(needle)
        || record.role.to_lowercase().contains(needle)
}

#[cfg(test)]
mod tests {
    use super::{SortKey, StatusFilter};
    use crate::model::application::ApplicationStatus;

    #[test]
    fn parses_view_options() {
        assert_eq!("date-asc".parse::<SortKey>().unwrap(), SortKey::DateAsc);
        assert!("newest".parse::<SortKey>().is_err());
        assert_eq!("ALL".parse::<StatusFilter>().unwrap(), StatusFilter::All);
        assert_eq!(
            "interview".parse::<StatusFilter>().unwrap(),
            StatusFilter::Only(ApplicationStatus::Interview)
        );
    }
}
