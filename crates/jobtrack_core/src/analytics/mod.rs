//! Aggregation engine: counts, rates and rankings over a record collection.
//!
//! # Responsibility
//! - Compute dashboard statistics as pure functions of `(records, today)`.
//! - Compute the admin overview across all owners.
//!
//! # Invariants
//! - Every rate is `0.0` when the collection is empty.
//! - `status_counts` only holds statuses that occur; missing keys mean zero.
//! - `top_companies` holds at most five entries, non-increasing by count,
//!   ties in first-encounter order.
//! - `avg_per_week` divides the 30-day count by a fixed 4.

use crate::model::application::{ApplicationRecord, ApplicationStatus};
use chrono::{Duration, NaiveDate};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

const RECENT_WINDOW_DAYS: i64 = 30;
const WEEKS_PER_RECENT_WINDOW: f64 = 4.0;
const ADMIN_RECENT_WINDOW_DAYS: i64 = 7;
const TOP_COMPANIES_LIMIT: usize = 5;

/// Dashboard statistics for one record collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicationStats {
    pub total: usize,
    pub status_counts: BTreeMap<ApplicationStatus, usize>,
    /// Percent of records in `Interview`.
    pub conversion_rate: f64,
    /// Percent of records in `Offer` or `Accepted`.
    pub success_rate: f64,
    /// Percent of records in `Rejected`.
    pub rejection_rate: f64,
    pub recent_count: usize,
    pub avg_per_week: f64,
    pub top_companies: Vec<CompanyCount>,
}

impl ApplicationStats {
    /// Count for `status`, defaulting to zero.
    pub fn count_for(&self, status: ApplicationStatus) -> usize {
        self.status_counts.get(&status).copied().unwrap_or(0)
    }
}

/// One company and how many applications reference it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompanyCount {
    pub company: String,
    pub count: usize,
}

/// Cross-owner overview for admins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminOverview {
    pub total: usize,
    pub unique_users: usize,
    pub recent_week_count: usize,
    pub status_counts: BTreeMap<ApplicationStatus, usize>,
}

/// Computes dashboard statistics.
pub fn compute_stats(records: &[ApplicationRecord], today: NaiveDate) -> ApplicationStats {
    let total = records.len();
    let status_counts = count_statuses(records);
    let count = |status| status_counts.get(&status).copied().unwrap_or(0);

    let conversion_rate = percentage(count(ApplicationStatus::Interview), total);
    let success_rate = percentage(
        count(ApplicationStatus::Offer) + count(ApplicationStatus::Accepted),
        total,
    );
    let rejection_rate = percentage(count(ApplicationStatus::Rejected), total);

    let recent_count = count_since(records, today, RECENT_WINDOW_DAYS);
    let avg_per_week = recent_count as f64 / WEEKS_PER_RECENT_WINDOW;

    ApplicationStats {
        total,
        status_counts,
        conversion_rate,
        success_rate,
        rejection_rate,
        recent_count,
        avg_per_week,
        top_companies: top_companies(records, TOP_COMPANIES_LIMIT),
    }
}

/// Computes the admin overview.
pub fn compute_admin_overview(records: &[ApplicationRecord], today: NaiveDate) -> AdminOverview {
    let unique_users = records
        .iter()
        .map(|record| record.user_id.as_str())
        .collect::<BTreeSet<_>>()
        .len();

    AdminOverview {
        total: records.len(),
        unique_users,
        recent_week_count: count_since(records, today, ADMIN_RECENT_WINDOW_DAYS),
        status_counts: count_statuses(records),
    }
}

/// `100 * part / total`, or `0.0` when `total == 0`.
pub fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    part as f64 / total as f64 * 100.0
}

fn count_statuses(records: &[ApplicationRecord]) -> BTreeMap<ApplicationStatus, usize> {
    let mut counts = BTreeMap::new();
    for record in records {
        *counts.entry(record.status).or_insert(0) += 1;
    }
    counts
}

fn count_since(records: &[ApplicationRecord], today: NaiveDate, days: i64) -> usize {
    let cutoff = today - Duration::days(days);
    records
        .iter()
        .filter(|record| record.applied_date >= cutoff)
        .count()
}

fn top_companies(records: &[ApplicationRecord], limit: usize) -> Vec<CompanyCount> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut grouped: Vec<CompanyCount> = Vec::new();
    for record in records {
        match positions.get(record.company.as_str()) {
            Some(&index) => grouped[index].count += 1,
            None => {
                positions.insert(record.company.as_str(), grouped.len());
                grouped.push(CompanyCount {
                    company: record.company.clone(),
                    count: 1,
                });
            }
        }
    }

    // Stable: equal counts keep first-encounter order.
    grouped.sort_by(|a, b| b.count.cmp(&a.count));
    grouped.truncate(limit);
    grouped
}
