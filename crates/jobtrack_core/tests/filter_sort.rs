use chrono::NaiveDate;
use jobtrack_core::{
    filter_and_sort, ApplicationDraft, ApplicationRecord, ApplicationStatus, SortKey,
    StatusFilter, ViewQuery,
};

fn record(company: &str, role: &str, status: ApplicationStatus, day: u32) -> ApplicationRecord {
    let applied = NaiveDate::from_ymd_opt(2026, 10, day).unwrap();
    let mut draft = ApplicationDraft::new(company, role);
    draft.status = status;
    draft.applied_date = Some(applied);
    draft.into_record("ada", applied, 0).unwrap()
}

fn sample() -> Vec<ApplicationRecord> {
    vec![
        record("Globex", "Data Engineer", ApplicationStatus::Rejected, 3),
        record("Acme", "Backend Developer", ApplicationStatus::Interview, 9),
        record("Initech", "Platform Engineer", ApplicationStatus::Applied, 1),
        record("Acme", "SRE", ApplicationStatus::Offer, 5),
        record("Hooli", "Designer", ApplicationStatus::Accepted, 7),
    ]
}

fn companies(records: &[ApplicationRecord]) -> Vec<&str> {
    records.iter().map(|record| record.company.as_str()).collect()
}

#[test]
fn search_matches_company_or_role_case_insensitively() {
    let query = ViewQuery {
        search: "  ENGINEER ".to_string(),
        sort: SortKey::DateAsc,
        ..ViewQuery::default()
    };
    assert_eq!(companies(&filter_and_sort(&sample(), &query)), vec!["Initech", "Globex"]);

    let query = ViewQuery {
        search: "acme".to_string(),
        ..ViewQuery::default()
    };
    assert_eq!(filter_and_sort(&sample(), &query).len(), 2);
}

#[test]
fn status_and_search_filters_combine() {
    let query = ViewQuery {
        search: "acme".to_string(),
        status: StatusFilter::Only(ApplicationStatus::Offer),
        sort: SortKey::DateDesc,
    };
    let view = filter_and_sort(&sample(), &query);
    assert_eq!(view.len(), 1);
    assert_eq!(view[0].role, "SRE");
}

#[test]
fn date_desc_is_reverse_of_date_asc() {
    let records = sample();
    let asc = filter_and_sort(
        &records,
        &ViewQuery {
            sort: SortKey::DateAsc,
            ..ViewQuery::default()
        },
    );
    let mut desc = filter_and_sort(&records, &ViewQuery::default());
    desc.reverse();
    assert_eq!(asc, desc);
    assert_eq!(companies(&asc), vec!["Initech", "Globex", "Acme", "Hooli", "Acme"]);
}

#[test]
fn company_sort_keeps_input_order_for_ties() {
    let view = filter_and_sort(
        &sample(),
        &ViewQuery {
            sort: SortKey::Company,
            ..ViewQuery::default()
        },
    );
    let pairs = view
        .iter()
        .map(|record| (record.company.as_str(), record.role.as_str()))
        .collect::<Vec<_>>();
    assert_eq!(
        pairs,
        vec![
            ("Acme", "Backend Developer"),
            ("Acme", "SRE"),
            ("Globex", "Data Engineer"),
            ("Hooli", "Designer"),
            ("Initech", "Platform Engineer"),
        ]
    );
}

#[test]
fn status_sort_orders_by_label() {
    let view = filter_and_sort(
        &sample(),
        &ViewQuery {
            sort: SortKey::Status,
            ..ViewQuery::default()
        },
    );
    let statuses = view.iter().map(|record| record.status).collect::<Vec<_>>();
    assert_eq!(
        statuses,
        vec![
            ApplicationStatus::Accepted,
            ApplicationStatus::Applied,
            ApplicationStatus::Interview,
            ApplicationStatus::Offer,
            ApplicationStatus::Rejected,
        ]
    );
}

#[test]
fn no_match_yields_empty_view() {
    let query = ViewQuery {
        search: "nonexistent".to_string(),
        ..ViewQuery::default()
    };
    assert!(filter_and_sort(&sample(), &query).is_empty());
}
