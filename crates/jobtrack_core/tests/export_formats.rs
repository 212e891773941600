use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use jobtrack_core::db::open_db_in_memory;
use jobtrack_core::export::csv::{to_csv, CSV_HEADERS};
use jobtrack_core::export::report::to_report;
use jobtrack_core::{
    build_export, filter_by_range, parse_json_export, ApplicationDraft, ApplicationRecord,
    ApplicationService, ApplicationStatus, Caller, DateRange, DirectorySink, ExportError,
    ExportFormat, ServiceError, SqliteApplicationStore, SqliteNotificationRepository,
};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 19, 9, 30, 0).unwrap()
}

fn today() -> NaiveDate {
    now().date_naive()
}

fn record(company: &str, status: ApplicationStatus, days_ago: i64) -> ApplicationRecord {
    let mut draft = ApplicationDraft::new(company, "Engineer");
    draft.status = status;
    draft.applied_date = Some(today() - Duration::days(days_ago));
    draft.into_record("ada", today(), 1_700_000_000_000).unwrap()
}

fn detailed() -> ApplicationRecord {
    let mut draft = ApplicationDraft::new("Acme, Inc.", "Engineer");
    draft.status = ApplicationStatus::Interview;
    draft.applied_date = NaiveDate::from_ymd_opt(2026, 3, 7);
    draft.notes = "Said \"great fit\"\nsecond line".to_string();
    draft.location = Some("Berlin".to_string());
    draft.salary = Some("90k".to_string());
    draft.job_type = Some("full-time".to_string());
    draft.contact_person = Some("Sam".to_string());
    draft.follow_up_date = NaiveDate::from_ymd_opt(2026, 3, 14);
    draft.job_url = Some("https://acme.example/jobs/1".to_string());
    draft.into_record("ada", today(), 0).unwrap()
}

#[test]
fn csv_header_is_fixed_and_rows_are_quoted() {
    let csv = to_csv(&[detailed(), record("Globex", ApplicationStatus::Applied, 1)]);
    let header = csv.lines().next().unwrap();

    assert_eq!(
        header,
        "Company,Role,Status,Applied Date,Location,Salary,Type,Contact Person,Follow-up Date,Job URL,Notes"
    );
    assert_eq!(CSV_HEADERS.len(), 11);
    assert!(csv.starts_with(&format!("{header}\n\"Acme, Inc.\",\"Engineer\",\"Interview\",\"2026-03-07\"")));
    assert!(csv.contains("\"Said \"\"great fit\"\"\nsecond line\""));
    assert!(csv.ends_with(
        "\"Globex\",\"Engineer\",\"Applied\",\"2026-10-18\",\"\",\"\",\"\",\"\",\"\",\"\",\"\""
    ));
}

#[test]
fn json_export_round_trips_records() {
    let records = vec![detailed(), record("Globex", ApplicationStatus::Offer, 3)];
    let payload = build_export(&records, ExportFormat::Json, DateRange::All, now()).unwrap();

    assert_eq!(payload.filename, "job-applications-2026-10-19.json");
    assert_eq!(payload.mime_type, "application/json");
    let parsed = parse_json_export(&payload.content).unwrap();
    assert_eq!(parsed.applications, records);
    assert_eq!(parsed.total_applications, 2);
    assert_eq!(parsed.export_date, now());

    let value: serde_json::Value = serde_json::from_str(&payload.content).unwrap();
    assert_eq!(value["totalApplications"], 2);
    assert_eq!(value["applications"][0]["appliedDate"], "2026-03-07");
    assert_eq!(value["applications"][0]["type"], "full-time");
    assert_eq!(value["applications"][0]["followUpDate"], "2026-03-14");
    assert!(value["applications"][1]["location"].is_null());
}

#[test]
fn malformed_json_export_is_a_parse_error() {
    assert!(matches!(
        parse_json_export("{\"exportDate\": 3"),
        Err(ExportError::Parse(_))
    ));
}

#[test]
fn report_has_fixed_layout() {
    let records = vec![
        detailed(),
        record("Globex", ApplicationStatus::Offer, 3),
        record("Initech", ApplicationStatus::Rejected, 4),
    ];
    let report = to_report(&records, DateRange::Last90Days, today());
    let lines = report.lines().collect::<Vec<_>>();

    assert_eq!(lines[0], "JOB APPLICATION TRACKER REPORT");
    assert_eq!(lines[1], "Generated on: 10/19/2026");
    assert_eq!(lines[2], "Date Range: 90days");
    assert!(lines.contains(&"- Total Applications: 3"));
    assert!(lines.contains(&"- Interview Stage: 1"));
    assert!(lines.contains(&"- Offers Received: 1"));
    assert!(lines.contains(&"- Rejected: 1"));
    assert!(lines.contains(&"- Interview Rate: 33.3%"));
    assert!(lines.contains(&"- Success Rate: 33.3%"));
    assert!(lines.contains(&"1. Acme, Inc. - Engineer"));
    assert!(lines.contains(&"   Applied: 3/7/2026"));
    assert!(lines.contains(&"   Location: Berlin"));
    assert!(lines.contains(&"2. Globex - Engineer"));
    assert!(lines.contains(&"   Location: Not specified"));
    assert!(lines.contains(&"   Notes: No notes"));
}

#[test]
fn range_cutoff_is_inclusive() {
    let records = vec![
        record("Edge", ApplicationStatus::Applied, 30),
        record("Outside", ApplicationStatus::Applied, 31),
        record("Inside", ApplicationStatus::Applied, 0),
    ];

    let last_30 = filter_by_range(&records, DateRange::Last30Days, today());
    let names = last_30
        .iter()
        .map(|record| record.company.as_str())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["Edge", "Inside"]);
    assert_eq!(filter_by_range(&records, DateRange::All, today()).len(), 3);
    assert_eq!(
        DateRange::LastYear.cutoff(today()),
        NaiveDate::from_ymd_opt(2025, 10, 19)
    );
}

#[test]
fn empty_selection_is_no_data() {
    assert!(matches!(
        build_export(&[], ExportFormat::Csv, DateRange::All, now()),
        Err(ExportError::NoData)
    ));
    let old = vec![record("Old", ApplicationStatus::Applied, 120)];
    assert!(matches!(
        build_export(&old, ExportFormat::Report, DateRange::Last90Days, now()),
        Err(ExportError::NoData)
    ));
}

#[test]
fn payload_names_follow_format() {
    let records = vec![record("Acme", ApplicationStatus::Applied, 1)];

    let csv = build_export(&records, ExportFormat::Csv, DateRange::All, now()).unwrap();
    assert_eq!(csv.filename, "job-applications-2026-10-19.csv");
    assert_eq!(csv.mime_type, "text/csv;charset=utf-8");
    assert_eq!(csv.record_count, 1);

    let report = build_export(&records, ExportFormat::Report, DateRange::All, now()).unwrap();
    assert_eq!(report.filename, "job-applications-report-2026-10-19.txt");
    assert_eq!(report.mime_type, "text/plain");
    assert!(report.content.contains("Date Range: All time"));
}

#[test]
fn service_export_writes_file_through_directory_sink() {
    let conn = open_db_in_memory().unwrap();
    let service = ApplicationService::new(
        SqliteApplicationStore::new(&conn),
        SqliteNotificationRepository::new(&conn),
    );
    let ada = Caller::member("ada");
    let dir = tempfile::tempdir().unwrap();
    let mut sink = DirectorySink::new(dir.path().join("exports"));

    assert!(matches!(
        service.export(&ada, ExportFormat::Csv, DateRange::All, now(), &mut sink),
        Err(ServiceError::Export(ExportError::NoData))
    ));

    let mut draft = ApplicationDraft::new("Acme", "Engineer");
    draft.applied_date = Some(today());
    service.create(&ada, draft).unwrap();

    let receipt = service
        .export(&ada, ExportFormat::Csv, DateRange::All, now(), &mut sink)
        .unwrap();
    let path = receipt.location.unwrap();
    assert_eq!(path, dir.path().join("exports").join(receipt.filename));
    let written = std::fs::read_to_string(path).unwrap();
    assert!(written.ends_with("\"Acme\",\"Engineer\",\"Applied\",\"2026-10-19\",\"\",\"\",\"\",\"\",\"\",\"\",\"\""));
}
