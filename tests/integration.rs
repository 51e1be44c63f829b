//! End-to-end tests for the on-call report engine.
//!
//! Every test drives a whole report run (schedule selection, decoding,
//! timezone conversion, classification, pricing, summary) through an
//! in-memory directory and the sample configuration in `./config`:
//! - Weekday shifts and the 09:00-17:00 weekday exclusion
//! - Weekend and bank holiday classification
//! - Rollback of early-morning samples and month boundaries
//! - Per-user timezones and holiday calendars
//! - Cross-schedule summary
//! - Report writers
//! - Error cases

use chrono::{DateTime, TimeZone, Utc};
use std::fs;

use oncall_report::api::InMemoryDirectory;
use oncall_report::config::ConfigLoader;
use oncall_report::error::ReportError;
use oncall_report::models::{DirectoryUser, RenderedScheduleEntry, ReportModel, UserReference};
use oncall_report::report::{
    ConsoleReport, CsvReport, OncallCsvReport, ReportGenerator, ReportWriter, ScheduleSelection,
};

// =============================================================================
// Test Helpers
// =============================================================================

fn create_test_config() -> ConfigLoader {
    ConfigLoader::load("./config/pd-report-config.example.yml").expect("Failed to load config")
}

/// Mid-April 2024, so the default window is March 2024.
fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 4, 15, 12, 0, 0).unwrap()
}

fn create_user(id: &str, name: &str, time_zone: Option<&str>) -> DirectoryUser {
    DirectoryUser {
        id: id.to_string(),
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        time_zone: time_zone.map(str::to_string),
        teams: vec![],
    }
}

fn create_entry(user: &DirectoryUser, start: &str, end: &str) -> RenderedScheduleEntry {
    RenderedScheduleEntry {
        start: start.to_string(),
        end: end.to_string(),
        user: UserReference {
            id: user.id.clone(),
            summary: user.name.clone(),
        },
    }
}

fn jane() -> DirectoryUser {
    create_user("PJANE01", "Jane Doe", Some("Europe/London"))
}

fn lucia() -> DirectoryUser {
    create_user("PLUCIA1", "Lucia Garcia", Some("Europe/Madrid"))
}

async fn run_single(entries: Vec<RenderedScheduleEntry>) -> ReportModel {
    run_single_at(entries, now()).await
}

async fn run_single_at(entries: Vec<RenderedScheduleEntry>, now: DateTime<Utc>) -> ReportModel {
    let config = create_test_config();
    let directory = InMemoryDirectory::new()
        .with_user(jane())
        .with_user(lucia())
        .with_schedule("PPRIMARY", "Primary Rota", entries);

    ReportGenerator::new(&config, &directory)
        .generate(&ScheduleSelection::All, now)
        .await
        .expect("Report generation failed")
}

/// Mid-May 2024, so the default window is April 2024.
fn april_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 15, 12, 0, 0).unwrap()
}

fn assert_approx(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "Expected {}, got {}",
        expected,
        actual
    );
}

// =============================================================================
// SECTION 1: Weekday Hours
// =============================================================================

#[tokio::test]
async fn test_weekday_overnight_shift_skips_office_hours() {
    // Tuesday 17:00 to Wednesday 09:00 London (GMT).
    // 17:00-24:00 Tuesday (7h), 00:00-08:00 rolled back to Tuesday (8h),
    // 08:00-09:00 Wednesday before the exclusion (1h).
    // Expected: 16h at 140/16 per hour = 140
    let jane = jane();
    let model = run_single(vec![create_entry(
        &jane,
        "2024-03-05T17:00:00Z",
        "2024-03-06T09:00:00Z",
    )])
    .await;

    let totals = model.schedules[0].rota_users[0].totals;
    assert_approx(totals.work_hours, 16.0);
    assert_approx(totals.work_days, 1.0);
    assert_approx(totals.work_amount, 140.0);
    assert_approx(totals.weekend_hours, 0.0);
    assert_approx(totals.total_amount, 140.0);
}

#[tokio::test]
async fn test_office_hours_only_shift_is_not_billed() {
    // Wednesday 09:00 to 17:00: entirely inside the exclusion.
    let jane = jane();
    let model = run_single(vec![create_entry(
        &jane,
        "2024-03-06T09:00:00Z",
        "2024-03-06T17:00:00Z",
    )])
    .await;

    let user = &model.schedules[0].rota_users[0];
    assert_eq!(user.name, "Jane Doe");
    assert_approx(user.totals.total_hours(), 0.0);
    assert_approx(user.totals.total_amount, 0.0);
}

// =============================================================================
// SECTION 2: Weekends and Bank Holidays
// =============================================================================

#[tokio::test]
async fn test_full_weekend_day() {
    // Saturday 08:00 to Sunday 08:00: one full weekend rotation day.
    let jane = jane();
    let model = run_single(vec![create_entry(
        &jane,
        "2024-03-09T08:00:00Z",
        "2024-03-10T08:00:00Z",
    )])
    .await;

    let totals = model.schedules[0].rota_users[0].totals;
    assert_approx(totals.weekend_hours, 24.0);
    assert_approx(totals.weekend_days, 1.0);
    assert_approx(totals.weekend_amount, 200.0);
    assert_approx(totals.work_hours, 0.0);
}

#[tokio::test]
async fn test_good_friday_is_bank_holiday() {
    let jane = jane();
    let model = run_single(vec![create_entry(
        &jane,
        "2024-03-29T08:00:00Z",
        "2024-03-30T08:00:00Z",
    )])
    .await;

    let totals = model.schedules[0].rota_users[0].totals;
    assert_approx(totals.bank_holiday_hours, 24.0);
    assert_approx(totals.bank_holiday_amount, 250.0);
    assert_approx(totals.work_hours, 0.0);
    assert_approx(totals.weekend_hours, 0.0);
}

#[tokio::test]
async fn test_weekend_across_daylight_saving_change() {
    // Saturday 30 March to Sunday 31 March; clocks go forward at 01:00 UTC.
    // Sampling is in UTC, so the day still yields 48 samples.
    let jane = jane();
    let model = run_single(vec![create_entry(
        &jane,
        "2024-03-30T08:00:00Z",
        "2024-03-31T08:00:00Z",
    )])
    .await;

    let totals = model.schedules[0].rota_users[0].totals;
    assert_approx(totals.weekend_hours, 24.0);
    assert_approx(totals.bank_holiday_hours, 0.0);
}

// =============================================================================
// SECTION 3: Rotation Day Boundaries
// =============================================================================

#[tokio::test]
async fn test_first_morning_of_month_is_dropped() {
    // 1 March 00:00-08:00 belongs to the 29 February rotation day,
    // which is outside the reported month.
    let jane = jane();
    let model = run_single(vec![create_entry(
        &jane,
        "2024-03-01T00:00:00Z",
        "2024-03-01T08:00:00Z",
    )])
    .await;

    let user = &model.schedules[0].rota_users[0];
    assert_approx(user.totals.total_hours(), 0.0);
}

#[tokio::test]
async fn test_bank_holiday_night_rolls_back_to_holiday() {
    // Saturday 30 March 00:00-08:00 still belongs to Good Friday.
    let jane = jane();
    let model = run_single(vec![create_entry(
        &jane,
        "2024-03-30T00:00:00Z",
        "2024-03-30T08:00:00Z",
    )])
    .await;

    let totals = model.schedules[0].rota_users[0].totals;
    assert_approx(totals.bank_holiday_hours, 8.0);
    assert_approx(totals.weekend_hours, 0.0);
}

#[tokio::test]
async fn test_last_night_of_month_is_billed_once() {
    // Sunday 31 March 08:00 BST to Monday 1 April 08:00 BST is one full
    // weekend rotation day of March.
    let jane = jane();
    let entries = vec![create_entry(
        &jane,
        "2024-03-31T07:00:00Z",
        "2024-04-01T07:00:00Z",
    )];

    let march = run_single(entries.clone()).await;
    let totals = march.schedules[0].rota_users[0].totals;
    assert_approx(totals.weekend_hours, 24.0);
    assert_approx(totals.work_hours, 0.0);
    assert_approx(totals.weekend_amount, 200.0);

    let april = run_single_at(entries, april_now()).await;
    assert_approx(april.schedules[0].rota_users[0].totals.total_hours(), 0.0);
}

#[tokio::test]
async fn test_next_month_day_east_of_utc_is_billed_once() {
    // 06:00-08:00 UTC on 1 April is 08:00-10:00 CEST in Madrid: April's
    // first rotation day, only 08:00-09:00 outside the weekday exclusion.
    let lucia = lucia();
    let entries = vec![create_entry(
        &lucia,
        "2024-04-01T06:00:00Z",
        "2024-04-01T08:00:00Z",
    )];

    let march = run_single(entries.clone()).await;
    assert_approx(march.schedules[0].rota_users[0].totals.total_hours(), 0.0);

    let april = run_single_at(entries, april_now()).await;
    let totals = april.schedules[0].rota_users[0].totals;
    assert_approx(totals.work_hours, 1.0);
    assert_approx(totals.work_amount, 8.75);
}

// =============================================================================
// SECTION 4: Timezones and Calendars
// =============================================================================

#[tokio::test]
async fn test_user_timezone_shifts_exclusion_window() {
    // 07:00-15:00 UTC is 08:00-16:00 in Madrid (CET): only 08:00-09:00
    // falls outside the weekday exclusion.
    let lucia = lucia();
    let model = run_single(vec![create_entry(
        &lucia,
        "2024-03-05T07:00:00Z",
        "2024-03-05T15:00:00Z",
    )])
    .await;

    let user = &model.schedules[0].rota_users[0];
    assert_eq!(user.email, "lucia.garcia@example.com");
    assert_approx(user.totals.work_hours, 1.0);
    assert_approx(user.totals.work_amount, 8.75);
}

#[tokio::test]
async fn test_missing_directory_timezone_uses_default() {
    let config = create_test_config();
    let user = create_user("PNOTZ01", "Sam Smith", None);
    let directory = InMemoryDirectory::new().with_user(user.clone()).with_schedule(
        "PPRIMARY",
        "Primary Rota",
        vec![create_entry(&user, "2024-03-09T08:00:00Z", "2024-03-09T20:00:00Z")],
    );

    let model = ReportGenerator::new(&config, &directory)
        .generate(&ScheduleSelection::All, now())
        .await
        .unwrap();

    assert_approx(model.schedules[0].rota_users[0].totals.weekend_hours, 12.0);
}

#[tokio::test]
async fn test_missing_timezone_without_default_aborts() {
    let yaml = fs::read_to_string("./config/pd-report-config.example.yml")
        .unwrap()
        .replace("defaultUserTimezone: \"Europe/London\"\n", "");
    let config = ConfigLoader::from_yaml_str(&yaml, "test").unwrap();
    let user = create_user("PNOTZ01", "Sam Smith", None);
    let directory = InMemoryDirectory::new().with_user(user.clone()).with_schedule(
        "PPRIMARY",
        "Primary Rota",
        vec![create_entry(&user, "2024-03-09T08:00:00Z", "2024-03-09T20:00:00Z")],
    );

    let result = ReportGenerator::new(&config, &directory)
        .generate(&ScheduleSelection::All, now())
        .await;

    match result {
        Err(ReportError::TimezoneUnavailable { user_id }) => assert_eq!(user_id, "PNOTZ01"),
        other => panic!("Expected TimezoneUnavailable, got {:?}", other),
    }
}

// =============================================================================
// SECTION 5: Cross-Schedule Summary
// =============================================================================

#[tokio::test]
async fn test_summary_merges_schedules() {
    let config = create_test_config();
    let jane = jane();
    let lucia = lucia();
    let directory = InMemoryDirectory::new()
        .with_user(jane.clone())
        .with_user(lucia.clone())
        .with_schedule(
            "PPRIMARY",
            "Primary Rota",
            vec![
                create_entry(&jane, "2024-03-09T08:00:00Z", "2024-03-10T08:00:00Z"),
                create_entry(&lucia, "2024-03-16T07:00:00Z", "2024-03-17T07:00:00Z"),
            ],
        )
        .with_schedule(
            "PSECOND",
            "Secondary Rota",
            vec![create_entry(&jane, "2024-03-05T17:00:00Z", "2024-03-06T09:00:00Z")],
        )
        .with_schedule("PIGNORE", "Ignored Rota", vec![]);

    let model = ReportGenerator::new(&config, &directory)
        .generate(&ScheduleSelection::All, now())
        .await
        .unwrap();

    assert_eq!(model.schedules.len(), 2);
    assert_eq!(model.users_summary.len(), 2);
    assert_eq!(model.users_summary[0].name, "Jane Doe");
    assert_eq!(model.users_summary[1].name, "Lucia Garcia");

    let jane_summary = model.users_summary[0].totals;
    assert_approx(jane_summary.work_hours, 16.0);
    assert_approx(jane_summary.weekend_hours, 24.0);
    assert_approx(jane_summary.total_amount, 340.0);
    assert_approx(jane_summary.work_days, 1.0);
    assert_approx(jane_summary.weekend_days, 1.0);
}

#[tokio::test]
async fn test_explicit_selection_keeps_order() {
    let config = create_test_config();
    let directory = InMemoryDirectory::new()
        .with_schedule("PFIRST", "First", vec![])
        .with_schedule("PSECOND", "Second", vec![]);

    let selection = ScheduleSelection::Ids(vec!["PSECOND".to_string(), "PFIRST".to_string()]);
    let model = ReportGenerator::new(&config, &directory)
        .generate(&selection, now())
        .await
        .unwrap();

    let ids: Vec<&str> = model.schedules.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["PSECOND", "PFIRST"]);
    assert!(model.users_summary.is_empty());
}

// =============================================================================
// SECTION 6: Report Writers
// =============================================================================

#[tokio::test]
async fn test_console_report_end_to_end() {
    let jane = jane();
    let model = run_single(vec![create_entry(
        &jane,
        "2024-03-09T08:00:00Z",
        "2024-03-10T08:00:00Z",
    )])
    .await;

    let mut writer = ConsoleReport::new(Vec::new());
    assert!(writer.generate_report(&model).unwrap().is_none());
    let output = String::from_utf8(writer.into_inner()).unwrap();

    assert!(output.contains("| Schedule: 'Primary Rota' (PPRIMARY)"));
    assert!(output.contains("| Users summary"));
    assert!(output.contains("£200"));
    assert!(output.contains("jane.doe@example.com"));
}

#[tokio::test]
async fn test_csv_reports_end_to_end() {
    let jane = jane();
    let model = run_single(vec![create_entry(
        &jane,
        "2024-03-05T17:00:00Z",
        "2024-03-06T09:00:00Z",
    )])
    .await;
    let dir = tempfile::tempdir().unwrap();

    let message = CsvReport::new(dir.path())
        .generate_report(&model)
        .unwrap()
        .unwrap();
    assert!(message.starts_with("Report successfully generated: file://"));

    let schedule_csv = fs::read_to_string(
        dir.path()
            .join("pagerduty_oncall_report.3-2024-Primary_Rota-PPRIMARY.csv"),
    )
    .unwrap();
    assert!(schedule_csv.contains("Jane Doe,jane.doe@example.com,16,1.0,0,0.0,0,0.0,140,0,0,140"));

    OncallCsvReport::new(dir.path()).generate_report(&model).unwrap();
    let summary_csv =
        fs::read_to_string(dir.path().join("pagerduty_oncall_report.3-2024-Summary.csv")).unwrap();
    assert!(summary_csv.starts_with("Start date:,Fri Mar  1 00:00:00 2024,"));
    assert!(summary_csv.contains("Jane Doe,16,1.0,0,0.0,0,0.0,"));
}

// =============================================================================
// SECTION 7: Error Cases
// =============================================================================

#[tokio::test]
async fn test_explicit_ignored_schedule_is_rejected() {
    let config = create_test_config();
    let directory = InMemoryDirectory::new().with_schedule("PIGNORE", "Ignored Rota", vec![]);

    let result = ReportGenerator::new(&config, &directory)
        .generate(&ScheduleSelection::Ids(vec!["PIGNORE".to_string()]), now())
        .await;

    assert!(matches!(result, Err(ReportError::ScheduleIgnored { .. })));
}

#[tokio::test]
async fn test_unknown_schedule_is_upstream_error() {
    let config = create_test_config();
    let directory = InMemoryDirectory::new();

    let result = ReportGenerator::new(&config, &directory)
        .generate(&ScheduleSelection::Ids(vec!["PMISSING".to_string()]), now())
        .await;

    assert!(matches!(result, Err(ReportError::Upstream { .. })));
}

#[tokio::test]
async fn test_malformed_entry_is_invalid_shift() {
    let jane = jane();
    let config = create_test_config();
    let directory = InMemoryDirectory::new().with_user(jane.clone()).with_schedule(
        "PPRIMARY",
        "Primary Rota",
        vec![create_entry(&jane, "yesterday", "2024-03-06T09:00:00Z")],
    );

    let result = ReportGenerator::new(&config, &directory)
        .generate(&ScheduleSelection::All, now())
        .await;

    assert!(matches!(result, Err(ReportError::InvalidShift { .. })));
}

#[tokio::test]
async fn test_missing_calendar_year_aborts() {
    // December rotations need the 2023 calendar, which is not shipped.
    let jane = jane();
    let config = create_test_config();
    let directory = InMemoryDirectory::new().with_user(jane.clone()).with_schedule(
        "PPRIMARY",
        "Primary Rota",
        vec![create_entry(&jane, "2023-12-05T08:00:00Z", "2023-12-05T20:00:00Z")],
    );

    let result = ReportGenerator::new(&config, &directory)
        .generate(&ScheduleSelection::All, Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap())
        .await;

    match result {
        Err(ReportError::CalendarNotFound { calendar, year, user_id }) => {
            assert_eq!(calendar, "uk");
            assert_eq!(year, 2023);
            assert_eq!(user_id, "PJANE01");
        }
        other => panic!("Expected CalendarNotFound, got {:?}", other),
    }
}
