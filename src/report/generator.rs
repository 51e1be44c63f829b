//! One report run, end to end.

use std::time::Instant;

use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use crate::api::Directory;
use crate::calculation::{DayType, PricesInfo, RotationAggregator, summarize};
use crate::config::{ConfigLoader, HolidayCalendarStore};
use crate::error::{ReportError, ReportResult};
use crate::models::{ReportModel, ReportWindow, ScheduleReport, ScheduleRotation};

use super::build_report;

/// Which schedules a run reports on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleSelection {
    /// Every schedule in the directory except the configured ignores.
    All,
    /// Exactly these schedule ids.
    Ids(Vec<String>),
}

impl ScheduleSelection {
    /// Interprets command-line schedule arguments. An empty list or any
    /// `all` entry selects every schedule.
    pub fn from_args(args: &[String]) -> Self {
        if args.is_empty() || args.iter().any(|a| a.eq_ignore_ascii_case("all")) {
            ScheduleSelection::All
        } else {
            ScheduleSelection::Ids(args.to_vec())
        }
    }
}

/// Generates report models from a directory and a configuration.
///
/// Schedules are processed one after another and the first error aborts the
/// run. Holiday calendars are loaded from `calendarsDirectory` for the years
/// the run needs unless a store is supplied with
/// [`with_calendars`](Self::with_calendars).
#[derive(Debug)]
pub struct ReportGenerator<'a, D> {
    config: &'a ConfigLoader,
    directory: &'a D,
    calendars: Option<HolidayCalendarStore>,
}

impl<'a, D: Directory> ReportGenerator<'a, D> {
    /// Creates a generator.
    pub fn new(config: &'a ConfigLoader, directory: &'a D) -> Self {
        Self {
            config,
            directory,
            calendars: None,
        }
    }

    /// Uses an already loaded calendar store instead of reading the
    /// calendars directory.
    pub fn with_calendars(mut self, calendars: HolidayCalendarStore) -> Self {
        self.calendars = Some(calendars);
        self
    }

    /// Runs the report for `selection`, resolving the default window
    /// relative to `now`.
    ///
    /// # Errors
    ///
    /// - `ScheduleIgnored` when an explicitly requested schedule is ignored
    /// - `PriceNotFound` when a day type has no price
    /// - any calendar, upstream, decoding or aggregation error
    pub async fn generate(
        &self,
        selection: &ScheduleSelection,
        now: DateTime<Utc>,
    ) -> ReportResult<ReportModel> {
        let run_id = Uuid::new_v4();
        let started = Instant::now();
        info!(run_id = %run_id, "Generating report");

        let default_window = self.config.report_window(now);
        let schedule_ids = self.select_schedules(run_id, selection).await?;
        let windows: Vec<(String, ReportWindow)> = schedule_ids
            .into_iter()
            .map(|id| {
                let window = self.config.schedule_window(&id, default_window);
                (id, window)
            })
            .collect();

        let run_window = windows
            .iter()
            .map(|(_, window)| *window)
            .reduce(|a, b| a.union(&b))
            .unwrap_or(default_window);

        let loaded;
        let calendars = match &self.calendars {
            Some(calendars) => calendars,
            None => {
                loaded = HolidayCalendarStore::load_dir(
                    &self.config.config().calendars_directory,
                    &run_window.calendar_years(),
                )?;
                &loaded
            }
        };

        let prices = PricesInfo::from_config(self.config)?;
        info!(
            run_id = %run_id,
            currency = prices.currency(),
            weekday_hourly = prices.effective_hourly_price(DayType::Weekday),
            weekend_hourly = prices.effective_hourly_price(DayType::Weekend),
            bank_holiday_hourly = prices.effective_hourly_price(DayType::BankHoliday),
            "Resolved hourly prices"
        );

        let mut aggregator = RotationAggregator::new(self.config, &prices, calendars, self.directory);
        let mut schedules = Vec::with_capacity(windows.len());

        for (id, window) in windows {
            info!(
                run_id = %run_id,
                schedule_id = %id,
                start = %window.start,
                end = %window.end,
                "Loading schedule"
            );

            let schedule = self.directory.get_schedule(&id, window.start, window.end).await?;
            let rotation = ScheduleRotation::from_entries(&schedule.entries)?;
            let rota_users = aggregator.aggregate(&rotation, &window).await?;

            info!(
                run_id = %run_id,
                schedule_id = %id,
                entries = schedule.entries.len(),
                users = rota_users.len(),
                "Aggregated schedule"
            );

            schedules.push(ScheduleReport {
                id,
                name: schedule.name,
                start: window.start,
                end: window.end,
                rota_users,
            });
        }

        let summary = summarize(&schedules, &prices);
        let model = build_report(default_window, prices.currency(), schedules, summary);

        info!(
            run_id = %run_id,
            schedules = model.schedules.len(),
            users = model.users_summary.len(),
            duration_ms = started.elapsed().as_millis() as u64,
            "Report generated"
        );

        Ok(model)
    }

    async fn select_schedules(
        &self,
        run_id: Uuid,
        selection: &ScheduleSelection,
    ) -> ReportResult<Vec<String>> {
        match selection {
            ScheduleSelection::All => {
                let schedules = self.directory.list_schedules().await?;
                Ok(schedules
                    .into_iter()
                    .filter(|schedule| {
                        let ignored = self.config.is_schedule_ignored(&schedule.id);
                        if ignored {
                            info!(
                                run_id = %run_id,
                                schedule_id = %schedule.id,
                                name = %schedule.name,
                                "Ignoring schedule"
                            );
                        }
                        !ignored
                    })
                    .map(|schedule| schedule.id)
                    .collect())
            }
            ScheduleSelection::Ids(ids) => {
                if let Some(ignored) = ids.iter().find(|id| self.config.is_schedule_ignored(id)) {
                    return Err(ReportError::ScheduleIgnored {
                        schedule_id: ignored.clone(),
                    });
                }
                Ok(ids.clone())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::InMemoryDirectory;
    use crate::calculation::HolidayCalendar;
    use crate::models::{DirectoryUser, RenderedScheduleEntry, UserReference};
    use chrono::{NaiveDate, TimeZone};

    const CONFIG: &str = r#"
pdAuthToken: "token"
defaultHolidayCalendar: "uk"
reportTimeRange: { start: "2024-03-01T00:00:00Z", end: "2024-04-01T08:00:00Z" }
rotationInfo:
  dailyRotationStartsAt: 8
  checkRotationChangeEvery: 30
rotationPrices:
  currency: "£"
  daysInfo:
    - { day: weekday, price: 240 }
    - { day: weekend, price: 480 }
    - { day: bankholiday, price: 720 }
scheduleTimeRangeOverrides:
  - { id: "PSHORT", start: "2024-03-25T00:00:00Z", end: "2024-04-01T08:00:00Z" }
schedulesToIgnore:
  - "PIGNORE"
"#;

    fn config() -> ConfigLoader {
        ConfigLoader::from_yaml_str(CONFIG, "test").unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 15, 12, 0, 0).unwrap()
    }

    fn calendars() -> HolidayCalendarStore {
        let mut store = HolidayCalendarStore::new();
        let mut calendar = HolidayCalendar::new("uk", 2024);
        calendar.add_holiday(NaiveDate::from_ymd_opt(2024, 3, 29).unwrap(), "Good Friday".to_string());
        store.insert(calendar);
        store
    }

    fn entry(user_id: &str, name: &str, start: &str, end: &str) -> RenderedScheduleEntry {
        RenderedScheduleEntry {
            start: start.to_string(),
            end: end.to_string(),
            user: UserReference {
                id: user_id.to_string(),
                summary: name.to_string(),
            },
        }
    }

    fn user(id: &str, name: &str) -> DirectoryUser {
        DirectoryUser {
            id: id.to_string(),
            name: name.to_string(),
            email: format!("{}@example.com", id.to_lowercase()),
            time_zone: Some("UTC".to_string()),
            teams: vec![],
        }
    }

    fn directory() -> InMemoryDirectory {
        InMemoryDirectory::new()
            .with_user(user("PJANE", "Jane Doe"))
            .with_user(user("PJOHN", "John Roe"))
            .with_schedule(
                "PPRIMARY",
                "Primary Rota",
                vec![
                    // Tuesday 08:00 to Wednesday 08:00: 24 weekday hours.
                    entry("PJANE", "Jane Doe", "2024-03-05T08:00:00Z", "2024-03-06T08:00:00Z"),
                    // Saturday 08:00 to 20:00: 12 weekend hours.
                    entry("PJOHN", "John Roe", "2024-03-09T08:00:00Z", "2024-03-09T20:00:00Z"),
                ],
            )
            .with_schedule(
                "PSHORT",
                "Short Rota",
                vec![entry("PJANE", "Jane Doe", "2024-03-29T08:00:00Z", "2024-03-29T14:00:00Z")],
            )
            .with_schedule("PIGNORE", "Ignored Rota", vec![])
    }

    // ==========================================================================
    // RG-001: All schedules except ignored ones are reported
    // ==========================================================================
    #[tokio::test]
    async fn test_rg_001_all_skips_ignored_schedules() {
        let config = config();
        let directory = directory();
        let generator = ReportGenerator::new(&config, &directory).with_calendars(calendars());

        let model = generator.generate(&ScheduleSelection::All, now()).await.unwrap();

        let ids: Vec<&str> = model.schedules.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["PPRIMARY", "PSHORT"]);
        assert_eq!(model.currency, "£");
    }

    // ==========================================================================
    // RG-002: Explicitly requesting an ignored schedule is fatal
    // ==========================================================================
    #[tokio::test]
    async fn test_rg_002_explicit_ignored_schedule_is_error() {
        let config = config();
        let directory = directory();
        let generator = ReportGenerator::new(&config, &directory).with_calendars(calendars());

        let selection = ScheduleSelection::Ids(vec!["PPRIMARY".to_string(), "PIGNORE".to_string()]);
        match generator.generate(&selection, now()).await {
            Err(ReportError::ScheduleIgnored { schedule_id }) => assert_eq!(schedule_id, "PIGNORE"),
            other => panic!("Expected ScheduleIgnored, got {:?}", other),
        }
    }

    // ==========================================================================
    // RG-003: Per-schedule override replaces the report window
    // ==========================================================================
    #[tokio::test]
    async fn test_rg_003_schedule_override_window() {
        let config = config();
        let directory = directory();
        let generator = ReportGenerator::new(&config, &directory).with_calendars(calendars());

        let model = generator.generate(&ScheduleSelection::All, now()).await.unwrap();

        let short = &model.schedules[1];
        assert_eq!(short.start, Utc.with_ymd_and_hms(2024, 3, 25, 0, 0, 0).unwrap());
        assert_eq!(short.end, Utc.with_ymd_and_hms(2024, 4, 1, 8, 0, 0).unwrap());
        assert_eq!(model.schedules[0].start, Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());
        assert_eq!(model.start, Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());
        assert_eq!(model.end, Utc.with_ymd_and_hms(2024, 4, 1, 8, 0, 0).unwrap());
    }

    // ==========================================================================
    // RG-004: Totals flow through to the summary
    // ==========================================================================
    #[tokio::test]
    async fn test_rg_004_totals_and_summary() {
        let config = config();
        let directory = directory();
        let generator = ReportGenerator::new(&config, &directory).with_calendars(calendars());

        let model = generator.generate(&ScheduleSelection::All, now()).await.unwrap();

        let primary = &model.schedules[0];
        let jane = primary.rota_users.iter().find(|u| u.name == "Jane Doe").unwrap();
        let john = primary.rota_users.iter().find(|u| u.name == "John Roe").unwrap();
        assert_eq!(jane.totals.work_hours, 24.0);
        assert_eq!(jane.email, "pjane@example.com");
        assert_eq!(john.totals.weekend_hours, 12.0);
        assert!((john.totals.weekend_amount - 240.0).abs() < 1e-9);

        // Good Friday on the short rota.
        let short_jane = &model.schedules[1].rota_users[0];
        assert_eq!(short_jane.totals.bank_holiday_hours, 6.0);

        let summary_jane = model.users_summary.iter().find(|u| u.name == "Jane Doe").unwrap();
        assert_eq!(summary_jane.totals.work_hours, 24.0);
        assert_eq!(summary_jane.totals.bank_holiday_hours, 6.0);
        assert!((summary_jane.totals.total_amount - (240.0 + 180.0)).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_missing_calendars_directory_is_error() {
        let yaml = format!("{}calendarsDirectory: \"/nonexistent/calendars\"\n", CONFIG);
        let config = ConfigLoader::from_yaml_str(&yaml, "test").unwrap();
        let directory = directory();
        let generator = ReportGenerator::new(&config, &directory);

        assert!(matches!(
            generator.generate(&ScheduleSelection::All, now()).await,
            Err(ReportError::ConfigNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_calendars_loaded_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("bank_holidays.uk.2024.yml"),
            "- { title: \"Good Friday\", date: \"29/03/2024\" }\n",
        )
        .unwrap();

        let yaml = format!("{}calendarsDirectory: \"{}\"\n", CONFIG, dir.path().display());
        let config = ConfigLoader::from_yaml_str(&yaml, "test").unwrap();
        let directory = directory();
        let generator = ReportGenerator::new(&config, &directory);

        let model = generator
            .generate(&ScheduleSelection::Ids(vec!["PSHORT".to_string()]), now())
            .await
            .unwrap();
        assert_eq!(model.schedules[0].rota_users[0].totals.bank_holiday_hours, 6.0);
    }

    #[test]
    fn test_selection_from_args() {
        assert_eq!(ScheduleSelection::from_args(&[]), ScheduleSelection::All);
        assert_eq!(
            ScheduleSelection::from_args(&["ALL".to_string()]),
            ScheduleSelection::All
        );
        assert_eq!(
            ScheduleSelection::from_args(&["P1".to_string(), "P2".to_string()]),
            ScheduleSelection::Ids(vec!["P1".to_string(), "P2".to_string()])
        );
    }
}
