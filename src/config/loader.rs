//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the report
//! configuration from a YAML file and answering the lookups the engine needs
//! (prices, excluded windows, calendar assignments, report windows).

use std::fs;
use std::path::Path;

use chrono::{DateTime, Datelike, Days, Duration, Months, NaiveTime, Utc};
use chrono_tz::Tz;
use tracing::warn;

use crate::calculation::DayType;
use crate::error::{ReportError, ReportResult};
use crate::models::ReportWindow;

use super::types::{Configuration, RotationExcludedHoursDay, RotationInfo};

/// Loads, validates and provides access to the report configuration.
///
/// # Example
///
/// ```no_run
/// use oncall_report::calculation::DayType;
/// use oncall_report::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("/home/me/.pd-report-config.yml").unwrap();
/// let price = loader.get_daily_price(DayType::Weekday).unwrap();
/// println!("Weekday price: {}{}", loader.currency(), price);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: Configuration,
}

impl ConfigLoader {
    /// Loads configuration from the specified YAML file.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` on success, or an error if:
    /// - The file does not exist (`ConfigNotFound`)
    /// - The file contains invalid YAML or misses required fields (`ConfigParseError`)
    /// - The values are inconsistent (`InvalidConfig`)
    pub fn load<P: AsRef<Path>>(path: P) -> ReportResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| ReportError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        Self::from_yaml_str(&content, &path_str)
    }

    /// Parses configuration from YAML text. `source` names the origin in errors.
    pub fn from_yaml_str(content: &str, source: &str) -> ReportResult<Self> {
        let config: Configuration =
            serde_yaml::from_str(content).map_err(|e| ReportError::ConfigParseError {
                path: source.to_string(),
                message: e.to_string(),
            })?;

        Self::new(config)
    }

    /// Wraps an already-built configuration after validating it.
    pub fn new(config: Configuration) -> ReportResult<Self> {
        validate(&config)?;
        Ok(Self { config })
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// Returns the currency symbol.
    pub fn currency(&self) -> &str {
        &self.config.rotation_prices.currency
    }

    /// Returns the sampling settings.
    pub fn rotation_info(&self) -> RotationInfo {
        self.config.rotation_info
    }

    /// Gets the flat daily price for a day type.
    ///
    /// A day type without a price is a configuration error, never zero.
    pub fn get_daily_price(&self, day: DayType) -> ReportResult<u32> {
        self.config
            .rotation_prices
            .days_info
            .iter()
            .find(|info| info.day == day)
            .map(|info| info.price)
            .ok_or_else(|| ReportError::PriceNotFound {
                day_type: day.to_string(),
            })
    }

    /// Gets the excluded-hours window for a day type, if one is configured.
    pub fn get_excluded_hours(&self, day: DayType) -> Option<&RotationExcludedHoursDay> {
        self.config
            .rotation_excluded_hours
            .iter()
            .find(|window| window.day == day)
    }

    /// Gets the holiday calendar name assigned to a user.
    ///
    /// Falls back to `defaultHolidayCalendar` when the user has no explicit
    /// assignment; fails with `CalendarAssignmentMissing` when neither exists.
    pub fn get_user_calendar(&self, user_id: &str) -> ReportResult<&str> {
        if let Some(user) = self
            .config
            .rotation_users
            .iter()
            .find(|user| user.user_id == user_id)
        {
            return Ok(&user.holidays_calendar);
        }

        match non_empty(&self.config.default_holiday_calendar) {
            Some(calendar) => {
                warn!(user_id, calendar, "defaulting user to default holiday calendar");
                Ok(calendar)
            }
            None => Err(ReportError::CalendarAssignmentMissing {
                user_id: user_id.to_string(),
            }),
        }
    }

    /// Returns the configured default user timezone, if any.
    pub fn default_user_timezone(&self) -> Option<&str> {
        non_empty(&self.config.default_user_timezone)
    }

    /// Whether a schedule is configured to be skipped.
    pub fn is_schedule_ignored(&self, schedule_id: &str) -> bool {
        self.config
            .schedules_to_ignore
            .iter()
            .any(|ignored| ignored == schedule_id)
    }

    /// Returns the report window used for schedules without an override.
    ///
    /// `reportTimeRange` wins when configured. Otherwise the window is the
    /// calendar month before `now`, from the 1st at 00:00 UTC up to the 1st of
    /// the following month plus `dailyRotationStartsAt` hours, so the last
    /// night of the month is billed in full.
    pub fn report_window(&self, now: DateTime<Utc>) -> ReportWindow {
        if let Some(range) = &self.config.report_time_range {
            return ReportWindow::new(range.start, range.end);
        }

        let first_of_this_month = now.date_naive() - Days::new(u64::from(now.day0()));
        let first_of_last_month = first_of_this_month - Months::new(1);

        let start = first_of_last_month.and_time(NaiveTime::MIN).and_utc();
        let end = first_of_this_month.and_time(NaiveTime::MIN).and_utc()
            + Duration::hours(i64::from(self.config.rotation_info.daily_rotation_starts_at));

        ReportWindow::new(start, end)
    }

    /// Returns the window for one schedule, honouring per-schedule overrides.
    pub fn schedule_window(&self, schedule_id: &str, default: ReportWindow) -> ReportWindow {
        self.config
            .schedule_time_range_overrides
            .iter()
            .find(|o| o.id == schedule_id)
            .map(|o| ReportWindow::new(o.start, o.end))
            .unwrap_or(default)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

fn invalid(field: &str, message: impl Into<String>) -> ReportError {
    ReportError::InvalidConfig {
        field: field.to_string(),
        message: message.into(),
    }
}

fn validate(config: &Configuration) -> ReportResult<()> {
    let info = config.rotation_info;
    if info.daily_rotation_starts_at > 23 {
        return Err(invalid(
            "rotationInfo.dailyRotationStartsAt",
            format!("must be an hour between 0 and 23, got {}", info.daily_rotation_starts_at),
        ));
    }
    let interval = info.check_rotation_change_every;
    if interval == 0 || interval > 60 || 60 % interval != 0 {
        return Err(invalid(
            "rotationInfo.checkRotationChangeEvery",
            format!("must be a divisor of 60 minutes, got {}", interval),
        ));
    }

    for (index, window) in config.rotation_excluded_hours.iter().enumerate() {
        let field = format!("rotationExcludedHours[{}]", index);
        if window.excluded_starts_at > window.excluded_ends_at || window.excluded_ends_at > 24 {
            return Err(invalid(
                &field,
                format!(
                    "window [{}, {}) must satisfy 0 <= start <= end <= 24",
                    window.excluded_starts_at, window.excluded_ends_at
                ),
            ));
        }
        if window.excluded_hours() >= 24 {
            return Err(invalid(&field, format!("{} leaves no billable hours", window.day)));
        }
        if config.rotation_excluded_hours[..index]
            .iter()
            .any(|other| other.day == window.day)
        {
            return Err(invalid(&field, format!("duplicate window for {}", window.day)));
        }
    }

    for (index, price) in config.rotation_prices.days_info.iter().enumerate() {
        if config.rotation_prices.days_info[..index]
            .iter()
            .any(|other| other.day == price.day)
        {
            return Err(invalid(
                &format!("rotationPrices.daysInfo[{}]", index),
                format!("duplicate price for {}", price.day),
            ));
        }
    }

    if let Some(timezone) = non_empty(&config.default_user_timezone) {
        if timezone.parse::<Tz>().is_err() {
            return Err(invalid(
                "defaultUserTimezone",
                format!("unknown timezone '{}'", timezone),
            ));
        }
    }

    if let Some(range) = &config.report_time_range {
        if range.start >= range.end {
            return Err(invalid("reportTimeRange", "start must be before end"));
        }
    }

    for schedule_override in &config.schedule_time_range_overrides {
        if schedule_override.start >= schedule_override.end {
            return Err(invalid(
                "scheduleTimeRangeOverrides",
                format!("start must be before end for schedule '{}'", schedule_override.id),
            ));
        }
    }

    Ok(())
}
