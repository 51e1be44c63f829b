//! Configuration types for on-call reporting.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from the YAML configuration file. Keys are camelCase to
//! stay compatible with existing `.pd-report-config.yml` files.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::calculation::DayType;

/// Default PagerDuty REST API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.pagerduty.com";

/// Default hour at which a rotation day starts.
pub const DEFAULT_DAILY_ROTATION_STARTS_AT: u32 = 8;

/// Default sampling interval, in minutes.
pub const DEFAULT_CHECK_ROTATION_CHANGE_EVERY: u32 = 30;

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_calendars_directory() -> PathBuf {
    PathBuf::from("calendars")
}

fn default_currency() -> String {
    "£".to_string()
}

fn default_daily_rotation_starts_at() -> u32 {
    DEFAULT_DAILY_ROTATION_STARTS_AT
}

fn default_check_rotation_change_every() -> u32 {
    DEFAULT_CHECK_ROTATION_CHANGE_EVERY
}

/// Explicit report range replacing the default "previous month" window.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReportTimeRange {
    /// Start of the range (RFC 3339).
    pub start: DateTime<Utc>,
    /// End of the range (RFC 3339, exclusive).
    pub end: DateTime<Utc>,
}

/// Per-schedule report range override.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScheduleTimeRange {
    /// The schedule id the override applies to.
    pub id: String,
    /// Start of the range (RFC 3339).
    pub start: DateTime<Utc>,
    /// End of the range (RFC 3339, exclusive).
    pub end: DateTime<Utc>,
}

/// How rotations are sampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RotationInfo {
    /// Hour of the day (0-23) at which the on-call day starts. Samples before
    /// this hour belong to the previous day.
    #[serde(default = "default_daily_rotation_starts_at")]
    pub daily_rotation_starts_at: u32,
    /// Sampling interval in minutes.
    #[serde(default = "default_check_rotation_change_every")]
    pub check_rotation_change_every: u32,
}

impl Default for RotationInfo {
    fn default() -> Self {
        Self {
            daily_rotation_starts_at: DEFAULT_DAILY_ROTATION_STARTS_AT,
            check_rotation_change_every: DEFAULT_CHECK_ROTATION_CHANGE_EVERY,
        }
    }
}

/// Hours of a day type that are not billable.
///
/// The window is `[excluded_starts_at, excluded_ends_at)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RotationExcludedHoursDay {
    /// The day type the window applies to.
    pub day: DayType,
    /// First excluded hour (0-24).
    pub excluded_starts_at: u32,
    /// First hour after the exclusion (0-24).
    pub excluded_ends_at: u32,
}

impl RotationExcludedHoursDay {
    /// Number of excluded hours in the window.
    pub fn excluded_hours(&self) -> u32 {
        self.excluded_ends_at.saturating_sub(self.excluded_starts_at)
    }

    /// Whether a sample at `hour` is billable under this window.
    pub fn is_billable_hour(&self, hour: u32) -> bool {
        hour < self.excluded_starts_at || hour >= self.excluded_ends_at
    }
}

/// Flat daily price for a day type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct RotationPriceDay {
    /// The day type.
    pub day: DayType,
    /// Daily price in the configured currency.
    pub price: u32,
}

/// Price table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RotationPrices {
    /// Currency symbol prefixed to amounts.
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Daily prices per day type.
    #[serde(default)]
    pub days_info: Vec<RotationPriceDay>,
}

/// Holiday calendar assignment for a rotation user.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RotationUser {
    /// The directory user id.
    pub user_id: String,
    /// Display name, informational only.
    #[serde(default)]
    pub name: String,
    /// Calendar name, e.g. "uk".
    pub holidays_calendar: String,
}

/// The complete report configuration as read from YAML.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    /// PagerDuty REST API token.
    #[serde(default)]
    pub pd_auth_token: String,
    /// PagerDuty REST API base URL.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Calendar used for users without an explicit assignment.
    #[serde(default)]
    pub default_holiday_calendar: Option<String>,
    /// Timezone used for users without a directory timezone.
    #[serde(default)]
    pub default_user_timezone: Option<String>,
    /// Directory holding the bank holiday calendar files.
    #[serde(default = "default_calendars_directory")]
    pub calendars_directory: PathBuf,
    /// Explicit report range.
    #[serde(default)]
    pub report_time_range: Option<ReportTimeRange>,
    /// Sampling settings.
    #[serde(default)]
    pub rotation_info: RotationInfo,
    /// Non-billable hour windows.
    #[serde(default)]
    pub rotation_excluded_hours: Vec<RotationExcludedHoursDay>,
    /// Price table.
    pub rotation_prices: RotationPrices,
    /// Per-user calendar assignments.
    #[serde(default)]
    pub rotation_users: Vec<RotationUser>,
    /// Per-schedule report ranges.
    #[serde(default)]
    pub schedule_time_range_overrides: Vec<ScheduleTimeRange>,
    /// Schedules never reported on.
    #[serde(default)]
    pub schedules_to_ignore: Vec<String>,
}
