//! Report window and report model types.
//!
//! This module contains [`ReportWindow`], the half-open UTC range a schedule
//! is reported over, and [`ReportModel`], the presentation-ready structure
//! handed to the report writers.

use std::ops::RangeInclusive;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{ScheduleUserTotals, SummaryTotals};

/// A half-open `[start, end)` UTC range.
///
/// # Example
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use oncall_report::models::ReportWindow;
///
/// let window = ReportWindow::new(
///     Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
///     Utc.with_ymd_and_hms(2024, 4, 1, 8, 0, 0).unwrap(),
/// );
///
/// assert!(window.contains(Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()));
/// assert!(!window.contains(window.end));
/// assert_eq!(window.calendar_years(), vec![2024]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportWindow {
    /// Inclusive start.
    pub start: DateTime<Utc>,
    /// Exclusive end.
    pub end: DateTime<Utc>,
}

impl ReportWindow {
    /// Creates a window.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Checks whether an instant falls within the window.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant < self.end
    }

    /// The calendar years whose holiday calendars the window needs.
    ///
    /// The window is widened by one day on each side since a user's local
    /// time near either edge can fall on the neighbouring day.
    pub fn calendar_years(&self) -> Vec<i32> {
        let first = (self.start - Duration::days(1)).year();
        let last = (self.end + Duration::days(1)).year();
        (first..=last).collect()
    }

    /// The rotation days billed in this window.
    ///
    /// Runs from the start date to the last rotation day that begins before
    /// the end, where rotation days begin at `starts_at`. With the default
    /// month window ending at the next 1st plus `starts_at` hours, that is
    /// exactly the days of the month.
    pub fn rotation_days(&self, starts_at: u32) -> RangeInclusive<NaiveDate> {
        let first = self.start.date_naive();
        let last_start = self.end - Duration::hours(i64::from(starts_at)) - Duration::seconds(1);
        first..=last_start.date_naive().max(first)
    }

    /// Smallest window covering both `self` and `other`.
    pub fn union(&self, other: &ReportWindow) -> ReportWindow {
        ReportWindow::new(self.start.min(other.start), self.end.max(other.end))
    }
}

/// Totals of every user of one schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleReport {
    /// Schedule id.
    pub id: String,
    /// Schedule name.
    pub name: String,
    /// Effective start of the schedule's window.
    pub start: DateTime<Utc>,
    /// Effective end of the schedule's window.
    pub end: DateTime<Utc>,
    /// Per-user totals, sorted by name.
    pub rota_users: Vec<ScheduleUserTotals>,
}

/// Everything a report writer needs to render one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportModel {
    /// Earliest schedule start.
    pub start: DateTime<Utc>,
    /// Latest schedule end.
    pub end: DateTime<Utc>,
    /// Currency symbol for amounts.
    pub currency: String,
    /// One entry per reported schedule, in processing order.
    pub schedules: Vec<ScheduleReport>,
    /// Cross-schedule totals, sorted by name.
    pub users_summary: Vec<SummaryTotals>,
}

impl ReportModel {
    /// The month and year label used in output file names, e.g. `3-2024`.
    pub fn period_label(&self) -> String {
        format!("{}-{}", self.start.month(), self.start.year())
    }
}
