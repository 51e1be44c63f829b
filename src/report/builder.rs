//! Report model assembly.

use crate::models::{ReportModel, ReportWindow, ScheduleReport, SummaryTotals};

/// Assembles the model handed to the writers.
///
/// The report range runs from the earliest schedule start to the latest
/// schedule end, or is `default_window` when there are no schedules. Users are
/// sorted by name within each schedule and within the summary; schedules keep
/// their processing order.
///
/// # Example
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use oncall_report::models::ReportWindow;
/// use oncall_report::report::build_report;
///
/// let window = ReportWindow::new(
///     Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
///     Utc.with_ymd_and_hms(2024, 4, 1, 8, 0, 0).unwrap(),
/// );
/// let model = build_report(window, "£", vec![], vec![]);
/// assert_eq!(model.start, window.start);
/// assert!(model.schedules.is_empty());
/// ```
pub fn build_report(
    default_window: ReportWindow,
    currency: &str,
    mut schedules: Vec<ScheduleReport>,
    mut users_summary: Vec<SummaryTotals>,
) -> ReportModel {
    let range = schedules
        .iter()
        .map(|s| ReportWindow::new(s.start, s.end))
        .reduce(|a, b| a.union(&b))
        .unwrap_or(default_window);

    for schedule in &mut schedules {
        schedule.rota_users.sort_by(|a, b| a.name.cmp(&b.name));
    }
    users_summary.sort_by(|a, b| a.name.cmp(&b.name));

    ReportModel {
        start: range.start,
        end: range.end,
        currency: currency.to_string(),
        schedules,
        users_summary,
    }
}
