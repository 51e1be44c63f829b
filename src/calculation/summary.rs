//! Cross-schedule summary.
//!
//! Per-schedule totals are merged into one entry per display name. Hours and
//! amounts are summed field by field; day-equivalents are then recomputed
//! from the summed hours.
//!
//! Two distinct users sharing a display name end up in the same entry.

use std::collections::BTreeMap;

use crate::models::{ScheduleReport, SummaryTotals};

use super::PricesInfo;

/// Merges every schedule's per-user totals, sorted by name.
///
/// # Example
///
/// ```
/// use oncall_report::calculation::{DayPrice, PricesInfo, summarize};
///
/// let prices = PricesInfo::new(
///     "£",
///     DayPrice::resolve(10, None),
///     DayPrice::resolve(10, None),
///     DayPrice::resolve(10, None),
/// );
/// assert!(summarize(&[], &prices).is_empty());
/// ```
pub fn summarize(schedules: &[ScheduleReport], prices: &PricesInfo) -> Vec<SummaryTotals> {
    let mut by_name: BTreeMap<&str, SummaryTotals> = BTreeMap::new();

    for schedule in schedules {
        for user in &schedule.rota_users {
            let entry = by_name
                .entry(user.name.as_str())
                .or_insert_with(|| SummaryTotals {
                    name: user.name.clone(),
                    email: user.email.clone(),
                    totals: Default::default(),
                });

            if entry.email.is_empty() {
                entry.email = user.email.clone();
            }
            entry.totals.accumulate(&user.totals);
        }
    }

    by_name
        .into_values()
        .map(|mut summary| {
            prices.recompute_days(&mut summary.totals);
            summary
        })
        .collect()
}
