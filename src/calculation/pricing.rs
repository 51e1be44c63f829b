//! Hourly price resolution.
//!
//! This module provides [`PricesInfo`], the per-run table of effective hourly
//! prices. Each day type has a flat daily price; when an excluded-hours window
//! is configured for the day type, the daily price is spread over the
//! remaining billable hours only.

use crate::config::{ConfigLoader, RotationExcludedHoursDay};
use crate::error::ReportResult;
use crate::models::BillableTotals;

use super::DayType;

/// Resolved pricing for one day type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayPrice {
    /// Configured daily price.
    pub daily_price: u32,
    /// Hours of the day that are billable (24 minus the excluded window).
    pub billable_hours: u32,
    /// `daily_price / billable_hours`.
    pub hourly_price: f64,
    /// The excluded window, when it excludes at least one hour.
    pub excluded: Option<RotationExcludedHoursDay>,
}

impl DayPrice {
    /// Resolves the price of a day type from its daily price and window.
    ///
    /// A zero-width window is treated as no window at all.
    ///
    /// # Example
    ///
    /// ```
    /// use oncall_report::calculation::{DayPrice, DayType};
    /// use oncall_report::config::RotationExcludedHoursDay;
    ///
    /// let window = RotationExcludedHoursDay {
    ///     day: DayType::Weekday,
    ///     excluded_starts_at: 9,
    ///     excluded_ends_at: 17,
    /// };
    /// let price = DayPrice::resolve(160, Some(window));
    ///
    /// assert_eq!(price.billable_hours, 16);
    /// assert_eq!(price.hourly_price, 10.0);
    /// ```
    pub fn resolve(daily_price: u32, window: Option<RotationExcludedHoursDay>) -> Self {
        let excluded = window.filter(|w| w.excluded_hours() > 0);
        let billable_hours = 24 - excluded.map_or(0, |w| w.excluded_hours().min(23));

        Self {
            daily_price,
            billable_hours,
            hourly_price: f64::from(daily_price) / f64::from(billable_hours),
            excluded,
        }
    }

    /// Whether a sample at local `hour` counts towards billing.
    pub fn is_billable_hour(&self, hour: u32) -> bool {
        self.excluded.is_none_or(|w| w.is_billable_hour(hour))
    }
}

/// Effective prices for every day type, computed once per run.
#[derive(Debug, Clone, PartialEq)]
pub struct PricesInfo {
    currency: String,
    days: [DayPrice; 3],
}

impl PricesInfo {
    /// Resolves prices from the configuration.
    ///
    /// # Errors
    ///
    /// `PriceNotFound` when any day type lacks a daily price.
    pub fn from_config(config: &ConfigLoader) -> ReportResult<Self> {
        let resolve = |day: DayType| -> ReportResult<DayPrice> {
            let daily_price = config.get_daily_price(day)?;
            Ok(DayPrice::resolve(daily_price, config.get_excluded_hours(day).copied()))
        };

        Ok(Self {
            currency: config.currency().to_string(),
            days: [
                resolve(DayType::Weekday)?,
                resolve(DayType::Weekend)?,
                resolve(DayType::BankHoliday)?,
            ],
        })
    }

    /// Builds prices from already-resolved parts.
    pub fn new(currency: &str, weekday: DayPrice, weekend: DayPrice, bank_holiday: DayPrice) -> Self {
        Self {
            currency: currency.to_string(),
            days: [weekday, weekend, bank_holiday],
        }
    }

    /// The currency symbol.
    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// The resolved price of a day type.
    pub fn day(&self, day: DayType) -> &DayPrice {
        match day {
            DayType::Weekday => &self.days[0],
            DayType::Weekend => &self.days[1],
            DayType::BankHoliday => &self.days[2],
        }
    }

    /// Price of one billable hour of the day type.
    pub fn effective_hourly_price(&self, day: DayType) -> f64 {
        self.day(day).hourly_price
    }

    /// The excluded window of the day type, if it excludes anything.
    pub fn excluded_window(&self, day: DayType) -> Option<RotationExcludedHoursDay> {
        self.day(day).excluded
    }

    /// Billable hours in one day of the day type.
    pub fn billable_hours(&self, day: DayType) -> u32 {
        self.day(day).billable_hours
    }

    /// Derives day-equivalents, amounts and the grand total from the hours.
    pub fn apply(&self, totals: &mut BillableTotals) {
        self.recompute_days(totals);
        totals.work_amount = totals.work_hours * self.effective_hourly_price(DayType::Weekday);
        totals.weekend_amount = totals.weekend_hours * self.effective_hourly_price(DayType::Weekend);
        totals.bank_holiday_amount =
            totals.bank_holiday_hours * self.effective_hourly_price(DayType::BankHoliday);
        totals.total_amount = totals.work_amount + totals.weekend_amount + totals.bank_holiday_amount;
    }

    /// Recomputes day-equivalents from the hours, leaving amounts untouched.
    pub fn recompute_days(&self, totals: &mut BillableTotals) {
        totals.work_days = totals.work_hours / f64::from(self.billable_hours(DayType::Weekday));
        totals.weekend_days = totals.weekend_hours / f64::from(self.billable_hours(DayType::Weekend));
        totals.bank_holiday_days =
            totals.bank_holiday_hours / f64::from(self.billable_hours(DayType::BankHoliday));
    }
}
