//! Billing totals for a user.
//!
//! [`BillableTotals`] carries the hours, day-equivalents and amounts of the
//! three day categories. [`ScheduleUserTotals`] attaches it to one user on
//! one schedule and [`SummaryTotals`] to one display name across schedules.

use serde::{Deserialize, Serialize};

use crate::calculation::DayType;

/// Hours, day-equivalents and amounts per day category.
///
/// Hours are accumulated first; days and amounts are derived afterwards by
/// the pricing step and are left at zero until then.
///
/// # Example
///
/// ```
/// use oncall_report::calculation::DayType;
/// use oncall_report::models::BillableTotals;
///
/// let mut totals = BillableTotals::default();
/// totals.add_hours(DayType::Weekend, 0.5);
/// totals.add_hours(DayType::Weekend, 0.5);
/// assert_eq!(totals.weekend_hours, 1.0);
/// assert_eq!(totals.total_hours(), 1.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BillableTotals {
    /// Ordinary weekday hours.
    pub work_hours: f64,
    /// Weekday day-equivalents.
    pub work_days: f64,
    /// Amount for weekday hours.
    pub work_amount: f64,
    /// Weekend hours.
    pub weekend_hours: f64,
    /// Weekend day-equivalents.
    pub weekend_days: f64,
    /// Amount for weekend hours.
    pub weekend_amount: f64,
    /// Bank holiday hours.
    pub bank_holiday_hours: f64,
    /// Bank holiday day-equivalents.
    pub bank_holiday_days: f64,
    /// Amount for bank holiday hours.
    pub bank_holiday_amount: f64,
    /// Sum of the three amounts.
    pub total_amount: f64,
}

impl BillableTotals {
    /// Adds hours to one category.
    pub fn add_hours(&mut self, day_type: DayType, hours: f64) {
        match day_type {
            DayType::Weekday => self.work_hours += hours,
            DayType::Weekend => self.weekend_hours += hours,
            DayType::BankHoliday => self.bank_holiday_hours += hours,
        }
    }

    /// Hours of one category.
    pub fn hours(&self, day_type: DayType) -> f64 {
        match day_type {
            DayType::Weekday => self.work_hours,
            DayType::Weekend => self.weekend_hours,
            DayType::BankHoliday => self.bank_holiday_hours,
        }
    }

    /// Hours across all categories.
    pub fn total_hours(&self) -> f64 {
        self.work_hours + self.weekend_hours + self.bank_holiday_hours
    }

    /// Adds every field of `other` into `self`.
    pub fn accumulate(&mut self, other: &BillableTotals) {
        self.work_hours += other.work_hours;
        self.work_days += other.work_days;
        self.work_amount += other.work_amount;
        self.weekend_hours += other.weekend_hours;
        self.weekend_days += other.weekend_days;
        self.weekend_amount += other.weekend_amount;
        self.bank_holiday_hours += other.bank_holiday_hours;
        self.bank_holiday_days += other.bank_holiday_days;
        self.bank_holiday_amount += other.bank_holiday_amount;
        self.total_amount += other.total_amount;
    }
}

/// Totals of one user on one schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleUserTotals {
    /// User id.
    pub user_id: String,
    /// Display name.
    pub name: String,
    /// Email address; empty when unknown.
    pub email: String,
    /// The billed figures.
    pub totals: BillableTotals,
}

/// Totals of one display name across every schedule in the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryTotals {
    /// Display name (the grouping key).
    pub name: String,
    /// Email of the first schedule entry seen for the name.
    pub email: String,
    /// The billed figures.
    pub totals: BillableTotals,
}
