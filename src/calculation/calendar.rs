//! Day classification against bank holiday calendars.
//!
//! This module provides the [`DayType`] categories, the per-region per-year
//! [`HolidayCalendar`] and the [`CalendarClassifier`] which decides the
//! category of a date with priority bank holiday > weekend > weekday.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::config::HolidayCalendarStore;
use crate::error::{ReportError, ReportResult};

/// The billing category of a day.
///
/// # Example
///
/// ```
/// use oncall_report::calculation::DayType;
///
/// let day_type: DayType = serde_yaml::from_str("bankholiday").unwrap();
/// assert_eq!(day_type, DayType::BankHoliday);
/// assert_eq!(day_type.to_string(), "bankholiday");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayType {
    /// Monday through Friday, not a bank holiday.
    Weekday,
    /// Saturday or Sunday, not a bank holiday.
    Weekend,
    /// A date listed in the user's holiday calendar.
    BankHoliday,
}

impl DayType {
    /// All categories in report column order.
    pub const ALL: [DayType; 3] = [DayType::Weekday, DayType::Weekend, DayType::BankHoliday];
}

impl std::fmt::Display for DayType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DayType::Weekday => write!(f, "weekday"),
            DayType::Weekend => write!(f, "weekend"),
            DayType::BankHoliday => write!(f, "bankholiday"),
        }
    }
}

/// Bank holidays of one named region for one year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HolidayCalendar {
    name: String,
    year: i32,
    holidays: BTreeMap<NaiveDate, String>,
}

impl HolidayCalendar {
    /// Creates an empty calendar.
    pub fn new(name: &str, year: i32) -> Self {
        Self {
            name: name.to_string(),
            year,
            holidays: BTreeMap::new(),
        }
    }

    /// The region name, e.g. `uk`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The calendar year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Adds a holiday. A second holiday on the same date replaces the title.
    pub fn add_holiday(&mut self, date: NaiveDate, title: String) {
        self.holidays.insert(date, title);
    }

    /// Exact date match against the listed holidays.
    pub fn is_bank_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.contains_key(&date)
    }

    /// Title of the holiday on `date`, if any.
    pub fn holiday_title(&self, date: NaiveDate) -> Option<&str> {
        self.holidays.get(&date).map(String::as_str)
    }

    /// Number of holidays.
    pub fn len(&self) -> usize {
        self.holidays.len()
    }

    /// Whether the calendar lists no holidays.
    pub fn is_empty(&self) -> bool {
        self.holidays.is_empty()
    }
}

/// Returns `true` for Saturday and Sunday.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use oncall_report::calculation::is_weekend;
///
/// // 2024-03-02 is a Saturday
/// assert!(is_weekend(NaiveDate::from_ymd_opt(2024, 3, 2).unwrap()));
/// assert!(!is_weekend(NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()));
/// ```
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Classifies dates against the calendars loaded for a run.
#[derive(Debug, Clone, Copy)]
pub struct CalendarClassifier<'a> {
    store: &'a HolidayCalendarStore,
}

impl<'a> CalendarClassifier<'a> {
    /// Creates a classifier over a loaded calendar store.
    pub fn new(store: &'a HolidayCalendarStore) -> Self {
        Self { store }
    }

    /// Checks `date` against the calendar `calendar` for the date's year.
    ///
    /// # Errors
    ///
    /// `CalendarNotFound` when that calendar and year were never loaded. The
    /// error's `user_id` is left empty for the caller to fill in.
    pub fn is_bank_holiday(&self, calendar: &str, date: NaiveDate) -> ReportResult<bool> {
        self.store
            .get(calendar, date.year())
            .map(|c| c.is_bank_holiday(date))
            .ok_or_else(|| ReportError::CalendarNotFound {
                calendar: calendar.to_string(),
                year: date.year(),
                user_id: String::new(),
            })
    }

    /// Returns `true` for Saturday and Sunday.
    pub fn is_weekend(&self, date: NaiveDate) -> bool {
        is_weekend(date)
    }

    /// Classifies a date: bank holiday > weekend > weekday.
    pub fn classify(&self, calendar: &str, date: NaiveDate) -> ReportResult<DayType> {
        if self.is_bank_holiday(calendar, date)? {
            Ok(DayType::BankHoliday)
        } else if self.is_weekend(date) {
            Ok(DayType::Weekend)
        } else {
            Ok(DayType::Weekday)
        }
    }
}
