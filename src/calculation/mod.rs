//! Calculation logic for the on-call report engine.
//!
//! This module contains the rota-to-billable-time engine: day classification
//! against bank holiday calendars, hourly price resolution with excluded-hour
//! windows, conversion to users' local time, sample-based rotation
//! aggregation and the cross-schedule summary.

mod calendar;
mod pricing;
mod rotation;
mod summary;
mod timezone;

pub use calendar::{CalendarClassifier, DayType, HolidayCalendar, is_weekend};
pub use pricing::{DayPrice, PricesInfo};
pub use rotation::{
    MAX_ROLLBACK_STEPS, RotationAggregator, SampleClassifier, SampleOutcome, rotation_day,
};
pub use summary::summarize;
pub use timezone::TimezoneNormalizer;
