//! Configuration loading and management for the on-call report engine.
//!
//! This module loads the YAML report configuration (prices, excluded hours,
//! calendar assignments, report windows) and the bank holiday calendars.
//!
//! # Example
//!
//! ```no_run
//! use oncall_report::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./pd-report-config.yml").unwrap();
//! println!("Currency: {}", config.currency());
//! ```

mod calendars;
mod loader;
mod types;

pub use calendars::HolidayCalendarStore;
pub use loader::ConfigLoader;
pub use types::{
    Configuration, DEFAULT_API_URL, DEFAULT_CHECK_ROTATION_CHANGE_EVERY,
    DEFAULT_DAILY_ROTATION_STARTS_AT, ReportTimeRange, RotationExcludedHoursDay, RotationInfo,
    RotationPriceDay, RotationPrices, RotationUser, ScheduleTimeRange,
};
