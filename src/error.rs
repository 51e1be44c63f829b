//! Error types for the on-call report engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while building a report.

use thiserror::Error;

/// The main error type for the on-call report engine.
///
/// Every stage of a report run (configuration, upstream fetches, aggregation,
/// rendering) returns this error type. None of them are recovered locally
/// except where noted on the component, so a single error aborts the run.
///
/// # Example
///
/// ```
/// use oncall_report::error::ReportError;
///
/// let error = ReportError::PriceNotFound {
///     day_type: "weekend".to_string(),
/// };
/// assert_eq!(error.to_string(), "No price configured for day type 'weekend'");
/// ```
#[derive(Debug, Error)]
pub enum ReportError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration (or calendar) file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Configuration parsed but holds inconsistent values.
    #[error("Invalid configuration field '{field}': {message}")]
    InvalidConfig {
        /// The offending field.
        field: String,
        /// What is wrong with it.
        message: String,
    },

    /// A day type has no configured daily price.
    #[error("No price configured for day type '{day_type}'")]
    PriceNotFound {
        /// The day type that is missing a price.
        day_type: String,
    },

    /// A user has no holiday calendar assigned and no default exists.
    #[error("No holiday calendar assigned to user '{user_id}' and no default calendar configured")]
    CalendarAssignmentMissing {
        /// The user without an assignment.
        user_id: String,
    },

    /// A calendar name + year was requested that was never loaded.
    #[error("Calendar '{calendar}-{year}' not found for user '{user_id}'")]
    CalendarNotFound {
        /// The calendar name.
        calendar: String,
        /// The calendar year.
        year: i32,
        /// The user whose aggregation needed it.
        user_id: String,
    },

    /// A schedule explicitly requested is configured to be ignored.
    #[error("Configuration explicitly ignores schedule '{schedule_id}'")]
    ScheduleIgnored {
        /// The ignored schedule id.
        schedule_id: String,
    },

    /// The upstream directory API failed.
    #[error("Upstream request failed for '{operation}': {message}")]
    Upstream {
        /// The operation in progress (e.g. "list users").
        operation: String,
        /// A description of the failure.
        message: String,
    },

    /// A user id could not be resolved by the upstream directory.
    #[error("User not found: {user_id}")]
    UserNotFound {
        /// The unresolved user id.
        user_id: String,
    },

    /// A rotation entry was invalid or contained inconsistent data.
    #[error("Invalid shift for user '{user_id}': {message}")]
    InvalidShift {
        /// The user the entry belongs to.
        user_id: String,
        /// A description of what made the entry invalid.
        message: String,
    },

    /// Neither the directory nor the configuration supplies a timezone.
    #[error("No timezone available for user '{user_id}' and no default user timezone configured")]
    TimezoneUnavailable {
        /// The user without a timezone.
        user_id: String,
    },

    /// A timezone name did not resolve to a known IANA zone.
    #[error("Unknown timezone '{timezone}' for user '{user_id}'")]
    UnknownTimezone {
        /// The unresolvable timezone name.
        timezone: String,
        /// The user it was configured for.
        user_id: String,
    },

    /// Writing a report failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Writing a CSV report failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Writing a PDF report failed.
    #[error("PDF error: {message}")]
    Pdf {
        /// A description of the failure.
        message: String,
    },
}

impl From<reqwest::Error> for ReportError {
    fn from(err: reqwest::Error) -> Self {
        let operation = err
            .url()
            .map(|url| url.path().to_string())
            .unwrap_or_else(|| "request".to_string());
        ReportError::Upstream {
            operation,
            message: err.to_string(),
        }
    }
}

/// A type alias for Results that return ReportError.
pub type ReportResult<T> = Result<T, ReportError>;
