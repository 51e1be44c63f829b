//! Query parameters sent to the PagerDuty REST API.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

/// Page size requested from list endpoints.
pub const PAGE_LIMIT: u32 = 100;

/// Offset pagination parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageQuery {
    /// Index of the first record.
    pub offset: u32,
    /// Records per page.
    pub limit: u32,
}

impl PageQuery {
    /// The first page.
    pub fn first() -> Self {
        Self {
            offset: 0,
            limit: PAGE_LIMIT,
        }
    }

    /// The page following this one.
    pub fn next(self) -> Self {
        Self {
            offset: self.offset + self.limit,
            limit: self.limit,
        }
    }
}

/// Window over which a schedule is rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleWindowQuery {
    /// Window start, RFC 3339.
    pub since: String,
    /// Window end, RFC 3339.
    pub until: String,
    /// Zone the rendered entries are expressed in.
    pub time_zone: &'static str,
}

impl ScheduleWindowQuery {
    /// Builds the query for `[since, until)`, rendered in UTC.
    pub fn new(since: DateTime<Utc>, until: DateTime<Utc>) -> Self {
        Self {
            since: since.to_rfc3339_opts(SecondsFormat::Secs, true),
            until: until.to_rfc3339_opts(SecondsFormat::Secs, true),
            time_zone: "UTC",
        }
    }
}
