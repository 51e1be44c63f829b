//! Shift period models.
//!
//! This module defines [`ShiftPeriod`] (one continuous on-call assignment),
//! [`UserRotaInfo`] (all periods of one user on one schedule) and
//! [`ScheduleRotation`] (all users of one schedule), plus the decoding of
//! rendered schedule entries into them.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ReportError, ReportResult};

use super::RenderedScheduleEntry;

/// One continuous on-call assignment for one user.
///
/// Instants are UTC. `start < end` holds for every value built through
/// [`ShiftPeriod::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftPeriod {
    /// The user on call.
    pub user_id: String,
    /// The start instant.
    pub start: DateTime<Utc>,
    /// The end instant (exclusive).
    pub end: DateTime<Utc>,
}

impl ShiftPeriod {
    /// Creates a period, rejecting empty or inverted ranges.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use oncall_report::models::ShiftPeriod;
    ///
    /// let start = Utc.with_ymd_and_hms(2024, 3, 4, 8, 0, 0).unwrap();
    /// let end = Utc.with_ymd_and_hms(2024, 3, 5, 8, 0, 0).unwrap();
    ///
    /// assert!(ShiftPeriod::new("PUSER01", start, end).is_ok());
    /// assert!(ShiftPeriod::new("PUSER01", end, start).is_err());
    /// ```
    pub fn new(user_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> ReportResult<Self> {
        if start >= end {
            return Err(ReportError::InvalidShift {
                user_id: user_id.to_string(),
                message: format!("start {} is not before end {}", start, end),
            });
        }
        Ok(Self {
            user_id: user_id.to_string(),
            start,
            end,
        })
    }

    /// Length of the period.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

/// All periods of one user within one schedule's window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRotaInfo {
    /// User id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// On-call periods in the order they were decoded.
    pub periods: Vec<ShiftPeriod>,
}

/// The rota of one schedule, grouped by user in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleRotation {
    users: Vec<UserRotaInfo>,
    index: HashMap<String, usize>,
}

impl ScheduleRotation {
    /// Creates an empty rotation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes rendered schedule entries.
    ///
    /// Each entry's timestamps are parsed as RFC 3339 with offset and
    /// converted to UTC; an unparsable timestamp or an entry whose start is
    /// not before its end is an `InvalidShift` error.
    pub fn from_entries(entries: &[RenderedScheduleEntry]) -> ReportResult<Self> {
        let mut rotation = Self::new();
        for entry in entries {
            let start = parse_instant(&entry.user.id, &entry.start)?;
            let end = parse_instant(&entry.user.id, &entry.end)?;
            let period = ShiftPeriod::new(&entry.user.id, start, end)?;
            rotation.push(&entry.user.id, &entry.user.summary, period);
        }
        Ok(rotation)
    }

    /// Appends a period to a user's rota, creating the user on first sight.
    pub fn push(&mut self, user_id: &str, name: &str, period: ShiftPeriod) {
        let position = match self.index.get(user_id) {
            Some(position) => *position,
            None => {
                self.users.push(UserRotaInfo {
                    id: user_id.to_string(),
                    name: name.to_string(),
                    periods: Vec::new(),
                });
                self.index.insert(user_id.to_string(), self.users.len() - 1);
                self.users.len() - 1
            }
        };
        self.users[position].periods.push(period);
    }

    /// Looks up a user's rota by id.
    pub fn get(&self, user_id: &str) -> Option<&UserRotaInfo> {
        self.index.get(user_id).map(|position| &self.users[*position])
    }

    /// Iterates users in first-seen order.
    pub fn users(&self) -> impl Iterator<Item = &UserRotaInfo> {
        self.users.iter()
    }

    /// Number of users on the rota.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Whether the rota has no users.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

fn parse_instant(user_id: &str, raw: &str) -> ReportResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|instant| instant.with_timezone(&Utc))
        .map_err(|e| ReportError::InvalidShift {
            user_id: user_id.to_string(),
            message: format!("invalid timestamp '{}': {}", raw, e),
        })
}
