//! Directory records: users, teams, services and schedules.
//!
//! These are the canonical shapes of the records the upstream directory
//! returns, independent of the wire format.

use serde::{Deserialize, Serialize};

/// Reference to a team, as embedded in user records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    /// Team id.
    pub id: String,
    /// Team name.
    pub name: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
}

/// A service owned by a team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    /// Service id.
    pub id: String,
    /// Service name.
    pub name: String,
}

/// A user record from the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryUser {
    /// User id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Email address; may be empty.
    #[serde(default)]
    pub email: String,
    /// IANA timezone name, when the user has set one.
    #[serde(default)]
    pub time_zone: Option<String>,
    /// Teams the user belongs to.
    #[serde(default)]
    pub teams: Vec<Team>,
}

impl DirectoryUser {
    /// Returns the user's timezone name, ignoring blank values.
    ///
    /// # Examples
    ///
    /// ```
    /// use oncall_report::models::DirectoryUser;
    ///
    /// let user = DirectoryUser {
    ///     id: "PUSER01".to_string(),
    ///     name: "Jane Doe".to_string(),
    ///     email: "jane@example.com".to_string(),
    ///     time_zone: Some("  ".to_string()),
    ///     teams: vec![],
    /// };
    /// assert_eq!(user.timezone(), None);
    /// ```
    pub fn timezone(&self) -> Option<&str> {
        self.time_zone.as_deref().filter(|tz| !tz.trim().is_empty())
    }
}

/// The user an on-call entry is assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserReference {
    /// User id.
    pub id: String,
    /// Display name as rendered in the schedule.
    pub summary: String,
}

/// One entry of a schedule's rendered final layer.
///
/// Timestamps are kept as the raw RFC 3339 strings until decoded into
/// [`ShiftPeriod`](super::ShiftPeriod)s.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedScheduleEntry {
    /// Start timestamp (RFC 3339 with offset).
    pub start: String,
    /// End timestamp (RFC 3339 with offset).
    pub end: String,
    /// Assigned user.
    pub user: UserReference,
}

/// A schedule and, when fetched for a window, its rendered entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    /// Schedule id.
    pub id: String,
    /// Schedule name.
    pub name: String,
    /// Schedule timezone name.
    #[serde(default)]
    pub time_zone: String,
    /// Final-layer entries within the requested window.
    #[serde(default)]
    pub entries: Vec<RenderedScheduleEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_user(time_zone: Option<&str>) -> DirectoryUser {
        DirectoryUser {
            id: "PUSER01".to_string(),
            name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            time_zone: time_zone.map(str::to_string),
            teams: vec![],
        }
    }

    #[test]
    fn test_timezone_present() {
        let user = create_test_user(Some("Europe/London"));
        assert_eq!(user.timezone(), Some("Europe/London"));
    }

    #[test]
    fn test_timezone_missing_or_blank() {
        assert_eq!(create_test_user(None).timezone(), None);
        assert_eq!(create_test_user(Some("")).timezone(), None);
    }
}
