//! The read-only directory seam.
//!
//! [`Directory`] is everything a report run needs from the upstream service.
//! [`PagerDutyClient`](super::PagerDutyClient) implements it over HTTP and
//! [`InMemoryDirectory`] over fixed data, for tests and benchmarks.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, Utc};

use crate::error::{ReportError, ReportResult};
use crate::models::{DirectoryUser, RenderedScheduleEntry, Schedule, Service, Team};

/// Read-only access to schedules, users, teams and services.
#[allow(async_fn_in_trait)]
pub trait Directory {
    /// Lists every schedule, without entries.
    async fn list_schedules(&self) -> ReportResult<Vec<Schedule>>;

    /// Fetches one schedule with its final-layer entries rendered for
    /// `[since, until)`.
    async fn get_schedule(
        &self,
        id: &str,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> ReportResult<Schedule>;

    /// Lists every user, following pagination to the end.
    async fn list_users(&self) -> ReportResult<Vec<DirectoryUser>>;

    /// Fetches one user.
    async fn get_user(&self, id: &str) -> ReportResult<DirectoryUser>;

    /// Lists every team.
    async fn list_teams(&self) -> ReportResult<Vec<Team>>;

    /// Lists the services owned by a team.
    async fn list_services(&self, team_id: &str) -> ReportResult<Vec<Service>>;
}

/// A [`Directory`] over fixed in-memory data.
///
/// Schedule entries are returned as stored, without clipping to the
/// requested window.
///
/// # Example
///
/// ```
/// use oncall_report::api::{Directory, InMemoryDirectory};
/// use oncall_report::models::DirectoryUser;
///
/// let directory = InMemoryDirectory::new().with_user(DirectoryUser {
///     id: "PUSER01".to_string(),
///     name: "Jane Doe".to_string(),
///     email: "jane@example.com".to_string(),
///     time_zone: Some("Europe/London".to_string()),
///     teams: vec![],
/// });
///
/// let runtime = tokio::runtime::Runtime::new().unwrap();
/// let user = runtime.block_on(directory.get_user("PUSER01")).unwrap();
/// assert_eq!(user.name, "Jane Doe");
/// ```
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    schedules: Vec<Schedule>,
    users: Mutex<Vec<DirectoryUser>>,
    teams: Vec<Team>,
    services: HashMap<String, Vec<Service>>,
    user_listing_error: Mutex<Option<String>>,
    user_listings: AtomicUsize,
}

impl InMemoryDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a schedule with its entries.
    pub fn with_schedule(mut self, id: &str, name: &str, entries: Vec<RenderedScheduleEntry>) -> Self {
        self.schedules.push(Schedule {
            id: id.to_string(),
            name: name.to_string(),
            time_zone: "UTC".to_string(),
            entries,
        });
        self
    }

    /// Adds a user.
    pub fn with_user(self, user: DirectoryUser) -> Self {
        self.add_user(user);
        self
    }

    /// Adds a team.
    pub fn with_team(mut self, team: Team) -> Self {
        self.teams.push(team);
        self
    }

    /// Adds a service owned by `team_id`.
    pub fn with_service(mut self, team_id: &str, service: Service) -> Self {
        self.services.entry(team_id.to_string()).or_default().push(service);
        self
    }

    /// Adds a user after construction, as if they joined mid-run.
    pub fn add_user(&self, user: DirectoryUser) {
        if let Ok(mut users) = self.users.lock() {
            users.push(user);
        }
    }

    /// Makes user listings fail with `message` until cleared with `None`.
    pub fn set_user_listing_error(&self, message: Option<&str>) {
        if let Ok(mut error) = self.user_listing_error.lock() {
            *error = message.map(str::to_string);
        }
    }

    /// How many times the users were listed.
    pub fn user_listings(&self) -> usize {
        self.user_listings.load(Ordering::SeqCst)
    }

    fn users(&self) -> Vec<DirectoryUser> {
        self.users.lock().map(|users| users.clone()).unwrap_or_default()
    }
}

impl Directory for InMemoryDirectory {
    async fn list_schedules(&self) -> ReportResult<Vec<Schedule>> {
        Ok(self
            .schedules
            .iter()
            .map(|schedule| Schedule {
                entries: vec![],
                ..schedule.clone()
            })
            .collect())
    }

    async fn get_schedule(
        &self,
        id: &str,
        _since: DateTime<Utc>,
        _until: DateTime<Utc>,
    ) -> ReportResult<Schedule> {
        self.schedules
            .iter()
            .find(|schedule| schedule.id == id)
            .cloned()
            .ok_or_else(|| ReportError::Upstream {
                operation: "get schedule".to_string(),
                message: format!("schedule '{}' not found", id),
            })
    }

    async fn list_users(&self) -> ReportResult<Vec<DirectoryUser>> {
        self.user_listings.fetch_add(1, Ordering::SeqCst);
        let error = self.user_listing_error.lock().ok().and_then(|e| e.clone());
        match error {
            Some(message) => Err(ReportError::Upstream {
                operation: "list users".to_string(),
                message,
            }),
            None => Ok(self.users()),
        }
    }

    async fn get_user(&self, id: &str) -> ReportResult<DirectoryUser> {
        self.users()
            .into_iter()
            .find(|user| user.id == id)
            .ok_or_else(|| ReportError::UserNotFound {
                user_id: id.to_string(),
            })
    }

    async fn list_teams(&self) -> ReportResult<Vec<Team>> {
        Ok(self.teams.clone())
    }

    async fn list_services(&self, team_id: &str) -> ReportResult<Vec<Service>> {
        Ok(self.services.get(team_id).cloned().unwrap_or_default())
    }
}
