//! Response envelopes of the PagerDuty REST API.
//!
//! The wire shapes are decoded here and converted into the canonical
//! [`models`](crate::models) records, so nothing outside this module depends
//! on the upstream JSON layout.

use serde::Deserialize;

use crate::models::{DirectoryUser, RenderedScheduleEntry, Schedule, Service, Team};

/// A paginated list response.
pub trait Page {
    /// Canonical record type of the page.
    type Item;

    /// Splits the page into its records and the `more` flag.
    fn into_parts(self) -> (Vec<Self::Item>, bool);
}

/// Error body returned with non-success statuses.
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    /// The error details.
    pub error: ApiErrorDetail,
}

/// Details of an upstream error.
#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    /// Human-readable message.
    #[serde(default)]
    pub message: String,
    /// Upstream error code.
    #[serde(default)]
    pub code: Option<u32>,
    /// Field-level messages.
    #[serde(default)]
    pub errors: Vec<String>,
}

impl ApiErrorBody {
    /// One-line description of the error.
    pub fn describe(&self) -> String {
        let mut message = self.error.message.clone();
        if let Some(code) = self.error.code {
            message = format!("{} (code {})", message, code);
        }
        if !self.error.errors.is_empty() {
            message = format!("{}: {}", message, self.error.errors.join("; "));
        }
        message
    }
}

#[derive(Debug, Deserialize)]
struct WireReference {
    id: String,
    #[serde(default)]
    summary: String,
}

#[derive(Debug, Deserialize)]
struct WireUser {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    time_zone: Option<String>,
    #[serde(default)]
    teams: Vec<WireReference>,
}

impl From<WireUser> for DirectoryUser {
    fn from(wire: WireUser) -> Self {
        DirectoryUser {
            id: wire.id,
            name: wire.name,
            email: wire.email,
            time_zone: wire.time_zone,
            teams: wire
                .teams
                .into_iter()
                .map(|team| Team {
                    id: team.id,
                    name: team.summary,
                    description: String::new(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireEntry {
    start: String,
    end: String,
    user: WireReference,
}

#[derive(Debug, Default, Deserialize)]
struct WireFinalSchedule {
    #[serde(default)]
    rendered_schedule_entries: Vec<WireEntry>,
}

#[derive(Debug, Deserialize)]
struct WireSchedule {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    time_zone: String,
    #[serde(default)]
    final_schedule: Option<WireFinalSchedule>,
}

impl From<WireSchedule> for Schedule {
    fn from(wire: WireSchedule) -> Self {
        let entries = wire
            .final_schedule
            .unwrap_or_default()
            .rendered_schedule_entries
            .into_iter()
            .map(|entry| RenderedScheduleEntry {
                start: entry.start,
                end: entry.end,
                user: crate::models::UserReference {
                    id: entry.user.id,
                    summary: entry.user.summary,
                },
            })
            .collect();

        Schedule {
            id: wire.id,
            name: wire.name,
            time_zone: wire.time_zone,
            entries,
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireTeam {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireService {
    id: String,
    #[serde(default)]
    name: String,
}

/// `GET /schedules/{id}` body.
#[derive(Debug, Deserialize)]
pub struct ScheduleEnvelope {
    schedule: WireSchedule,
}

impl From<ScheduleEnvelope> for Schedule {
    fn from(envelope: ScheduleEnvelope) -> Self {
        envelope.schedule.into()
    }
}

/// `GET /users/{id}` body.
#[derive(Debug, Deserialize)]
pub struct UserEnvelope {
    user: WireUser,
}

impl From<UserEnvelope> for DirectoryUser {
    fn from(envelope: UserEnvelope) -> Self {
        envelope.user.into()
    }
}

/// `GET /schedules` page.
#[derive(Debug, Deserialize)]
pub struct SchedulesPage {
    #[serde(default)]
    schedules: Vec<WireSchedule>,
    #[serde(default)]
    more: bool,
}

impl Page for SchedulesPage {
    type Item = Schedule;

    fn into_parts(self) -> (Vec<Schedule>, bool) {
        (self.schedules.into_iter().map(Into::into).collect(), self.more)
    }
}

/// `GET /users` page.
#[derive(Debug, Deserialize)]
pub struct UsersPage {
    #[serde(default)]
    users: Vec<WireUser>,
    #[serde(default)]
    more: bool,
}

impl Page for UsersPage {
    type Item = DirectoryUser;

    fn into_parts(self) -> (Vec<DirectoryUser>, bool) {
        (self.users.into_iter().map(Into::into).collect(), self.more)
    }
}

/// `GET /teams` page.
#[derive(Debug, Deserialize)]
pub struct TeamsPage {
    #[serde(default)]
    teams: Vec<WireTeam>,
    #[serde(default)]
    more: bool,
}

impl Page for TeamsPage {
    type Item = Team;

    fn into_parts(self) -> (Vec<Team>, bool) {
        let teams = self
            .teams
            .into_iter()
            .map(|team| Team {
                id: team.id,
                name: team.name,
                description: team.description.unwrap_or_default(),
            })
            .collect();
        (teams, self.more)
    }
}

/// `GET /services` page.
#[derive(Debug, Deserialize)]
pub struct ServicesPage {
    #[serde(default)]
    services: Vec<WireService>,
    #[serde(default)]
    more: bool,
}

impl Page for ServicesPage {
    type Item = Service;

    fn into_parts(self) -> (Vec<Service>, bool) {
        let services = self
            .services
            .into_iter()
            .map(|service| Service {
                id: service.id,
                name: service.name,
            })
            .collect();
        (services, self.more)
    }
}
