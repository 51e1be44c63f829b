//! HTTP client for the PagerDuty REST API (v2).

use chrono::{DateTime, Utc};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::config::ConfigLoader;
use crate::error::{ReportError, ReportResult};
use crate::models::{DirectoryUser, Schedule, Service, Team};

use super::directory::Directory;
use super::request::{PageQuery, ScheduleWindowQuery};
use super::response::{
    ApiErrorBody, Page, ScheduleEnvelope, SchedulesPage, ServicesPage, TeamsPage, UserEnvelope,
    UsersPage,
};

/// Media type selecting version 2 of the REST API.
const ACCEPT_V2: &str = "application/vnd.pagerduty+json;version=2";

/// A [`Directory`] backed by the PagerDuty REST API.
///
/// Requests are sent one at a time; list endpoints are followed page by page
/// until the API reports no more records.
#[derive(Debug, Clone)]
pub struct PagerDutyClient {
    http: Client,
    base_url: String,
}

impl PagerDutyClient {
    /// Creates a client for `api_url` authenticating with `token`.
    pub fn new(api_url: &str, token: &str) -> ReportResult<Self> {
        let authorization = HeaderValue::from_str(&format!("Token token={}", token)).map_err(|e| {
            ReportError::InvalidConfig {
                field: "pdAuthToken".to_string(),
                message: e.to_string(),
            }
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, authorization);
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_V2));

        let http = Client::builder()
            .default_headers(headers)
            .user_agent(concat!("pd-report/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: api_url.trim_end_matches('/').to_string(),
        })
    }

    /// Creates a client from `pdAuthToken` and `apiUrl`.
    pub fn from_config(config: &ConfigLoader) -> ReportResult<Self> {
        let config = config.config();
        if config.pd_auth_token.trim().is_empty() {
            return Err(ReportError::InvalidConfig {
                field: "pdAuthToken".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        Self::new(&config.api_url, &config.pd_auth_token)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, operation: &str, request: RequestBuilder) -> ReportResult<Response> {
        request.send().await.map_err(|e| ReportError::Upstream {
            operation: operation.to_string(),
            message: e.to_string(),
        })
    }

    async fn decode<T: DeserializeOwned>(&self, operation: &str, response: Response) -> ReportResult<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|error| error.describe())
                .unwrap_or(body);
            return Err(ReportError::Upstream {
                operation: operation.to_string(),
                message: format!("HTTP {}: {}", status, detail),
            });
        }

        response.json::<T>().await.map_err(|e| ReportError::Upstream {
            operation: operation.to_string(),
            message: format!("invalid response body: {}", e),
        })
    }

    async fn get_all<P>(&self, operation: &str, path: &str, extra: &[(&str, &str)]) -> ReportResult<Vec<P::Item>>
    where
        P: Page + DeserializeOwned,
    {
        let mut items = Vec::new();
        let mut page = PageQuery::first();

        loop {
            debug!(operation, offset = page.offset, "fetching page");
            let request = self.http.get(self.url(path)).query(&page).query(extra);
            let response = self.send(operation, request).await?;
            let (batch, more) = self.decode::<P>(operation, response).await?.into_parts();

            let fetched = batch.len();
            items.extend(batch);
            if !more || fetched == 0 {
                break;
            }
            page = page.next();
        }

        info!(operation, count = items.len(), "listed records");
        Ok(items)
    }
}

impl Directory for PagerDutyClient {
    async fn list_schedules(&self) -> ReportResult<Vec<Schedule>> {
        self.get_all::<SchedulesPage>("list schedules", "/schedules", &[]).await
    }

    async fn get_schedule(
        &self,
        id: &str,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> ReportResult<Schedule> {
        let operation = "get schedule";
        let request = self
            .http
            .get(self.url(&format!("/schedules/{}", id)))
            .query(&ScheduleWindowQuery::new(since, until));
        let response = self.send(operation, request).await?;
        let schedule: Schedule = self.decode::<ScheduleEnvelope>(operation, response).await?.into();

        debug!(schedule_id = %schedule.id, entries = schedule.entries.len(), "fetched schedule");
        Ok(schedule)
    }

    async fn list_users(&self) -> ReportResult<Vec<DirectoryUser>> {
        self.get_all::<UsersPage>("list users", "/users", &[]).await
    }

    async fn get_user(&self, id: &str) -> ReportResult<DirectoryUser> {
        let operation = "get user";
        let request = self.http.get(self.url(&format!("/users/{}", id)));
        let response = self.send(operation, request).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(ReportError::UserNotFound {
                user_id: id.to_string(),
            });
        }
        Ok(self.decode::<UserEnvelope>(operation, response).await?.into())
    }

    async fn list_teams(&self) -> ReportResult<Vec<Team>> {
        self.get_all::<TeamsPage>("list teams", "/teams", &[]).await
    }

    async fn list_services(&self, team_id: &str) -> ReportResult<Vec<Service>> {
        self.get_all::<ServicesPage>("list services", "/services", &[("team_ids[]", team_id)])
            .await
    }
}
