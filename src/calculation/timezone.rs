//! Conversion of UTC instants into users' local civil time.
//!
//! The [`TimezoneNormalizer`] owns the per-run user cache. The whole user
//! directory is listed on first use; a lookup that misses the loaded cache
//! lists it once more (per run) before falling back to the configured default
//! timezone.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tracing::{debug, warn};

use crate::api::Directory;
use crate::config::ConfigLoader;
use crate::error::{ReportError, ReportResult};
use crate::models::DirectoryUser;

/// Resolves user timezones and emails through a lazily loaded user cache.
#[derive(Debug)]
pub struct TimezoneNormalizer<'a, D> {
    directory: &'a D,
    default_timezone: Option<String>,
    users: HashMap<String, DirectoryUser>,
    loaded: bool,
    reloaded: bool,
}

impl<'a, D: Directory> TimezoneNormalizer<'a, D> {
    /// Creates a normalizer with an empty cache.
    pub fn new(directory: &'a D, default_timezone: Option<&str>) -> Self {
        Self {
            directory,
            default_timezone: default_timezone.map(str::to_string),
            users: HashMap::new(),
            loaded: false,
            reloaded: false,
        }
    }

    /// Creates a normalizer using `defaultUserTimezone` from the configuration.
    pub fn from_config(directory: &'a D, config: &ConfigLoader) -> Self {
        Self::new(directory, config.default_user_timezone())
    }

    /// Number of cached users.
    pub fn cached_users(&self) -> usize {
        self.users.len()
    }

    async fn load(&mut self) -> ReportResult<()> {
        let users = self.directory.list_users().await?;
        debug!(users = users.len(), "loaded user cache");
        self.users = users.into_iter().map(|u| (u.id.clone(), u)).collect();
        self.loaded = true;
        Ok(())
    }

    async fn lookup(&mut self, user_id: &str) -> ReportResult<Option<&DirectoryUser>> {
        if !self.loaded {
            self.load().await?;
        }
        if !self.users.contains_key(user_id) && !self.reloaded {
            debug!(user_id, "user missing from cache, reloading");
            self.reloaded = true;
            self.load().await?;
        }
        Ok(self.users.get(user_id))
    }

    /// Returns the timezone of a user.
    ///
    /// # Errors
    ///
    /// - `TimezoneUnavailable` when neither the directory nor the
    ///   configuration supplies one
    /// - `UnknownTimezone` when the name is not an IANA zone
    /// - any error of the user listing that populates the cache
    pub async fn user_timezone(&mut self, user_id: &str) -> ReportResult<Tz> {
        let directory_timezone = self
            .lookup(user_id)
            .await?
            .and_then(|user| user.timezone())
            .map(str::to_string);

        let name = match directory_timezone {
            Some(name) => name,
            None => match &self.default_timezone {
                Some(default) => {
                    warn!(user_id, timezone = %default, "using default user timezone");
                    default.clone()
                }
                None => {
                    return Err(ReportError::TimezoneUnavailable {
                        user_id: user_id.to_string(),
                    });
                }
            },
        };

        name.parse::<Tz>().map_err(|_| ReportError::UnknownTimezone {
            timezone: name.clone(),
            user_id: user_id.to_string(),
        })
    }

    /// Converts a UTC instant into the user's local time.
    pub async fn to_user_local_time(
        &mut self,
        instant: DateTime<Utc>,
        user_id: &str,
    ) -> ReportResult<DateTime<Tz>> {
        let timezone = self.user_timezone(user_id).await?;
        Ok(instant.with_timezone(&timezone))
    }

    /// Returns the user's email, or an empty string when unknown.
    pub async fn user_email(&mut self, user_id: &str) -> ReportResult<String> {
        Ok(self
            .lookup(user_id)
            .await?
            .map(|user| user.email.clone())
            .unwrap_or_default())
    }
}
