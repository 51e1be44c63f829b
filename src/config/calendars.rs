//! Bank holiday calendar loading.
//!
//! Calendars live as YAML files in a directory, one file per region and
//! year, named `<prefix>.<calendar>.<year>.yml` (for example
//! `bank_holidays.uk.2024.yml`). Each file is a list of holidays:
//!
//! ```yaml
//! - title: "Christmas Day"
//!   date: "25/12/2024"
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use tracing::{debug, info};

use crate::calculation::HolidayCalendar;
use crate::error::{ReportError, ReportResult};

/// Date format used by calendar files.
const CALENDAR_DATE_FORMAT: &str = "%d/%m/%Y";

#[derive(Debug, Deserialize)]
struct BankHolidayEntry {
    #[serde(default)]
    title: String,
    #[serde(deserialize_with = "deserialize_day")]
    date: NaiveDate,
}

fn deserialize_day<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    NaiveDate::parse_from_str(&raw, CALENDAR_DATE_FORMAT).map_err(serde::de::Error::custom)
}

/// All holiday calendars loaded for one report run, keyed by name and year.
#[derive(Debug, Clone, Default)]
pub struct HolidayCalendarStore {
    calendars: HashMap<(String, i32), HolidayCalendar>,
}

impl HolidayCalendarStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a calendar.
    pub fn insert(&mut self, calendar: HolidayCalendar) {
        self.calendars
            .insert((calendar.name().to_string(), calendar.year()), calendar);
    }

    /// Looks up a calendar by name and year.
    pub fn get(&self, name: &str, year: i32) -> Option<&HolidayCalendar> {
        self.calendars.get(&(name.to_string(), year))
    }

    /// Number of loaded calendars.
    pub fn len(&self) -> usize {
        self.calendars.len()
    }

    /// Whether no calendar is loaded.
    pub fn is_empty(&self) -> bool {
        self.calendars.is_empty()
    }

    /// Loads every calendar file in `dir` whose year is in `years`.
    ///
    /// Files that do not follow the naming scheme are skipped. A file that
    /// matches but cannot be parsed is a `ConfigParseError`.
    pub fn load_dir<P: AsRef<Path>>(dir: P, years: &[i32]) -> ReportResult<Self> {
        let dir = dir.as_ref();
        let dir_str = dir.display().to_string();

        let entries = fs::read_dir(dir).map_err(|_| ReportError::ConfigNotFound {
            path: dir_str.clone(),
        })?;

        let mut store = Self::new();
        for entry in entries {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }

            let Some((name, year)) = path
                .file_name()
                .and_then(|f| f.to_str())
                .and_then(parse_calendar_file_name)
            else {
                debug!(path = %path.display(), "skipping non-calendar file");
                continue;
            };

            if !years.contains(&year) {
                continue;
            }

            let content = fs::read_to_string(&path)?;
            let calendar = parse_calendar(&name, year, &content).map_err(|message| {
                ReportError::ConfigParseError {
                    path: path.display().to_string(),
                    message,
                }
            })?;

            info!(calendar = %name, year, holidays = calendar.len(), "loaded calendar");
            store.insert(calendar);
        }

        Ok(store)
    }
}

/// Splits `bank_holidays.uk.2024.yml` into `("uk", 2024)`.
fn parse_calendar_file_name(file_name: &str) -> Option<(String, i32)> {
    let stem = file_name
        .strip_suffix(".yml")
        .or_else(|| file_name.strip_suffix(".yaml"))?;
    let (rest, year) = stem.rsplit_once('.')?;
    let year = year.parse::<i32>().ok()?;
    let name = rest.split_once('.').map_or(rest, |(_, name)| name);

    if name.is_empty() {
        return None;
    }
    Some((name.replace('.', "-"), year))
}

fn parse_calendar(name: &str, year: i32, content: &str) -> Result<HolidayCalendar, String> {
    let entries: Vec<BankHolidayEntry> =
        serde_yaml::from_str(content).map_err(|e| e.to_string())?;

    let mut calendar = HolidayCalendar::new(name, year);
    for entry in entries {
        calendar.add_holiday(entry.date, entry.title);
    }
    Ok(calendar)
}
