//! Rotation aggregation.
//!
//! This module turns a schedule's on-call periods into billable hours. Each
//! period is converted to the user's local time and walked in steps of
//! `checkRotationChangeEvery` minutes. Every sample is attributed to a
//! rotation day, classified and, unless an excluded window drops it, adds
//! `interval / 60` hours to its day type.
//!
//! # Rotation days
//!
//! An on-call day starts at `dailyRotationStartsAt`, not at midnight. A sample
//! before that hour is stepped back one hour at a time until it reaches the
//! previous day's rotation hours; that is the date it is classified on. A
//! sample whose rotation day falls outside the schedule window's
//! [rotation days](ReportWindow::rotation_days) belongs to another report and
//! is dropped, so the night after the last day of a month is billed with that
//! day and the next month's days are never billed twice.

use std::ops::RangeInclusive;

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Timelike};
use tracing::debug;

use crate::api::Directory;
use crate::config::{ConfigLoader, HolidayCalendarStore};
use crate::error::{ReportError, ReportResult};
use crate::models::{BillableTotals, ReportWindow, ScheduleRotation, ScheduleUserTotals, UserRotaInfo};

use super::{CalendarClassifier, DayType, PricesInfo, TimezoneNormalizer};

/// Upper bound on one-hour step-backs for a single sample.
pub const MAX_ROLLBACK_STEPS: u32 = 24;

/// Attributes a local sample to its rotation day.
///
/// Returns the stepped-back instant whose date and hour decide the sample's
/// classification.
///
/// # Example
///
/// ```
/// use chrono::{Datelike, TimeZone, Timelike, Utc};
/// use oncall_report::calculation::rotation_day;
///
/// // 03:00 belongs to the previous day's rotation when days start at 08:00.
/// let sample = Utc.with_ymd_and_hms(2024, 3, 5, 3, 0, 0).unwrap();
/// let day = rotation_day(sample, 8);
/// assert_eq!(day.day(), 4);
/// assert_eq!(day.hour(), 23);
///
/// // The 1st of a month rolls back onto the last day of the previous one.
/// let first = Utc.with_ymd_and_hms(2024, 4, 1, 3, 0, 0).unwrap();
/// assert_eq!(rotation_day(first, 8).day(), 31);
/// ```
pub fn rotation_day<T: TimeZone>(sample: DateTime<T>, starts_at: u32) -> DateTime<T> {
    let mut current = sample;

    for _ in 0..MAX_ROLLBACK_STEPS {
        if current.hour() >= starts_at {
            break;
        }
        current = current - Duration::hours(1);
    }

    current
}

/// What happened to one sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleOutcome {
    /// Counted towards the day type.
    Billable(DayType),
    /// Fell inside the day type's excluded window.
    Excluded(DayType),
    /// Attributed to a rotation day outside the report window.
    Dropped,
}

/// Classifies individual samples. Pure and synchronous.
#[derive(Debug, Clone, Copy)]
pub struct SampleClassifier<'a> {
    calendars: CalendarClassifier<'a>,
    prices: &'a PricesInfo,
    starts_at: u32,
}

impl<'a> SampleClassifier<'a> {
    /// Creates a sample classifier.
    pub fn new(calendars: &'a HolidayCalendarStore, prices: &'a PricesInfo, starts_at: u32) -> Self {
        Self {
            calendars: CalendarClassifier::new(calendars),
            prices,
            starts_at,
        }
    }

    /// Classifies a local sample against `calendar`, dropping it when its
    /// rotation day is not one of `days`.
    ///
    /// # Errors
    ///
    /// `CalendarNotFound` when the rotation day's year was not loaded.
    pub fn classify<T: TimeZone>(
        &self,
        calendar: &str,
        sample: DateTime<T>,
        days: &RangeInclusive<NaiveDate>,
    ) -> ReportResult<SampleOutcome> {
        let day = rotation_day(sample, self.starts_at);
        if !days.contains(&day.date_naive()) {
            return Ok(SampleOutcome::Dropped);
        }

        let day_type = self.calendars.classify(calendar, day.date_naive())?;
        if self.prices.day(day_type).is_billable_hour(day.hour()) {
            Ok(SampleOutcome::Billable(day_type))
        } else {
            Ok(SampleOutcome::Excluded(day_type))
        }
    }
}

/// Per-user sample counts, kept for logging.
#[derive(Debug, Default, Clone, Copy)]
struct SampleCounts {
    billable: usize,
    excluded: usize,
    dropped: usize,
}

/// Aggregates schedule rotations into priced per-user totals.
///
/// One aggregator serves a whole report run so the user cache of its
/// [`TimezoneNormalizer`] is shared across schedules.
#[derive(Debug)]
pub struct RotationAggregator<'a, D> {
    config: &'a ConfigLoader,
    prices: &'a PricesInfo,
    samples: SampleClassifier<'a>,
    normalizer: TimezoneNormalizer<'a, D>,
}

impl<'a, D: Directory> RotationAggregator<'a, D> {
    /// Creates an aggregator for one run.
    pub fn new(
        config: &'a ConfigLoader,
        prices: &'a PricesInfo,
        calendars: &'a HolidayCalendarStore,
        directory: &'a D,
    ) -> Self {
        let starts_at = config.rotation_info().daily_rotation_starts_at;
        Self {
            config,
            prices,
            samples: SampleClassifier::new(calendars, prices, starts_at),
            normalizer: TimezoneNormalizer::from_config(directory, config),
        }
    }

    /// Aggregates every user of a schedule, in the rotation's user order.
    /// Only samples on the rotation days of `window` are billed.
    ///
    /// # Errors
    ///
    /// The first error of any user aborts the schedule: a missing calendar
    /// assignment or calendar, a timezone failure, or a user listing failure.
    pub async fn aggregate(
        &mut self,
        rotation: &ScheduleRotation,
        window: &ReportWindow,
    ) -> ReportResult<Vec<ScheduleUserTotals>> {
        let days = window.rotation_days(self.samples.starts_at);
        let mut result = Vec::with_capacity(rotation.len());
        for user in rotation.users() {
            result.push(self.aggregate_user(user, &days).await?);
        }
        Ok(result)
    }

    async fn aggregate_user(
        &mut self,
        user: &UserRotaInfo,
        days: &RangeInclusive<NaiveDate>,
    ) -> ReportResult<ScheduleUserTotals> {
        let config = self.config;
        let calendar = config.get_user_calendar(&user.id)?;

        let interval = config.rotation_info().check_rotation_change_every;
        let step = Duration::minutes(i64::from(interval));
        let sample_hours = f64::from(interval) / 60.0;

        let mut totals = BillableTotals::default();
        let mut counts = SampleCounts::default();

        for period in &user.periods {
            let start = self.normalizer.to_user_local_time(period.start, &user.id).await?;
            let end = self.normalizer.to_user_local_time(period.end, &user.id).await?;

            let mut sample = start;
            while sample < end {
                let outcome = self
                    .samples
                    .classify(calendar, sample, days)
                    .map_err(|e| with_user(e, &user.id))?;

                match outcome {
                    SampleOutcome::Billable(day_type) => {
                        totals.add_hours(day_type, sample_hours);
                        counts.billable += 1;
                    }
                    SampleOutcome::Excluded(_) => counts.excluded += 1,
                    SampleOutcome::Dropped => counts.dropped += 1,
                }
                sample += step;
            }
        }

        self.prices.apply(&mut totals);
        let email = self.normalizer.user_email(&user.id).await?;

        debug!(
            user_id = %user.id,
            calendar,
            periods = user.periods.len(),
            billable = counts.billable,
            excluded = counts.excluded,
            dropped = counts.dropped,
            total_amount = totals.total_amount,
            "aggregated user rotation"
        );

        Ok(ScheduleUserTotals {
            user_id: user.id.clone(),
            name: user.name.clone(),
            email,
            totals,
        })
    }
}

fn with_user(error: ReportError, user_id: &str) -> ReportError {
    match error {
        ReportError::CalendarNotFound { calendar, year, .. } => ReportError::CalendarNotFound {
            calendar,
            year,
            user_id: user_id.to_string(),
        },
        other => other,
    }
}
