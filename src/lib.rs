//! On-call rota billing reports from PagerDuty schedules.
//!
//! This crate turns the rendered final layer of PagerDuty schedules into
//! billable hours per user, classified as weekday, weekend or bank holiday in
//! each user's own timezone, priced from a configured daily rate and rendered
//! as console tables, CSV files or a PDF document.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod report;
