//! Core data models for the on-call report engine.
//!
//! This module contains the directory records, decoded rotas, billing totals
//! and the report model consumed by the writers.

mod directory;
mod report;
mod shift;
mod totals;

pub use directory::{DirectoryUser, RenderedScheduleEntry, Schedule, Service, Team, UserReference};
pub use report::{ReportModel, ReportWindow, ScheduleReport};
pub use shift::{ScheduleRotation, ShiftPeriod, UserRotaInfo};
pub use totals::{BillableTotals, ScheduleUserTotals, SummaryTotals};
