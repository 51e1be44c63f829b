//! Upstream directory access.
//!
//! This module defines the [`Directory`] trait the report engine reads
//! schedules and users through, and its PagerDuty REST implementation.

mod client;
mod directory;
mod request;
mod response;

pub use client::PagerDutyClient;
pub use directory::{Directory, InMemoryDirectory};
pub use request::{PAGE_LIMIT, PageQuery, ScheduleWindowQuery};
pub use response::{ApiErrorBody, Page};
