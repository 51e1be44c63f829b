//! Hours-and-days CSV files for manager sign-off.
//!
//! Same file layout as the CSV report, without email or amount columns. Each
//! file opens with the report range and ends every row with an empty
//! "Manager Approval" cell.

use std::path::{Path, PathBuf};

use csv::WriterBuilder;
use tracing::info;

use crate::error::ReportResult;
use crate::models::{BillableTotals, ReportModel};

use super::ReportWriter;
use super::format::{
    days, generated_message, inclusive_end, long_date, number, remove_existing, schedule_file,
    summary_file,
};

const HEADER: [&str; 8] = [
    "User",
    "Weekday Hours",
    "Weekday Days",
    "Weekend Hours",
    "Weekend Days",
    "Holiday Hours",
    "Holiday Days",
    "Manager Approval",
];

/// Writes the on-call CSV files into a directory.
#[derive(Debug, Clone)]
pub struct OncallCsvReport {
    directory: PathBuf,
}

impl OncallCsvReport {
    /// Creates a writer for `directory`.
    pub fn new(directory: &Path) -> Self {
        Self {
            directory: directory.to_path_buf(),
        }
    }

    fn write_file<'u>(
        &self,
        path: &Path,
        report: &ReportModel,
        users: impl Iterator<Item = (&'u str, &'u BillableTotals)>,
    ) -> ReportResult<()> {
        remove_existing(path)?;
        let mut writer = WriterBuilder::new().flexible(true).from_path(path)?;

        writer.write_record([
            "Start date:".to_string(),
            long_date(report.start),
            "End date:".to_string(),
            long_date(inclusive_end(report.end)),
        ])?;
        writer.write_record(HEADER)?;

        for (name, totals) in users {
            writer.write_record([
                name.to_string(),
                number(totals.work_hours),
                days(totals.work_days),
                number(totals.weekend_hours),
                days(totals.weekend_days),
                number(totals.bank_holiday_hours),
                days(totals.bank_holiday_days),
                String::new(),
            ])?;
        }

        writer.flush()?;
        Ok(())
    }
}

impl ReportWriter for OncallCsvReport {
    fn generate_report(&mut self, report: &ReportModel) -> ReportResult<Option<String>> {
        for schedule in &report.schedules {
            let path = schedule_file(&self.directory, report, &schedule.name, &schedule.id, "csv");
            self.write_file(
                &path,
                report,
                schedule
                    .rota_users
                    .iter()
                    .map(|u| (u.name.as_str(), &u.totals)),
            )?;
            info!(schedule_id = %schedule.id, path = %path.display(), "Wrote schedule report");
        }

        let path = summary_file(&self.directory, report, "csv");
        self.write_file(
            &path,
            report,
            report
                .users_summary
                .iter()
                .map(|u| (u.name.as_str(), &u.totals)),
        )?;

        Ok(Some(generated_message(&path)))
    }
}
