//! CSV files with hours, days and amounts.

use std::path::{Path, PathBuf};

use csv::Writer;
use tracing::info;

use crate::error::ReportResult;
use crate::models::{BillableTotals, ReportModel};

use super::ReportWriter;
use super::format::{days, generated_message, number, remove_existing, schedule_file, summary_file};

/// Writes one CSV file per schedule and a summary file into a directory.
#[derive(Debug, Clone)]
pub struct CsvReport {
    directory: PathBuf,
}

impl CsvReport {
    /// Creates a writer for `directory`.
    pub fn new(directory: &Path) -> Self {
        Self {
            directory: directory.to_path_buf(),
        }
    }
}

fn header(currency: &str) -> Vec<String> {
    let currency = currency.trim();
    let mut header: Vec<String> = [
        "User",
        "Email",
        "Weekday Hours",
        "Weekday Days",
        "Weekend Hours",
        "Weekend Days",
        "Bank Holiday Hours",
        "Bank Holiday Days",
    ]
    .iter()
    .map(|h| h.to_string())
    .collect();

    for label in ["Total Weekday", "Total Weekend", "Total Bank Holiday", "Total"] {
        header.push(format!("{} Amount ({})", label, currency));
    }
    header
}

fn record(name: &str, email: &str, totals: &BillableTotals) -> [String; 12] {
    [
        name.to_string(),
        email.to_string(),
        number(totals.work_hours),
        days(totals.work_days),
        number(totals.weekend_hours),
        days(totals.weekend_days),
        number(totals.bank_holiday_hours),
        days(totals.bank_holiday_days),
        number(totals.work_amount),
        number(totals.weekend_amount),
        number(totals.bank_holiday_amount),
        number(totals.total_amount),
    ]
}

fn write_table(
    path: &Path,
    header: &[String],
    rows: impl Iterator<Item = [String; 12]>,
) -> ReportResult<()> {
    remove_existing(path)?;
    let mut writer = Writer::from_path(path)?;
    writer.write_record(header)?;
    for row in rows {
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}

impl ReportWriter for CsvReport {
    fn generate_report(&mut self, report: &ReportModel) -> ReportResult<Option<String>> {
        let header = header(&report.currency);

        for schedule in &report.schedules {
            let path = schedule_file(&self.directory, report, &schedule.name, &schedule.id, "csv");
            write_table(
                &path,
                &header,
                schedule
                    .rota_users
                    .iter()
                    .map(|u| record(&u.name, &u.email, &u.totals)),
            )?;
            info!(schedule_id = %schedule.id, path = %path.display(), "Wrote schedule report");
        }

        let path = summary_file(&self.directory, report, "csv");
        write_table(
            &path,
            &header,
            report
                .users_summary
                .iter()
                .map(|u| record(&u.name, &u.email, &u.totals)),
        )?;

        Ok(Some(generated_message(&path)))
    }
}
