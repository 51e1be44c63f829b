//! Bordered fixed-width tables for the terminal.

use std::io::Write;

use crate::error::ReportResult;
use crate::models::{BillableTotals, ReportModel};

use super::ReportWriter;
use super::format::{days, inclusive_end, long_date, number, short_date};

const COLUMN_WIDTHS: [usize; 8] = [35, 7, 7, 12, 13, 13, 18, 9];

const HEADER: [[&str; 8]; 3] = [
    [
        "USER",
        "WEEKDAY",
        "WEEKEND",
        "BANK HOLIDAY",
        "TOTAL WEEKDAY",
        "TOTAL WEEKEND",
        "TOTAL BANK HOLIDAY",
        "TOTAL",
    ],
    ["EMAIL", "HOURS", "HOURS", "HOURS", "AMOUNT", "AMOUNT", "AMOUNT", "AMOUNT"],
    ["", "DAYS", "DAYS", "DAYS", "", "", "", ""],
];

/// Writes the report as text tables to any [`Write`] sink, normally stdout.
#[derive(Debug)]
pub struct ConsoleReport<W> {
    out: W,
}

impl<W: Write> ConsoleReport<W> {
    /// Creates a writer over `out`.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Returns the sink.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn separator(&mut self) -> ReportResult<()> {
        let width: usize = COLUMN_WIDTHS.iter().sum::<usize>() + 3 * COLUMN_WIDTHS.len() + 1;
        writeln!(self.out, " {}", "-".repeat(width))?;
        Ok(())
    }

    fn row(&mut self, cells: [&str; 8]) -> ReportResult<()> {
        let [w0, w1, w2, w3, w4, w5, w6, w7] = COLUMN_WIDTHS;
        writeln!(
            self.out,
            "| {:<w0$} || {:>w1$} | {:>w2$} | {:>w3$} | {:>w4$} | {:>w5$} | {:>w6$} | {:>w7$} |",
            cells[0], cells[1], cells[2], cells[3], cells[4], cells[5], cells[6], cells[7],
        )?;
        Ok(())
    }

    fn table_header(&mut self) -> ReportResult<()> {
        for header in HEADER {
            self.row(header)?;
        }
        self.separator()
    }

    fn user_rows(
        &mut self,
        name: &str,
        email: &str,
        totals: &BillableTotals,
        currency: &str,
    ) -> ReportResult<()> {
        let hours = |value: f64| format!("{} h", number(value));
        let amount = |value: f64| format!("{}{}", currency, number(value));
        let day_count = |value: f64| format!("{} d", days(value));

        self.row([
            name,
            &hours(totals.work_hours),
            &hours(totals.weekend_hours),
            &hours(totals.bank_holiday_hours),
            &amount(totals.work_amount),
            &amount(totals.weekend_amount),
            &amount(totals.bank_holiday_amount),
            &amount(totals.total_amount),
        ])?;
        self.row([
            email,
            &day_count(totals.work_days),
            &day_count(totals.weekend_days),
            &day_count(totals.bank_holiday_days),
            "_____________",
            "_____________",
            "__________________",
            "_________",
        ])?;
        self.separator()
    }
}

impl<W: Write> ReportWriter for ConsoleReport<W> {
    fn generate_report(&mut self, report: &ReportModel) -> ReportResult<Option<String>> {
        self.separator()?;
        writeln!(
            self.out,
            "| Generating report(s) from '{}' to '{}'",
            long_date(report.start),
            long_date(inclusive_end(report.end))
        )?;
        self.separator()?;

        for schedule in &report.schedules {
            writeln!(self.out)?;
            self.separator()?;
            writeln!(self.out, "| Schedule: '{}' ({})", schedule.name, schedule.id)?;
            writeln!(
                self.out,
                "| Time Range: {} to {}",
                short_date(schedule.start),
                short_date(inclusive_end(schedule.end))
            )?;
            self.separator()?;
            self.table_header()?;

            for user in &schedule.rota_users {
                self.user_rows(&user.name, &user.email, &user.totals, &report.currency)?;
            }
        }

        writeln!(self.out)?;
        self.separator()?;
        writeln!(self.out, "| Users summary")?;
        self.separator()?;
        self.table_header()?;
        for user in &report.users_summary {
            self.user_rows(&user.name, &user.email, &user.totals, &report.currency)?;
        }

        self.out.flush()?;
        Ok(None)
    }
}
