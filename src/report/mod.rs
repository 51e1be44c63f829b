//! Report assembly and rendering.
//!
//! [`ReportGenerator`] drives one report run against a [`Directory`]
//! (schedule selection, window resolution, aggregation, summary) and produces
//! a [`ReportModel`]. The model is rendered by one of the [`ReportWriter`]
//! implementations chosen through [`OutputFormat`].
//!
//! [`Directory`]: crate::api::Directory

mod builder;
mod console;
mod csv_file;
mod format;
mod generator;
mod oncall_csv;
mod pdf;

use std::path::Path;

use clap::ValueEnum;

use crate::error::ReportResult;
use crate::models::ReportModel;

pub use builder::build_report;
pub use console::ConsoleReport;
pub use csv_file::CsvReport;
pub use generator::{ReportGenerator, ScheduleSelection};
pub use oncall_csv::OncallCsvReport;
pub use pdf::PdfReport;

/// Renders a report model.
pub trait ReportWriter {
    /// Writes the report, returning an optional status message for the user
    /// (e.g. the location of the generated file).
    fn generate_report(&mut self, report: &ReportModel) -> ReportResult<Option<String>>;
}

/// Output formats selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Bordered tables on stdout.
    #[default]
    Console,
    /// One CSV file per schedule plus a summary file.
    Csv,
    /// Hours and days CSV files with a manager approval column.
    OncallCsv,
    /// A single A4 PDF document.
    Pdf,
}

impl OutputFormat {
    /// Creates the writer for this format. File writers write into
    /// `output_dir`; the console writer ignores it.
    pub fn writer(self, output_dir: &Path) -> Box<dyn ReportWriter> {
        match self {
            OutputFormat::Console => Box::new(ConsoleReport::new(std::io::stdout())),
            OutputFormat::Csv => Box::new(CsvReport::new(output_dir)),
            OutputFormat::OncallCsv => Box::new(OncallCsvReport::new(output_dir)),
            OutputFormat::Pdf => Box::new(PdfReport::new(output_dir)),
        }
    }
}
