//! A4 PDF report.
//!
//! Every schedule gets a block of fixed-width Courier rows; the users summary
//! starts on a page of its own. Pages are added as the cursor runs out of
//! vertical space.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use printpdf::{
    BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
};

use crate::error::{ReportError, ReportResult};
use crate::models::{BillableTotals, ReportModel};

use super::ReportWriter;
use super::format::{
    FILE_PREFIX, day_date, days, generated_message, inclusive_end, number, remove_existing,
    short_date,
};

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 15.0;
const TITLE_SIZE: f32 = 12.0;
const TEXT_SIZE: f32 = 9.0;
const ROW_SIZE: f32 = 7.0;

const HEADER: [[&str; 8]; 3] = [
    [
        "USER",
        "WEEKDAY",
        "WEEKEND",
        "B. HOLIDAY",
        "WEEKDAY",
        "WEEKEND",
        "B. HOLIDAY",
        "TOTAL",
    ],
    ["EMAIL", "HOURS", "HOURS", "HOURS", "AMOUNT", "AMOUNT", "AMOUNT", "AMOUNT"],
    ["", "DAYS", "DAYS", "DAYS", "", "", "", ""],
];

fn pdf_error(error: printpdf::Error) -> ReportError {
    ReportError::Pdf {
        message: error.to_string(),
    }
}

fn row(cells: [&str; 8]) -> String {
    format!(
        "{:<40} {:>8} {:>8} {:>10} {:>8} {:>8} {:>12} {:>10}",
        cells[0], cells[1], cells[2], cells[3], cells[4], cells[5], cells[6], cells[7]
    )
}

/// Writes the report as a single PDF file into a directory.
#[derive(Debug, Clone)]
pub struct PdfReport {
    directory: PathBuf,
}

impl PdfReport {
    /// Creates a writer for `directory`.
    pub fn new(directory: &Path) -> Self {
        Self {
            directory: directory.to_path_buf(),
        }
    }
}

struct PageCursor {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    y: f32,
}

impl PageCursor {
    fn new(title: &str) -> ReportResult<Self> {
        let (doc, page, layer) = PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        let regular = doc.add_builtin_font(BuiltinFont::Courier).map_err(pdf_error)?;
        let bold = doc.add_builtin_font(BuiltinFont::CourierBold).map_err(pdf_error)?;
        let layer = doc.get_page(page).get_layer(layer);

        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            y: PAGE_HEIGHT - MARGIN,
        })
    }

    fn new_page(&mut self) {
        let (page, layer) = self.doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = PAGE_HEIGHT - MARGIN;
    }

    fn text(&mut self, text: &str, size: f32, bold: bool) {
        // Points to millimetres, with some leading.
        let height = size * 0.3528 * 1.4;
        if self.y - height < MARGIN {
            self.new_page();
        }
        self.y -= height;
        let font = if bold { &self.bold } else { &self.regular };
        self.layer.use_text(text, size, Mm(MARGIN), Mm(self.y), font);
    }

    fn gap(&mut self, millimetres: f32) {
        self.y -= millimetres;
    }

    fn table_header(&mut self) {
        for header in HEADER {
            self.text(&row(header), ROW_SIZE, true);
        }
        self.gap(1.5);
    }

    fn user_rows(&mut self, name: &str, email: &str, totals: &BillableTotals, currency: &str) {
        let amount = |value: f64| format!("{}{}", currency, number(value));
        self.text(
            &row([
                name,
                &number(totals.work_hours),
                &number(totals.weekend_hours),
                &number(totals.bank_holiday_hours),
                &amount(totals.work_amount),
                &amount(totals.weekend_amount),
                &amount(totals.bank_holiday_amount),
                &amount(totals.total_amount),
            ]),
            ROW_SIZE,
            false,
        );
        self.text(
            &row([
                email,
                &days(totals.work_days),
                &days(totals.weekend_days),
                &days(totals.bank_holiday_days),
                "",
                "",
                "",
                "",
            ]),
            ROW_SIZE,
            false,
        );
        self.gap(1.5);
    }

    fn save(self, path: &Path) -> ReportResult<()> {
        let mut out = BufWriter::new(File::create(path)?);
        self.doc.save(&mut out).map_err(pdf_error)
    }
}

impl ReportWriter for PdfReport {
    fn generate_report(&mut self, report: &ReportModel) -> ReportResult<Option<String>> {
        let title = format!(
            "PagerDuty oncall report(s) from {} to {}",
            day_date(report.start),
            day_date(inclusive_end(report.end))
        );
        let mut cursor = PageCursor::new(&title)?;
        cursor.text(&title, TITLE_SIZE, true);
        cursor.gap(4.0);

        for schedule in &report.schedules {
            cursor.text(&format!("Schedule name: '{}'", schedule.name), TEXT_SIZE, true);
            cursor.text(&format!("Schedule ID: {}", schedule.id), TEXT_SIZE, false);
            cursor.text(
                &format!(
                    "Time Range: {} to {}",
                    short_date(schedule.start),
                    short_date(inclusive_end(schedule.end))
                ),
                TEXT_SIZE,
                false,
            );
            cursor.gap(2.0);
            cursor.table_header();
            for user in &schedule.rota_users {
                cursor.user_rows(&user.name, &user.email, &user.totals, &report.currency);
            }
            cursor.gap(4.0);
        }

        cursor.new_page();
        cursor.text("Users summary", TITLE_SIZE, true);
        cursor.gap(2.0);
        cursor.table_header();
        for user in &report.users_summary {
            cursor.user_rows(&user.name, &user.email, &user.totals, &report.currency);
        }

        let path = self
            .directory
            .join(format!("{}.{}.pdf", FILE_PREFIX, report.period_label()));
        remove_existing(&path)?;
        cursor.save(&path)?;

        Ok(Some(generated_message(&path)))
    }
}
