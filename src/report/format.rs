//! Value formatting and file handling shared by the writers.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};

use crate::models::ReportModel;

/// Hours and amounts, rounded to two decimals with trailing zeros dropped.
pub(crate) fn number(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 {
        return "0".to_string();
    }
    format!("{}", rounded)
}

/// Day-equivalents, one decimal.
pub(crate) fn days(value: f64) -> String {
    format!("{:.1}", value)
}

/// `Fri Mar  1 00:00:00 2024`.
pub(crate) fn long_date(instant: DateTime<Utc>) -> String {
    instant.format("%a %b %e %H:%M:%S %Y").to_string()
}

/// `01 Mar 24 00:00 UTC`.
pub(crate) fn short_date(instant: DateTime<Utc>) -> String {
    instant.format("%d %b %y %H:%M UTC").to_string()
}

/// `01/03/2024`.
pub(crate) fn day_date(instant: DateTime<Utc>) -> String {
    instant.format("%d/%m/%Y").to_string()
}

/// Window ends are exclusive; they are shown as the last included second.
pub(crate) fn inclusive_end(end: DateTime<Utc>) -> DateTime<Utc> {
    end - Duration::seconds(1)
}

/// Path of a per-schedule file: `<dir>/<prefix>.<month>-<year>-<Name>-<id>.<ext>`.
pub(crate) fn schedule_file(
    dir: &Path,
    report: &ReportModel,
    name: &str,
    id: &str,
    extension: &str,
) -> PathBuf {
    dir.join(format!(
        "{}.{}-{}-{}.{}",
        FILE_PREFIX,
        report.period_label(),
        name.replace(' ', "_"),
        id,
        extension
    ))
}

/// Path of the run summary file: `<dir>/<prefix>.<month>-<year>-Summary.<ext>`.
pub(crate) fn summary_file(dir: &Path, report: &ReportModel, extension: &str) -> PathBuf {
    dir.join(format!(
        "{}.{}-Summary.{}",
        FILE_PREFIX,
        report.period_label(),
        extension
    ))
}

pub(crate) const FILE_PREFIX: &str = "pagerduty_oncall_report";

/// Deletes `path` if it exists.
pub(crate) fn remove_existing(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}

pub(crate) fn generated_message(path: &Path) -> String {
    format!("Report successfully generated: file://{}", path.display())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_number_trims_and_rounds() {
        assert_eq!(number(15.0), "15");
        assert_eq!(number(6.25), "6.25");
        assert_eq!(number(0.1 + 0.2), "0.3");
        assert_eq!(number(5.833333), "5.83");
        assert_eq!(number(0.0), "0");
    }

    #[test]
    fn test_days_one_decimal() {
        assert_eq!(days(0.6667), "0.7");
        assert_eq!(days(2.0), "2.0");
    }

    #[test]
    fn test_date_formats() {
        let instant = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        assert_eq!(long_date(instant), "Fri Mar  1 00:00:00 2024");
        assert_eq!(short_date(instant), "01 Mar 24 00:00 UTC");
        assert_eq!(day_date(instant), "01/03/2024");
        assert_eq!(
            long_date(inclusive_end(Utc.with_ymd_and_hms(2024, 4, 1, 8, 0, 0).unwrap())),
            "Mon Apr  1 07:59:59 2024"
        );
    }

    #[test]
    fn test_remove_existing_tolerates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.csv");
        assert!(remove_existing(&path).is_ok());

        fs::write(&path, "stale").unwrap();
        remove_existing(&path).unwrap();
        assert!(!path.exists());
    }
}
