//! Report persistence.

use super::TestReport;
use crate::error::Result;
use crate::fs::write_json_pretty;
use std::path::{Path, PathBuf};
use tracing::info;

/// File overwritten on every run with the most recent report.
pub const LATEST_REPORT_FILE: &str = "latest_report.json";

/// Write the timestamped report and refresh `latest_report.json`.
///
/// Returns the path of the timestamped file.
pub fn save_report(report: &TestReport, reports_dir: &Path) -> Result<PathBuf> {
    let document = report.document();

    let report_path = unused_report_path(report, reports_dir);
    write_json_pretty(&report_path, &document)?;
    write_json_pretty(reports_dir.join(LATEST_REPORT_FILE), &document)?;

    info!(path = %report_path.display(), "report saved");
    Ok(report_path)
}

/// Timestamped path with millisecond precision. A numeric suffix is added
/// when a report with the same stamp already exists.
fn unused_report_path(report: &TestReport, reports_dir: &Path) -> PathBuf {
    let stem = format!(
        "test_report_{}",
        report.timestamp.format("%Y%m%d_%H%M%S_%3f")
    );
    let mut path = reports_dir.join(format!("{}.json", stem));
    let mut n = 1;
    while path.exists() {
        path = reports_dir.join(format!("{}_{}.json", stem, n));
        n += 1;
    }
    path
}
