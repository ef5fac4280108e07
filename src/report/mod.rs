//! Result model and aggregate report.
//!
//! A [`TestResult`] is owned and mutated by exactly one agent while it runs
//! and is handed to the orchestrator once complete. The orchestrator folds
//! results into a [`TestReport`], prints the summary and persists it once.

mod persist;
mod summary;


use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::PathBuf;

pub use persist::{LATEST_REPORT_FILE, save_report};
pub use summary::print_summary;

/// Outcome of one subject run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestResult {
    pub name: String,
    pub path: PathBuf,
    pub passed: bool,
    /// Wall-clock seconds spent on the run.
    pub duration: f64,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub fps_average: f64,
    pub actions_performed: u64,
    pub screenshot_count: u64,
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
    pub timestamp: DateTime<Local>,
}

impl TestResult {
    /// A failed, empty result stamped with the current time.
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            passed: false,
            duration: 0.0,
            errors: Vec::new(),
            warnings: Vec::new(),
            fps_average: 0.0,
            actions_performed: 0,
            screenshot_count: 0,
            stdout: String::new(),
            stderr: String::new(),
            exit_code: 0,
            timestamp: Local::now(),
        }
    }

    /// Record an error. Any error recorded through here fails the result.
    pub fn fail(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
        self.passed = false;
    }
}

/// Aggregate over one orchestration run.
#[derive(Debug, Clone, PartialEq)]
pub struct TestReport {
    pub total_subjects: usize,
    pub passed_count: usize,
    pub failed_count: usize,
    /// Subjects never started because the run was interrupted.
    pub skipped_count: usize,
    /// Seconds from orchestration start to the last result.
    pub total_duration: f64,
    pub results: Vec<TestResult>,
    pub timestamp: DateTime<Local>,
    pub engine_version: String,
    pub host: String,
}

impl TestReport {
    pub fn new(total_subjects: usize, engine_version: impl Into<String>) -> Self {
        Self {
            total_subjects,
            passed_count: 0,
            failed_count: 0,
            skipped_count: 0,
            total_duration: 0.0,
            results: Vec::new(),
            timestamp: Local::now(),
            engine_version: engine_version.into(),
            host: host_name(),
        }
    }

    /// Fold one completed result into the counters.
    pub fn record(&mut self, result: TestResult) {
        if result.passed {
            self.passed_count += 1;
        } else {
            self.failed_count += 1;
        }
        self.results.push(result);
    }

    /// Count every subject without a result as skipped.
    pub fn skip_unrun(&mut self) {
        self.skipped_count = self
            .total_subjects
            .saturating_sub(self.passed_count + self.failed_count);
    }

    /// Percentage of passed subjects; 0 for an empty run.
    pub fn pass_rate(&self) -> f64 {
        if self.total_subjects == 0 {
            return 0.0;
        }
        self.passed_count as f64 / self.total_subjects as f64 * 100.0
    }

    pub fn failed_results(&self) -> impl Iterator<Item = &TestResult> {
        self.results.iter().filter(|r| !r.passed)
    }

    /// Serializable document shape written to disk.
    pub fn document(&self) -> ReportDocument<'_> {
        ReportDocument {
            summary: ReportSummary {
                total: self.total_subjects,
                passed: self.passed_count,
                failed: self.failed_count,
                skipped: self.skipped_count,
                pass_rate: format!("{:.1}%", self.pass_rate()),
                total_duration: format!("{:.2}s", self.total_duration),
            },
            engine_version: &self.engine_version,
            host: &self.host,
            timestamp: self.timestamp,
            results: &self.results,
        }
    }
}

/// On-disk report layout.
#[derive(Debug, Serialize)]
pub struct ReportDocument<'a> {
    pub summary: ReportSummary,
    pub engine_version: &'a str,
    pub host: &'a str,
    pub timestamp: DateTime<Local>,
    pub results: &'a [TestResult],
}

#[derive(Debug, Serialize)]
pub struct ReportSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub pass_rate: String,
    pub total_duration: String,
}

fn host_name() -> String {
    hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .unwrap_or_else(|| "unknown".to_string())
}
