//! Result harvesting and pass/fail reconciliation.
//!
//! Three channels feed a [`TestResult`]: the optional side-channel JSON file
//! written by the instrumentation, the process exit code, and the captured
//! streams. They are applied in that order; a fatal marker in stderr is
//! applied last and always wins.

use super::executor::ProcessOutput;
use crate::config::SuiteConfig;
use crate::error::PlayrunError;
use crate::manifest;
use crate::report::TestResult;
use crate::subject::MANIFEST_FILE;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Side-channel file name, both in-tree and in the user data directory.
pub const RESULTS_FILE: &str = "test_results.json";

/// Literal success markers accepted in stdout.
const SUCCESS_MARKERS: &[&str] = &["PASSED: true", "PASSED: True"];

/// Literal marker in stderr that fails the run.
const FATAL_MARKER: &str = "ERROR";

/// Error recorded when the fatal marker is seen.
pub const STDERR_ERROR: &str = "engine errors in stderr";

/// Decoded side-channel file. Every field is optional; absent or null
/// values take the defaults (`false`, empty, `0`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SideChannelResult {
    #[serde(default)]
    pub passed: Option<bool>,
    #[serde(default)]
    pub errors: Option<Vec<String>>,
    #[serde(default)]
    pub fps_avg: Option<f64>,
    /// Numbers, not integers: the engine's JSON writer may emit `12.0`.
    #[serde(default)]
    pub actions: Option<f64>,
    #[serde(default)]
    pub screenshots: Option<f64>,
}

impl SideChannelResult {
    pub fn parse(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Overwrite the result's verdict and telemetry, appending errors.
    pub fn merge_into(self, result: &mut TestResult) {
        result.passed = self.passed.unwrap_or(false);
        result.errors.extend(self.errors.unwrap_or_default());
        result.fps_average = self.fps_avg.unwrap_or(0.0);
        result.actions_performed = to_count(self.actions);
        result.screenshot_count = to_count(self.screenshots);
    }
}

fn to_count(value: Option<f64>) -> u64 {
    value.map(|v| v.max(0.0) as u64).unwrap_or(0)
}

/// Alternate results location inside the engine's user data directory.
///
/// Keyed by the manifest's display name, falling back to the directory name.
pub fn user_data_results_path(config: &SuiteConfig, subject_path: &Path) -> Option<PathBuf> {
    let base = config.user_data_base()?;
    let project_name = manifest::read_display_name(&subject_path.join(MANIFEST_FILE))
        .or_else(|| {
            subject_path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
        })?;
    Some(base.join(project_name).join(RESULTS_FILE))
}

/// The side-channel file to read, if any. The user data copy wins.
pub fn locate_results_file(config: &SuiteConfig, subject_path: &Path) -> Option<PathBuf> {
    if let Some(alt) = user_data_results_path(config, subject_path)
        && alt.is_file()
    {
        return Some(alt);
    }

    let in_tree = subject_path.join(RESULTS_FILE);
    in_tree.is_file().then_some(in_tree)
}

/// Merge the side-channel file into `result` when one exists.
///
/// Unreadable or undecodable files become a warning, never a failure.
pub fn merge_results_file(result: &mut TestResult, path: &Path) {
    let decoded = std::fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|content| SideChannelResult::parse(&content).map_err(|e| e.to_string()));

    match decoded {
        Ok(side_channel) => {
            debug!(path = %path.display(), "merging side-channel results");
            side_channel.merge_into(result);
        }
        Err(e) => result
            .warnings
            .push(PlayrunError::ProtocolError(e).to_string()),
    }
}

/// Apply process signals to `result`.
///
/// Exit code zero or a stdout success marker sets `passed`; the stderr
/// fatal marker then fails the result regardless.
pub fn reconcile_signals(result: &mut TestResult, output: &ProcessOutput) {
    if output.exit_code == Some(0) || SUCCESS_MARKERS.iter().any(|m| output.stdout.contains(m)) {
        result.passed = true;
    }

    if output.stderr.contains(FATAL_MARKER) {
        result.fail(STDERR_ERROR);
    }
}
