//! Temporary instrumentation of a subject directory.
//!
//! [`Instrumentation`] is a scope guard: whatever `prepare` managed to put in
//! place is removed by `restore`, which also runs from `Drop`. Restoring is
//! unconditional (it does not depend on how far `prepare` got), so a subject
//! left half-instrumented by an earlier crash is repaired as well.

use crate::config::SuiteConfig;
use crate::error::{PlayrunError, Result};
use crate::fs::write_json_pretty;
use crate::manifest;
use crate::subject::MANIFEST_FILE;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, warn};

/// Instrumentation script, relative to the framework dir and the subject.
pub const INSTRUMENTATION_FILE: &str = "autoload/test_agent.gd";

/// Injected config file name in the subject root.
pub const CONFIG_FILE: &str = "test_config.json";

/// Scenario run before the category-specific one.
const FIRST_SCENARIO: &str = "menu_navigation";

/// Scenario run after the category-specific one.
const LAST_SCENARIO: &str = "stress_test";

/// Config consumed by the instrumentation inside the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstrumentationConfig {
    pub auto_start: bool,
    pub auto_exit: bool,
    pub game_type: String,
    pub timeout: u64,
    pub scenarios: Vec<String>,
}

impl InstrumentationConfig {
    pub fn new(category: &str, timeout: u64) -> Self {
        Self {
            auto_start: true,
            auto_exit: true,
            game_type: category.to_string(),
            timeout,
            scenarios: vec![
                FIRST_SCENARIO.to_string(),
                category.to_string(),
                LAST_SCENARIO.to_string(),
            ],
        }
    }
}

/// Scope guard over one subject's injected state.
#[derive(Debug)]
pub struct Instrumentation {
    subject_path: PathBuf,
    scratch: Option<TempDir>,
    restored: bool,
}

impl Instrumentation {
    /// Guard for `subject_path`. Nothing is modified until `prepare`.
    pub fn new(subject_path: &Path) -> Self {
        Self {
            subject_path: subject_path.to_path_buf(),
            scratch: None,
            restored: false,
        }
    }

    /// Inject the instrumentation, its config and the manifest registration.
    ///
    /// Without `injected` no config file is written and the instrumentation
    /// runs with its own defaults.
    ///
    /// # Errors
    ///
    /// * `EnvironmentError` - the instrumentation source is missing; nothing
    ///   has been written to the subject at that point
    /// * `IoError` - any copy or write failed
    pub fn prepare(
        &mut self,
        config: &SuiteConfig,
        injected: Option<&InstrumentationConfig>,
    ) -> Result<()> {
        let scratch = tempfile::Builder::new()
            .prefix("playrun_")
            .tempdir()
            .map_err(|e| {
                PlayrunError::IoError(format!("failed to create scratch directory: {}", e))
            })?;
        self.scratch = Some(scratch);

        let source = config.framework_dir().join(INSTRUMENTATION_FILE);
        if !source.is_file() {
            return Err(PlayrunError::EnvironmentError(format!(
                "Failed to prepare test environment: instrumentation not found at '{}'",
                source.display()
            )));
        }

        let target = self.subject_path.join(INSTRUMENTATION_FILE);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                PlayrunError::IoError(format!(
                    "failed to create '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }
        fs::copy(&source, &target).map_err(|e| {
            PlayrunError::IoError(format!(
                "failed to copy instrumentation to '{}': {}",
                target.display(),
                e
            ))
        })?;

        if let Some(injected) = injected {
            write_json_pretty(self.subject_path.join(CONFIG_FILE), injected)?;
        }

        manifest::inject_registration(&self.subject_path.join(MANIFEST_FILE))?;

        debug!(subject = %self.subject_path.display(), "instrumentation injected");
        Ok(())
    }

    /// Scratch directory, present once `prepare` has started.
    pub fn scratch_dir(&self) -> Option<&Path> {
        self.scratch.as_ref().map(|d| d.path())
    }

    /// Return the subject to its uninstrumented state.
    ///
    /// Runs once; later calls (including the one from `Drop`) do nothing.
    /// Failures are logged and swallowed.
    pub fn restore(&mut self) {
        if self.restored {
            return;
        }
        self.restored = true;

        for rel in [INSTRUMENTATION_FILE, CONFIG_FILE] {
            let path = self.subject_path.join(rel);
            if path.exists()
                && let Err(e) = fs::remove_file(&path)
            {
                warn!(path = %path.display(), error = %e, "failed to remove injected file");
            }
        }

        if let Err(e) = manifest::remove_registration(&self.subject_path.join(MANIFEST_FILE)) {
            warn!(error = %e, "failed to restore project manifest");
        }

        if let Some(scratch) = self.scratch.take() {
            let path = scratch.path().to_path_buf();
            if let Err(e) = scratch.close() {
                warn!(path = %path.display(), error = %e, "failed to remove scratch directory");
            }
        }

        debug!(subject = %self.subject_path.display(), "instrumentation removed");
    }
}

impl Drop for Instrumentation {
    fn drop(&mut self) {
        self.restore();
    }
}
