//! SuiteConfig struct definition and default implementation.

use super::types::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for one orchestration run.
///
/// Built once from `playrun.yaml` (when present), the environment, and CLI
/// flags, then passed by reference into the orchestrator and every agent.
/// Unknown fields in the YAML are ignored for forward compatibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SuiteConfig {
    /// Directory holding the subject projects. Never read from YAML.
    #[serde(skip)]
    pub root: PathBuf,

    // =========================================================================
    // Engine settings
    // =========================================================================
    /// Engine command line; split with shell quoting rules.
    #[serde(default = "default_engine_command")]
    pub engine_command: String,

    /// Timeout handed to the subject (`--quit-after` and the injected config).
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Added to `timeout_seconds` to form the supervisory bound.
    #[serde(default = "default_supervisor_grace_seconds")]
    pub supervisor_grace_seconds: u64,

    /// Bound on the `--version` query.
    #[serde(default = "default_version_timeout_seconds")]
    pub version_timeout_seconds: u64,

    // =========================================================================
    // Paths
    // =========================================================================
    /// Framework directory holding the instrumentation source
    /// (default: `<root>/_test_framework`). Relative paths resolve against root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub framework_dir: Option<PathBuf>,

    /// Where reports are written (default: `<root>/tests/reports`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reports_dir: Option<PathBuf>,

    /// Base of the engine's per-project user data directories.
    /// Defaults to the platform location when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_data_dir: Option<PathBuf>,

    // =========================================================================
    // Classification
    // =========================================================================
    /// Ordered category table, first match wins.
    #[serde(default = "default_category_rules")]
    pub categories: Vec<CategoryRule>,

    /// Category used when no rule matches.
    #[serde(default = "default_category")]
    pub default_category: String,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            engine_command: default_engine_command(),
            timeout_seconds: default_timeout_seconds(),
            supervisor_grace_seconds: default_supervisor_grace_seconds(),
            version_timeout_seconds: default_version_timeout_seconds(),
            framework_dir: None,
            reports_dir: None,
            user_data_dir: None,
            categories: default_category_rules(),
            default_category: default_category(),
        }
    }
}
