//! Configuration types and defaults for playrun.
//!
//! This module defines constants, the category rule type, and default value
//! functions used by the SuiteConfig struct.

use serde::{Deserialize, Serialize};

/// Name of the optional suite config file inside the subjects root.
pub const CONFIG_FILE_NAME: &str = "playrun.yaml";

/// Environment variable overriding the engine command.
pub const ENV_ENGINE_COMMAND: &str = "GODOT_CMD";

/// Default engine executable.
pub const DEFAULT_ENGINE_COMMAND: &str = "godot";

/// Default in-process timeout handed to each subject, in seconds.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 60;

/// Extra time the supervisor allows on top of the subject timeout.
pub const DEFAULT_SUPERVISOR_GRACE_SECONDS: u64 = 10;

/// Timeout for the one-off `--version` query.
pub const DEFAULT_VERSION_TIMEOUT_SECONDS: u64 = 10;

/// Framework directory name relative to the subjects root.
pub const DEFAULT_FRAMEWORK_DIR: &str = "_test_framework";

/// Reports directory relative to the subjects root.
pub const DEFAULT_REPORTS_DIR: &str = "tests/reports";

/// Category assigned when no rule matches.
pub const DEFAULT_CATEGORY: &str = "tap";

/// One entry of the ordered category table.
///
/// A subject belongs to the first rule that has a keyword contained in its
/// lower-cased directory name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    /// Category name written into the instrumentation config.
    pub name: String,

    /// Lower-case substrings that select this category.
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl CategoryRule {
    pub fn new(name: &str, keywords: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// Default category table.
pub fn default_category_rules() -> Vec<CategoryRule> {
    vec![
        CategoryRule::new("tap", &["flappy", "whack", "tap", "click", "pop", "fidget"]),
        CategoryRule::new("swipe", &["snake", "2048", "fruit", "slice", "tetris"]),
        CategoryRule::new("drag", &["breakout", "pong", "paddle", "doodle"]),
        CategoryRule::new("gravity", &["gravity", "flip", "jump", "bounce"]),
        CategoryRule::new("puzzle", &["memory", "match", "puzzle", "pin", "pull"]),
    ]
}

// Default value functions for serde
pub(super) fn default_engine_command() -> String {
    DEFAULT_ENGINE_COMMAND.to_string()
}
pub(super) fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}
pub(super) fn default_supervisor_grace_seconds() -> u64 {
    DEFAULT_SUPERVISOR_GRACE_SECONDS
}
pub(super) fn default_version_timeout_seconds() -> u64 {
    DEFAULT_VERSION_TIMEOUT_SECONDS
}
pub(super) fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}
