//! Config loading, validation, and path resolution.

use super::model::SuiteConfig;
use super::types::{CONFIG_FILE_NAME, DEFAULT_FRAMEWORK_DIR, DEFAULT_REPORTS_DIR, ENV_ENGINE_COMMAND};
use crate::error::{PlayrunError, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;

impl SuiteConfig {
    /// Load the config for a subjects root.
    ///
    /// Reads `<root>/playrun.yaml` when it exists and falls back to defaults
    /// otherwise, then applies environment overrides.
    ///
    /// # Returns
    ///
    /// * `Ok(SuiteConfig)` - Successfully loaded and validated config
    /// * `Err(PlayrunError::UserError)` - Missing root, parse error or validation failure
    pub fn load_for_root<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref();

        if !root.is_dir() {
            return Err(PlayrunError::UserError(format!(
                "subjects root '{}' is not a directory",
                root.display()
            )));
        }

        let config_path = root.join(CONFIG_FILE_NAME);
        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path).map_err(|e| {
                PlayrunError::UserError(format!(
                    "failed to read config file '{}': {}",
                    config_path.display(),
                    e
                ))
            })?;
            Self::from_yaml(&content)?
        } else {
            Self::default()
        };

        config.root = root.to_path_buf();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Parse config from a YAML string.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty document deserializes to unit, not a map.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: SuiteConfig = serde_yaml::from_str(yaml)
            .map_err(|e| PlayrunError::UserError(format!("failed to parse config YAML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Override values from the process environment.
    ///
    /// Only `GODOT_CMD` is honored; an empty value is ignored.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(cmd) = std::env::var(ENV_ENGINE_COMMAND)
            && !cmd.trim().is_empty()
        {
            self.engine_command = cmd;
        }
    }

    /// Validate config values and return error on invalid values.
    ///
    /// Validation rules:
    /// - `timeout_seconds` must be positive
    /// - `engine_command` must not be empty
    /// - category names and `default_category` must not be empty
    pub fn validate(&self) -> Result<()> {
        if self.timeout_seconds == 0 {
            return Err(PlayrunError::UserError(
                "config validation failed: timeout_seconds must be greater than 0".to_string(),
            ));
        }

        if self.engine_command.trim().is_empty() {
            return Err(PlayrunError::UserError(
                "config validation failed: engine_command cannot be empty".to_string(),
            ));
        }

        if self.default_category.trim().is_empty() {
            return Err(PlayrunError::UserError(
                "config validation failed: default_category cannot be empty".to_string(),
            ));
        }

        for (i, rule) in self.categories.iter().enumerate() {
            if rule.name.trim().is_empty() {
                return Err(PlayrunError::UserError(format!(
                    "config validation failed: categories[{}] has an empty name",
                    i
                )));
            }
        }

        Ok(())
    }

    /// Split the engine command into program and leading arguments.
    pub fn engine_argv(&self) -> Result<(String, Vec<String>)> {
        let mut parts = shell_words::split(&self.engine_command).map_err(|e| {
            PlayrunError::UserError(format!(
                "failed to parse engine command '{}': {}\n\
                 Fix: check for unmatched quotes or invalid escape sequences.",
                self.engine_command, e
            ))
        })?;

        if parts.is_empty() {
            return Err(PlayrunError::UserError(
                "engine command is empty after parsing".to_string(),
            ));
        }

        let program = parts.remove(0);
        Ok((program, parts))
    }

    /// Wall-clock bound on one engine invocation.
    pub fn supervisory_timeout(&self) -> Duration {
        Duration::from_secs(
            self.timeout_seconds
                .saturating_add(self.supervisor_grace_seconds),
        )
    }

    /// Resolved framework directory.
    pub fn framework_dir(&self) -> PathBuf {
        self.resolve(self.framework_dir.as_deref(), DEFAULT_FRAMEWORK_DIR)
    }

    /// Resolved reports directory.
    pub fn reports_dir(&self) -> PathBuf {
        self.resolve(self.reports_dir.as_deref(), DEFAULT_REPORTS_DIR)
    }

    /// Base directory holding the engine's per-project user data.
    ///
    /// Returns `None` when the platform location cannot be determined
    /// (no home directory); the alternate result location is then skipped.
    pub fn user_data_base(&self) -> Option<PathBuf> {
        if let Some(dir) = &self.user_data_dir {
            return Some(self.resolve(Some(dir), ""));
        }
        platform_user_data_base()
    }

    fn resolve(&self, configured: Option<&Path>, default_rel: &str) -> PathBuf {
        match configured {
            Some(p) if p.is_absolute() => p.to_path_buf(),
            Some(p) => self.root.join(p),
            None => self.root.join(default_rel),
        }
    }
}

#[cfg(target_os = "macos")]
fn platform_user_data_base() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join("Library/Application Support/Godot/app_userdata"))
}

#[cfg(windows)]
fn platform_user_data_base() -> Option<PathBuf> {
    // Roaming AppData, the same folder %APPDATA% points at.
    dirs::config_dir().map(|d| d.join("Godot").join("app_userdata"))
}

#[cfg(not(any(target_os = "macos", windows)))]
fn platform_user_data_base() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".local/share/godot/app_userdata"))
}
