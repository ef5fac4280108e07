//! Suite configuration for playrun.
//!
//! This module defines the SuiteConfig struct that represents `playrun.yaml`.
//! It supports forward-compatible YAML parsing (unknown fields are ignored),
//! sensible defaults for optional fields, environment overrides, and
//! validation of config values.

mod model;
mod operations;
pub mod types;


// Re-export public API
pub use model::SuiteConfig;
pub use types::CategoryRule;
