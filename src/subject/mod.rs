//! Subject discovery and classification.
//!
//! A subject is one engine project living in an immediate subdirectory of the
//! suite root. Discovery is read-only: it never touches the subject trees, so
//! it is safe to run while previously discovered subjects are executing.
//!
//! # Layout
//!
//! Paths below are relative to a subject directory:
//! - `project.godot` - project manifest, required for a directory to count
//! - `scenes/game.gd` - logic file scanned for declared mechanics
//! - `scenes/main_menu.tscn`, `autoload/game_manager.gd`,
//!   `autoload/audio_manager.gd` - optional resources reported as flags

mod classify;
mod discovery;


use serde::Serialize;
use std::path::PathBuf;

pub use classify::{Classifier, detect_mechanics};
pub use discovery::discover;

/// Project manifest file name.
pub const MANIFEST_FILE: &str = "project.godot";

/// Logic file inspected for mechanics, relative to the subject root.
pub const LOGIC_FILE: &str = "scenes/game.gd";

/// Menu scene checked for `has_menu`.
pub const MENU_SCENE: &str = "scenes/main_menu.tscn";

/// Core controller checked for `has_core_controller`.
pub const CORE_CONTROLLER: &str = "autoload/game_manager.gd";

/// Audio controller checked for `has_audio_controller`.
pub const AUDIO_CONTROLLER: &str = "autoload/audio_manager.gd";

/// A discovered subject. Constructed fresh on every discovery pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubjectDescriptor {
    /// Directory name.
    pub name: String,
    /// Absolute or root-relative path to the subject directory.
    pub path: PathBuf,
    /// Heuristic category from the ordered rule table.
    pub category: String,
    /// Capability tags found in the logic file, in pattern order.
    pub mechanics: Vec<String>,
    pub has_menu: bool,
    pub has_core_controller: bool,
    pub has_audio_controller: bool,
}

impl SubjectDescriptor {
    /// Path to this subject's project manifest.
    pub fn manifest_path(&self) -> PathBuf {
        self.path.join(MANIFEST_FILE)
    }

    /// Case-insensitive substring match used by name filters.
    pub fn matches(&self, query: &str) -> bool {
        self.name.to_lowercase().contains(&query.to_lowercase())
    }
}
