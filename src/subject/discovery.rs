//! Enumeration of subject directories under the suite root.

use super::classify::{Classifier, detect_mechanics};
use super::{
    AUDIO_CONTROLLER, CORE_CONTROLLER, LOGIC_FILE, MANIFEST_FILE, MENU_SCENE, SubjectDescriptor,
};
use crate::error::{PlayrunError, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Prefix reserved for internal directories such as the test framework.
const RESERVED_PREFIX: char = '_';

/// Hidden-entry marker.
const HIDDEN_PREFIX: char = '.';

/// Discover every valid subject directly under `root`.
///
/// Entries are returned in lexicographic order of directory name. A
/// directory is skipped silently when its name starts with `_` or `.`, does
/// not start with a digit, or lacks a project manifest.
///
/// # Errors
///
/// Only an unreadable root is an error; problems with individual entries
/// exclude that entry.
pub fn discover(root: &Path, classifier: &Classifier) -> Result<Vec<SubjectDescriptor>> {
    let entries = fs::read_dir(root).map_err(|e| {
        PlayrunError::UserError(format!(
            "failed to read subjects root '{}': {}",
            root.display(),
            e
        ))
    })?;

    let mut candidates: Vec<(String, std::path::PathBuf)> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .filter_map(|entry| {
            let name = entry.file_name().to_str()?.to_string();
            Some((name, entry.path()))
        })
        .collect();
    candidates.sort_by(|a, b| a.0.cmp(&b.0));

    let mut subjects = Vec::new();
    for (name, path) in candidates {
        if !is_candidate_name(&name) {
            continue;
        }
        if !path.join(MANIFEST_FILE).is_file() {
            debug!(subject = %name, "skipping directory without project manifest");
            continue;
        }
        subjects.push(analyze(&name, &path, classifier));
    }

    Ok(subjects)
}

fn is_candidate_name(name: &str) -> bool {
    if name.starts_with(RESERVED_PREFIX) || name.starts_with(HIDDEN_PREFIX) {
        return false;
    }
    name.chars().next().is_some_and(|c| c.is_ascii_digit())
}

fn analyze(name: &str, path: &Path, classifier: &Classifier) -> SubjectDescriptor {
    // Unreadable or non-UTF-8 logic files declare nothing.
    let mechanics = fs::read_to_string(path.join(LOGIC_FILE))
        .map(|source| detect_mechanics(&source))
        .unwrap_or_default();

    SubjectDescriptor {
        name: name.to_string(),
        path: path.to_path_buf(),
        category: classifier.classify(name),
        mechanics,
        has_menu: path.join(MENU_SCENE).exists(),
        has_core_controller: path.join(CORE_CONTROLLER).exists(),
        has_audio_controller: path.join(AUDIO_CONTROLLER).exists(),
    }
}
