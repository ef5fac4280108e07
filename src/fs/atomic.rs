//! Atomic file replacement.
//!
//! Content is written to a temporary file created in the target's directory,
//! synced, then persisted over the target with a rename. Source and target
//! share a filesystem, so the rename is atomic on POSIX and uses
//! `MoveFileEx` with replace semantics on Windows (handled by `tempfile`).

use crate::error::{PlayrunError, Result};
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Atomically replace `path` with `content`, creating parent directories.
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &[u8]) -> Result<()> {
    let path = path.as_ref();
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    fs::create_dir_all(parent).map_err(|e| {
        PlayrunError::IoError(format!(
            "failed to create parent directory '{}': {}",
            parent.display(),
            e
        ))
    })?;

    let mut temp = NamedTempFile::new_in(parent).map_err(|e| {
        PlayrunError::IoError(format!(
            "failed to create temporary file in '{}': {}",
            parent.display(),
            e
        ))
    })?;

    temp.write_all(content)
        .and_then(|_| temp.as_file().sync_all())
        .map_err(|e| PlayrunError::IoError(format!("failed to write temporary file: {}", e)))?;

    // On failure the temp file is dropped and removed.
    temp.persist(path).map_err(|e| {
        PlayrunError::IoError(format!(
            "failed to atomically replace '{}': {}",
            path.display(),
            e.error
        ))
    })?;

    Ok(())
}

/// Atomically write a string to a file.
pub fn atomic_write_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
    atomic_write(path, content.as_bytes())
}

/// Serialize `value` as indented JSON and write it atomically.
pub fn write_json_pretty<P: AsRef<Path>, T: Serialize>(path: P, value: &T) -> Result<()> {
    let path = path.as_ref();
    let mut json = serde_json::to_string_pretty(value).map_err(|e| {
        PlayrunError::IoError(format!(
            "failed to serialize '{}': {}",
            path.display(),
            e
        ))
    })?;
    json.push('\n');
    atomic_write(path, json.as_bytes())
}
