//! Project manifest registration edits.
//!
//! The manifest is an INI-like `key=value` file with `[section]` headers.
//! Instrumentation is registered by adding one entry to the `[autoload]`
//! section, which is appended when missing. [`patch`] and [`unpatch`] are
//! pure text transforms and exact inverses, except that a manifest without
//! an `[autoload]` section and without a final newline gains one:
//!
//! - `unpatch(patch(m)) == m`
//! - `patch(patch(m)) == patch(m)`
//! - `unpatch(m) == m` when `m` carries no registration

use crate::error::{PlayrunError, Result};
use crate::fs::atomic_write_file;
use std::path::Path;

/// Substring identifying the registration entry.
pub const REGISTRATION_MARKER: &str = "TestAgent";

/// Registration entry line.
pub const REGISTRATION_ENTRY: &str = "TestAgent=\"*res://autoload/test_agent.gd\"";

/// Section header that owns auto-loaded components.
pub const AUTOLOAD_SECTION: &str = "[autoload]";

/// Comment opening a section that [`patch`] appended itself. It carries the
/// marker, so [`unpatch`] can tell that section from one the project owns.
pub const APPENDED_SECTION_NOTE: &str = "; TestAgent section added by playrun";

/// Key holding the project's display name.
const NAME_KEY: &str = "config/name=";

/// Register the instrumentation in manifest text.
///
/// No-op when the marker is already present. Otherwise the entry becomes
/// the first line of the existing `[autoload]` section, or a new section is
/// appended.
pub fn patch(content: &str) -> String {
    if content.contains(REGISTRATION_MARKER) {
        return content.to_string();
    }

    let mut lines: Vec<&str> = content.split('\n').collect();
    if let Some(header) = lines.iter().position(|l| l.trim() == AUTOLOAD_SECTION) {
        lines.insert(header + 1, REGISTRATION_ENTRY);
        return lines.join("\n");
    }

    let mut patched = content.to_string();
    if !patched.is_empty() && !patched.ends_with('\n') {
        patched.push('\n');
    }
    patched.push_str(&appended_section());
    patched
}

/// Block appended by [`patch`] when the manifest has no `[autoload]` section.
fn appended_section() -> String {
    format!(
        "\n{}\n{}\n{}\n",
        AUTOLOAD_SECTION, APPENDED_SECTION_NOTE, REGISTRATION_ENTRY
    )
}

/// Remove every line referencing the registration marker.
///
/// A section that [`patch`] appended is dropped whole, together with its
/// separating blank line. An `[autoload]` section that existed before the
/// patch keeps its header even when it ends up empty. Text without the
/// marker is returned unchanged.
pub fn unpatch(content: &str) -> String {
    if !content.contains(REGISTRATION_MARKER) {
        return content.to_string();
    }

    let appended = appended_section();
    let base = match content.strip_suffix(appended.as_str()) {
        Some(rest) if rest.is_empty() || rest.ends_with('\n') => rest,
        _ => content,
    };

    base.split('\n')
        .filter(|line| !line.contains(REGISTRATION_MARKER))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Whether the manifest text carries the registration.
pub fn is_patched(content: &str) -> bool {
    content.contains(REGISTRATION_MARKER)
}

/// Display name declared by `config/name=`, unquoted.
pub fn display_name(content: &str) -> Option<String> {
    content
        .lines()
        .find_map(|line| line.strip_prefix(NAME_KEY))
        .map(|value| value.trim().trim_matches('"').to_string())
        .filter(|name| !name.is_empty())
}

/// Apply [`patch`] to the manifest file in place.
///
/// The file is only rewritten when the content changes.
pub fn inject_registration(path: &Path) -> Result<()> {
    let content = read_manifest(path)?;
    let patched = patch(&content);
    if patched != content {
        atomic_write_file(path, &patched)?;
    }
    Ok(())
}

/// Apply [`unpatch`] to the manifest file in place.
///
/// A missing manifest is not an error: there is nothing to restore.
pub fn remove_registration(path: &Path) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }
    let content = read_manifest(path)?;
    let restored = unpatch(&content);
    if restored != content {
        atomic_write_file(path, &restored)?;
    }
    Ok(())
}

/// Read the display name from a manifest file, if any.
pub fn read_display_name(path: &Path) -> Option<String> {
    std::fs::read_to_string(path)
        .ok()
        .and_then(|content| display_name(&content))
}

fn read_manifest(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        PlayrunError::IoError(format!(
            "failed to read project manifest '{}': {}",
            path.display(),
            e
        ))
    })
}
