use crate::config::SuiteConfig;
use std::path::{Path, PathBuf};

pub(crate) const SAMPLE_MANIFEST: &str = r#"; Engine configuration file.
config_version=5

[application]

config/name="Sample Game"
run/main_scene="res://scenes/main_menu.tscn"

[autoload]

GameManager="*res://autoload/game_manager.gd"
AudioManager="*res://autoload/audio_manager.gd"

[display]

window/size/viewport_width=720
"#;

pub(crate) const MANIFEST_WITHOUT_AUTOLOAD: &str = r#"config_version=5

[application]

config/name="Bare Game"
"#;

/// Create a subject directory with the given manifest content.
pub(crate) fn create_subject_with_manifest(root: &Path, name: &str, manifest: &str) -> PathBuf {
    let path = root.join(name);
    std::fs::create_dir_all(path.join("autoload")).unwrap();
    std::fs::create_dir_all(path.join("scenes")).unwrap();
    std::fs::write(path.join("project.godot"), manifest).unwrap();
    path
}

/// Create a subject directory with the sample manifest.
pub(crate) fn create_subject(root: &Path, name: &str) -> PathBuf {
    create_subject_with_manifest(root, name, SAMPLE_MANIFEST)
}

/// Create the framework directory holding the instrumentation source.
pub(crate) fn create_framework(root: &Path) -> PathBuf {
    let dir = root.join("_test_framework");
    std::fs::create_dir_all(dir.join("autoload")).unwrap();
    std::fs::write(
        dir.join("autoload").join("test_agent.gd"),
        "extends Node\n\nfunc _ready():\n\tpass\n",
    )
    .unwrap();
    dir
}

/// Config rooted at `root` whose alternate result location is `user_data`
/// rather than the real user profile.
pub(crate) fn test_config(root: &Path, user_data: &Path) -> SuiteConfig {
    SuiteConfig {
        root: root.to_path_buf(),
        user_data_dir: Some(user_data.to_path_buf()),
        timeout_seconds: 5,
        supervisor_grace_seconds: 2,
        version_timeout_seconds: 2,
        ..Default::default()
    }
}

/// Write an executable shell script standing in for the engine binary.
#[cfg(unix)]
pub(crate) fn write_fake_engine(dir: &Path, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("fake-engine.sh");
    std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path
}

/// Collect the file names present in a directory (non-recursive).
pub(crate) fn list_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}
