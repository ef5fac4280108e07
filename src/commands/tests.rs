//! Tests for command implementations.

use super::*;
use crate::agent::instrument::{CONFIG_FILE, INSTRUMENTATION_FILE};
use crate::error::PlayrunError;
use crate::exit_codes;
use crate::subject::{Classifier, discover};
use crate::test_support::{SAMPLE_MANIFEST, create_framework, create_subject};
use serial_test::serial;
use crate::interrupt::InterruptFlag;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn global_args(root: &Path) -> GlobalArgs {
    GlobalArgs {
        root: root.to_path_buf(),
        engine: None,
        timeout: None,
        reports_dir: None,
    }
}

fn suite_root(names: &[&str]) -> TempDir {
    let temp = TempDir::new().unwrap();
    create_framework(temp.path());
    for name in names {
        create_subject(temp.path(), name);
    }
    temp
}

#[test]
#[serial]
fn test_build_config_cli_overrides_file_and_env() {
    let temp = TempDir::new().unwrap();
    std::fs::write(
        temp.path().join("playrun.yaml"),
        "engine_command: godot-from-file\ntimeout_seconds: 30\n",
    )
    .unwrap();
    // SAFETY: serialized with other env-touching tests.
    unsafe { std::env::set_var("GODOT_CMD", "godot-from-env") };

    let mut args = global_args(temp.path());
    args.engine = Some("godot-from-cli".to_string());
    args.timeout = Some(12);
    args.reports_dir = Some(PathBuf::from("out"));
    let config = build_config(&args);

    unsafe { std::env::remove_var("GODOT_CMD") };

    let config = config.unwrap();
    assert_eq!(config.engine_command, "godot-from-cli");
    assert_eq!(config.timeout_seconds, 12);
    assert_eq!(config.reports_dir(), temp.path().join("out"));
}

#[test]
#[serial]
fn test_build_config_env_beats_file() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("playrun.yaml"), "engine_command: godot-from-file\n").unwrap();
    // SAFETY: serialized with other env-touching tests.
    unsafe { std::env::set_var("GODOT_CMD", "godot-from-env") };

    let config = build_config(&global_args(temp.path()));

    unsafe { std::env::remove_var("GODOT_CMD") };

    assert_eq!(config.unwrap().engine_command, "godot-from-env");
}

#[test]
#[serial]
fn test_build_config_rejects_zero_timeout() {
    let temp = TempDir::new().unwrap();
    let mut args = global_args(temp.path());
    args.timeout = Some(0);

    let err = build_config(&args).unwrap_err();
    assert!(matches!(err, PlayrunError::UserError(_)));
    assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
}

#[test]
fn test_build_config_missing_root_is_user_error() {
    let temp = TempDir::new().unwrap();
    let err = build_config(&global_args(&temp.path().join("nope"))).unwrap_err();
    assert!(matches!(err, PlayrunError::UserError(_)));
}

#[test]
fn test_parse_resolution() {
    assert_eq!(visual::parse_resolution("720x1280").unwrap(), (720, 1280));
    assert_eq!(visual::parse_resolution("1920X1080").unwrap(), (1920, 1080));

    for bad in ["", "720", "x1280", "720x", "0x100", "wide x tall", "-1x5"] {
        let err = visual::parse_resolution(bad).unwrap_err();
        assert!(matches!(err, PlayrunError::UserError(_)), "{:?}", bad);
    }
}

#[test]
fn test_find_subject_first_match_wins() {
    let temp = suite_root(&["03_snake_classic", "01_flappy_clone", "07_snake_arena"]);
    let classifier = Classifier::new(Vec::new(), "tap");
    let subjects = discover(temp.path(), &classifier).unwrap();

    let found = visual::find_subject(&subjects, "SNAKE").unwrap();
    assert_eq!(found.name, "03_snake_classic");
}

#[test]
fn test_find_subject_no_match_lists_available() {
    let temp = suite_root(&["01_flappy_clone", "06_snake"]);
    let classifier = Classifier::new(Vec::new(), "tap");
    let subjects = discover(temp.path(), &classifier).unwrap();

    let err = visual::find_subject(&subjects, "tetris").unwrap_err();
    let message = err.to_string();
    assert!(matches!(err, PlayrunError::UserError(_)));
    assert!(message.contains("tetris"));
    assert!(message.contains("01_flappy_clone"));
    assert!(message.contains("06_snake"));
}

#[test]
fn test_format_entry_pads_category_and_lists_mechanics() {
    let temp = suite_root(&["01_flappy_clone"]);
    std::fs::write(
        temp.path().join("01_flappy_clone/scenes/game.gd"),
        "func _input(event):\n\tif event is InputEventScreenTouch:\n\t\tflap()\n",
    )
    .unwrap();
    let classifier = Classifier::new(Vec::new(), "tap");
    let subjects = discover(temp.path(), &classifier).unwrap();

    assert_eq!(list::format_entry(&subjects[0]), "  [tap     ] 01_flappy_clone (touch)");
}

#[test]
fn test_cmd_list_succeeds_without_touching_subjects() {
    let temp = suite_root(&["01_flappy_clone", "06_snake"]);
    let config = build_config(&global_args(temp.path())).unwrap();

    assert_eq!(list::cmd_list(&config).unwrap(), exit_codes::SUCCESS);
    assert_eq!(
        std::fs::read_to_string(temp.path().join("06_snake/project.godot")).unwrap(),
        SAMPLE_MANIFEST
    );
}

#[test]
fn test_cmd_visual_unknown_subject_is_user_error() {
    let temp = suite_root(&["01_flappy_clone"]);
    let config = build_config(&global_args(temp.path())).unwrap();
    let args = crate::cli::VisualArgs {
        name: Some("tetris".to_string()),
        interactive: false,
        no_agent: false,
        resolution: "720x1280".to_string(),
    };

    let err = visual::cmd_visual(&config, args).unwrap_err();
    assert!(matches!(err, PlayrunError::UserError(_)));
}

fn discovered(temp: &TempDir) -> Vec<crate::subject::SubjectDescriptor> {
    let classifier = Classifier::new(Vec::new(), "tap");
    discover(temp.path(), &classifier).unwrap()
}

fn select(subjects: &[crate::subject::SubjectDescriptor], typed: &str) -> (Option<usize>, String) {
    let mut input = Cursor::new(typed.as_bytes().to_vec());
    let mut output = Vec::new();
    let picked = visual::select_interactively(subjects, &mut input, &mut output).unwrap();
    (picked, String::from_utf8(output).unwrap())
}

#[test]
fn test_select_interactively_lists_numbered_subjects() {
    let temp = suite_root(&["01_flappy_clone", "06_snake"]);
    let subjects = discovered(&temp);

    let (picked, shown) = select(&subjects, "2\n");

    assert_eq!(picked, Some(1));
    assert!(shown.contains("[ 1] 01_flappy_clone"));
    assert!(shown.contains("[ 2] 06_snake"));
    assert!(shown.contains("[ 0] Exit"));
}

#[test]
fn test_select_interactively_zero_or_end_of_input_exits() {
    let temp = suite_root(&["01_flappy_clone"]);
    let subjects = discovered(&temp);

    assert_eq!(select(&subjects, "0\n").0, None);
    assert_eq!(select(&subjects, "").0, None);
}

#[test]
fn test_select_interactively_reprompts_on_bad_input() {
    let temp = suite_root(&["01_flappy_clone", "06_snake"]);
    let subjects = discovered(&temp);

    let (picked, shown) = select(&subjects, "snake\n9\n\n 1 \n");

    assert_eq!(picked, Some(0));
    assert_eq!(shown.matches("Please enter a number").count(), 2);
    assert_eq!(shown.matches("Invalid selection").count(), 1);
    assert_eq!(shown.matches("Select subject number:").count(), 4);
}

#[test]
fn test_select_interactively_with_no_subjects_is_user_error() {
    let mut input = Cursor::new(b"1\n".to_vec());
    let mut output = Vec::new();

    let err = visual::select_interactively(&[], &mut input, &mut output).unwrap_err();
    assert!(matches!(err, PlayrunError::UserError(_)));
}

#[test]
fn test_visual_session_without_name_exits_on_zero() {
    let temp = suite_root(&["01_flappy_clone"]);
    let config = build_config(&global_args(temp.path())).unwrap();
    let args = crate::cli::VisualArgs {
        name: None,
        interactive: false,
        no_agent: false,
        resolution: "720x1280".to_string(),
    };
    let mut input = Cursor::new(b"0\n".to_vec());
    let mut output = Vec::new();

    let code = visual::visual_session(&config, &args, &mut input, &mut output, || {
        panic!("no subject was picked, so nothing should launch")
    })
    .unwrap();

    assert_eq!(code, exit_codes::SUCCESS);
    assert!(String::from_utf8(output).unwrap().contains("01_flappy_clone"));
    assert!(!temp.path().join("01_flappy_clone").join(INSTRUMENTATION_FILE).exists());
}

#[cfg(unix)]
mod process {
    use super::*;
    use crate::test_support::write_fake_engine;

    // Exits 7 when the instrumentation is visible, 3 otherwise; echoes args.
    const VISIBILITY_ENGINE: &str = r#"echo "$@" > "$PWD/../engine_args.txt"
if [ -f autoload/test_agent.gd ] && grep -q TestAgent project.godot; then exit 7; fi
exit 3"#;

    fn visual_config(temp: &TempDir) -> SuiteConfig {
        let engine = write_fake_engine(temp.path(), VISIBILITY_ENGINE);
        let mut args = global_args(temp.path());
        args.engine = Some(engine.to_string_lossy().to_string());
        build_config(&args).unwrap()
    }

    fn launch(config: &SuiteConfig, args: &crate::cli::VisualArgs, typed: &str) -> Result<i32> {
        let mut input = Cursor::new(typed.as_bytes().to_vec());
        let mut output = Vec::new();
        visual::visual_session(config, args, &mut input, &mut output, InterruptFlag::default)
    }

    fn visual_args(no_agent: bool) -> crate::cli::VisualArgs {
        crate::cli::VisualArgs {
            name: Some("flappy".to_string()),
            interactive: false,
            no_agent,
            resolution: "640x480".to_string(),
        }
    }

    #[test]
    fn test_cmd_visual_injects_then_restores() {
        let temp = suite_root(&["01_flappy_clone"]);
        let config = visual_config(&temp);

        let code = launch(&config, &visual_args(false), "").unwrap();

        assert_eq!(code, 7);
        let subject = temp.path().join("01_flappy_clone");
        assert!(!subject.join(INSTRUMENTATION_FILE).exists());
        assert!(!subject.join(CONFIG_FILE).exists());
        assert_eq!(
            std::fs::read_to_string(subject.join("project.godot")).unwrap(),
            SAMPLE_MANIFEST
        );

        let engine_args = std::fs::read_to_string(temp.path().join("engine_args.txt")).unwrap();
        assert!(engine_args.contains("--resolution 640x480"));
        assert!(!engine_args.contains("--headless"));
    }

    #[test]
    fn test_cmd_visual_without_agent_leaves_subject_alone() {
        let temp = suite_root(&["01_flappy_clone"]);
        let config = visual_config(&temp);

        let code = launch(&config, &visual_args(true), "").unwrap();

        assert_eq!(code, 3);
    }

    #[test]
    fn test_cmd_visual_missing_engine_restores_subject() {
        let temp = suite_root(&["01_flappy_clone"]);
        let mut args = global_args(temp.path());
        args.engine = Some("nonexistent_engine_xyz_123".to_string());
        let config = build_config(&args).unwrap();

        let err = launch(&config, &visual_args(false), "").unwrap_err();

        assert!(matches!(err, PlayrunError::EnvironmentError(_)));
        assert!(err.to_string().contains("GODOT_CMD"));
        let subject = temp.path().join("01_flappy_clone");
        assert!(!subject.join(INSTRUMENTATION_FILE).exists());
        assert_eq!(
            std::fs::read_to_string(subject.join("project.godot")).unwrap(),
            SAMPLE_MANIFEST
        );
    }

    #[test]
    fn test_interactive_flag_ignores_name_and_launches_choice() {
        let temp = suite_root(&["01_flappy_clone", "06_snake"]);
        let config = visual_config(&temp);
        let mut args = visual_args(false);
        args.interactive = true;

        let code = launch(&config, &args, "2\n").unwrap();

        assert_eq!(code, 7);
        let engine_args = std::fs::read_to_string(temp.path().join("engine_args.txt")).unwrap();
        assert!(engine_args.contains("06_snake"));
    }

    #[test]
    fn test_interrupted_session_restores_subject_and_succeeds() {
        let temp = suite_root(&["01_flappy_clone"]);
        let engine = write_fake_engine(temp.path(), "sleep 30");
        let mut global = global_args(temp.path());
        global.engine = Some(engine.to_string_lossy().to_string());
        let config = build_config(&global).unwrap();

        let interrupt = InterruptFlag::default();
        let setter = interrupt.clone();
        let agent_file = temp.path().join("01_flappy_clone").join(INSTRUMENTATION_FILE);
        let watcher = std::thread::spawn(move || {
            let deadline = std::time::Instant::now() + std::time::Duration::from_secs(10);
            while !agent_file.exists() && std::time::Instant::now() < deadline {
                std::thread::sleep(std::time::Duration::from_millis(20));
            }
            std::thread::sleep(std::time::Duration::from_millis(200));
            setter.set();
        });

        let started = std::time::Instant::now();
        let mut input = Cursor::new(Vec::new());
        let mut output = Vec::new();
        let code = visual::visual_session(
            &config,
            &visual_args(false),
            &mut input,
            &mut output,
            move || interrupt,
        )
        .unwrap();
        watcher.join().unwrap();

        assert_eq!(code, exit_codes::SUCCESS);
        assert!(started.elapsed() < std::time::Duration::from_secs(20));
        assert!(String::from_utf8(output).unwrap().contains("interrupted by user"));
        let subject = temp.path().join("01_flappy_clone");
        assert!(!subject.join(INSTRUMENTATION_FILE).exists());
        assert_eq!(
            std::fs::read_to_string(subject.join("project.godot")).unwrap(),
            SAMPLE_MANIFEST
        );
    }
}
