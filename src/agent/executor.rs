//! Engine subprocess executor.
//!
//! Runs the engine with a supervisory timeout, capturing stdout and stderr
//! to log files in the agent's scratch directory.

use crate::config::SuiteConfig;
use crate::error::{PlayrunError, Result};
use crate::interrupt::InterruptFlag;
use std::fs::File;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Version reported when the engine cannot be queried.
pub const UNKNOWN_VERSION: &str = "unknown";

/// A fully resolved engine command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

impl Invocation {
    /// Engine invocation for a headless run of `subject_path`.
    ///
    /// The engine is asked to quit after the configured subject timeout.
    pub fn headless(config: &SuiteConfig, subject_path: &Path) -> Result<Self> {
        let (program, mut args) = config.engine_argv()?;
        args.extend([
            "--headless".to_string(),
            "--path".to_string(),
            subject_path.to_string_lossy().to_string(),
            "--quit-after".to_string(),
            config.timeout_seconds.to_string(),
        ]);
        Ok(Self {
            program,
            args,
            cwd: subject_path.to_path_buf(),
        })
    }

    /// Engine invocation for a windowed, interactive run of `subject_path`.
    pub fn windowed(
        config: &SuiteConfig,
        subject_path: &Path,
        resolution: (u32, u32),
    ) -> Result<Self> {
        let (program, mut args) = config.engine_argv()?;
        args.extend([
            "--path".to_string(),
            subject_path.to_string_lossy().to_string(),
            "--resolution".to_string(),
            format!("{}x{}", resolution.0, resolution.1),
        ]);
        Ok(Self {
            program,
            args,
            cwd: subject_path.to_path_buf(),
        })
    }

    /// Engine invocation for the `--version` query.
    pub fn version(config: &SuiteConfig) -> Result<Self> {
        let (program, mut args) = config.engine_argv()?;
        args.push("--version".to_string());
        Ok(Self {
            program,
            args,
            cwd: config.root.clone(),
        })
    }

    fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Captured outcome of one process run.
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    /// Exit code (None if killed or terminated by a signal).
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub duration: Duration,
    /// Whether the process was killed at the supervisory timeout.
    pub timed_out: bool,
    /// Whether the process was killed because of Ctrl-C.
    pub interrupted: bool,
}

/// How waiting on a child process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// The process exited; `None` when it died from a signal.
    Exited(Option<i32>),
    TimedOut,
    Interrupted,
}

/// Run `invocation`, killing it once `timeout` elapses or `interrupt` is set.
///
/// Output is streamed to `stdout.log` / `stderr.log` in `logs_dir` and read
/// back after the process ends, so a killed process still yields whatever
/// it wrote before the kill.
///
/// # Errors
///
/// * `EnvironmentError` - the program does not exist on this host
/// * `IoError` - log files could not be created or the spawn failed otherwise
pub fn run_with_timeout(
    invocation: &Invocation,
    timeout: Duration,
    logs_dir: &Path,
    interrupt: &InterruptFlag,
) -> Result<ProcessOutput> {
    let stdout_path = logs_dir.join("stdout.log");
    let stderr_path = logs_dir.join("stderr.log");

    let stdout_file = create_log(&stdout_path)?;
    let stderr_file = create_log(&stderr_path)?;

    debug!(command = %invocation.command_line(), "spawning engine");

    let start_time = Instant::now();
    let mut child = Command::new(&invocation.program)
        .args(&invocation.args)
        .current_dir(&invocation.cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::from(stdout_file))
        .stderr(Stdio::from(stderr_file))
        .spawn()
        .map_err(|e| spawn_error(invocation, e))?;

    let outcome = wait_for_child(&mut child, Some(timeout), interrupt)?;
    let duration = start_time.elapsed();

    Ok(ProcessOutput {
        exit_code: match outcome {
            WaitOutcome::Exited(code) => code,
            _ => None,
        },
        stdout: read_log(&stdout_path),
        stderr: read_log(&stderr_path),
        duration,
        timed_out: outcome == WaitOutcome::TimedOut,
        interrupted: outcome == WaitOutcome::Interrupted,
    })
}

/// Run `invocation` in the foreground with inherited stdio and no timeout.
///
/// The process is killed when `interrupt` is set.
///
/// # Errors
///
/// * `EnvironmentError` - the program does not exist on this host
/// * `IoError` - the spawn or a status check failed
pub fn run_attached(invocation: &Invocation, interrupt: &InterruptFlag) -> Result<WaitOutcome> {
    debug!(command = %invocation.command_line(), "launching engine");

    let mut child = Command::new(&invocation.program)
        .args(&invocation.args)
        .current_dir(&invocation.cwd)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .map_err(|e| spawn_error(invocation, e))?;

    wait_for_child(&mut child, None, interrupt)
}

fn spawn_error(invocation: &Invocation, e: std::io::Error) -> PlayrunError {
    match e.kind() {
        ErrorKind::NotFound => PlayrunError::EnvironmentError(format!(
            "engine not found at: {}",
            invocation.program
        )),
        _ => PlayrunError::IoError(format!(
            "failed to execute engine command '{}': {}",
            invocation.program, e
        )),
    }
}

/// Ask the engine for its version string.
///
/// Best effort: any failure, including a timeout, yields `"unknown"`.
pub fn query_engine_version(config: &SuiteConfig) -> String {
    let attempt = || -> Result<String> {
        let invocation = Invocation::version(config)?;
        let logs = tempfile::Builder::new()
            .prefix("playrun_version_")
            .tempdir()
            .map_err(|e| PlayrunError::IoError(format!("failed to create temp dir: {}", e)))?;
        let output = run_with_timeout(
            &invocation,
            Duration::from_secs(config.version_timeout_seconds),
            logs.path(),
            &InterruptFlag::default(),
        )?;
        if output.timed_out {
            return Err(PlayrunError::Timeout(config.version_timeout_seconds));
        }
        Ok(output.stdout.trim().to_string())
    };

    match attempt() {
        Ok(version) => version,
        Err(e) => {
            warn!(error = %e, "could not query engine version");
            UNKNOWN_VERSION.to_string()
        }
    }
}

/// Poll a child until it exits, `timeout` elapses or `interrupt` is set.
fn wait_for_child(
    child: &mut Child,
    timeout: Option<Duration>,
    interrupt: &InterruptFlag,
) -> Result<WaitOutcome> {
    let start = Instant::now();
    let poll_interval = Duration::from_millis(50);

    loop {
        match child.try_wait() {
            // Ctrl-C in a terminal reaches the engine too, so it may exit first.
            Ok(Some(_)) if interrupt.is_set() => return Ok(WaitOutcome::Interrupted),
            Ok(Some(status)) => return Ok(WaitOutcome::Exited(status.code())),
            Ok(None) => {
                if interrupt.is_set() {
                    kill_process(child);
                    return Ok(WaitOutcome::Interrupted);
                }
                if timeout.is_some_and(|t| start.elapsed() >= t) {
                    kill_process(child);
                    return Ok(WaitOutcome::TimedOut);
                }
                std::thread::sleep(poll_interval);
            }
            Err(e) => {
                kill_process(child);
                return Err(PlayrunError::IoError(format!(
                    "failed to check engine process status: {}",
                    e
                )));
            }
        }
    }
}

/// Kill a process and reap it.
fn kill_process(child: &mut Child) {
    // SIGKILL on Unix, TerminateProcess on Windows.
    let _ = child.kill();
    let _ = child.wait();
}

fn create_log(path: &Path) -> Result<File> {
    File::create(path).map_err(|e| {
        PlayrunError::IoError(format!(
            "failed to create log '{}': {}",
            path.display(),
            e
        ))
    })
}

fn read_log(path: &Path) -> String {
    std::fs::read(path)
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .unwrap_or_default()
}
