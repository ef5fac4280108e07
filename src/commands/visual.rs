//! Implementation of the `playrun visual` command.
//!
//! Launches a single subject in a window for manual inspection. The
//! instrumentation, when injected, is removed again when the engine exits
//! or the session is ended with Ctrl-C.

use crate::agent::{Instrumentation, Invocation, WaitOutcome, run_attached};
use crate::cli::VisualArgs;
use crate::config::SuiteConfig;
use crate::error::{PlayrunError, Result};
use crate::exit_codes;
use crate::interrupt::InterruptFlag;
use crate::manifest;
use crate::subject::{Classifier, SubjectDescriptor, discover};
use std::io::{self, BufRead, Write};

/// Execute the `playrun visual` command.
///
/// Returns the engine's exit code, 1 if it was terminated by a signal, and
/// `SUCCESS` when the session is ended with Ctrl-C or no subject is picked.
pub fn cmd_visual(config: &SuiteConfig, args: VisualArgs) -> Result<i32> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();
    visual_session(config, &args, &mut input, &mut output, InterruptFlag::install)
}

/// Pick a subject, then launch it.
///
/// `interrupt` is only called once a subject is chosen, so Ctrl-C at the
/// selection prompt still ends the process immediately.
pub(super) fn visual_session<R: BufRead, W: Write>(
    config: &SuiteConfig,
    args: &VisualArgs,
    input: &mut R,
    output: &mut W,
    interrupt: impl FnOnce() -> InterruptFlag,
) -> Result<i32> {
    let resolution = parse_resolution(&args.resolution)?;

    let classifier = Classifier::from_config(config);
    let subjects = discover(&config.root, &classifier)?;

    let subject = match args.name.as_deref() {
        Some(name) if !args.interactive => find_subject(&subjects, name)?,
        _ => match select_interactively(&subjects, input, output)? {
            Some(index) => &subjects[index],
            None => return Ok(exit_codes::SUCCESS),
        },
    };

    launch(config, subject, args, resolution, &interrupt(), output)
}

fn launch<W: Write>(
    config: &SuiteConfig,
    subject: &SubjectDescriptor,
    args: &VisualArgs,
    resolution: (u32, u32),
    interrupt: &InterruptFlag,
    output: &mut W,
) -> Result<i32> {
    let title = manifest::read_display_name(&subject.manifest_path())
        .unwrap_or_else(|| subject.name.clone());
    write_line(output, &format!("Launching: {} ({})", title, subject.name))?;
    write_line(output, &format!("Resolution: {}x{}", resolution.0, resolution.1))?;

    let mut instrumentation = Instrumentation::new(&subject.path);
    if !args.no_agent {
        instrumentation.prepare(config, None)?;
        write_line(output, "Test agent injected")?;
    }

    let invocation = Invocation::windowed(config, &subject.path, resolution)?;
    let outcome = run_attached(&invocation, interrupt).map_err(|e| match e {
        PlayrunError::EnvironmentError(msg) => PlayrunError::EnvironmentError(format!(
            "{}\nFix: install the engine or point GODOT_CMD (or --engine) at it.",
            msg
        )),
        other => other,
    });

    instrumentation.restore();

    let code = match outcome? {
        WaitOutcome::Exited(code) => code.unwrap_or(1),
        WaitOutcome::TimedOut => exit_codes::TESTS_FAILED,
        WaitOutcome::Interrupted => {
            write_line(output, "Session interrupted by user")?;
            exit_codes::SUCCESS
        }
    };

    if !args.no_agent {
        write_line(output, "Test agent removed")?;
    }
    Ok(code)
}

/// Print a numbered subject list and read a choice from `input`.
///
/// Returns `None` for `0` or end of input. Anything else that is not a
/// listed number re-prompts.
pub(super) fn select_interactively<R: BufRead, W: Write>(
    subjects: &[SubjectDescriptor],
    input: &mut R,
    output: &mut W,
) -> Result<Option<usize>> {
    if subjects.is_empty() {
        return Err(PlayrunError::UserError(
            "no subjects discovered to choose from".to_string(),
        ));
    }

    let rule = "=".repeat(60);
    write_line(output, "")?;
    write_line(output, &rule)?;
    write_line(output, "VISUAL RUN - select a subject")?;
    write_line(output, &rule)?;
    write_line(output, "")?;
    for (i, subject) in subjects.iter().enumerate() {
        write_line(
            output,
            &format!("  [{:2}] {:<35} ({})", i + 1, subject.name, subject.category),
        )?;
    }
    write_line(output, "")?;
    write_line(output, "  [ 0] Exit")?;
    write_line(output, "")?;

    loop {
        write!(output, "Select subject number: ")
            .and_then(|_| output.flush())
            .map_err(output_error)?;

        let mut line = String::new();
        let read = input.read_line(&mut line).map_err(|e| {
            PlayrunError::IoError(format!("failed to read selection: {}", e))
        })?;
        if read == 0 {
            return Ok(None);
        }

        let choice = line.trim();
        if choice == "0" {
            return Ok(None);
        }
        match choice.parse::<usize>() {
            Ok(n) if (1..=subjects.len()).contains(&n) => return Ok(Some(n - 1)),
            Ok(_) => write_line(output, "Invalid selection")?,
            Err(_) => write_line(output, "Please enter a number")?,
        }
    }
}

/// Parse `WIDTHxHEIGHT` into a pair of pixel dimensions.
pub(super) fn parse_resolution(value: &str) -> Result<(u32, u32)> {
    let invalid = || {
        PlayrunError::UserError(format!(
            "invalid resolution '{}': expected WIDTHxHEIGHT, e.g. 720x1280",
            value
        ))
    };

    let (width, height) = value.trim().split_once(['x', 'X']).ok_or_else(invalid)?;
    let width: u32 = width.trim().parse().map_err(|_| invalid())?;
    let height: u32 = height.trim().parse().map_err(|_| invalid())?;
    if width == 0 || height == 0 {
        return Err(invalid());
    }
    Ok((width, height))
}

/// First subject in discovery order whose name contains `query`.
pub(super) fn find_subject<'a>(
    subjects: &'a [SubjectDescriptor],
    query: &str,
) -> Result<&'a SubjectDescriptor> {
    if let Some(subject) = subjects.iter().find(|s| s.matches(query)) {
        return Ok(subject);
    }

    let available = subjects
        .iter()
        .map(|s| format!("  {}", s.name))
        .collect::<Vec<_>>()
        .join("\n");
    Err(PlayrunError::UserError(format!(
        "no subject matches '{}'. Available subjects:\n{}",
        query, available
    )))
}

fn write_line<W: Write>(output: &mut W, line: &str) -> Result<()> {
    writeln!(output, "{}", line).map_err(output_error)
}

fn output_error(e: io::Error) -> PlayrunError {
    PlayrunError::IoError(format!("failed to write to terminal: {}", e))
}
