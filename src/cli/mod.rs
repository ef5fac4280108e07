//! CLI argument parsing for playrun.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Playrun: headless test orchestrator for collections of game projects.
///
/// Every numbered project directory under the root is instrumented with a
/// test harness, run headless by the engine under a timeout, restored, and
/// summarized in a JSON report.
#[derive(Parser, Debug)]
#[command(name = "playrun")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every command.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Directory holding the subject projects.
    #[arg(long, global = true, env = "PLAYRUN_ROOT", default_value = ".")]
    pub root: PathBuf,

    /// Engine command (overrides GODOT_CMD and playrun.yaml).
    #[arg(long, global = true)]
    pub engine: Option<String>,

    /// Per-subject timeout in seconds.
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Directory for JSON reports.
    #[arg(long, global = true)]
    pub reports_dir: Option<PathBuf>,
}

/// Available commands for playrun.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List discovered subjects with their category.
    #[command(alias = "ls")]
    List,

    /// Run the headless suite and write a report.
    ///
    /// Exits 0 when every selected subject passed, 1 otherwise.
    Run(RunArgs),

    /// Launch one subject windowed for manual inspection.
    Visual(VisualArgs),
}

/// Arguments for the `run` command.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Only run subjects whose name contains one of these (case-insensitive).
    pub filters: Vec<String>,

    /// Number of subjects run concurrently.
    #[arg(short, long, default_value_t = 1)]
    pub parallel: usize,

    /// Print per-subject status and errors as results arrive.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Arguments for the `visual` command.
#[derive(Parser, Debug)]
pub struct VisualArgs {
    /// Subject name or part of it (case-insensitive). Prompts when omitted.
    pub name: Option<String>,

    /// Pick the subject from a numbered list.
    #[arg(short, long)]
    pub interactive: bool,

    /// Launch without injecting the instrumentation.
    #[arg(long)]
    pub no_agent: bool,

    /// Window resolution as WIDTHxHEIGHT.
    #[arg(short, long, default_value = "720x1280")]
    pub resolution: String,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
