//! Command implementations for playrun.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations and builds the effective suite configuration from the
//! global options.

mod list;
mod run;
mod visual;

#[cfg(test)]
mod tests;

use crate::cli::{Cli, Command, GlobalArgs};
use crate::config::SuiteConfig;
use crate::error::Result;

/// Dispatch a command to its implementation.
///
/// Returns the process exit code on success; errors are mapped to exit
/// codes by the caller.
pub fn dispatch(cli: Cli) -> Result<i32> {
    let config = build_config(&cli.global)?;
    match cli.command {
        Command::List => list::cmd_list(&config),
        Command::Run(args) => run::cmd_run(config, args),
        Command::Visual(args) => visual::cmd_visual(&config, args),
    }
}

/// Effective configuration: file and environment first, then CLI flags.
pub fn build_config(global: &GlobalArgs) -> Result<SuiteConfig> {
    let mut config = SuiteConfig::load_for_root(&global.root)?;

    if let Some(engine) = &global.engine {
        config.engine_command = engine.clone();
    }
    if let Some(timeout) = global.timeout {
        config.timeout_seconds = timeout;
    }
    if let Some(reports_dir) = &global.reports_dir {
        config.reports_dir = Some(reports_dir.clone());
    }

    config.validate()?;
    Ok(config)
}
