//! Implementation of the `playrun run` command.

use crate::cli::RunArgs;
use crate::config::SuiteConfig;
use crate::error::Result;
use crate::exit_codes;
use crate::interrupt::InterruptFlag;
use crate::orchestrator::{Orchestrator, RunOptions};

/// Execute the `playrun run` command.
///
/// Exit code is `SUCCESS` when no selected subject failed and
/// `TESTS_FAILED` otherwise. An empty selection still writes a report.
/// A run cut short by Ctrl-C writes its partial report and exits with
/// `INTERRUPTED`.
pub fn cmd_run(config: SuiteConfig, args: RunArgs) -> Result<i32> {
    let options = RunOptions {
        filters: args.filters,
        workers: args.parallel,
        verbose: args.verbose,
        interrupt: InterruptFlag::install(),
    };

    let outcome = Orchestrator::new(config).run_all(&options)?;

    if outcome.interrupted {
        Ok(exit_codes::INTERRUPTED)
    } else if outcome.report.failed_count == 0 {
        Ok(exit_codes::SUCCESS)
    } else {
        Ok(exit_codes::TESTS_FAILED)
    }
}
