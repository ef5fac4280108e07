//! Execution agent: one subject, one run.
//!
//! An agent drives a subject through four phases:
//!
//! 1. **Prepare** - inject the instrumentation, its config and the manifest
//!    registration ([`Instrumentation::prepare`])
//! 2. **Execute** - run the engine headless under the supervisory timeout
//! 3. **Harvest** - merge the side-channel file and reconcile process signals
//! 4. **Cleanup** - restore the subject ([`Instrumentation::restore`])
//!
//! Phase 4 runs on every exit path, including errors, panics and Ctrl-C in
//! phases 1-3. No error escapes an agent: everything lands in the
//! [`TestResult`].

pub mod executor;
pub mod harvest;
pub mod instrument;


use crate::config::SuiteConfig;
use crate::error::{PlayrunError, Result};
use crate::interrupt::InterruptFlag;
use crate::report::TestResult;
use crate::subject::SubjectDescriptor;
use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Instant;
use tracing::{info, info_span};

use executor::run_with_timeout;
use harvest::{locate_results_file, merge_results_file, reconcile_signals};
use instrument::InstrumentationConfig;

pub use executor::{Invocation, WaitOutcome, query_engine_version, run_attached};
pub use instrument::Instrumentation;

/// Runs one subject under the suite configuration.
pub struct Agent<'a> {
    config: &'a SuiteConfig,
    subject: &'a SubjectDescriptor,
    interrupt: InterruptFlag,
}

impl<'a> Agent<'a> {
    pub fn new(config: &'a SuiteConfig, subject: &'a SubjectDescriptor) -> Self {
        Self {
            config,
            subject,
            interrupt: InterruptFlag::default(),
        }
    }

    /// Stop the engine and clean up once `interrupt` is set.
    pub fn with_interrupt(mut self, interrupt: &InterruptFlag) -> Self {
        self.interrupt = interrupt.clone();
        self
    }

    /// Run all four phases and return the finished result.
    pub fn run(&self) -> TestResult {
        let _span = info_span!("agent", subject = %self.subject.name).entered();
        let start = Instant::now();

        let mut result = TestResult::new(&self.subject.name, &self.subject.path);
        let mut instrumentation = Instrumentation::new(&self.subject.path);

        let outcome = catch_unwind(AssertUnwindSafe(|| {
            self.run_phases(&mut instrumentation, &mut result)
        }));
        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(e)) => result.fail(e.to_string()),
            Err(panic) => result.fail(format!("Exception: {}", panic_message(panic.as_ref()))),
        }

        instrumentation.restore();
        result.duration = start.elapsed().as_secs_f64();

        info!(
            passed = result.passed,
            duration = result.duration,
            errors = result.errors.len(),
            "subject finished"
        );
        result
    }

    fn run_phases(
        &self,
        instrumentation: &mut Instrumentation,
        result: &mut TestResult,
    ) -> Result<()> {
        let injected =
            InstrumentationConfig::new(&self.subject.category, self.config.timeout_seconds);
        instrumentation.prepare(self.config, Some(&injected))?;

        let logs_dir = instrumentation.scratch_dir().ok_or_else(|| {
            PlayrunError::IoError("scratch directory unavailable".to_string())
        })?;
        let invocation = Invocation::headless(self.config, &self.subject.path)?;
        let output = run_with_timeout(
            &invocation,
            self.config.supervisory_timeout(),
            logs_dir,
            &self.interrupt,
        )?;

        result.stdout = output.stdout.clone();
        result.stderr = output.stderr.clone();
        if output.interrupted {
            return Err(PlayrunError::Interrupted);
        }
        if output.timed_out {
            return Err(PlayrunError::Timeout(self.config.timeout_seconds));
        }
        // Signal deaths carry no code.
        result.exit_code = output.exit_code.unwrap_or(-1);

        if let Some(path) = locate_results_file(self.config, &self.subject.path) {
            merge_results_file(result, &path);
        }
        reconcile_signals(result, &output);
        Ok(())
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
