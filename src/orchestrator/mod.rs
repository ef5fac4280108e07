//! Orchestration across all discovered subjects.
//!
//! Subjects run either one after another in discovery order, or on a fixed
//! pool of worker threads. Workers share nothing mutable: each owns one
//! subject directory for the duration of its agent run, and results flow
//! back over a channel to the single thread that folds them into the
//! report.


use crate::agent::{Agent, query_engine_version};
use crate::config::SuiteConfig;
use crate::error::Result;
use crate::interrupt::InterruptFlag;
use crate::report::{TestReport, TestResult, print_summary, save_report};
use crate::subject::{Classifier, SubjectDescriptor, discover};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::Instant;
use tracing::{debug, info};

/// Options for one orchestration run.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Case-insensitive name substrings; empty runs everything.
    pub filters: Vec<String>,
    /// Worker count; 0 or 1 selects sequential mode.
    pub workers: usize,
    pub verbose: bool,
    /// Once set, no further subject starts and running ones are stopped.
    pub interrupt: InterruptFlag,
}

/// What a finished run produced.
#[derive(Debug)]
pub struct RunOutcome {
    pub report: TestReport,
    /// Timestamped report file.
    pub report_path: PathBuf,
    /// Whether Ctrl-C cut the run short.
    pub interrupted: bool,
}

/// Drives discovery, agents, aggregation and persistence.
pub struct Orchestrator {
    config: SuiteConfig,
    classifier: Classifier,
}

impl Orchestrator {
    pub fn new(config: SuiteConfig) -> Self {
        let classifier = Classifier::from_config(&config);
        Self { config, classifier }
    }

    /// Discover subjects in discovery order.
    pub fn discover(&self) -> Result<Vec<SubjectDescriptor>> {
        discover(&self.config.root, &self.classifier)
    }

    /// Discover subjects and keep those matching any filter.
    pub fn select(&self, filters: &[String]) -> Result<Vec<SubjectDescriptor>> {
        let subjects = self.discover()?;
        if filters.is_empty() {
            return Ok(subjects);
        }
        Ok(subjects
            .into_iter()
            .filter(|s| filters.iter().any(|f| s.matches(f)))
            .collect())
    }

    /// Run every selected subject, print the summary and persist the report.
    pub fn run_all(&self, options: &RunOptions) -> Result<RunOutcome> {
        let subjects = self.select(&options.filters)?;
        let engine_version = query_engine_version(&self.config);

        self.print_header(subjects.len(), options.workers.max(1));

        let report = self.execute(&subjects, options, engine_version);

        let interrupted = options.interrupt.is_set();
        if interrupted {
            println!();
            println!(
                "Interrupted: {} subject(s) not run",
                report.skipped_count
            );
        }

        print_summary(&report);
        let report_path = save_report(&report, &self.config.reports_dir())?;
        println!();
        println!("Report saved: {}", report_path.display());

        Ok(RunOutcome {
            report,
            report_path,
            interrupted,
        })
    }

    /// Run the given subjects and aggregate their results.
    pub fn execute(
        &self,
        subjects: &[SubjectDescriptor],
        options: &RunOptions,
        engine_version: String,
    ) -> TestReport {
        let mut report = TestReport::new(subjects.len(), engine_version);
        let start = Instant::now();

        if options.workers > 1 {
            self.run_parallel(subjects, options, &mut report);
        } else {
            self.run_sequential(subjects, options, &mut report);
        }

        report.skip_unrun();
        report.total_duration = start.elapsed().as_secs_f64();
        info!(
            total = report.total_subjects,
            passed = report.passed_count,
            failed = report.failed_count,
            skipped = report.skipped_count,
            "run complete"
        );
        report
    }

    fn run_sequential(
        &self,
        subjects: &[SubjectDescriptor],
        options: &RunOptions,
        report: &mut TestReport,
    ) {
        let total = subjects.len();
        for (i, subject) in subjects.iter().enumerate() {
            if options.interrupt.is_set() {
                break;
            }
            println!();
            println!("[{}/{}] Testing: {}", i + 1, total, subject.name);
            let result = Agent::new(&self.config, subject)
                .with_interrupt(&options.interrupt)
                .run();
            record(report, result, options.verbose);
        }
    }

    fn run_parallel(
        &self,
        subjects: &[SubjectDescriptor],
        options: &RunOptions,
        report: &mut TestReport,
    ) {
        let total = subjects.len();
        let workers = options.workers.min(total.max(1));
        let next = AtomicUsize::new(0);
        let (tx, rx) = mpsc::channel::<TestResult>();

        debug!(workers, total, "starting worker pool");

        thread::scope(|scope| {
            for _ in 0..workers {
                let tx = tx.clone();
                let next = &next;
                scope.spawn(move || {
                    while !options.interrupt.is_set() {
                        let index = next.fetch_add(1, Ordering::Relaxed);
                        let Some(subject) = subjects.get(index) else {
                            break;
                        };
                        let result = Agent::new(&self.config, subject)
                            .with_interrupt(&options.interrupt)
                            .run();
                        if tx.send(result).is_err() {
                            break;
                        }
                    }
                });
            }
            // Only worker clones keep the channel open from here on.
            drop(tx);

            for (i, result) in rx.iter().enumerate() {
                let status = if result.passed { "PASS" } else { "FAIL" };
                println!("[{}/{}] Completed: {} - {}", i + 1, total, result.name, status);
                record(report, result, options.verbose);
            }
        });
    }

    fn print_header(&self, count: usize, workers: usize) {
        let rule = "=".repeat(60);
        println!();
        println!("{}", rule);
        println!("AUTONOMOUS SUBJECT TEST SUITE");
        println!("{}", rule);
        println!("Subjects to test:    {}", count);
        println!("Parallel workers:    {}", workers);
        println!("Timeout per subject: {}s", self.config.timeout_seconds);
        println!("{}", rule);
    }
}

/// Fold one result into the report, echoing it in verbose mode.
fn record(report: &mut TestReport, result: TestResult, verbose: bool) {
    if verbose {
        let status = if result.passed { "PASS" } else { "FAIL" };
        println!("  {} ({:.2}s)", status, result.duration);
        for error in &result.errors {
            println!("    Error: {}", error);
        }
    }
    report.record(result);
}
