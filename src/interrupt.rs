//! Ctrl-C handling.
//!
//! An interrupt sets a shared flag instead of terminating playrun. Agents
//! poll it while the engine runs: they kill the engine, restore the subject
//! and report the run as interrupted. The orchestrator stops scheduling new
//! subjects and still writes the report.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use tracing::warn;

/// Cancellation flag shared between the interrupt handler and the workers.
#[derive(Debug, Clone, Default)]
pub struct InterruptFlag(Arc<AtomicBool>);

impl InterruptFlag {
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn set(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// The process-wide flag wired to Ctrl-C.
    ///
    /// The handler is installed on first use. If installation fails the
    /// returned flag is never set and Ctrl-C keeps its default behavior.
    pub fn install() -> Self {
        static PROCESS_FLAG: OnceLock<InterruptFlag> = OnceLock::new();

        PROCESS_FLAG
            .get_or_init(|| {
                let flag = InterruptFlag::default();
                let handler_flag = flag.clone();
                if let Err(e) = ctrlc::set_handler(move || handler_flag.set()) {
                    warn!(error = %e, "failed to install interrupt handler");
                }
                flag
            })
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_state() {
        let flag = InterruptFlag::default();
        let worker_view = flag.clone();
        assert!(!worker_view.is_set());

        flag.set();

        assert!(worker_view.is_set());
    }
}
