//! Error types for the playrun CLI.
//!
//! Uses thiserror for derive macros and provides user-actionable error messages.
//! Errors raised while processing a single subject never leave the agent: they
//! are stringified into that subject's result instead.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for playrun operations.
#[derive(Error, Debug)]
pub enum PlayrunError {
    /// User provided invalid arguments or the suite is misconfigured.
    #[error("{0}")]
    UserError(String),

    /// A required host resource is missing (engine binary, instrumentation source).
    #[error("{0}")]
    EnvironmentError(String),

    /// The supervisory timeout elapsed and the engine process was killed.
    #[error("Test timed out after {0}s")]
    Timeout(u64),

    /// A side-channel result file existed but could not be decoded.
    #[error("Could not parse results: {0}")]
    ProtocolError(String),

    /// The user interrupted the run with Ctrl-C.
    #[error("Interrupted by user")]
    Interrupted,

    /// Filesystem operation failed.
    #[error("{0}")]
    IoError(String),
}

impl PlayrunError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            PlayrunError::UserError(_) => exit_codes::USER_ERROR,
            PlayrunError::EnvironmentError(_) => exit_codes::USER_ERROR,
            PlayrunError::Timeout(_) => exit_codes::TESTS_FAILED,
            PlayrunError::ProtocolError(_) => exit_codes::TESTS_FAILED,
            PlayrunError::Interrupted => exit_codes::INTERRUPTED,
            PlayrunError::IoError(_) => exit_codes::USER_ERROR,
        }
    }
}

/// Result type alias for playrun operations.
pub type Result<T> = std::result::Result<T, PlayrunError>;
