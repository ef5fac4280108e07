//! Exit code constants for the playrun CLI.
//!
//! - 0: Success (every executed subject passed, or a listing command ran)
//! - 1: At least one subject failed
//! - 2: User error (bad args, invalid root, unreadable config)
//! - 130: Run interrupted with Ctrl-C (128 + SIGINT)

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// One or more subjects failed their run.
pub const TESTS_FAILED: i32 = 1;

/// User error: bad arguments, invalid root directory, or invalid config.
pub const USER_ERROR: i32 = 2;

/// The run was interrupted before every selected subject finished.
pub const INTERRUPTED: i32 = 130;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct() {
        let codes = [SUCCESS, TESTS_FAILED, USER_ERROR, INTERRUPTED];
        for (i, &a) in codes.iter().enumerate() {
            for (j, &b) in codes.iter().enumerate() {
                if i != j {
                    assert_ne!(a, b, "Exit codes must be distinct");
                }
            }
        }
    }

    #[test]
    fn failed_runs_exit_with_one() {
        assert_eq!(SUCCESS, 0);
        assert_eq!(TESTS_FAILED, 1);
    }
}
