//! Error handlers
//!
//! Reports fatal errors and maps them to a process exit code.

use crate::error::types::RelayError;
use log::error;

/// Exit code used for every fatal error and for usage errors.
pub const FATAL_EXIT_CODE: i32 = 1;

/// Handle a fatal relay error: log it, print the diagnostic to stderr and
/// return the exit code the process should terminate with.
pub fn handle_fatal(err: &RelayError) -> i32 {
    match err {
        RelayError::Usage(_) => {}
        _ => error!("Relay Error: {}", err),
    }
    eprintln!("{}", err);
    FATAL_EXIT_CODE
}
