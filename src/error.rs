//! Error handling for the bashplate application.
//! Defines custom error types and results used throughout the application.

use std::io;
use thiserror::Error;

/// Custom error types for bashplate operations.
///
/// This enum represents all possible errors that can occur while generating
/// a script template. It implements the standard Error trait through
/// thiserror's derive macro.
#[derive(Error, Debug)]
pub enum Error {
    /// Represents errors that occur during file system operations
    #[error("IO error: {0}.")]
    IoError(#[from] io::Error),

    /// Represents errors that occur during configuration loading or dumping
    #[error("Configuration error: {0}.")]
    ConfigError(String),

    /// Represents errors in the serialized configuration format
    #[error("JSON error: {0}.")]
    JsonError(#[from] serde_json::Error),

    /// Represents failures of the interactive prompt machinery itself.
    /// Invalid answers are reprompted locally, never surfaced through this.
    #[error("Prompt error: {0}.")]
    PromptError(String),

    /// The operator interrupted the question flow; no output is produced.
    #[error("Cancelled.")]
    Cancelled,
}

/// Convenience type alias for Results with bashplate's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Exit status used when the operator interrupts the run (128 + SIGINT).
pub const CANCELLED_EXIT_CODE: i32 = 130;

/// Default error handler that prints the error and exits the program.
///
/// # Behavior
/// Logs a warning and exits with status 130 for a cancellation;
/// prints the error message to stderr and exits with status 1 otherwise.
pub fn default_error_handler(err: Error) -> ! {
    match err {
        Error::Cancelled => {
            log::warn!("Cancelled.");
            std::process::exit(CANCELLED_EXIT_CODE);
        }
        _ => {
            eprintln!("{}", err);
            std::process::exit(1);
        }
    }
}
