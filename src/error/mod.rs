// Error types for the melody denoiser
//
// This module defines custom error types for score construction and signal
// processing, providing structured error handling with stable error codes.

mod score;
mod signal;

pub use score::{log_score_error, ScoreError, ScoreErrorCodes};
pub use signal::{log_signal_error, SignalError, SignalErrorCodes};

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages
/// from custom error types, enabling consistent error handling across
/// the library and the CLI.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}
