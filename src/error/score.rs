// Score error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Score error code constants
///
/// Error code range: 1001-1005
pub struct ScoreErrorCodes {}

impl ScoreErrorCodes {
    /// A note has a non-positive duration or an out-of-band frequency
    pub const INVALID_NOTE: i32 = 1001;

    /// The score has no notes and configuration forbids silence
    pub const EMPTY_SCORE: i32 = 1002;

    /// Tempo is not a positive, finite BPM value
    pub const INVALID_TEMPO: i32 = 1003;

    /// A pitch name could not be parsed
    pub const INVALID_PITCH: i32 = 1004;

    /// A score file could not be read or decoded
    pub const SCORE_FILE: i32 = 1005;
}

/// Log a score error with structured context
///
/// This function logs score errors with structured fields including:
/// - error_code: Numeric error code for programmatic handling
/// - component: The component where the error occurred
/// - message: Human-readable error message
/// - context: Additional contextual information
pub fn log_score_error(err: &ScoreError, context: &str) {
    error!(
        "Score error in {}: code={}, component=Score, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Score-related errors
///
/// Raised while building a score, before any signal work begins.
///
/// Error code ranges: 1001-1005
#[derive(Debug, Clone, PartialEq)]
pub enum ScoreError {
    /// Note at `index` is malformed
    InvalidNote {
        index: usize,
        frequency: f64,
        duration: f64,
        reason: String,
    },

    /// Score contains no notes
    EmptyScore,

    /// BPM value is invalid (must be positive and finite)
    InvalidTempo { bpm: f64 },

    /// Pitch name is not recognised
    InvalidPitch { name: String },

    /// Score file could not be loaded
    ScoreFile { path: String, reason: String },
}

impl ErrorCode for ScoreError {
    fn code(&self) -> i32 {
        match self {
            ScoreError::InvalidNote { .. } => ScoreErrorCodes::INVALID_NOTE,
            ScoreError::EmptyScore => ScoreErrorCodes::EMPTY_SCORE,
            ScoreError::InvalidTempo { .. } => ScoreErrorCodes::INVALID_TEMPO,
            ScoreError::InvalidPitch { .. } => ScoreErrorCodes::INVALID_PITCH,
            ScoreError::ScoreFile { .. } => ScoreErrorCodes::SCORE_FILE,
        }
    }

    fn message(&self) -> String {
        match self {
            ScoreError::InvalidNote {
                index,
                frequency,
                duration,
                reason,
            } => {
                let known: Vec<String> = [(*frequency, "Hz"), (*duration, "s")]
                    .iter()
                    .filter(|(value, _)| !value.is_nan())
                    .map(|(value, unit)| format!("{} {}", value, unit))
                    .collect();
                if known.is_empty() {
                    format!("Invalid note #{}: {}", index, reason)
                } else {
                    format!("Invalid note #{} ({}): {}", index, known.join(", "), reason)
                }
            }
            ScoreError::EmptyScore => {
                "Score is empty and empty scores are disabled in configuration".to_string()
            }
            ScoreError::InvalidTempo { bpm } => {
                format!("BPM must be positive and finite (got {})", bpm)
            }
            ScoreError::InvalidPitch { name } => format!("Unrecognised pitch name '{}'", name),
            ScoreError::ScoreFile { path, reason } => {
                format!("Failed to load score file {}: {}", path, reason)
            }
        }
    }
}

impl fmt::Display for ScoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ScoreError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for ScoreError {}
