// Signal error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Signal error code constants
///
/// Error code range: 2001-2005
pub struct SignalErrorCodes {}

impl SignalErrorCodes {
    /// Time base parameters cannot describe a sampling grid
    pub const INVALID_TIME_BASE: i32 = 2001;

    /// A signal handed to the analyzer does not match the time base
    pub const SPECTRUM_SIZE_MISMATCH: i32 = 2002;

    /// Two signals combined pointwise have different lengths
    pub const LENGTH_MISMATCH: i32 = 2003;

    /// A noise frequency lies outside [0, Nyquist)
    pub const INVALID_NOISE_FREQUENCY: i32 = 2004;

    /// A noise descriptor has no frequencies
    pub const EMPTY_NOISE_DESCRIPTOR: i32 = 2005;
}

/// Log a signal error with structured context
pub fn log_signal_error(err: &SignalError, context: &str) {
    error!(
        "Signal error in {}: code={}, component=SignalPipeline, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Signal-processing errors
///
/// Length mismatches indicate signals from different runs being mixed and are
/// never repaired by truncation or padding.
///
/// Error code ranges: 2001-2005
#[derive(Debug, Clone, PartialEq)]
pub enum SignalError {
    /// Time base parameters are unusable
    InvalidTimeBase { reason: String },

    /// Signal length disagrees with the shared time base
    SpectrumSizeMismatch { expected: usize, actual: usize },

    /// Pointwise arithmetic on signals of different lengths
    LengthMismatch { left: usize, right: usize },

    /// Noise frequency outside the representable band
    InvalidNoiseFrequency { frequency: f64, nyquist: f64 },

    /// Noise descriptor without frequencies
    EmptyNoiseDescriptor,
}

impl ErrorCode for SignalError {
    fn code(&self) -> i32 {
        match self {
            SignalError::InvalidTimeBase { .. } => SignalErrorCodes::INVALID_TIME_BASE,
            SignalError::SpectrumSizeMismatch { .. } => SignalErrorCodes::SPECTRUM_SIZE_MISMATCH,
            SignalError::LengthMismatch { .. } => SignalErrorCodes::LENGTH_MISMATCH,
            SignalError::InvalidNoiseFrequency { .. } => {
                SignalErrorCodes::INVALID_NOISE_FREQUENCY
            }
            SignalError::EmptyNoiseDescriptor => SignalErrorCodes::EMPTY_NOISE_DESCRIPTOR,
        }
    }

    fn message(&self) -> String {
        match self {
            SignalError::InvalidTimeBase { reason } => format!("Invalid time base: {}", reason),
            SignalError::SpectrumSizeMismatch { expected, actual } => format!(
                "Signal has {} samples but the time base defines {}",
                actual, expected
            ),
            SignalError::LengthMismatch { left, right } => format!(
                "Cannot combine signals of {} and {} samples",
                left, right
            ),
            SignalError::InvalidNoiseFrequency { frequency, nyquist } => format!(
                "Noise frequency {} Hz is outside [0, {}) Hz",
                frequency, nyquist
            ),
            SignalError::EmptyNoiseDescriptor => {
                "Noise descriptor must contain at least one frequency".to_string()
            }
        }
    }
}

impl fmt::Display for SignalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SignalError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for SignalError {}
