//! Sampled signal value type
//!
//! A `Signal` is an ordered run of amplitude samples aligned 1:1 with the
//! instants of a [`TimeBase`](crate::synthesis::TimeBase). Signals are never
//! mutated once produced; every combinator returns a new value.

use serde::Serialize;

use crate::error::SignalError;

/// Real-valued sample buffer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Signal {
    samples: Vec<f64>,
}

impl Signal {
    /// All-zero signal of `len` samples (silence)
    pub fn zeros(len: usize) -> Self {
        Self {
            samples: vec![0.0; len],
        }
    }

    pub fn from_samples(samples: Vec<f64>) -> Self {
        Self { samples }
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<f64> {
        self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// True when every sample is exactly zero
    pub fn is_silent(&self) -> bool {
        self.samples.iter().all(|&s| s == 0.0)
    }

    /// Largest absolute sample value (0 for an empty signal)
    pub fn peak(&self) -> f64 {
        self.samples.iter().fold(0.0_f64, |acc, &s| acc.max(s.abs()))
    }

    /// Pointwise sum
    pub fn add(&self, other: &Signal) -> Result<Signal, SignalError> {
        self.zip_with(other, |a, b| a + b)
    }

    /// Pointwise difference (`self - other`)
    pub fn sub(&self, other: &Signal) -> Result<Signal, SignalError> {
        self.zip_with(other, |a, b| a - b)
    }

    /// Mean absolute difference between two equally long signals
    pub fn mean_abs_error(&self, other: &Signal) -> Result<f64, SignalError> {
        let diff = self.sub(other)?;
        if diff.is_empty() {
            return Ok(0.0);
        }
        Ok(diff.samples.iter().map(|s| s.abs()).sum::<f64>() / diff.len() as f64)
    }

    fn zip_with(&self, other: &Signal, op: impl Fn(f64, f64) -> f64) -> Result<Signal, SignalError> {
        if self.len() != other.len() {
            return Err(SignalError::LengthMismatch {
                left: self.len(),
                right: other.len(),
            });
        }

        Ok(Signal {
            samples: self
                .samples
                .iter()
                .zip(other.samples.iter())
                .map(|(&a, &b)| op(a, b))
                .collect(),
        })
    }
}
