//! Noise descriptors and the sources that produce them
//!
//! A `NoiseDescriptor` is the set of interference frequencies for one run.
//! Sources are injected into the pipeline as values so that tests can swap
//! random draws for a fixed set, or seed the generator for reproducibility.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::error::SignalError;
use crate::synthesis::TimeBase;

/// Set of interference frequencies (Hz), sorted and without duplicates
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct NoiseDescriptor {
    frequencies: Vec<f64>,
}

impl NoiseDescriptor {
    /// Validate frequencies against `[0, Nyquist)` and collapse duplicates
    pub fn new(frequencies: Vec<f64>, time_base: &TimeBase) -> Result<Self, SignalError> {
        if frequencies.is_empty() {
            return Err(SignalError::EmptyNoiseDescriptor);
        }

        let nyquist = time_base.nyquist_hz();
        if let Some(&bad) = frequencies
            .iter()
            .find(|&&f| !f.is_finite() || f < 0.0 || f >= nyquist)
        {
            return Err(SignalError::InvalidNoiseFrequency {
                frequency: bad,
                nyquist,
            });
        }

        let mut frequencies = frequencies;
        frequencies.sort_by(|a, b| a.total_cmp(b));
        frequencies.dedup();
        Ok(Self { frequencies })
    }

    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }
}

/// Anything that can choose the interference for a run
pub trait NoiseSource {
    fn descriptor(&mut self, time_base: &TimeBase) -> Result<NoiseDescriptor, SignalError>;
}

/// Integral frequencies drawn uniformly from `[0, Nyquist)`
pub struct RandomNoise<R: Rng = StdRng> {
    rng: R,
    tone_count: usize,
}

impl RandomNoise<StdRng> {
    /// Reproducible draws from a fixed seed
    pub fn seeded(seed: u64, tone_count: usize) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), tone_count)
    }

    /// Draws seeded from OS entropy
    pub fn from_entropy(tone_count: usize) -> Self {
        Self::with_rng(StdRng::from_entropy(), tone_count)
    }
}

impl<R: Rng> RandomNoise<R> {
    pub fn with_rng(rng: R, tone_count: usize) -> Self {
        Self { rng, tone_count }
    }
}

impl<R: Rng> NoiseSource for RandomNoise<R> {
    fn descriptor(&mut self, time_base: &TimeBase) -> Result<NoiseDescriptor, SignalError> {
        // integers below ceil(nyquist) are all strictly below nyquist
        let upper = time_base.nyquist_hz().ceil().max(1.0) as u64;
        let frequencies = (0..self.tone_count)
            .map(|_| self.rng.gen_range(0..upper) as f64)
            .collect();
        let descriptor = NoiseDescriptor::new(frequencies, time_base)?;
        tracing::debug!(
            "[Noise] Drew {} tone(s): {:?}",
            descriptor.len(),
            descriptor.frequencies()
        );
        Ok(descriptor)
    }
}

/// Explicit descriptor, bypassing random generation
pub struct FixedNoise {
    frequencies: Vec<f64>,
}

impl FixedNoise {
    pub fn new(frequencies: Vec<f64>) -> Self {
        Self { frequencies }
    }
}

impl NoiseSource for FixedNoise {
    fn descriptor(&mut self, time_base: &TimeBase) -> Result<NoiseDescriptor, SignalError> {
        NoiseDescriptor::new(self.frequencies.clone(), time_base)
    }
}
