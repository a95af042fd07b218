// FFT module - forward transform into a normalized one-sided spectrum
//
// The full-length signal is transformed without windowing so that a unit
// sinusoid at an integral frequency concentrates into a single bin.

use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

use crate::analysis::spectrum::Spectrum;
use crate::error::SignalError;
use crate::signal::Signal;
use crate::synthesis::TimeBase;

/// Spectral analyzer planned once for a time base
pub struct SpectralAnalyzer {
    fft: Arc<dyn Fft<f64>>,
    sample_count: usize,
    /// Normalization length N (duration × analysis rate)
    analysis_len: usize,
    bins: usize,
    nyquist_hz: f64,
}

impl SpectralAnalyzer {
    /// Create an analyzer for signals laid out on `time_base`
    pub fn new(time_base: &TimeBase) -> Self {
        let sample_count = time_base.sample_count();
        let fft = FftPlanner::new().plan_fft_forward(sample_count);

        Self {
            fft,
            sample_count,
            analysis_len: time_base.analysis_len(),
            bins: time_base.spectrum_bins(),
            nyquist_hz: time_base.nyquist_hz(),
        }
    }

    /// Compute the one-sided magnitude spectrum of `signal`
    ///
    /// Keeps the first N/2 bins, scales each magnitude by 2/N and pairs it with
    /// a frequency axis running linearly from 0 to the Nyquist limit.
    ///
    /// # Errors
    /// `SignalError::SpectrumSizeMismatch` if the signal was not produced on
    /// this analyzer's time base.
    pub fn analyze(&self, signal: &Signal) -> Result<Spectrum, SignalError> {
        if signal.len() != self.sample_count {
            return Err(SignalError::SpectrumSizeMismatch {
                expected: self.sample_count,
                actual: signal.len(),
            });
        }

        let mut buffer: Vec<Complex<f64>> = signal
            .samples()
            .iter()
            .map(|&s| Complex::new(s, 0.0))
            .collect();
        self.fft.process(&mut buffer);

        let scale = 2.0 / self.analysis_len as f64;
        let magnitudes = buffer[..self.bins]
            .iter()
            .map(|c| c.norm() * scale)
            .collect();

        Ok(Spectrum::new(self.frequency_axis(), magnitudes))
    }

    /// Linearly spaced axis `0..=nyquist` with one entry per bin
    pub fn frequency_axis(&self) -> Vec<f64> {
        if self.bins <= 1 {
            return vec![0.0; self.bins];
        }
        let step = self.nyquist_hz / (self.bins - 1) as f64;
        (0..self.bins).map(|i| i as f64 * step).collect()
    }

    pub fn bins(&self) -> usize {
        self.bins
    }
}
