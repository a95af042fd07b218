//! Noise canceller - threshold-based spectral subtraction
//!
//! The cancellation threshold is the ceiling of the clean reference's peak
//! magnitude. Every bin of the corrupted spectrum strictly above it is taken
//! to be an injected tone: its axis frequency is rounded to the nearest
//! integer, a unit sinusoid is rebuilt at that frequency, and the sum of
//! those sinusoids is subtracted from the corrupted signal.
//!
//! This only recovers the clean signal when injected tones are integral and
//! louder than anything in the song. Neither condition is checked here.
//! A silent reference gives a threshold of 0, so every bin with any energy
//! (leakage included) is treated as noise; a warning is logged in that case.

use serde::Serialize;

use crate::analysis::{SpectralAnalyzer, Spectrum};
use crate::error::SignalError;
use crate::signal::Signal;
use crate::synthesis::{sinusoid, TimeBase};

/// One spectral bin classified as interference
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DetectedNoise {
    pub index: usize,
    /// Frequency-axis value of the bin
    pub frequency: f64,
    /// Frequency used to rebuild the interfering sinusoid
    pub rounded_frequency: f64,
    pub magnitude: f64,
}

/// Outcome of one cancellation pass
#[derive(Debug, Clone)]
pub struct Cancellation {
    pub restored: Signal,
    pub estimated_noise: Signal,
    pub threshold: f64,
    pub detected: Vec<DetectedNoise>,
    /// Spectrum of the corrupted input the detection ran on
    pub corrupted_spectrum: Spectrum,
}

impl Cancellation {
    pub fn noise_detected(&self) -> bool {
        !self.detected.is_empty()
    }

    /// Distinct rebuilt frequencies, ascending
    pub fn detected_frequencies(&self) -> Vec<f64> {
        let mut freqs: Vec<f64> = self.detected.iter().map(|d| d.rounded_frequency).collect();
        freqs.sort_by(|a, b| a.total_cmp(b));
        freqs.dedup();
        freqs
    }
}

/// Ceiling of the largest magnitude in a clean reference spectrum
pub fn cancellation_threshold(clean_spectrum: &Spectrum) -> f64 {
    clean_spectrum.max_magnitude().ceil()
}

pub struct NoiseCanceller<'a> {
    time_base: &'a TimeBase,
    analyzer: SpectralAnalyzer,
}

impl<'a> NoiseCanceller<'a> {
    pub fn new(time_base: &'a TimeBase) -> Self {
        Self {
            time_base,
            analyzer: SpectralAnalyzer::new(time_base),
        }
    }

    /// Analyzer shared by every pass of this canceller
    pub fn analyzer(&self) -> &SpectralAnalyzer {
        &self.analyzer
    }

    /// Restore `corrupted` using `clean` as the calibration reference
    pub fn cancel(&self, clean: &Signal, corrupted: &Signal) -> Result<Signal, SignalError> {
        self.cancel_with_report(clean, corrupted)
            .map(|cancellation| cancellation.restored)
    }

    /// Like [`cancel`](Self::cancel), also returning the threshold, detected
    /// bins, the corrupted spectrum and the estimated noise signal
    ///
    /// When no bin exceeds the threshold the corrupted signal is returned
    /// unchanged and a warning is logged.
    pub fn cancel_with_report(
        &self,
        clean: &Signal,
        corrupted: &Signal,
    ) -> Result<Cancellation, SignalError> {
        if clean.len() != corrupted.len() {
            return Err(SignalError::LengthMismatch {
                left: clean.len(),
                right: corrupted.len(),
            });
        }

        let clean_spectrum = self.analyzer.analyze(clean)?;
        self.cancel_against_spectrum(&clean_spectrum, corrupted)
    }

    /// Cancellation pass for callers that already hold the clean reference's spectrum
    pub fn cancel_against_spectrum(
        &self,
        clean_spectrum: &Spectrum,
        corrupted: &Signal,
    ) -> Result<Cancellation, SignalError> {
        if clean_spectrum.len() != self.analyzer.bins() {
            return Err(SignalError::SpectrumSizeMismatch {
                expected: self.analyzer.bins(),
                actual: clean_spectrum.len(),
            });
        }

        let threshold = cancellation_threshold(clean_spectrum);
        if threshold == 0.0 {
            tracing::warn!(
                "[Canceller] Clean reference is silent; threshold 0 treats every non-zero bin as noise"
            );
        }
        let corrupted_spectrum = self.analyzer.analyze(corrupted)?;

        let detected: Vec<DetectedNoise> = corrupted_spectrum
            .bins_above(threshold)
            .into_iter()
            .map(|peak| DetectedNoise {
                index: peak.index,
                frequency: peak.frequency,
                rounded_frequency: peak.frequency.round(),
                magnitude: peak.magnitude,
            })
            .collect();

        if detected.is_empty() {
            tracing::warn!(
                "[Canceller] No bin above threshold {}; returning input unchanged",
                threshold
            );
            return Ok(Cancellation {
                restored: corrupted.clone(),
                estimated_noise: Signal::zeros(corrupted.len()),
                threshold,
                detected,
                corrupted_spectrum,
            });
        }

        let mut estimate = vec![0.0_f64; self.time_base.sample_count()];
        for noise in &detected {
            let component = sinusoid(self.time_base, noise.rounded_frequency);
            for (sample, &v) in estimate.iter_mut().zip(component.samples()) {
                *sample += v;
            }
        }
        let estimated_noise = Signal::from_samples(estimate);
        let restored = corrupted.sub(&estimated_noise)?;

        tracing::info!(
            "[Canceller] threshold={} detected {} bin(s) at {:?} Hz",
            threshold,
            detected.len(),
            detected.iter().map(|d| d.rounded_frequency).collect::<Vec<_>>()
        );

        Ok(Cancellation {
            restored,
            estimated_noise,
            threshold,
            detected,
            corrupted_spectrum,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::{NoiseDescriptor, NoiseInjector};
    use crate::synthesis::tone;

    fn time_base() -> TimeBase {
        TimeBase::new(12 * 1024, 3.0, 1024.0).unwrap()
    }

    /// Short two-note phrase; its spectrum peaks well below 1
    fn phrase(tb: &TimeBase) -> Signal {
        let a = tone(tb, 220.0);
        let c = tone(tb, 130.81);
        let samples = tb
            .instants()
            .iter()
            .zip(a.samples().iter().zip(c.samples()))
            .map(|(&t, (&a, &c))| {
                if t <= 0.1 {
                    a
                } else if (0.15..=0.25).contains(&t) {
                    c
                } else {
                    0.0
                }
            })
            .collect();
        Signal::from_samples(samples)
    }

    #[test]
    fn test_threshold_is_ceiling_of_clean_peak() {
        let tb = time_base();
        let spectrum = SpectralAnalyzer::new(&tb).analyze(&phrase(&tb)).unwrap();
        assert!(spectrum.max_magnitude() > 0.0 && spectrum.max_magnitude() < 1.0);
        assert_eq!(cancellation_threshold(&spectrum), 1.0);
    }

    #[test]
    fn test_detects_exactly_the_injected_frequencies() {
        let tb = time_base();
        let clean = phrase(&tb);
        let descriptor = NoiseDescriptor::new(vec![300.0, 450.0], &tb).unwrap();
        let corrupted = NoiseInjector::new(&tb).inject(&clean, &descriptor).unwrap();

        let report = NoiseCanceller::new(&tb)
            .cancel_with_report(&clean, &corrupted)
            .unwrap();

        assert!(report.noise_detected());
        assert_eq!(report.detected_frequencies(), vec![300.0, 450.0]);
        assert_eq!(report.detected.len(), 2);
    }

    #[test]
    fn test_cancellation_recovers_clean_signal() {
        let tb = time_base();
        let clean = phrase(&tb);
        let descriptor = NoiseDescriptor::new(vec![77.0, 333.0], &tb).unwrap();
        let corrupted = NoiseInjector::new(&tb).inject(&clean, &descriptor).unwrap();

        let restored = NoiseCanceller::new(&tb).cancel(&clean, &corrupted).unwrap();
        let error = restored.mean_abs_error(&clean).unwrap();
        assert!(error < 1e-9, "mean absolute error {} too large", error);
    }

    #[test]
    fn test_clean_input_is_a_no_op() {
        let tb = time_base();
        let clean = phrase(&tb);
        let report = NoiseCanceller::new(&tb)
            .cancel_with_report(&clean, &clean)
            .unwrap();

        assert!(!report.noise_detected());
        assert_eq!(report.restored, clean);
        assert!(report.estimated_noise.is_silent());
    }

    #[test]
    fn test_silent_reference_is_a_no_op() {
        let tb = time_base();
        let silence = Signal::zeros(tb.sample_count());
        let restored = NoiseCanceller::new(&tb).cancel(&silence, &silence).unwrap();
        assert!(restored.is_silent());
    }

    #[test]
    fn test_silent_reference_gives_zero_threshold() {
        let tb = time_base();
        let silence = Signal::zeros(tb.sample_count());
        let descriptor = NoiseDescriptor::new(vec![300.0], &tb).unwrap();
        let corrupted = NoiseInjector::new(&tb).inject(&silence, &descriptor).unwrap();

        let report = NoiseCanceller::new(&tb)
            .cancel_with_report(&silence, &corrupted)
            .unwrap();
        assert_eq!(report.threshold, 0.0);
        // leakage bins count as noise too, not just the injected tone
        assert!(report.detected.len() > 1);
        assert!(report.detected_frequencies().contains(&300.0));
    }

    #[test]
    fn test_precomputed_clean_spectrum_matches_full_pass() {
        let tb = time_base();
        let clean = phrase(&tb);
        let descriptor = NoiseDescriptor::new(vec![300.0, 450.0], &tb).unwrap();
        let corrupted = NoiseInjector::new(&tb).inject(&clean, &descriptor).unwrap();

        let canceller = NoiseCanceller::new(&tb);
        let clean_spectrum = canceller.analyzer().analyze(&clean).unwrap();
        let shared = canceller
            .cancel_against_spectrum(&clean_spectrum, &corrupted)
            .unwrap();
        let full = canceller.cancel_with_report(&clean, &corrupted).unwrap();

        assert_eq!(shared.restored, full.restored);
        assert_eq!(shared.detected, full.detected);
        assert_eq!(
            shared.corrupted_spectrum,
            canceller.analyzer().analyze(&corrupted).unwrap()
        );
    }

    #[test]
    fn test_rejects_foreign_clean_spectrum() {
        let tb = time_base();
        let other = TimeBase::new(1024, 1.0, 256.0).unwrap();
        let foreign = SpectralAnalyzer::new(&other)
            .analyze(&Signal::zeros(1024))
            .unwrap();
        let err = NoiseCanceller::new(&tb)
            .cancel_against_spectrum(&foreign, &phrase(&tb))
            .unwrap_err();
        assert_eq!(
            err,
            SignalError::SpectrumSizeMismatch {
                expected: 1536,
                actual: 128
            }
        );
    }

    #[test]
    fn test_rejects_mismatched_lengths() {
        let tb = time_base();
        let clean = phrase(&tb);
        let err = NoiseCanceller::new(&tb)
            .cancel(&clean, &Signal::zeros(100))
            .unwrap_err();
        assert!(matches!(err, SignalError::LengthMismatch { .. }));

        let err = NoiseCanceller::new(&tb)
            .cancel(&Signal::zeros(100), &Signal::zeros(100))
            .unwrap_err();
        assert!(matches!(err, SignalError::SpectrumSizeMismatch { .. }));
    }
}
