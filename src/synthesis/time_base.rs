// Time base - the shared sampling grid for one run
//
// All signals and spectra in a run are laid out against a single TimeBase.
// It is built once from configuration and passed by reference to every
// component that needs it.

use crate::config::TimeBaseConfig;
use crate::error::SignalError;

/// Fixed sampling grid over `[0, duration]`, both endpoints included
#[derive(Debug, Clone, PartialEq)]
pub struct TimeBase {
    sample_count: usize,
    duration: f64,
    analysis_rate_hz: f64,
    instants: Vec<f64>,
}

impl TimeBase {
    /// Build a time base
    ///
    /// # Arguments
    /// * `sample_count` - Number of grid instants (at least 2)
    /// * `duration` - Window length in seconds
    /// * `analysis_rate_hz` - Effective sample rate assumed by spectral analysis
    ///
    /// # Errors
    /// `SignalError::InvalidTimeBase` when any parameter is non-positive or
    /// non-finite, or when the analysis length needs more bins than the grid has.
    pub fn new(
        sample_count: usize,
        duration: f64,
        analysis_rate_hz: f64,
    ) -> Result<Self, SignalError> {
        if sample_count < 2 {
            return Err(SignalError::InvalidTimeBase {
                reason: format!("sample_count must be at least 2 (got {})", sample_count),
            });
        }
        if !(duration.is_finite() && duration > 0.0) {
            return Err(SignalError::InvalidTimeBase {
                reason: format!("duration must be positive (got {})", duration),
            });
        }
        if !(analysis_rate_hz.is_finite() && analysis_rate_hz > 0.0) {
            return Err(SignalError::InvalidTimeBase {
                reason: format!("analysis rate must be positive (got {})", analysis_rate_hz),
            });
        }

        let analysis_len = (duration * analysis_rate_hz).round() as usize;
        if analysis_len < 2 || analysis_len / 2 > sample_count {
            return Err(SignalError::InvalidTimeBase {
                reason: format!(
                    "analysis length {} does not fit a grid of {} samples",
                    analysis_len, sample_count
                ),
            });
        }

        let step = duration / (sample_count - 1) as f64;
        let instants = (0..sample_count).map(|k| k as f64 * step).collect();

        Ok(Self {
            sample_count,
            duration,
            analysis_rate_hz,
            instants,
        })
    }

    pub fn from_config(config: &TimeBaseConfig) -> Result<Self, SignalError> {
        Self::new(
            config.sample_count,
            config.duration_secs,
            config.analysis_rate_hz,
        )
    }

    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Sample instants in seconds, ascending from 0 to `duration`
    pub fn instants(&self) -> &[f64] {
        &self.instants
    }

    pub fn analysis_rate_hz(&self) -> f64 {
        self.analysis_rate_hz
    }

    /// Analysis length N used for spectrum normalization (`duration * analysis_rate`)
    pub fn analysis_len(&self) -> usize {
        (self.duration * self.analysis_rate_hz).round() as usize
    }

    /// Number of one-sided spectrum bins (N / 2)
    pub fn spectrum_bins(&self) -> usize {
        self.analysis_len() / 2
    }

    /// Highest representable frequency
    pub fn nyquist_hz(&self) -> f64 {
        self.analysis_rate_hz / 2.0
    }

    /// Grid density in samples per second, used when rendering to audio files
    pub fn grid_rate_hz(&self) -> f64 {
        self.sample_count as f64 / self.duration
    }
}
