// Spectrum - one-sided normalized magnitude spectrum
//
// Produced by the SpectralAnalyzer and never mutated afterwards. Frequencies
// and magnitudes are stored as parallel vectors of equal length.

use serde::Serialize;

/// Frequency-domain magnitude representation of a signal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Spectrum {
    frequencies: Vec<f64>,
    magnitudes: Vec<f64>,
}

/// One bin of a spectrum, identified by index
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpectralPeak {
    pub index: usize,
    pub frequency: f64,
    pub magnitude: f64,
}

impl Spectrum {
    pub(crate) fn new(frequencies: Vec<f64>, magnitudes: Vec<f64>) -> Self {
        debug_assert_eq!(frequencies.len(), magnitudes.len());
        Self {
            frequencies,
            magnitudes,
        }
    }

    /// Frequency axis in Hz, ascending from 0 to the Nyquist limit
    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    pub fn magnitudes(&self) -> &[f64] {
        &self.magnitudes
    }

    pub fn len(&self) -> usize {
        self.magnitudes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.magnitudes.is_empty()
    }

    pub fn frequency_of(&self, index: usize) -> Option<f64> {
        self.frequencies.get(index).copied()
    }

    /// `(frequency, magnitude)` pairs in bin order
    pub fn bins(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.frequencies
            .iter()
            .copied()
            .zip(self.magnitudes.iter().copied())
    }

    /// Largest magnitude over all bins (0 for an empty spectrum)
    pub fn max_magnitude(&self) -> f64 {
        self.magnitudes.iter().fold(0.0_f64, |acc, &m| acc.max(m))
    }

    /// Up to `count` strongest bins, strongest first
    pub fn peaks(&self, count: usize) -> Vec<SpectralPeak> {
        let mut peaks: Vec<SpectralPeak> = self
            .bins()
            .enumerate()
            .map(|(index, (frequency, magnitude))| SpectralPeak {
                index,
                frequency,
                magnitude,
            })
            .collect();
        peaks.sort_by(|a, b| b.magnitude.total_cmp(&a.magnitude));
        peaks.truncate(count);
        peaks
    }

    /// Bins whose magnitude is strictly above `threshold`
    pub fn bins_above(&self, threshold: f64) -> Vec<SpectralPeak> {
        self.bins()
            .enumerate()
            .filter(|(_, (_, magnitude))| *magnitude > threshold)
            .map(|(index, (frequency, magnitude))| SpectralPeak {
                index,
                frequency,
                magnitude,
            })
            .collect()
    }
}
