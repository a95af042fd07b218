// Analysis module - frequency-domain view of signals
//
// The SpectralAnalyzer turns a time-domain Signal into a one-sided Spectrum.
// It is a pure mapping: the same signal always yields a bit-identical spectrum.

pub mod fft;
pub mod spectrum;

pub use fft::SpectralAnalyzer;
pub use spectrum::{SpectralPeak, Spectrum};
