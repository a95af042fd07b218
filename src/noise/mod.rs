// Noise module - synthetic interference and its removal
//
// The injector corrupts a clean signal with unit sinusoids chosen by a
// NoiseSource; the canceller finds them again in the spectrum and subtracts
// a rebuilt estimate.

pub mod canceller;
pub mod injector;
pub mod source;

pub use canceller::{cancellation_threshold, Cancellation, DetectedNoise, NoiseCanceller};
pub use injector::NoiseInjector;
pub use source::{FixedNoise, NoiseDescriptor, NoiseSource, RandomNoise};
