// Melody Denoise - additive melody synthesis and spectral noise cancellation
// Batch DSP pipeline: score -> clean signal -> corrupted signal -> restored signal

// Module declarations
pub mod analysis;
pub mod config;
pub mod error;
pub mod noise;
pub mod pipeline;
pub mod render;
pub mod signal;
pub mod synthesis;

// Re-exports for convenience
pub use analysis::{SpectralAnalyzer, Spectrum};
pub use config::AppConfig;
pub use noise::{FixedNoise, NoiseCanceller, NoiseDescriptor, NoiseInjector, NoiseSource, RandomNoise};
pub use pipeline::{Pipeline, RunOutput, RunReport};
pub use signal::Signal;
pub use synthesis::{Note, Score, Synthesizer, TimeBase};
