//! Output sinks for signals and spectra
//!
//! The processing core hands its results to a `RenderSink` and never reads
//! anything back. Plotting or playback front ends implement the trait
//! themselves; this module ships a WAV writer and a JSON spectrum collector.

mod json;
mod wav;

pub use json::SpectrumJsonSink;
pub use wav::{write_wav, WavSink};

use crate::analysis::Spectrum;
use crate::signal::Signal;
use crate::synthesis::TimeBase;

/// Opaque consumer of pipeline output
pub trait RenderSink {
    fn accept_signal(&mut self, label: &str, time_base: &TimeBase, signal: &Signal);

    fn accept_spectrum(&mut self, label: &str, spectrum: &Spectrum);
}
