// JSON sink - collects labelled spectra into one document

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::analysis::Spectrum;
use crate::render::RenderSink;
use crate::signal::Signal;
use crate::synthesis::TimeBase;

#[derive(Serialize)]
struct LabeledSpectrum {
    label: String,
    #[serde(flatten)]
    spectrum: Spectrum,
}

#[derive(Default)]
pub struct SpectrumJsonSink {
    spectra: Vec<LabeledSpectrum>,
}

impl SpectrumJsonSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.spectra.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spectra.is_empty()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.spectra)?)
    }

    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?).with_context(|| format!("writing {}", path.display()))
    }
}

impl RenderSink for SpectrumJsonSink {
    fn accept_signal(&mut self, _label: &str, _time_base: &TimeBase, _signal: &Signal) {}

    fn accept_spectrum(&mut self, label: &str, spectrum: &Spectrum) {
        self.spectra.push(LabeledSpectrum {
            label: label.to_string(),
            spectrum: spectrum.clone(),
        });
    }
}
