// WAV sink - mono 32-bit float files at the grid rate

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};

use crate::analysis::Spectrum;
use crate::render::RenderSink;
use crate::signal::Signal;
use crate::synthesis::TimeBase;

/// Write `signal` as a mono float WAV, scaled down if its peak exceeds 1
pub fn write_wav(path: &Path, time_base: &TimeBase, signal: &Signal) -> Result<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: time_base.grid_rate_hz().round() as u32,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };

    let peak = signal.peak();
    let gain = if peak > 1.0 { 1.0 / peak } else { 1.0 };

    let mut writer = hound::WavWriter::create(path, spec)
        .with_context(|| format!("creating {}", path.display()))?;
    for &sample in signal.samples() {
        writer
            .write_sample((sample * gain) as f32)
            .with_context(|| format!("writing {}", path.display()))?;
    }
    writer
        .finalize()
        .with_context(|| format!("finalizing {}", path.display()))?;

    tracing::debug!(
        "[WavSink] Wrote {} samples to {} (gain {:.3})",
        signal.len(),
        path.display(),
        gain
    );
    Ok(())
}

/// Writes every accepted signal to `<dir>/<label>.wav`
///
/// Failures are collected rather than returned so the sink stays opaque to
/// the caller; [`WavSink::finish`] reports them.
pub struct WavSink {
    dir: PathBuf,
    written: Vec<PathBuf>,
    failures: Vec<String>,
}

impl WavSink {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self {
            dir: dir.into(),
            written: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Paths written so far, or the first failure message
    pub fn finish(self) -> Result<Vec<PathBuf>> {
        match self.failures.into_iter().next() {
            Some(failure) => Err(anyhow!(failure)),
            None => Ok(self.written),
        }
    }
}

impl RenderSink for WavSink {
    fn accept_signal(&mut self, label: &str, time_base: &TimeBase, signal: &Signal) {
        let path = self.dir.join(format!("{label}.wav"));
        let result = fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating {}", self.dir.display()))
            .and_then(|_| write_wav(&path, time_base, signal));

        match result {
            Ok(()) => self.written.push(path),
            Err(err) => {
                tracing::error!("[WavSink] {:#}", err);
                self.failures.push(format!("{:#}", err));
            }
        }
    }

    fn accept_spectrum(&mut self, _label: &str, _spectrum: &Spectrum) {}
}
