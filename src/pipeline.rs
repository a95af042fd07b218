//! End-to-end run: synthesize, corrupt, restore, analyze.
//!
//! `Pipeline` owns the run's time base and tempo (built once from
//! configuration) and chains the synthesis, injection, and cancellation
//! stages. Results come back as a `RunOutput` that can be summarized into a
//! serializable `RunReport` or handed to a `RenderSink`.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::analysis::{SpectralAnalyzer, SpectralPeak, Spectrum};
use crate::config::AppConfig;
use crate::error::{log_score_error, log_signal_error};
use crate::noise::{
    Cancellation, DetectedNoise, NoiseCanceller, NoiseDescriptor, NoiseInjector, NoiseSource,
    RandomNoise,
};
use crate::render::RenderSink;
use crate::signal::Signal;
use crate::synthesis::{Score, ScoreFile, Synthesizer, Tempo, TimeBase};

/// Number of strongest bins listed per spectrum in reports
pub const REPORT_PEAKS: usize = 5;

pub struct Pipeline {
    config: AppConfig,
    time_base: TimeBase,
    tempo: Tempo,
}

impl Pipeline {
    pub fn new(config: AppConfig) -> Result<Self> {
        let time_base =
            TimeBase::from_config(&config.time_base).context("building time base")?;
        let tempo = Tempo::new(config.tempo.bpm).context("building tempo")?;
        Ok(Self {
            config,
            time_base,
            tempo,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn time_base(&self) -> &TimeBase {
        &self.time_base
    }

    pub fn tempo(&self) -> &Tempo {
        &self.tempo
    }

    /// Load and validate a JSON score against this run's tempo and time base
    pub fn load_score<P: AsRef<Path>>(&self, path: P) -> Result<Score> {
        let path = path.as_ref();
        let score = ScoreFile::load(path)
            .and_then(|file| file.into_score(&self.tempo, &self.time_base))
            .map_err(|err| {
                log_score_error(&err, "load_score");
                err
            })
            .with_context(|| format!("loading score {}", path.display()))?;
        Ok(score)
    }

    /// Random noise source from configuration; `seed` overrides the configured seed
    pub fn random_noise(&self, seed: Option<u64>) -> RandomNoise {
        let tone_count = self.config.noise.tone_count;
        match seed.or(self.config.noise.seed) {
            Some(seed) => RandomNoise::seeded(seed, tone_count),
            None => RandomNoise::from_entropy(tone_count),
        }
    }

    pub fn synthesize(&self, score: &Score) -> Result<Signal> {
        let synth = Synthesizer::from_config(&self.time_base, &self.config.tempo)?;
        Ok(synth.synthesize(score)?)
    }

    pub fn analyze(&self, signal: &Signal) -> Result<Spectrum> {
        Ok(SpectralAnalyzer::new(&self.time_base).analyze(signal)?)
    }

    /// Full flow: clean → corrupted → restored, with a spectrum for each
    pub fn run(&self, score: &Score, noise: &mut dyn NoiseSource) -> Result<RunOutput> {
        let canceller = NoiseCanceller::new(&self.time_base);
        let analyzer = canceller.analyzer();

        let clean = self.synthesize(score).context("synthesizing score")?;
        let clean_spectrum = analyzer.analyze(&clean)?;

        let descriptor = noise
            .descriptor(&self.time_base)
            .map_err(|err| {
                log_signal_error(&err, "noise_descriptor");
                err
            })
            .context("choosing noise frequencies")?;
        let corrupted = NoiseInjector::new(&self.time_base).inject(&clean, &descriptor)?;

        let cancellation = canceller
            .cancel_against_spectrum(&clean_spectrum, &corrupted)
            .map_err(|err| {
                log_signal_error(&err, "cancel_noise");
                err
            })
            .context("cancelling noise")?;
        let corrupted_spectrum = cancellation.corrupted_spectrum.clone();
        let restored_spectrum = analyzer.analyze(&cancellation.restored)?;

        tracing::info!(
            "[Pipeline] injected {:?} Hz, detected {:?} Hz",
            descriptor.frequencies(),
            cancellation.detected_frequencies()
        );

        Ok(RunOutput {
            time_base: self.time_base.clone(),
            descriptor,
            clean,
            corrupted,
            cancellation,
            clean_spectrum,
            corrupted_spectrum,
            restored_spectrum,
        })
    }
}

/// Every signal and spectrum produced by one run
pub struct RunOutput {
    pub time_base: TimeBase,
    pub descriptor: NoiseDescriptor,
    pub clean: Signal,
    pub corrupted: Signal,
    pub cancellation: Cancellation,
    pub clean_spectrum: Spectrum,
    pub corrupted_spectrum: Spectrum,
    pub restored_spectrum: Spectrum,
}

impl RunOutput {
    pub fn restored(&self) -> &Signal {
        &self.cancellation.restored
    }

    /// Hand the three signals and their spectra to `sink`
    pub fn emit(&self, sink: &mut dyn RenderSink) {
        sink.accept_signal("clean", &self.time_base, &self.clean);
        sink.accept_signal("corrupted", &self.time_base, &self.corrupted);
        sink.accept_signal("restored", &self.time_base, self.restored());
        sink.accept_spectrum("clean", &self.clean_spectrum);
        sink.accept_spectrum("corrupted", &self.corrupted_spectrum);
        sink.accept_spectrum("restored", &self.restored_spectrum);
    }

    pub fn report(&self) -> Result<RunReport> {
        Ok(RunReport {
            sample_count: self.time_base.sample_count(),
            duration_secs: self.time_base.duration(),
            nyquist_hz: self.time_base.nyquist_hz(),
            noise_frequencies: self.descriptor.frequencies().to_vec(),
            threshold: self.cancellation.threshold,
            noise_detected: self.cancellation.noise_detected(),
            detected_frequencies: self.cancellation.detected_frequencies(),
            detected: self.cancellation.detected.clone(),
            corrupted_error: self.corrupted.mean_abs_error(&self.clean)?,
            restored_error: self.restored().mean_abs_error(&self.clean)?,
            peaks: ReportPeaks {
                clean: self.clean_spectrum.peaks(REPORT_PEAKS),
                corrupted: self.corrupted_spectrum.peaks(REPORT_PEAKS),
                restored: self.restored_spectrum.peaks(REPORT_PEAKS),
            },
        })
    }
}

/// Serializable run summary
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub sample_count: usize,
    pub duration_secs: f64,
    pub nyquist_hz: f64,
    pub noise_frequencies: Vec<f64>,
    pub threshold: f64,
    pub noise_detected: bool,
    pub detected_frequencies: Vec<f64>,
    pub detected: Vec<DetectedNoise>,
    /// Mean absolute sample error of the corrupted signal against the clean one
    pub corrupted_error: f64,
    /// Mean absolute sample error of the restored signal against the clean one
    pub restored_error: f64,
    pub peaks: ReportPeaks,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportPeaks {
    pub clean: Vec<SpectralPeak>,
    pub corrupted: Vec<SpectralPeak>,
    pub restored: Vec<SpectralPeak>,
}
