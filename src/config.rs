//! Configuration management for run parameters
//!
//! This module provides runtime configuration loading from JSON files so the
//! sampling grid, tempo, and noise injection can be tuned without
//! recompilation. Missing or malformed files fall back to defaults that
//! reproduce the demo run (3 s at 12 * 1024 samples, 140 BPM, two noise tones).

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default location of the configuration file
pub const DEFAULT_CONFIG_PATH: &str = "assets/config.json";

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub time_base: TimeBaseConfig,
    #[serde(default)]
    pub tempo: TempoConfig,
    #[serde(default)]
    pub noise: NoiseConfig,
}

/// Sampling grid parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeBaseConfig {
    /// Length of the rendering window in seconds
    pub duration_secs: f64,
    /// Number of grid instants across the window (endpoints included)
    pub sample_count: usize,
    /// Effective sample rate assumed by spectral analysis; its half is the Nyquist limit
    pub analysis_rate_hz: f64,
}

impl Default for TimeBaseConfig {
    fn default() -> Self {
        Self {
            duration_secs: 3.0,
            sample_count: 12 * 1024,
            analysis_rate_hz: 1024.0,
        }
    }
}

/// Tempo and sequencing parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TempoConfig {
    /// Beats per minute
    pub bpm: f64,
    /// Silent gap between notes as a fraction of the smallest note unit
    pub gap_fraction: f64,
    /// Whether an empty score renders as silence (true) or is rejected
    pub allow_empty_score: bool,
}

impl Default for TempoConfig {
    fn default() -> Self {
        Self {
            bpm: 140.0,
            gap_fraction: 0.25,
            allow_empty_score: true,
        }
    }
}

/// Random noise injection parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoiseConfig {
    /// Number of interference tones drawn per run
    pub tone_count: usize,
    /// Fixed RNG seed; `None` draws from OS entropy
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            tone_count: 2,
            seed: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from JSON file
    ///
    /// # Arguments
    /// * `path` - Path to JSON config file
    ///
    /// # Returns
    /// The parsed configuration, or the defaults if the file doesn't exist or
    /// its JSON is invalid
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    log::info!("[Config] Loaded configuration from {:?}", path.as_ref());
                    config
                }
                Err(err) => {
                    log::warn!(
                        "[Config] Failed to parse JSON from {:?}: {}. Using defaults.",
                        path.as_ref(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!(
                    "[Config] Failed to read config file {:?}: {}. Using defaults.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        }
    }

    /// Load configuration from the default location
    pub fn load() -> Self {
        Self::load_from_file(DEFAULT_CONFIG_PATH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.time_base.duration_secs, 3.0);
        assert_eq!(config.time_base.sample_count, 12288);
        assert_eq!(config.time_base.analysis_rate_hz, 1024.0);
        assert_eq!(config.tempo.bpm, 140.0);
        assert_eq!(config.tempo.gap_fraction, 0.25);
        assert!(config.tempo.allow_empty_score);
        assert_eq!(config.noise.tone_count, 2);
        assert_eq!(config.noise.seed, None);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = AppConfig::default();
        let json = serde_json::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.time_base.sample_count, config.time_base.sample_count);
        assert_eq!(parsed.tempo.bpm, config.tempo.bpm);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let parsed: AppConfig =
            serde_json::from_str(r#"{"noise": {"tone_count": 3, "seed": 7}}"#).unwrap();
        assert_eq!(parsed.noise.tone_count, 3);
        assert_eq!(parsed.noise.seed, Some(7));
        assert_eq!(parsed.tempo.bpm, 140.0);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = AppConfig::load_from_file("/definitely/not/here.json");
        assert_eq!(config.time_base.sample_count, 12288);
    }
}
