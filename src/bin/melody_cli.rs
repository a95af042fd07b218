use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use melody_denoise::analysis::SpectralPeak;
use melody_denoise::noise::cancellation_threshold;
use melody_denoise::pipeline::RunReport;
use melody_denoise::render::{write_wav, SpectrumJsonSink, WavSink};
use melody_denoise::{AppConfig, FixedNoise, NoiseSource, Pipeline};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(
    name = "melody_cli",
    about = "Synthesize a melody, inject tonal noise, and cancel it again"
)]
struct Cli {
    /// Configuration file (defaults to assets/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Raise log verbosity (-v info, -vv debug); logs go to stderr
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run synthesis, noise injection and cancellation, printing a JSON report
    Run {
        #[arg(long)]
        score: PathBuf,
        /// Seed for the random noise draw
        #[arg(long, conflicts_with = "noise")]
        seed: Option<u64>,
        /// Explicit noise frequencies in Hz, comma separated
        #[arg(long, value_delimiter = ',')]
        noise: Option<Vec<f64>>,
        /// Write clean/corrupted/restored WAV files into this directory
        #[arg(long)]
        wav_dir: Option<PathBuf>,
        /// Write all three spectra as JSON to this path
        #[arg(long)]
        spectra: Option<PathBuf>,
        /// Write the report here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
        /// Exit with code 2 when no noise was detected
        #[arg(long)]
        strict: bool,
    },
    /// Render the clean score to a WAV file
    Synthesize {
        #[arg(long)]
        score: PathBuf,
        #[arg(long)]
        wav: PathBuf,
    },
    /// Print the strongest spectral bins of the clean score
    Spectrum {
        #[arg(long)]
        score: PathBuf,
        #[arg(long, default_value_t = 10)]
        top: usize,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(1)
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = match &cli.config {
        Some(path) => AppConfig::load_from_file(path),
        None => AppConfig::load(),
    };
    let pipeline = Pipeline::new(config)?;

    match cli.command {
        Commands::Run {
            score,
            seed,
            noise,
            wav_dir,
            spectra,
            output,
            strict,
        } => run_pipeline(
            &pipeline,
            &score,
            seed,
            noise,
            RunOutputs {
                wav_dir,
                spectra,
                output,
            },
            strict,
        ),
        Commands::Synthesize { score, wav } => run_synthesize(&pipeline, &score, &wav),
        Commands::Spectrum { score, top } => run_spectrum(&pipeline, &score, top),
    }
}

struct RunOutputs {
    wav_dir: Option<PathBuf>,
    spectra: Option<PathBuf>,
    output: Option<PathBuf>,
}

fn run_pipeline(
    pipeline: &Pipeline,
    score_path: &Path,
    seed: Option<u64>,
    noise: Option<Vec<f64>>,
    outputs: RunOutputs,
    strict: bool,
) -> Result<ExitCode> {
    let score = pipeline.load_score(score_path)?;
    let mut source: Box<dyn NoiseSource> = match noise {
        Some(frequencies) => Box::new(FixedNoise::new(frequencies)),
        None => Box::new(pipeline.random_noise(seed)),
    };

    let output = pipeline.run(&score, source.as_mut())?;

    if let Some(dir) = outputs.wav_dir {
        let mut sink = WavSink::new(dir);
        output.emit(&mut sink);
        for path in sink.finish()? {
            tracing::info!("[CLI] wrote {}", path.display());
        }
    }
    if let Some(path) = outputs.spectra {
        let mut sink = SpectrumJsonSink::new();
        output.emit(&mut sink);
        sink.write(&path)?;
    }

    let report = output.report()?;
    let payload = RunPayload {
        score: &score_path.display().to_string(),
        report: &report,
    };
    emit_json(&payload, outputs.output)?;

    if strict && !report.noise_detected {
        return Ok(ExitCode::from(2));
    }
    Ok(ExitCode::from(0))
}

fn run_synthesize(pipeline: &Pipeline, score_path: &Path, wav: &Path) -> Result<ExitCode> {
    let score = pipeline.load_score(score_path)?;
    let clean = pipeline.synthesize(&score)?;
    write_wav(wav, pipeline.time_base(), &clean)?;
    println!("{}", wav.display());
    Ok(ExitCode::from(0))
}

fn run_spectrum(pipeline: &Pipeline, score_path: &Path, top: usize) -> Result<ExitCode> {
    let score = pipeline.load_score(score_path)?;
    let clean = pipeline.synthesize(&score)?;
    let spectrum = pipeline.analyze(&clean)?;

    let payload = SpectrumPayload {
        score: &score_path.display().to_string(),
        max_magnitude: spectrum.max_magnitude(),
        threshold: cancellation_threshold(&spectrum),
        peaks: spectrum.peaks(top),
    };
    emit_json(&payload, None)?;
    Ok(ExitCode::from(0))
}

fn emit_json<T: Serialize>(payload: &T, output_path: Option<PathBuf>) -> Result<()> {
    let json = serde_json::to_string_pretty(payload)?;

    if let Some(path) = output_path {
        fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    } else {
        println!("{json}");
    }

    Ok(())
}

#[derive(Serialize)]
struct RunPayload<'a> {
    score: &'a str,
    #[serde(flatten)]
    report: &'a RunReport,
}

#[derive(Serialize)]
struct SpectrumPayload<'a> {
    score: &'a str,
    max_magnitude: f64,
    threshold: f64,
    peaks: Vec<SpectralPeak>,
}
