use std::fs;
use std::path::PathBuf;
use std::process::Command;

use serde_json::Value;

fn cli() -> Command {
    Command::new(env!("CARGO_BIN_EXE_melody_cli"))
}

fn asset(parts: &[&str]) -> String {
    parts
        .iter()
        .fold(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets"), |p, part| {
            p.join(part)
        })
        .to_string_lossy()
        .into_owned()
}

fn config_args() -> [String; 2] {
    ["--config".to_string(), asset(&["config.json"])]
}

#[test]
fn run_with_fixed_noise_reports_detection() {
    let output = cli()
        .args(config_args())
        .args(["run", "--score", asset(&["scores", "pirates.json"]).as_str()])
        .args(["--noise", "300,450"])
        .output()
        .expect("failed to run melody_cli run");
    assert!(
        output.status.success(),
        "CLI exited with {:?}",
        output.status.code()
    );

    let stdout = String::from_utf8(output.stdout).expect("stdout UTF-8");
    let json: Value = serde_json::from_str(stdout.trim()).expect("run report JSON payload");
    assert_eq!(json["noise_detected"], true);
    assert_eq!(json["threshold"], 1.0);
    let detected: Vec<f64> = json["detected_frequencies"]
        .as_array()
        .expect("detected_frequencies array")
        .iter()
        .map(|v| v.as_f64().unwrap())
        .collect();
    assert_eq!(detected, vec![300.0, 450.0]);
    assert!(json["restored_error"].as_f64().unwrap() < 1e-9);
}

#[test]
fn run_with_seed_is_reproducible() {
    let run = || {
        let output = cli()
            .args(config_args())
            .args(["run", "--score", asset(&["scores", "pirates.json"]).as_str()])
            .args(["--seed", "11"])
            .output()
            .expect("failed to run seeded melody_cli run");
        assert!(output.status.success());
        let json: Value = serde_json::from_slice(&output.stdout).expect("JSON payload");
        json["noise_frequencies"].clone()
    };
    assert_eq!(run(), run());
}

#[test]
fn run_writes_wavs_and_spectra() {
    let dir = std::env::temp_dir().join(format!("melody_cli_out_{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    let spectra = dir.join("spectra.json");

    let output = cli()
        .args(config_args())
        .args(["run", "--score", asset(&["scores", "pirates.json"]).as_str()])
        .args(["--noise", "250"])
        .arg("--wav-dir")
        .arg(&dir)
        .arg("--spectra")
        .arg(&spectra)
        .output()
        .expect("failed to run melody_cli with outputs");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    for name in ["clean.wav", "corrupted.wav", "restored.wav"] {
        assert!(dir.join(name).exists(), "missing {}", name);
    }
    let json: Value =
        serde_json::from_str(&fs::read_to_string(&spectra).expect("spectra file")).unwrap();
    assert_eq!(json.as_array().map(|a| a.len()), Some(3));

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn spectrum_lists_peaks() {
    let output = cli()
        .args(config_args())
        .args(["spectrum", "--score", asset(&["scores", "pirates.json"]).as_str()])
        .args(["--top", "3"])
        .output()
        .expect("failed to run melody_cli spectrum");
    assert!(output.status.success());

    let json: Value = serde_json::from_slice(&output.stdout).expect("spectrum JSON payload");
    assert_eq!(json["peaks"].as_array().unwrap().len(), 3);
    assert_eq!(json["threshold"], 1.0);
}

#[test]
fn out_of_band_noise_is_an_error() {
    let output = cli()
        .args(config_args())
        .args(["run", "--score", asset(&["scores", "pirates.json"]).as_str()])
        .args(["--noise", "900"])
        .output()
        .expect("failed to run melody_cli");
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).expect("stderr UTF-8");
    assert!(stderr.contains("Noise frequency"), "unexpected stderr: {stderr}");
}

#[test]
fn missing_score_is_an_error() {
    let output = cli()
        .args(["run", "--score", "/definitely/not/here.json"])
        .output()
        .expect("failed to run melody_cli");
    assert_eq!(output.status.code(), Some(1));
}
