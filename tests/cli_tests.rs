//! Integration tests for the CLI application
//!
//! These tests run the compiled binary against generated feature files.

use std::fs;
use std::io::Write;
use std::process::{Command, Output};
use tempfile::{NamedTempFile, TempDir};

/// Helper to create test data files
struct TestDataFiles {
    pub features_csv: NamedTempFile,
    pub malformed_csv: NamedTempFile,
    pub constant_column_csv: NamedTempFile,
}

impl TestDataFiles {
    fn new() -> std::io::Result<Self> {
        // Two separable classes, labels quoted the way the extractor writes them
        let mut features_csv = NamedTempFile::with_suffix(".csv")?;
        writeln!(features_csv, "centroid,rolloff,zcr,label")?;
        for i in 0..100 {
            let sign = if i % 2 == 0 { -1.0 } else { 1.0 };
            let label = if i % 2 == 0 { "A" } else { "B" };
            writeln!(
                features_csv,
                "{},{},{},\"{label}\"",
                sign * (1.0 + (i % 7) as f32 * 0.1),
                (i % 5) as f32 * 0.3,
                sign * 0.5 + (i % 3) as f32 * 0.2
            )?;
        }
        features_csv.flush()?;

        let mut malformed_csv = NamedTempFile::with_suffix(".csv")?;
        writeln!(malformed_csv, "centroid,label")?;
        writeln!(malformed_csv, "1.0,A")?;
        writeln!(malformed_csv, "not-a-number,B")?;
        malformed_csv.flush()?;

        let mut constant_column_csv = NamedTempFile::with_suffix(".csv")?;
        writeln!(constant_column_csv, "centroid,gain,label")?;
        for i in 0..40 {
            let sign = if i % 2 == 0 { -1.0 } else { 1.0 };
            let label = if i % 2 == 0 { "A" } else { "B" };
            writeln!(
                constant_column_csv,
                "{},0.5,{label}",
                sign * (1.0 + (i % 4) as f32 * 0.2)
            )?;
        }
        constant_column_csv.flush()?;

        Ok(TestDataFiles {
            features_csv,
            malformed_csv,
            constant_column_csv,
        })
    }
}

fn run_cli(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_au-learner"))
        .args(args)
        .output()
        .expect("Failed to run CLI")
}

#[test]
fn test_cli_trains_and_exports() {
    let test_data = TestDataFiles::new().expect("Failed to create test data");
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let model_path = temp_dir.path().join("model.json");

    let output = run_cli(&[
        "-i",
        test_data.features_csv.path().to_str().unwrap(),
        "-o",
        model_path.to_str().unwrap(),
    ]);

    assert!(
        output.status.success(),
        "Training failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(model_path.exists(), "Model file was not created");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("AU Features Learner v0.0.1"));
    assert!(stdout.contains("Learning W/ Features from: \""));
    assert!(stdout.contains("Exporting Model to: \""));
    assert!(stdout.contains("LinearSVC(C="));
    assert!(stdout.contains("Model Accuracy: "));
    assert!(stdout.contains("%\n"));

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&model_path).unwrap()).unwrap();
    assert_eq!(json["coef"].as_array().unwrap().len(), 1);
    assert_eq!(json["coef"][0].as_array().unwrap().len(), 3);
    assert_eq!(json["classes"]["0"], "A");
    assert_eq!(json["classes"]["1"], "B");
}

#[test]
fn test_cli_output_is_deterministic() {
    let test_data = TestDataFiles::new().expect("Failed to create test data");
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let first = temp_dir.path().join("first.json");
    let second = temp_dir.path().join("second.json");
    let input = test_data.features_csv.path().to_str().unwrap();

    assert!(run_cli(&["-i", input, "-o", first.to_str().unwrap()]).status.success());
    assert!(run_cli(&["-i", input, "-o", second.to_str().unwrap()]).status.success());

    assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
}

#[test]
fn test_cli_overwrites_existing_output() {
    let test_data = TestDataFiles::new().expect("Failed to create test data");
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let model_path = temp_dir.path().join("model.json");
    fs::write(&model_path, "stale content that is longer than nothing").unwrap();

    let output = run_cli(&[
        "-i",
        test_data.features_csv.path().to_str().unwrap(),
        "-o",
        model_path.to_str().unwrap(),
    ]);
    assert!(output.status.success());

    let content = fs::read_to_string(&model_path).unwrap();
    assert!(content.starts_with("{\n    \"intercept\""));
}

#[test]
fn test_cli_missing_required_options() {
    let test_data = TestDataFiles::new().expect("Failed to create test data");
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let model_path = temp_dir.path().join("model.json");

    // Missing -i
    let output = run_cli(&["-o", model_path.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Usage"), "Usage missing from: {stderr}");
    assert!(!model_path.exists());

    // Missing -o
    let output = run_cli(&["-i", test_data.features_csv.path().to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Usage"));
}

#[test]
fn test_cli_unknown_option() {
    let output = run_cli(&["-i", "in.csv", "-o", "out.json", "--bogus"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(!String::from_utf8_lossy(&output.stderr).is_empty());
}

#[test]
fn test_cli_help() {
    let output = run_cli(&["-h"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("AU Features Learner"));
    assert!(stdout.contains("-i"));
    assert!(stdout.contains("-o"));
    assert!(stdout.contains("-v"));
}

#[test]
fn test_cli_version() {
    let output = run_cli(&["-V"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("0.0.1"));
}

#[test]
fn test_cli_malformed_csv() {
    let test_data = TestDataFiles::new().expect("Failed to create test data");
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let model_path = temp_dir.path().join("model.json");

    let output = run_cli(&[
        "-i",
        test_data.malformed_csv.path().to_str().unwrap(),
        "-o",
        model_path.to_str().unwrap(),
    ]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Parse error"));
    assert!(!model_path.exists());
}

#[test]
fn test_cli_error_visible_with_logging_disabled() {
    let test_data = TestDataFiles::new().expect("Failed to create test data");
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let model_path = temp_dir.path().join("model.json");

    let output = Command::new(env!("CARGO_BIN_EXE_au-learner"))
        .env("RUST_LOG", "off")
        .args([
            "-i",
            test_data.malformed_csv.path().to_str().unwrap(),
            "-o",
            model_path.to_str().unwrap(),
        ])
        .output()
        .expect("Failed to run CLI");

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error: Parse error"));
}

#[test]
fn test_cli_constant_column() {
    let test_data = TestDataFiles::new().expect("Failed to create test data");
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let model_path = temp_dir.path().join("model.json");

    let output = run_cli(&[
        "-i",
        test_data.constant_column_csv.path().to_str().unwrap(),
        "-o",
        model_path.to_str().unwrap(),
    ]);

    assert!(
        output.status.success(),
        "Training failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(String::from_utf8_lossy(&output.stdout).contains("Model Accuracy: "));

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&model_path).unwrap()).unwrap();
    assert_eq!(json["normalisation"]["std"][1], 0.0);
    assert!(json["coef"][0][0].is_null());
    assert!(json["coef"][0][1].is_null());
    assert!(json["intercept"][0].is_null());
}

#[test]
fn test_cli_missing_input_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let model_path = temp_dir.path().join("model.json");
    let missing = temp_dir.path().join("missing.csv");

    let output = run_cli(&[
        "-i",
        missing.to_str().unwrap(),
        "-o",
        model_path.to_str().unwrap(),
    ]);

    assert_eq!(output.status.code(), Some(1));
    assert!(!model_path.exists());
}
