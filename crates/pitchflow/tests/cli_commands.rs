use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn pitchflow_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_pitchflow"))
}

fn run_cli(home: &Path, args: &[&str]) -> Output {
    let mut cmd = Command::new(pitchflow_bin());
    cmd.args(args)
        .env("PITCHFLOW_HOME", home)
        .env_remove("PITCHFLOW_API_KEY")
        .env_remove("PITCHFLOW_CONFIG")
        .env_remove("RUST_LOG");
    cmd.output().expect("failed to execute pitchflow CLI")
}

fn assert_success(output: &Output, args: &[&str]) {
    assert!(
        output.status.success(),
        "command failed: {}\nstdout:\n{}\nstderr:\n{}",
        args.join(" "),
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
}

fn parse_json_output(output: &Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let json_start = stdout.find(['{', '[']).unwrap_or_else(|| {
        panic!(
            "no JSON payload found in output\nstdout:\n{}\nstderr:\n{}",
            stdout,
            String::from_utf8_lossy(&output.stderr)
        )
    });
    let mut deserializer = serde_json::Deserializer::from_str(&stdout[json_start..]);
    serde_json::Value::deserialize(&mut deserializer).expect("failed to parse JSON output")
}

fn write_records(dir: &Path, wins: i64) -> PathBuf {
    let path = dir.join("records.json");
    let records = serde_json::json!([{
        "id": 1,
        "name": "Dinamo",
        "league": "Liga 1",
        "season": 2023,
        "statistics": {"wins": wins, "draws": 4, "losses": 6}
    }]);
    fs::write(&path, serde_json::to_string_pretty(&records).unwrap()).unwrap();
    path
}

#[test]
fn test_schema_writes_file_and_prints_json() {
    let home = TempDir::new().unwrap();
    let input = home.path().join("events.csv");
    let output_path = home.path().join("schema.json");
    fs::write(
        &input,
        "Team Name!,minute,xG,kickoff\n\
         Dinamo,12,0.31,2024-08-01 18:30:00\n\
         Rapid,,0.05,2024-08-02 20:00:00\n",
    )
    .unwrap();

    let args = [
        "schema",
        "--input",
        input.to_str().unwrap(),
        "--output",
        output_path.to_str().unwrap(),
        "--json",
    ];
    let output = run_cli(home.path(), &args);
    assert_success(&output, &args);

    let printed = parse_json_output(&output);
    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output_path).unwrap()).unwrap();
    assert_eq!(printed, written);

    let types: Vec<(&str, &str)> = written
        .as_array()
        .unwrap()
        .iter()
        .map(|f| (f["name"].as_str().unwrap(), f["type"].as_str().unwrap()))
        .collect();
    assert_eq!(
        types,
        vec![
            ("Team_Name", "STRING"),
            ("minute", "FLOAT64"),
            ("xG", "FLOAT64"),
            ("kickoff", "TIMESTAMP"),
        ]
    );
    assert!(written
        .as_array()
        .unwrap()
        .iter()
        .all(|f| f["mode"] == "NULLABLE"));
}

#[test]
fn test_schema_missing_input_fails_without_output() {
    let home = TempDir::new().unwrap();
    let output_path = home.path().join("schema.json");
    let missing = home.path().join("missing.csv");

    let output = run_cli(
        home.path(),
        &[
            "schema",
            "--input",
            missing.to_str().unwrap(),
            "--output",
            output_path.to_str().unwrap(),
        ],
    );

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("not found"));
    assert!(!output_path.exists());
}

#[test]
fn test_schema_empty_file_is_failure() {
    let home = TempDir::new().unwrap();
    let input = home.path().join("empty.csv");
    let output_path = home.path().join("schema.json");
    fs::write(&input, "").unwrap();

    let output = run_cli(
        home.path(),
        &[
            "schema",
            "--input",
            input.to_str().unwrap(),
            "--output",
            output_path.to_str().unwrap(),
        ],
    );

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr)
        .contains("Schema inference failed or returned an empty schema."));
    assert!(!output_path.exists());
}

#[test]
fn test_handle_then_aggregate() {
    let home = TempDir::new().unwrap();
    let records = write_records(home.path(), 20);

    let args = [
        "handle",
        "--message",
        "job_started",
        "--records",
        records.to_str().unwrap(),
        "--json",
    ];
    let output = run_cli(home.path(), &args);
    assert_success(&output, &args);
    let aggregates = parse_json_output(&output);
    assert_eq!(aggregates[0]["team_name"], "Dinamo");
    assert_eq!(aggregates[0]["avg_wins"], 20.0);

    let raw_table = home
        .path()
        .join("warehouse/spatial-tempo-425409-i2/main_dataset/auto_upload_table.jsonl");
    assert_eq!(fs::read_to_string(raw_table).unwrap().lines().count(), 1);

    let args = ["aggregate", "--json"];
    let output = run_cli(home.path(), &args);
    assert_success(&output, &args);
    assert_eq!(parse_json_output(&output), aggregates);
}

#[test]
fn test_handle_envelope_file() {
    let home = TempDir::new().unwrap();
    let records = write_records(home.path(), 7);
    let envelope = home.path().join("envelope.json");
    fs::write(
        &envelope,
        r#"{"message": {"data": "am9iX3N0YXJ0ZWQ=", "messageId": "1"}, "subscription": "s"}"#,
    )
    .unwrap();

    let args = [
        "handle",
        "--envelope",
        envelope.to_str().unwrap(),
        "--records",
        records.to_str().unwrap(),
    ];
    let output = run_cli(home.path(), &args);
    assert_success(&output, &args);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("gs://frf-datacamp/auto-scraped-files/dinamo_statistics_2023_"));
    assert!(stdout.contains("Dinamo"));
}

#[test]
fn test_handle_unrecognized_message_is_ignored() {
    let home = TempDir::new().unwrap();
    let records = write_records(home.path(), 1);

    let args = [
        "handle",
        "--message",
        "hello",
        "--records",
        records.to_str().unwrap(),
    ];
    let output = run_cli(home.path(), &args);
    assert_success(&output, &args);
    assert!(String::from_utf8_lossy(&output.stdout).contains("Invalid pub/sub body"));
    assert!(!home.path().join("staging").exists());
}

#[test]
fn test_handle_unrecognized_message_skips_records() {
    let home = TempDir::new().unwrap();
    let missing = home.path().join("missing.json");

    let args = [
        "handle",
        "--message",
        "other",
        "--records",
        missing.to_str().unwrap(),
    ];
    let output = run_cli(home.path(), &args);
    assert_success(&output, &args);
    assert!(String::from_utf8_lossy(&output.stdout).contains("Invalid pub/sub body"));
}

#[test]
fn test_aggregate_before_any_load_fails() {
    let home = TempDir::new().unwrap();
    let output = run_cli(home.path(), &["aggregate"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Table not found"));
}

#[test]
fn test_fetch_without_api_key_fails() {
    let home = TempDir::new().unwrap();
    let output = run_cli(home.path(), &["fetch"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("PITCHFLOW_API_KEY"));
}

#[test]
fn test_config_prints_effective_values() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("pipeline.toml");
    fs::write(&config, "[storage]\nbucket = \"other-bucket\"\n").unwrap();

    let args = ["--config", config.to_str().unwrap(), "config"];
    let output = run_cli(home.path(), &args);
    assert_success(&output, &args);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("bucket = \"other-bucket\""));
    assert!(stdout.contains("dataset = \"main_dataset\""));
    assert!(stdout.contains("# API key: not set"));
}
