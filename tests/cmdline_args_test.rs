//! Tests for the command-line tool
//!
//! These run the built binary with landmark frames on stdin or in a file and
//! check the JSON records it prints.

use serde_json::Value;
use std::io::Write;
use std::process::{Command, Output, Stdio};

const BIN: &str = env!("CARGO_BIN_EXE_face-direction");

fn run_with_stdin(args: &[&str], input: &str) -> Output {
    let mut child = Command::new(BIN)
        .args(args)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to start binary");
    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(input.as_bytes())
        .expect("Failed to write stdin");
    child.wait_with_output().expect("Failed to wait for binary")
}

fn records(output: &Output) -> Vec<Value> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(|line| serde_json::from_str(line).expect("stdout line is JSON"))
        .collect()
}

/// Unlabeled keypoint array with the nose landmarks at the default face mesh indices
fn mesh_line(x: f64, y: f64) -> String {
    let mut points = vec![serde_json::json!({"x": 0.0, "y": 0.0}); 280];
    points[1] = serde_json::json!({"x": x, "y": y});
    points[279] = serde_json::json!({"x": x - 20.0, "y": y + 50.0});
    points[49] = serde_json::json!({"x": x + 20.0, "y": y + 50.0});
    Value::from(points).to_string()
}

fn labeled_line(x: f64, y: f64) -> String {
    serde_json::json!({
        "keypoints": [
            {"x": x, "y": y, "name": "noseTip"},
            {"x": x - 20.0, "y": y + 50.0, "name": "leftNose"},
            {"x": x + 20.0, "y": y + 50.0, "name": "rightNose"},
        ]
    })
    .to_string()
}

#[test]
fn test_help_argument() {
    let output = Command::new(BIN).arg("--help").output().unwrap();
    assert!(output.status.success());
    let help = String::from_utf8_lossy(&output.stdout);
    for flag in ["--input", "--config", "--keys", "--debug", "--print-config"] {
        assert!(help.contains(flag), "help does not mention {flag}");
    }
}

#[test]
fn test_unknown_argument_fails() {
    let output = Command::new(BIN).arg("--camera").output().unwrap();
    assert!(!output.status.success());
}

#[test]
fn test_print_config_is_loadable() {
    let output = Command::new(BIN).arg("--print-config").output().unwrap();
    assert!(output.status.success());
    let config = face_direction::config::Config::from_yaml(&String::from_utf8_lossy(&output.stdout)).unwrap();
    assert_eq!(config, face_direction::config::Config::default());
}

#[test]
fn test_stdin_records() {
    let input = format!("{}\n{{oops\n{}\n", mesh_line(320.0, 240.0), mesh_line(100.0, 400.0));
    let output = run_with_stdin(&[], &input);
    assert!(output.status.success());

    let records = records(&output);
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["frame"], 0);
    assert_eq!(records[0]["bucket"]["horizontal"], "center");
    // The malformed line still takes a frame slot
    assert_eq!(records[1]["frame"], 2);
    assert_eq!(records[1]["at_ms"], 600);
    assert_eq!(records[1]["bucket"]["horizontal"], "left");
    assert_eq!(records[1]["bucket"]["vertical"], "down");
    assert_eq!(records[1]["changed"], true);
}

#[test]
fn test_keys_flag_emits_key_events() {
    let input = format!("{}\n{}\n", mesh_line(500.0, 240.0), mesh_line(500.0, 240.0));
    let output = run_with_stdin(&["--keys"], &input);
    assert!(output.status.success());

    let records = records(&output);
    let events: Vec<&Value> = records.iter().filter_map(|r| r.get("key_event")).collect();
    assert_eq!(events.len(), 6);
    assert_eq!(events[0]["type"], "keydown");
    assert_eq!(events[0]["key"], "r");
    assert_eq!(events[1]["key"], "ArrowRight");
    assert_eq!(events[1]["key_code"], 39);
    assert_eq!(events[5]["at_ms"], 300);
}

#[test]
fn test_input_file_with_config() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.yaml");
    std::fs::write(
        &config_path,
        "landmarks:\n  tip: noseTip\n  side_a: leftNose\n  side_b: rightNose\nthresholds:\n  left: 150.0\n",
    )
    .unwrap();
    let input_path = dir.path().join("frames.jsonl");
    std::fs::write(&input_path, format!("{}\n{}\n", labeled_line(200.0, 240.0), labeled_line(100.0, 240.0))).unwrap();

    let output = Command::new(BIN)
        .args(["-C", config_path.to_str().unwrap(), "--input", input_path.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(output.status.success());

    let records = records(&output);
    assert_eq!(records.len(), 2);
    // 200 is left of the default cutoff but not of the configured one
    assert_eq!(records[0]["bucket"]["horizontal"], "center");
    assert_eq!(records[1]["bucket"]["horizontal"], "left");
}

#[test]
fn test_bad_config_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.yaml");
    std::fs::write(&config_path, "thresholds: [not, a, map\n").unwrap();

    let output = run_with_stdin(&["-C", config_path.to_str().unwrap()], &format!("{}\n", mesh_line(320.0, 100.0)));
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Using defaults"));

    let records = records(&output);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["bucket"]["vertical"], "up");
}

#[test]
fn test_missing_input_file_fails() {
    let output = Command::new(BIN).args(["--input", "does/not/exist.jsonl"]).output().unwrap();
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}
