//! Exit codes and output of the `simpl` binary.

use std::fs;
use std::process::Command;

const PIPELINE: &str = r#"{
  "name": "cli",
  "filters": [
    { "filter": "CreateDataContainer",
      "parameters": { "DataContainerName": { "type": "string", "value": "C" } } },
    { "filter": "CreateAttributeMatrix",
      "parameters": {
        "CreatedAttributeMatrix": { "type": "path", "value": "C/M" },
        "TupleDimensions": { "type": "dims", "value": [3] } } },
    { "filter": "CreateDataArray",
      "parameters": {
        "NewArray": { "type": "path", "value": "C/M/X" },
        "ScalarType": { "type": "numeric_type", "value": "int32" },
        "InitializationValue": { "type": "float", "value": 5.0 } } }
  ]
}"#;

fn simpl() -> Command {
    Command::new(env!("CARGO_BIN_EXE_simpl"))
}

#[test]
fn run_writes_output_and_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = dir.path().join("p.json");
    let output = dir.path().join("out.json");
    fs::write(&pipeline, PIPELINE).unwrap();

    let status = simpl()
        .arg("run")
        .arg(&pipeline)
        .arg("--output")
        .arg(&output)
        .status()
        .unwrap();
    assert_eq!(status.code(), Some(0));
    let text = fs::read_to_string(&output).unwrap();
    assert!(text.contains("\"int32\""));
}

#[test]
fn exhausted_time_limit_cancels_and_exits_two() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = dir.path().join("p.json");
    let output = dir.path().join("out.json");
    fs::write(&pipeline, PIPELINE).unwrap();

    let out = simpl()
        .arg("run")
        .arg(&pipeline)
        .arg("--time-limit-ms")
        .arg("0")
        .arg("--output")
        .arg(&output)
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("cancelled at filter 0 (CreateDataContainer)"));
    let text = fs::read_to_string(&output).unwrap();
    assert!(!text.contains("\"int32\""));
}

#[test]
fn generous_time_limit_completes() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = dir.path().join("p.json");
    fs::write(&pipeline, PIPELINE).unwrap();

    let status = simpl()
        .arg("run")
        .arg(&pipeline)
        .arg("--time-limit-ms")
        .arg("600000")
        .status()
        .unwrap();
    assert_eq!(status.code(), Some(0));
}

#[test]
fn failing_pipeline_exits_one_with_filter_and_code() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = dir.path().join("p.json");
    fs::write(
        &pipeline,
        r#"{ "name": "bad", "filters": [ { "filter": "DataContainerReader" } ] }"#,
    )
    .unwrap();

    let out = simpl().arg("run").arg(&pipeline).output().unwrap();
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("stopped at filter 0 (DataContainerReader) with code -387"));
}

#[test]
fn preflight_prints_structure() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = dir.path().join("p.json");
    fs::write(&pipeline, PIPELINE).unwrap();

    let out = simpl().arg("preflight").arg(&pipeline).output().unwrap();
    assert_eq!(out.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains('X'));
}

#[test]
fn filters_lists_core_filters() {
    let out = simpl().arg("filters").output().unwrap();
    assert_eq!(out.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("CreateDataArray"));
    assert!(stdout.contains("DataContainerReader"));
}
