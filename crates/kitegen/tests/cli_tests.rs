//! Binary-level tests for the kitegen CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn bundled(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../pipelines")
        .join(name)
}

fn kitegen() -> Command {
    let mut cmd = Command::cargo_bin("kitegen").unwrap();
    cmd.env_remove("KITEGEN_IMAGE")
        .env_remove("RUST_LOG")
        .env_remove("KITEGEN_LOG_LEVEL")
        .env_remove("KITEGEN_LOG_FORMAT");
    cmd
}

#[test]
fn test_compile_bundled_stable() {
    let output = kitegen()
        .arg("compile")
        .arg(bundled("stable.yml"))
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let yaml = String::from_utf8(output).unwrap();
    let doc: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();

    let group = &doc["steps"][0];
    assert_eq!(group["group"].as_str(), Some("stable"));
    assert_eq!(group["steps"].as_sequence().map(Vec::len), Some(2));
    assert_eq!(group["steps"][0]["parallelism"].as_u64(), Some(2));
    assert_eq!(
        group["steps"][0]["retry"]["automatic"][0]["limit"].as_u64(),
        Some(3)
    );
    assert!(group["steps"][1].get("parallelism").is_none());
    assert!(group["steps"][1].get("retry").is_none());
}

#[test]
fn test_all_bundled_definitions_validate() {
    for name in ["stable.yml", "bench.yml", "local-cluster.yml"] {
        kitegen()
            .arg("validate")
            .arg(bundled(name))
            .assert()
            .success()
            .stdout(predicate::str::contains("0 errors"));
    }
}

#[test]
fn test_compile_is_byte_stable() {
    let run = || {
        kitegen()
            .arg("compile")
            .arg(bundled("local-cluster.yml"))
            .assert()
            .success()
            .get_output()
            .stdout
            .clone()
    };
    assert_eq!(run(), run());
}

#[test]
fn test_compile_then_check() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("pipeline.yml");

    kitegen()
        .arg("compile")
        .arg(bundled("bench.yml"))
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    kitegen()
        .arg("check")
        .arg(bundled("bench.yml"))
        .arg(&output)
        .assert()
        .success();

    kitegen()
        .arg("check")
        .arg(bundled("bench.yml"))
        .arg(&output)
        .env("KITEGEN_IMAGE", "example/ci:other")
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "+              image: \"example/ci:other\"",
        ));
}

#[test]
fn test_json_check_keeps_stdout_a_single_document() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("pipeline.yml");

    kitegen()
        .arg("compile")
        .arg(bundled("bench.yml"))
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    let stdout = kitegen()
        .arg("--json")
        .arg("check")
        .arg(bundled("bench.yml"))
        .arg(&output)
        .args(["--image", "x/y:1"])
        .assert()
        .code(1)
        .get_output()
        .stdout
        .clone();

    let envelope: serde_json::Value = serde_json::from_slice(&stdout).unwrap();
    assert_eq!(envelope["error"]["code"].as_str(), Some("stale"));
    let diff = envelope["error"]["diff"].as_str().unwrap();
    assert!(diff.contains("+              image: \"x/y:1\""));
    assert!(!diff.contains("a//"));
}

#[test]
fn test_invalid_yaml_names_the_file() {
    let dir = TempDir::new().unwrap();
    let definition = dir.path().join("misspelled.yml");
    fs::write(
        &definition,
        "groups:\n  - name: g\n    steps:\n      - { name: a, paralelism: 2 }\n",
    )
    .unwrap();

    let stdout = kitegen()
        .arg("--json")
        .arg("compile")
        .arg(&definition)
        .assert()
        .code(2)
        .get_output()
        .stdout
        .clone();

    let envelope: serde_json::Value = serde_json::from_slice(&stdout).unwrap();
    let message = envelope["error"]["message"].as_str().unwrap();
    assert!(message.contains("misspelled.yml"));
    assert!(message.contains("paralelism"));
}

#[test]
fn test_empty_group_fails_without_output() {
    let dir = TempDir::new().unwrap();
    let definition = dir.path().join("empty.yml");
    fs::write(&definition, "groups:\n  - name: nothing\n").unwrap();

    kitegen()
        .arg("compile")
        .arg(&definition)
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("nothing"));
}

#[test]
fn test_missing_field_json_error() {
    let dir = TempDir::new().unwrap();
    let definition = dir.path().join("broken.json");
    fs::write(
        &definition,
        r#"{"groups": [{"name": "g", "steps": [{"name": "a", "command": "a.sh", "timeout_in_minutes": 5}]}]}"#,
    )
    .unwrap();

    let output = kitegen()
        .arg("--json")
        .arg("compile")
        .arg(&definition)
        .assert()
        .code(2)
        .get_output()
        .stdout
        .clone();

    let envelope: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(envelope["status"].as_str(), Some("error"));
    assert_eq!(envelope["error"]["code"].as_str(), Some("config"));
    assert!(
        envelope["error"]["message"]
            .as_str()
            .unwrap()
            .contains("Missing required field 'agent_queue'")
    );
}

#[test]
fn test_missing_definition_file() {
    let output = kitegen()
        .args(["--json", "compile", "does-not-exist.yml"])
        .assert()
        .code(3)
        .get_output()
        .stdout
        .clone();

    let envelope: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(envelope["error"]["code"].as_str(), Some("other"));
    assert!(
        envelope["error"]["message"]
            .as_str()
            .unwrap()
            .contains("does-not-exist.yml")
    );
}

#[test]
fn test_env_command() {
    kitegen()
        .arg("env")
        .assert()
        .success()
        .stdout(predicate::str::contains("image: anzaxyz/ci:"))
        .stdout(predicate::str::contains("  BUILDKITE_AGENT_ACCESS_TOKEN\n"));
}
