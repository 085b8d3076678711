//! Smoke tests for the todomvc-e2e CLI
//!
//! Every run here uses the in-process driver, so no browser or server is
//! needed.

#![allow(deprecated)] // Command::cargo_bin is deprecated in newer assert_cmd
#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Get a command for the todomvc-e2e binary
fn todomvc_e2e() -> Command {
    let mut cmd = Command::cargo_bin("todomvc-e2e").expect("todomvc-e2e binary should exist");
    cmd.env_remove("TODOMVC_URL").env_remove("RUST_LOG");
    cmd
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_version_flag() {
    todomvc_e2e()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_help_lists_subcommands() {
    todomvc_e2e()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_no_args_fails() {
    todomvc_e2e().assert().failure();
}

// ============================================================================
// list
// ============================================================================

#[test]
fn test_list_prints_every_scenario() {
    let output = todomvc_e2e().arg("list").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.lines().count(), 11);
    assert!(stdout.contains("New Todo > should trim entered text"));
    assert!(stdout.contains("Item > should allow me to edit an item"));
}

#[test]
fn test_list_filter() {
    todomvc_e2e()
        .args(["list", "--filter", "MARK ALL"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Mark all as completed >"))
        .stdout(predicate::str::contains("New Todo").not());
}

// ============================================================================
// run
// ============================================================================

#[test]
fn test_run_memory_driver_passes() {
    todomvc_e2e()
        .args(["--color", "never", "run", "--driver", "memory"])
        .assert()
        .success()
        .stdout(predicate::str::contains("PASS New Todo > should allow me to add todo items"))
        .stdout(predicate::str::contains("PASSED 11 scenarios"));
}

#[cfg(not(feature = "browser"))]
#[test]
fn test_bare_run_uses_memory_driver() {
    todomvc_e2e()
        .args(["--color", "never", "run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("PASSED 11 scenarios"));
}

#[test]
fn test_run_help_names_browser_feature() {
    todomvc_e2e()
        .args(["run", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--features browser"));
}

#[test]
fn test_run_json_format() {
    let output = todomvc_e2e()
        .args(["run", "--driver", "memory", "--format", "json", "--filter", "item"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["driver"], "memory");
    let outcomes = report["outcomes"].as_array().unwrap();
    assert!(!outcomes.is_empty());
    assert!(outcomes.iter().all(|o| o["status"] == "passed"));
}

#[test]
fn test_run_writes_report_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("report.json");

    todomvc_e2e()
        .args(["-q", "run", "--driver", "memory", "--report"])
        .arg(&path)
        .assert()
        .success();

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(report["suite"], "TodoMVC - React");
    assert_eq!(report["outcomes"].as_array().unwrap().len(), 11);
}

#[test]
fn test_run_with_fixture_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("items.json");
    fs::write(
        &path,
        r#"{"items": ["walk the dog", "water the plants", "call mom"]}"#,
    )
    .unwrap();

    todomvc_e2e()
        .args(["run", "--driver", "memory", "--fixture"])
        .arg(&path)
        .assert()
        .success();
}

#[test]
fn test_run_rejects_short_fixture() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("items.json");
    fs::write(&path, r#"{"items": ["only one"]}"#).unwrap();

    todomvc_e2e()
        .args(["run", "--driver", "memory", "--fixture"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Fixture error"));
}

#[test]
fn test_run_config_file_driver() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("suite.yaml");
    fs::write(&path, "driver: memory\npoll_interval_ms: 10\n").unwrap();

    todomvc_e2e()
        .args(["run", "--config"])
        .arg(&path)
        .assert()
        .success();
}

#[test]
fn test_run_rejects_unknown_config_key() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("suite.yaml");
    fs::write(&path, "drivr: memory\n").unwrap();

    todomvc_e2e()
        .args(["run", "--config"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

// ============================================================================
// config
// ============================================================================

#[test]
fn test_config_prints_yaml() {
    let output = todomvc_e2e().arg("config").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let yaml: serde_yaml_ng::Value = serde_yaml_ng::from_str(&stdout).unwrap();
    assert_eq!(yaml["base_url"].as_str(), Some("http://localhost:8888"));
    assert_eq!(yaml["assertion_timeout_ms"].as_u64(), Some(4000));
}

#[test]
fn test_config_reads_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("suite.yaml");
    fs::write(&path, "base_url: http://localhost:3000\n").unwrap();

    todomvc_e2e()
        .args(["config", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("http://localhost:3000"));
}
