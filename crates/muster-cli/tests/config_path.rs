//! Integration tests for the config commands.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

/// Test: config path honors MUSTER_HOME.
#[test]
fn test_config_path_honors_muster_home() {
    let temp = tempdir().unwrap();

    Command::cargo_bin("muster")
        .unwrap()
        .env("MUSTER_HOME", temp.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(temp.path().to_str().unwrap()))
        .stdout(predicate::str::contains("config.toml"));
}

/// Test: config init writes the template once.
#[test]
fn test_config_init_creates_file() {
    let temp = tempdir().unwrap();
    let config_path = temp.path().join("config.toml");

    Command::cargo_bin("muster")
        .unwrap()
        .env("MUSTER_HOME", temp.path())
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created"));

    assert!(config_path.exists(), "config.toml should exist");
    let contents = std::fs::read_to_string(&config_path).unwrap();
    assert!(contents.contains("export_path"));

    // Second init leaves the file alone.
    Command::cargo_bin("muster")
        .unwrap()
        .env("MUSTER_HOME", temp.path())
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}
