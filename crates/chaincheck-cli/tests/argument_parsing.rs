//! Focused CLI argument parsing tests.
//!
//! Tests that verify command-line argument parsing works correctly without
//! requiring any fixtures.

#![allow(deprecated)] // Command::cargo_bin is deprecated but replacement requires newer assert_cmd

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn chaincheck() -> Command {
    Command::cargo_bin("chaincheck").unwrap()
}

// ============================================================================
// Commands That Work Without Fixtures
// ============================================================================

#[test]
fn version_command_succeeds() {
    chaincheck()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("chaincheck"));
}

#[test]
fn version_flag_shows_version() {
    chaincheck()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("chaincheck"));
}

#[test]
fn help_flag_shows_usage() {
    chaincheck()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("chain"))
        .stdout(predicate::str::contains("trx"));
}

#[test]
fn config_prints_default_thresholds() {
    let temp = TempDir::new().unwrap();

    chaincheck()
        .args(["config", "--project-dir"])
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("[structural]"))
        .stdout(predicate::str::contains("min_length = 50"))
        .stdout(predicate::str::contains("window_minutes = 5"));
}

// ============================================================================
// Missing Replica Count
// ============================================================================

#[test]
fn chain_without_replicas_prints_instructions() {
    chaincheck()
        .arg("chain")
        .assert()
        .success()
        .stdout(predicate::str::contains("Running instructions"))
        .stdout(predicate::str::contains("chaincheck chain <replicas>"))
        .stdout(predicate::str::contains("\u{1b}[").not());
}

#[test]
fn trx_without_replicas_prints_instructions() {
    chaincheck()
        .args(["--no-color", "trx"])
        .assert()
        .success()
        .stdout(predicate::str::contains("chaincheck trx <replicas>"));
}

#[test]
fn no_command_prints_instructions_and_exits_cleanly() {
    chaincheck()
        .assert()
        .code(0)
        .stdout(predicate::str::contains("Running instructions"))
        .stdout(predicate::str::contains("chaincheck chain <replicas>"))
        .stdout(predicate::str::contains("chaincheck trx <replicas>"));
}

// ============================================================================
// Type Validation Errors
// ============================================================================

#[test]
fn invalid_replica_count_rejected() {
    chaincheck()
        .args(["chain", "three"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid"));
}

#[test]
fn zero_replicas_rejected() {
    chaincheck()
        .args(["trx", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid"));
}

#[test]
fn zero_window_rejected() {
    chaincheck()
        .args(["trx", "1", "--window-minutes", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid"));
}

// ============================================================================
// Unrecognized Commands/Arguments
// ============================================================================

#[test]
fn unrecognized_command_shows_error() {
    chaincheck()
        .arg("simulate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized"));
}

#[test]
fn unrecognized_flag_shows_error() {
    chaincheck()
        .args(["chain", "3", "--fast"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unexpected"));
}
