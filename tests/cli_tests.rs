//! Integration tests for the tally CLI
//!
//! These tests run the tally binary and verify flags, exit codes, and
//! output formats.

use assert_cmd::{cargo::cargo_bin_cmd, Command};
use predicates::prelude::*;
use tempfile::tempdir;

/// Get a Command for tally
fn tally() -> Command {
    cargo_bin_cmd!("tally")
}

// ============================================================================
// Help and Version tests
// ============================================================================

#[test]
fn test_help_flag() {
    tally()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: tally"))
        .stdout(predicate::str::contains("Commands:"))
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("validate"))
        .stdout(predicate::str::contains("sync"));
}

#[test]
fn test_version_flag() {
    tally()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("tally"));
}

#[test]
fn test_subcommand_help() {
    tally()
        .args(["set", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Record a score or comment"));
}

#[test]
fn test_no_command_prints_blurb() {
    tally()
        .assert()
        .success()
        .stdout(predicate::str::contains("tally"))
        .stdout(predicate::str::contains("--help"));
}

// ============================================================================
// Exit code tests
// ============================================================================

#[test]
fn test_unknown_format_exit_code_2() {
    tally()
        .args(["--format", "invalid", "list"])
        .assert()
        .code(2);
}

#[test]
fn test_unknown_argument_json_usage_error() {
    tally()
        .args(["--format", "json", "list", "--bogus-flag"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("\"type\":\"usage_error\""));
}

#[test]
fn test_unknown_command_exit_code_2() {
    tally().arg("nonexistent").assert().code(2);
}

#[test]
fn test_missing_store_exit_code_3() {
    let dir = tempdir().unwrap();
    tally()
        .current_dir(dir.path())
        .arg("list")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("store not found"));
}

#[test]
fn test_missing_store_json_envelope() {
    let dir = tempdir().unwrap();
    tally()
        .current_dir(dir.path())
        .args(["--format", "json", "list"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("\"type\":\"store_not_found\""));
}

// ============================================================================
// Init command tests
// ============================================================================

#[test]
fn test_init_creates_store() {
    let dir = tempdir().unwrap();

    tally()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized tally store"));

    assert!(dir.path().join(".tally").exists());
    assert!(dir.path().join(".tally/rubrics").exists());
    assert!(dir.path().join(".tally/scores").exists());
    assert!(dir.path().join(".tally/courses").exists());
    assert!(dir.path().join(".tally/config.toml").exists());
}

#[test]
fn test_init_twice_fails() {
    let dir = tempdir().unwrap();

    tally()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    tally()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_init_visible() {
    let dir = tempdir().unwrap();

    tally()
        .current_dir(dir.path())
        .args(["init", "--visible"])
        .assert()
        .success();

    assert!(dir.path().join("tally").exists());
    assert!(!dir.path().join(".tally").exists());
}

#[test]
fn test_init_json_format() {
    let dir = tempdir().unwrap();

    tally()
        .current_dir(dir.path())
        .args(["--format", "json", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"status\": \"ok\""))
        .stdout(predicate::str::contains("\"store\""));
}

#[test]
fn test_init_at_explicit_store_path() {
    let dir = tempdir().unwrap();

    tally()
        .current_dir(dir.path())
        .args(["--store", "grading/data", "init"])
        .assert()
        .success();

    assert!(dir.path().join("grading/data/config.toml").exists());
}

// ============================================================================
// New command tests
// ============================================================================

#[test]
fn test_new_prints_id() {
    let dir = tempdir().unwrap();
    tally()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    tally()
        .current_dir(dir.path())
        .args(["new", "Homework 1"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("ty-"));
}

#[test]
fn test_new_with_categories_json() {
    let dir = tempdir().unwrap();
    tally()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    tally()
        .current_dir(dir.path())
        .args([
            "--format",
            "json",
            "new",
            "Homework 1",
            "--category",
            "Correctness",
            "--category",
            "Style",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\": \"Homework 1\""))
        .stdout(predicate::str::contains("\"name\": \"Correctness\""))
        .stdout(predicate::str::contains("\"name\": \"Style\""));
}

#[test]
fn test_new_writes_document() {
    let dir = tempdir().unwrap();
    tally()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    tally()
        .current_dir(dir.path())
        .args(["new", "Homework 1"])
        .assert()
        .success();

    let rubrics: Vec<_> = std::fs::read_dir(dir.path().join(".tally/rubrics"))
        .unwrap()
        .filter_map(|e| e.ok())
        .collect();
    assert_eq!(rubrics.len(), 1);
    let name = rubrics[0].file_name();
    let name = name.to_string_lossy();
    assert!(name.starts_with("ty-"), "unexpected filename {}", name);
    assert!(name.ends_with("-homework-1.json"), "unexpected filename {}", name);
}

// ============================================================================
// List command tests
// ============================================================================

#[test]
fn test_list_empty_store() {
    let dir = tempdir().unwrap();
    tally()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    tally()
        .current_dir(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No documents found"));
}

#[test]
fn test_list_shows_rubric_row() {
    let dir = tempdir().unwrap();
    tally()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();
    tally()
        .current_dir(dir.path())
        .args(["new", "Homework 1"])
        .assert()
        .success();

    tally()
        .current_dir(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("R ty-"))
        .stdout(predicate::str::contains("Homework 1"));

    // Kind filters
    tally()
        .current_dir(dir.path())
        .args(["list", "--scores"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Homework 1").not());
}

#[test]
fn test_list_since_filters_rows() {
    let dir = tempdir().unwrap();
    tally()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();
    tally()
        .current_dir(dir.path())
        .args(["new", "Homework 1"])
        .assert()
        .success();

    tally()
        .current_dir(dir.path())
        .args(["list", "--since", "2000-01-01T00:00:00Z"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Homework 1"));

    tally()
        .current_dir(dir.path())
        .args(["list", "--since", "2100-01-01T00:00:00Z"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No documents found"));
}

#[test]
fn test_list_rejects_bad_since() {
    let dir = tempdir().unwrap();
    tally()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    tally()
        .current_dir(dir.path())
        .args(["list", "--since", "not-a-date"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid --since date"));
}

#[test]
fn test_list_conflicting_filters_rejected() {
    let dir = tempdir().unwrap();
    tally()
        .current_dir(dir.path())
        .args(["list", "--rubrics", "--scores"])
        .assert()
        .code(2);
}

// ============================================================================
// Show command tests
// ============================================================================

#[test]
fn test_show_unknown_id() {
    let dir = tempdir().unwrap();
    tally()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    tally()
        .current_dir(dir.path())
        .args(["--format", "json", "show", "ty-missing1"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("\"type\":\"document_not_found\""));
}

// ============================================================================
// Global flag tests
// ============================================================================

#[test]
fn test_store_env_var() {
    let dir = tempdir().unwrap();
    tally()
        .current_dir(dir.path())
        .args(["init", "--visible"])
        .assert()
        .success();

    tally()
        .current_dir(dir.path())
        .env("TALLY_STORE", dir.path().join("tally"))
        .arg("list")
        .assert()
        .success();
}

#[test]
fn test_root_flag_resolves_store() {
    let dir = tempdir().unwrap();
    tally()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    // Run from elsewhere, pointing --root at the project
    tally()
        .args(["--root", dir.path().to_str().unwrap(), "list"])
        .assert()
        .success();
}
