use assert_cmd::{cargo::cargo_bin_cmd, Command};
use serde_json::{json, Value};
use std::fs;
use std::path::PathBuf;
use std::process::Output;
use tempfile::TempDir;

/// Get a Command for tally
pub fn tally() -> Command {
    cargo_bin_cmd!("tally")
}

/// Extract a document ID from command output (first line)
pub fn extract_id(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

/// Setup a test store and return the directory
pub fn setup_test_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    tally()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();
    dir
}

fn item(id: &str, name: &str, score_type: &str, score_value: &str, point_value: f64) -> Value {
    json!({
        "id": id,
        "name": name,
        "scoreType": score_type,
        "scoreValue": score_value,
        "pointValue": point_value,
    })
}

/// The standard grading fixture: two categories, nine scorable leaves,
/// 12.5 possible points (bonus and penalty items excluded from the total)
#[allow(dead_code)]
pub fn fixture_rubric(id: &str) -> Value {
    let mut group = item("cat-1-item-0", "Report", "boolean", "points", 1.0);
    group["subItems"] = json!([
        item("cat-1-sub-0", "Sections complete", "full_half", "points", 1.0),
        item("cat-1-sub-1", "Formatted", "boolean", "points", 0.5),
    ]);

    json!({
        "id": id,
        "name": "Homework 1",
        "categories": [
            {
                "id": "cat-0",
                "name": "Correctness",
                "items": [
                    item("cat-0-item-0", "Compiles", "boolean", "points", 2.0),
                    item("cat-0-item-1", "Handles errors", "full_half", "points", 1.0),
                    item("cat-0-item-2", "Tests pass", "points", "points", 4.0),
                ],
            },
            {
                "id": "cat-1",
                "name": "Style",
                "items": [
                    group,
                    item("cat-1-item-1", "Naming", "full_half", "points", 2.0),
                    item("cat-1-item-2", "Comments", "points", "points", 2.0),
                    item("cat-1-item-3", "Extra credit", "points", "bonus", 2.0),
                    item("cat-1-item-4", "Late penalty", "points", "penalty", -1.0),
                ],
            },
        ],
    })
}

/// Write a rubric document straight into the store, bypassing the CLI
#[allow(dead_code)]
pub fn install_rubric(dir: &TempDir, rubric: &Value) -> String {
    let id = rubric["id"].as_str().expect("rubric id").to_string();
    let rubrics_dir = dir.path().join(".tally").join("rubrics");
    fs::create_dir_all(&rubrics_dir).unwrap();
    fs::write(
        rubrics_dir.join(format!("{}-fixture.json", id)),
        serde_json::to_string_pretty(rubric).unwrap(),
    )
    .unwrap();
    id
}

/// Path of the single rubric document in the store
#[allow(dead_code)]
pub fn sole_rubric_path(dir: &TempDir) -> PathBuf {
    let rubrics_dir = dir.path().join(".tally").join("rubrics");
    let mut paths: Vec<PathBuf> = fs::read_dir(&rubrics_dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    assert_eq!(paths.len(), 1, "expected exactly one rubric document");
    paths.remove(0)
}

/// Apply an in-place edit to the sole rubric document
#[allow(dead_code)]
pub fn edit_rubric(dir: &TempDir, edit: impl FnOnce(&mut Value)) {
    let path = sole_rubric_path(dir);
    let mut rubric: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    edit(&mut rubric);
    fs::write(&path, serde_json::to_string_pretty(&rubric).unwrap()).unwrap();
}

/// Start a score card for a rubric and return its ID
#[allow(dead_code)]
pub fn start_card(dir: &TempDir, rubric_id: &str) -> String {
    let output = tally()
        .current_dir(dir.path())
        .args(["start", rubric_id])
        .output()
        .unwrap();
    assert!(output.status.success(), "start failed: {:?}", output);
    extract_id(&output)
}

/// Run a command with `--format json` and parse stdout
#[allow(dead_code)]
pub fn stdout_json(dir: &TempDir, args: &[&str]) -> Value {
    let mut full_args = vec!["--format", "json"];
    full_args.extend_from_slice(args);
    let output = tally()
        .current_dir(dir.path())
        .args(&full_args)
        .output()
        .unwrap();
    assert!(output.status.success(), "command failed: {:?}", output);
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

/// Record a raw score on one item of a card
#[allow(dead_code)]
pub fn set_item_score(dir: &TempDir, score_id: &str, item_id: &str, score: f64) {
    tally()
        .current_dir(dir.path())
        .args([
            "set",
            score_id,
            "--item",
            item_id,
            "--score",
            &score.to_string(),
        ])
        .assert()
        .success();
}
