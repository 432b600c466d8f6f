use assert_cmd::prelude::*;
use predicates::prelude::*;
use serde_json::Value;
use std::process::{Command, Output};
use tempfile::TempDir;

fn todo(temp: &TempDir) -> Command {
    let bin = assert_cmd::cargo::cargo_bin!("todo");
    let mut cmd = Command::new(bin.as_os_str());
    cmd.current_dir(temp.path())
        .env("HOME", temp.path())
        .env("TODO_DIR", temp.path().join(".todo"))
        .env_remove("TODO_JSON")
        .env_remove("TODO_DB")
        .env_remove("TODO_TODAY")
        .env_remove("TODO_LOG_FILE");
    cmd
}

fn run_json(temp: &TempDir, args: &[&str]) -> Value {
    let output = todo(temp)
        .args(args)
        .arg("--json")
        .output()
        .expect("run todo");
    assert!(output.status.success(), "todo {args:?} failed: {output:?}");
    serde_json::from_slice(&output.stdout).expect("valid JSON on stdout")
}

fn run_json_failure(temp: &TempDir, args: &[&str]) -> (Output, Value) {
    let output = todo(temp)
        .args(args)
        .arg("--json")
        .output()
        .expect("run todo");
    assert!(!output.status.success(), "todo {args:?} should fail");
    let json = serde_json::from_slice(&output.stdout).expect("error envelope on stdout");
    (output, json)
}

fn create_list(temp: &TempDir, name: &str) -> i64 {
    run_json(temp, &["list", "create", name])["id"]
        .as_i64()
        .expect("list id")
}

#[test]
fn test_list_create_and_show() {
    let temp = tempfile::tempdir().unwrap();

    let id = create_list(&temp, "Groceries");
    assert!(temp.path().join(".todo").join("tasks.db").exists());

    let lists = run_json(&temp, &["list", "show"]);
    let lists = lists.as_array().expect("array of summaries");
    assert_eq!(lists.len(), 1);
    assert_eq!(lists[0]["id"].as_i64(), Some(id));
    assert_eq!(lists[0]["name"].as_str(), Some("Groceries"));
    assert_eq!(lists[0]["total"].as_u64(), Some(0));
    assert!(lists[0]["nearest_due"].is_null());
}

#[test]
fn test_duplicate_list_exits_with_code_3() {
    let temp = tempfile::tempdir().unwrap();
    create_list(&temp, "Groceries");

    let (output, json) = run_json_failure(&temp, &["list", "create", "Groceries"]);
    assert_eq!(output.status.code(), Some(3));
    assert_eq!(json["error"]["code"].as_str(), Some("DUPLICATE"));

    let names = run_json(&temp, &["list", "names"]);
    assert_eq!(names["names"].as_array().map(Vec::len), Some(1));
}

#[test]
fn test_item_lifecycle() {
    let temp = tempfile::tempdir().unwrap();
    let home = create_list(&temp, "Home");
    let work = create_list(&temp, "Work");

    let item = run_json(
        &temp,
        &["item", "add", &home.to_string(), "Sweep", "--due", "01/03/2025"],
    );
    let item_id = item["id"].as_i64().expect("item id");
    assert_eq!(item["due_date"].as_str(), Some("2025-03-01"));
    assert_eq!(item["status"].as_u64(), Some(0));

    let done = run_json(&temp, &["item", "done", &item_id.to_string()]);
    assert_eq!(done["status"].as_u64(), Some(1));

    let listing = run_json(&temp, &["item", "ls", &home.to_string()]);
    assert_eq!(listing["total"].as_u64(), Some(1));
    assert_eq!(listing["completed"].as_u64(), Some(1));

    let moved = run_json(
        &temp,
        &["item", "mv", &item_id.to_string(), &work.to_string()],
    );
    assert_eq!(moved["list_id"].as_i64(), Some(work));

    let due = run_json(&temp, &["due", &work.to_string(), "--today", "2025-03-01"]);
    assert_eq!(due["nearest_due"].as_str(), Some("2025-03-01"));
    assert_eq!(due["due_state"].as_str(), Some("today"));

    let removed = run_json(&temp, &["item", "rm", &item_id.to_string()]);
    assert_eq!(removed["deleted"].as_bool(), Some(true));

    let listing = run_json(&temp, &["item", "ls", &work.to_string()]);
    assert_eq!(listing["total"].as_u64(), Some(0));
}

#[test]
fn test_duplicate_item_in_same_list_fails() {
    let temp = tempfile::tempdir().unwrap();
    let home = create_list(&temp, "Home");
    let work = create_list(&temp, "Work");

    run_json(&temp, &["item", "add", &home.to_string(), "Buy milk"]);
    run_json(&temp, &["item", "add", &work.to_string(), "Buy milk"]);

    let (output, json) = run_json_failure(&temp, &["item", "add", &home.to_string(), "Buy milk"]);
    assert_eq!(output.status.code(), Some(3));
    assert_eq!(json["error"]["code"].as_str(), Some("DUPLICATE"));
}

#[test]
fn test_invalid_due_date_is_validation_error() {
    let temp = tempfile::tempdir().unwrap();
    let home = create_list(&temp, "Home");

    let (output, json) = run_json_failure(
        &temp,
        &["item", "add", &home.to_string(), "Sweep", "--due", "2025-13-40"],
    );
    assert_eq!(output.status.code(), Some(2));
    assert_eq!(json["error"]["code"].as_str(), Some("VALIDATION_FAILED"));
}

#[test]
fn test_missing_item_is_not_found() {
    let temp = tempfile::tempdir().unwrap();
    create_list(&temp, "Home");

    let (output, json) = run_json_failure(&temp, &["item", "done", "999"]);
    assert_eq!(output.status.code(), Some(4));
    assert_eq!(json["error"]["code"].as_str(), Some("NOT_FOUND"));
}

#[test]
fn test_plain_output_and_error_hint() {
    let temp = tempfile::tempdir().unwrap();

    todo(&temp)
        .args(["list", "create", "Home"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Home"));

    todo(&temp)
        .args(["list", "create", "Home"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_quiet_suppresses_output() {
    let temp = tempfile::tempdir().unwrap();

    todo(&temp)
        .args(["list", "create", "Home", "--quiet"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_reset_requires_confirmation() {
    let temp = tempfile::tempdir().unwrap();
    create_list(&temp, "Home");

    let (output, _) = run_json_failure(&temp, &["reset"]);
    assert_eq!(output.status.code(), Some(2));

    let reset = run_json(&temp, &["reset", "--yes"]);
    assert_eq!(reset["lists_removed"].as_u64(), Some(1));

    let names = run_json(&temp, &["list", "names"]);
    assert_eq!(names["ids"].as_array().map(Vec::len), Some(0));
}

#[test]
fn test_schema_needs_no_database() {
    let temp = tempfile::tempdir().unwrap();

    let schema = run_json(&temp, &["schema", "task-item"]);
    assert_eq!(schema["tool"].as_str(), Some("todo"));
    assert!(!temp.path().join(".todo").join("tasks.db").exists());

    let tables = run_json(&temp, &["schema", "--tables"]);
    assert!(tables["tables"]["task_items"].is_array());
}
