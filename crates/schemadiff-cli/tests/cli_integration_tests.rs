//! CLI integration tests
//!
//! Run the built `schemadiff` binary against snapshot files in a temp dir.

use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

const USERS: &str = r#"{
  "tables": [
    {"id": "t1", "name": "users", "fields": [
      {"id": "f1", "name": "id", "type": {"id": "INT", "name": "int"}, "primaryKey": true}
    ]}
  ]
}"#;

const USERS_RENAMED: &str = r#"{
  "tables": [
    {"id": "t1", "name": "users", "fields": [
      {"id": "f1", "name": "user_id", "type": {"id": "INT", "name": "int"}, "primaryKey": true}
    ]},
    {"id": "t2", "name": "posts"}
  ]
}"#;

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn run(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_schemadiff"))
        .current_dir(dir)
        .env("RUST_LOG", "off")
        .args(args)
        .output()
        .expect("Failed to execute CLI")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_cli_diff_json() {
    let temp_dir = TempDir::new().unwrap();
    let old = write(&temp_dir, "old.json", USERS);
    let new = write(&temp_dir, "new.json", USERS_RENAMED);

    let output = run(
        temp_dir.path(),
        &["diff", old.to_str().unwrap(), new.to_str().unwrap()],
    );

    assert!(
        output.status.success(),
        "Stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["diffMap"]["field-name-f1"]["newValue"], "user_id");
    assert_eq!(json["diffMap"]["table-t2"]["kind"], "table_added");
    assert_eq!(json["changedTables"]["t1"], true);
}

#[test]
fn test_cli_diff_summary() {
    let temp_dir = TempDir::new().unwrap();
    let old = write(&temp_dir, "old.json", USERS);
    let new = write(&temp_dir, "new.json", USERS_RENAMED);

    let output = run(
        temp_dir.path(),
        &[
            "diff",
            old.to_str().unwrap(),
            new.to_str().unwrap(),
            "--format",
            "summary",
        ],
    );

    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.starts_with("## Schema Diff"));
    assert!(text.contains("### Table `t1`"));
}

#[test]
fn test_cli_diff_identical_files_is_empty() {
    let temp_dir = TempDir::new().unwrap();
    let old = write(&temp_dir, "old.json", USERS);

    let output = run(
        temp_dir.path(),
        &[
            "diff",
            old.to_str().unwrap(),
            old.to_str().unwrap(),
            "--format",
            "summary",
        ],
    );

    assert!(output.status.success());
    assert!(stdout(&output).contains("_No changes detected._"));
}

#[test]
fn test_cli_check_reports_integrity_problems() {
    let temp_dir = TempDir::new().unwrap();
    let good = write(&temp_dir, "good.json", USERS);
    let bad = write(
        &temp_dir,
        "bad.json",
        r#"{"tables": [{"id": "t1", "name": "a"}, {"id": "t1", "name": "b"}]}"#,
    );

    let ok = run(temp_dir.path(), &["check", good.to_str().unwrap()]);
    assert!(ok.status.success());
    assert!(stdout(&ok).contains("OK: 1 tables, 1 fields, 0 relationships"));

    let failed = run(temp_dir.path(), &["check", bad.to_str().unwrap()]);
    assert!(!failed.status.success());
    assert!(String::from_utf8_lossy(&failed.stderr).contains("duplicate table id 't1'"));
}

#[test]
fn test_cli_commit_and_head() {
    let temp_dir = TempDir::new().unwrap();
    let file = write(&temp_dir, "schema.json", USERS);
    let db = temp_dir.path().join("ledger").join("store.db");
    let db_arg = db.to_str().unwrap();

    let committed = run(
        temp_dir.path(),
        &["commit", file.to_str().unwrap(), "--db", db_arg],
    );
    assert!(
        committed.status.success(),
        "Stderr: {}",
        String::from_utf8_lossy(&committed.stderr)
    );
    assert!(stdout(&committed).contains("Snapshot committed"));

    let unchanged = run(
        temp_dir.path(),
        &["commit", file.to_str().unwrap(), "--db", db_arg, "--incremental"],
    );
    assert!(stdout(&unchanged).contains("Snapshot unchanged"));

    let conn = Connection::open(&db).unwrap();
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM snapshots", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1, "Expected one snapshot in database");

    let head = run(temp_dir.path(), &["head", "--db", db_arg]);
    let json: serde_json::Value = serde_json::from_str(&stdout(&head)).unwrap();
    assert_eq!(json["tables"][0]["name"], "users");
}

#[test]
fn test_cli_config_sets_commit_mode() {
    let temp_dir = TempDir::new().unwrap();
    let file = write(&temp_dir, "schema.json", USERS);
    let config = write(&temp_dir, "schemadiff.yaml", "commit_mode: incremental\n");
    let db = temp_dir.path().join("store.db");

    for _ in 0..2 {
        let output = run(
            temp_dir.path(),
            &[
                "--config",
                config.to_str().unwrap(),
                "commit",
                file.to_str().unwrap(),
                "--db",
                db.to_str().unwrap(),
            ],
        );
        assert!(output.status.success());
    }

    let conn = Connection::open(&db).unwrap();
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM snapshots", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn test_cli_invalid_config_fails() {
    let temp_dir = TempDir::new().unwrap();
    let file = write(&temp_dir, "schema.json", USERS);
    let config = write(&temp_dir, "bad.yaml", "debounce_ms: 0\n");

    let output = run(
        temp_dir.path(),
        &["--config", config.to_str().unwrap(), "check", file.to_str().unwrap()],
    );

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("debounce_ms"));
}

#[test]
fn test_cli_head_on_empty_ledger() {
    let temp_dir = TempDir::new().unwrap();
    let output = run(temp_dir.path(), &["head", "--db", "store.db"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("No snapshot committed"));
}
