//! Integration tests for the `focuslist` CLI.
//!
//! Each test runs the binary against a task file and config inside a temp directory.

use std::fs;
use std::path::Path;
use std::process::Command;

/// Run `focuslist` with the given args, returning (stdout, stderr, success).
fn run(dir: &Path, args: &[&str]) -> (String, String, bool) {
    let tasks = dir.join("tasks.json");
    let config = dir.join("config.toml");
    let output = Command::new(env!("CARGO_BIN_EXE_focuslist"))
        .arg("--file")
        .arg(&tasks)
        .arg("--config")
        .arg(&config)
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to run focuslist");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

/// Run `focuslist` expecting success, return stdout.
fn run_ok(dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run(dir, args);
    if !success {
        panic!("focuslist {:?} failed:\nstdout: {}\nstderr: {}", args, stdout, stderr);
    }
    stdout
}

#[test]
fn add_list_and_stats() {
    let tmp = tempfile::TempDir::new().unwrap();

    let out = run_ok(tmp.path(), &["add", "Write report", "--category", "work", "--priority", "1"]);
    assert_eq!(out.trim(), "Added 1. [WOR][P1] Write report");
    run_ok(tmp.path(), &["add", "Read book", "-c", "Personal", "-p", "3"]);

    let out = run_ok(tmp.path(), &["list"]);
    assert_eq!(
        out,
        "1. [WOR][P1] Write report\n2. [PER][P3] Read book\n2 tasks • 0 done\n"
    );

    let out = run_ok(tmp.path(), &["stats"]);
    assert_eq!(out.trim(), "2 tasks • 0 done");
}

#[test]
fn add_uses_config_defaults() {
    let tmp = tempfile::TempDir::new().unwrap();
    fs::write(
        tmp.path().join("config.toml"),
        "default_category = \"Study\"\ndefault_priority = 3\n",
    )
    .unwrap();

    let out = run_ok(tmp.path(), &["add", "Revise notes"]);
    assert_eq!(out.trim(), "Added 1. [STU][P3] Revise notes");
}

#[test]
fn filtered_list_keeps_full_list_numbers() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_ok(tmp.path(), &["add", "Write report"]);
    run_ok(tmp.path(), &["add", "Read book"]);

    let out = run_ok(tmp.path(), &["list", "--query", "BOOK"]);
    assert!(out.starts_with("2. [PER][P2] Read book\n"));
    assert!(!out.contains("Write report"));
}

#[test]
fn done_and_delete_by_number() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_ok(tmp.path(), &["add", "Write report"]);
    run_ok(tmp.path(), &["add", "Read book"]);

    let out = run_ok(tmp.path(), &["done", "2"]);
    assert_eq!(out.trim(), "Marked 2 as done: Read book");
    let out = run_ok(tmp.path(), &["list"]);
    assert!(out.contains("2. [PER][P2] ✅ Read book"));
    assert!(out.ends_with("2 tasks • 1 done\n"));

    let out = run_ok(tmp.path(), &["delete", "1"]);
    assert_eq!(out.trim(), "Deleted: Write report");
    let out = run_ok(tmp.path(), &["stats"]);
    assert_eq!(out.trim(), "1 tasks • 1 done");
}

#[test]
fn bad_numbers_fail_without_touching_the_file() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_ok(tmp.path(), &["add", "Write report"]);
    let before = fs::read_to_string(tmp.path().join("tasks.json")).unwrap();

    let (_, _, success) = run(tmp.path(), &["done", "5"]);
    assert!(!success);
    let (_, _, success) = run(tmp.path(), &["delete", "0"]);
    assert!(!success);

    assert_eq!(fs::read_to_string(tmp.path().join("tasks.json")).unwrap(), before);
}

#[test]
fn empty_text_is_rejected() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_, _, success) = run(tmp.path(), &["add", "   "]);
    assert!(!success);
    assert!(!tmp.path().join("tasks.json").exists());
}

#[test]
fn corrupt_file_is_reported_not_overwritten() {
    let tmp = tempfile::TempDir::new().unwrap();
    fs::write(tmp.path().join("tasks.json"), "{ broken").unwrap();

    let (_, _, success) = run(tmp.path(), &["add", "Write report"]);
    assert!(!success);
    assert_eq!(fs::read_to_string(tmp.path().join("tasks.json")).unwrap(), "{ broken");
}

#[test]
fn upgrade_changes_nothing() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_ok(tmp.path(), &["upgrade"]);
    assert!(out.contains("FocusList Pro is not available yet."));
    assert!(!tmp.path().join("tasks.json").exists());
}

#[test]
fn dev_config_points_at_dev_task_file() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_ok(tmp.path(), &["--dev", "stats"]);

    let config = fs::read_to_string(tmp.path().join("config.toml")).unwrap();
    let tasks_line = config.lines().find(|l| l.starts_with("tasks_file")).unwrap();
    assert!(tasks_line.contains("focuslist-dev"), "{tasks_line}");
}
