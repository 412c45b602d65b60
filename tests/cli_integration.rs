//! End-to-end tests for the `tablechat` binary
//!
//! Each test points the binary at its own temporary store directory and a
//! config path that does not exist, so only defaults and flags apply.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

mod common;

fn tablechat(store_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("tablechat").unwrap();
    cmd.env_remove("TABLECHAT_STORAGE_PATH")
        .env_remove("TABLECHAT_STORAGE_KEY")
        .env("NO_COLOR", "1")
        .arg("--config")
        .arg(store_dir.join("missing-config.yaml"))
        .arg("--storage-path")
        .arg(store_dir.join("store"))
        .arg("--no-delay");
    cmd
}

fn extract_session_id(stdout: &str) -> String {
    let start = stdout.find("session_").expect("output names a session");
    stdout[start..]
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}

#[test]
fn test_ask_prints_table_and_session() {
    let dir = TempDir::new().unwrap();

    tablechat(dir.path())
        .args(["ask", "Tell", "me", "about", "programming", "languages"])
        .assert()
        .success()
        .stdout(predicate::str::contains("JavaScript"))
        .stdout(predicate::str::contains("Year Created"))
        .stdout(predicate::str::contains("Session: session_"));
}

#[test]
fn test_sessions_list_shows_title_after_ask() {
    let dir = TempDir::new().unwrap();

    tablechat(dir.path())
        .args(["ask", "Which", "cloud", "provider", "leads", "the", "market"])
        .assert()
        .success();

    tablechat(dir.path())
        .args(["sessions", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Which cloud provider leads the"))
        .stdout(predicate::str::contains("market").not());
}

#[test]
fn test_follow_up_in_same_session_and_show() {
    let dir = TempDir::new().unwrap();

    let output = tablechat(dir.path())
        .args(["ask", "web", "framework", "picks"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let session_id = extract_session_id(&String::from_utf8_lossy(&output.stdout));

    tablechat(dir.path())
        .args(["ask", "--session", &session_id, "anything", "else?"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Data Analysis"));

    tablechat(dir.path())
        .args(["sessions", "show", &session_id])
        .assert()
        .success()
        .stdout(predicate::str::contains("web framework picks"))
        .stdout(predicate::str::contains("Svelte"))
        .stdout(predicate::str::contains("anything else?"));
}

#[test]
fn test_feedback_on_missing_message_is_not_an_error() {
    let dir = TempDir::new().unwrap();

    let output = tablechat(dir.path())
        .args(["ask", "hello"])
        .output()
        .unwrap();
    let session_id = extract_session_id(&String::from_utf8_lossy(&output.stdout));

    tablechat(dir.path())
        .args(["feedback", &session_id, "msg_missing", "like"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No answer msg_missing to rate"));
}

#[test]
fn test_ask_unknown_session_fails() {
    let dir = TempDir::new().unwrap();

    tablechat(dir.path())
        .args(["ask", "--session", "session_nope", "hello"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Session not found"));
}

#[test]
fn test_ephemeral_store_starts_empty() {
    let dir = TempDir::new().unwrap();

    tablechat(dir.path())
        .args(["--ephemeral", "sessions", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No conversation history found."));
    assert!(!dir.path().join("store").exists());
}

#[test]
fn test_invalid_config_is_rejected() {
    let (_config_dir, config_path) = common::temp_config_file("chat:\n  title_max_words: 0\n");
    let dir = TempDir::new().unwrap();

    let mut cmd = Command::cargo_bin("tablechat").unwrap();
    cmd.arg("--config")
        .arg(config_path)
        .arg("--storage-path")
        .arg(dir.path().join("store"))
        .args(["sessions", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("title_max_words must be greater than 0"));
}

#[test]
fn test_blank_session_id_does_not_pick_a_session() {
    let dir = TempDir::new().unwrap();

    tablechat(dir.path()).args(["ask", "hello"]).assert().success();

    tablechat(dir.path())
        .args(["ask", "--session", "", "follow", "up"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Session not found"));
}
