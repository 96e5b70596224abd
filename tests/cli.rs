use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn focusdesk(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("focusdesk").unwrap();
    cmd.env("FOCUSDESK_HOME", home.path())
        .env("FOCUSDESK_URL", "http://127.0.0.1:9")
        .env_remove("FOCUSDESK_EMAIL")
        .env_remove("FOCUSDESK_PASSWORD")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_lists_commands() {
    let home = TempDir::new().unwrap();
    focusdesk(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("focus"))
        .stdout(predicate::str::contains("objective"));
}

#[test]
fn completions_for_bash() {
    let home = TempDir::new().unwrap();
    focusdesk(&home)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("focusdesk"));
}

#[test]
fn config_path_follows_home() {
    let home = TempDir::new().unwrap();
    focusdesk(&home)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(home.path().to_string_lossy().as_ref()))
        .stdout(predicate::str::contains("config.yaml"));
}

#[test]
fn config_init_then_show() {
    let home = TempDir::new().unwrap();
    focusdesk(&home)
        .args(["config", "init"])
        .assert()
        .success();
    assert!(home.path().join("config.yaml").exists());

    focusdesk(&home)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    focusdesk(&home)
        .args(["config", "show", "-o", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"focus_minutes\": 25"))
        .stdout(predicate::str::contains("http://127.0.0.1:9"));
}

#[test]
fn blank_objective_is_rejected_before_any_request() {
    let home = TempDir::new().unwrap();
    focusdesk(&home)
        .args(["objective", "add", "1", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Objective text cannot be empty"));
}

#[test]
fn headless_run_needs_a_task() {
    let home = TempDir::new().unwrap();
    focusdesk(&home)
        .args(["focus", "run", "--headless"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--task is required"));
}

#[test]
fn invalid_duration_is_rejected() {
    let home = TempDir::new().unwrap();
    focusdesk(&home)
        .args(["focus", "run", "--headless", "--task", "1", "--focus", "soon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid focus duration"));
}

#[test]
fn oversized_duration_is_rejected() {
    let home = TempDir::new().unwrap();
    focusdesk(&home)
        .args(["focus", "run", "--headless", "--task", "1", "--focus", "9999999999999999h"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid focus duration"));
}
