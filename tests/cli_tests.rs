//! Binary-level tests for the Pomodoro Timer CLI.

use assert_cmd::Command;
use predicates::prelude::*;

fn cli() -> Command {
    let mut cmd = Command::cargo_bin("pomodoro-timer").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_subcommands() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("prefs"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn test_completions_bash() {
    cli()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pomodoro-timer"));
}

#[test]
fn test_prefs_show_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("prefs.json");

    cli()
        .args(["prefs", "show", "--file"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("theme:    darkly"))
        .stdout(predicate::str::contains("volume:   50%"));
}

#[test]
fn test_prefs_set_then_show() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("prefs.json");

    cli()
        .args(["prefs", "set", "--volume", "70", "--theme", "solar", "--file"])
        .arg(&file)
        .assert()
        .success();

    cli()
        .args(["prefs", "show", "--file"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("theme:    solar"))
        .stdout(predicate::str::contains("volume:   70%"));
}

#[test]
fn test_prefs_set_rejects_bad_volume() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("prefs.json");

    cli()
        .args(["prefs", "set", "--volume", "101", "--file"])
        .arg(&file)
        .assert()
        .failure();
    assert!(!file.exists());
}

#[test]
fn test_run_rejects_invalid_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("timer.json");
    std::fs::write(&config, r#"{"sessions_per_cycle": 0}"#).unwrap();

    cli()
        .args(["run", "--config"])
        .arg(&config)
        .write_stdin("q\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_run_quits_on_command() {
    let dir = tempfile::tempdir().unwrap();

    cli()
        .args(["run", "--seconds", "-w", "5", "--no-bell", "--prefs-file"])
        .arg(dir.path().join("prefs.json"))
        .write_stdin("i\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("WORK SESSION 00:00:05 (ready)"));
}

#[test]
fn test_run_asks_before_quitting_a_running_session() {
    let dir = tempfile::tempdir().unwrap();

    cli()
        .args(["run", "--no-bell", "--prefs-file"])
        .arg(dir.path().join("prefs.json"))
        .write_stdin("s\nq\nn\nq\ny\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Quit anyway? [y/N]"))
        .stdout(predicate::str::contains("Quit cancelled"));
}
