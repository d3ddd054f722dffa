//! CLI tests for the taskr binary
//!
//! Logs go under a temporary XDG_DATA_HOME so tests never touch the real one.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn taskr(data_home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("taskr").expect("binary builds");
    cmd.env("XDG_DATA_HOME", data_home.path())
        .env("HOME", data_home.path())
        .env("NO_COLOR", "1")
        .current_dir(data_home.path());
    cmd
}

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

#[test]
fn test_help_lists_commands() {
    let home = TempDir::new().unwrap();
    taskr(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("replay"))
        .stdout(predicate::str::contains("prompt"));
}

#[test]
fn test_replay_prints_tasks_in_order() {
    let home = TempDir::new().unwrap();
    taskr(&home)
        .args(["replay", &fixture("eggs.txt"), "--chunk-size", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1. Make scrambled eggs (Today)"))
        .stdout(predicate::str::contains("Whisk with a pinch of salt"))
        .stdout(predicate::str::contains("2. Eat a {healthy} breakfast (Daily)"))
        .stdout(predicate::str::contains("3. Buy eggs \"free range\" (Weekly)"))
        .stdout(predicate::str::contains("skipped:"))
        .stdout(predicate::str::contains("0/3 done, 1 skipped"))
        .stdout(predicate::str::contains("response cut off").not());
}

#[test]
fn test_replay_json_is_one_task_per_line() {
    let home = TempDir::new().unwrap();
    let output = taskr(&home)
        .args(["--format", "json", "replay", &fixture("eggs.txt"), "--chunk-size", "1"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let tasks: Vec<serde_json::Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert_eq!(tasks.len(), 3);
    assert_eq!(tasks[0]["task"], "Make scrambled eggs");
    assert_eq!(tasks[0]["components"].as_array().unwrap().len(), 2);
    assert_eq!(tasks[0]["steps"][2]["step"], "Cook on low heat, stirring");
    assert_eq!(tasks[2]["type"], "Weekly");
    assert!(tasks.iter().all(|t| t["completed"] == false));
}

#[test]
fn test_replay_missing_file_fails() {
    let home = TempDir::new().unwrap();
    taskr(&home)
        .args(["replay", "does-not-exist.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read recorded response"));
}

#[test]
fn test_prompt_renders_goal() {
    let home = TempDir::new().unwrap();
    taskr(&home)
        .args(["prompt", "make", "eggs"])
        .assert()
        .success()
        .stdout(predicate::str::contains("The goal is: make eggs"));
}

#[test]
fn test_prompt_uses_configured_template() {
    let home = TempDir::new().unwrap();
    let template = home.path().join("custom.pmt");
    std::fs::write(&template, "Plan for {{goal}}\n").unwrap();
    let config = home.path().join("taskr.yml");
    std::fs::write(&config, format!("prompt:\n  template: {}\n", template.display())).unwrap();

    taskr(&home)
        .args(["--config", config.to_str().unwrap(), "prompt", "run"])
        .assert()
        .success()
        .stdout("Plan for run\n");
}
