#![allow(deprecated)] // cargo_bin deprecation - still works fine

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn cmd() -> Command {
    let mut c = Command::cargo_bin("wflint").expect("binary should exist");
    c.env("NO_COLOR", "1").env_remove("WFLINT_LOG");
    c
}

const CLEAN: &str = "name: CI
on: push
jobs:
  build:
    runs-on: ubuntu-latest
    steps:
      - uses: actions/checkout@v4
      - run: cargo test
";

fn workflows(temp: &TempDir) -> std::path::PathBuf {
    let dir = temp.path().join(".github/workflows");
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn clean_workflow_exits_success() {
    let temp = TempDir::new().unwrap();
    fs::write(workflows(&temp).join("ci.yml"), CLEAN).unwrap();

    cmd()
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("errors=0 warnings=0 files=1"));
}

#[test]
fn errors_exit_with_code_one() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("ci.yml");
    fs::write(&file, "on: push\njobs:\n  build:\n    runs-on:\n    steps:\n      - run: make\n").unwrap();

    cmd()
        .arg(&file)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("❲empty-runs-on❳"))
        .stdout(predicate::str::contains(":4"));
}

#[test]
fn warnings_pass_unless_strict() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("ci.yml");
    fs::write(&file, format!("{CLEAN}custom: 1\n")).unwrap();

    cmd().arg(&file).assert().success();
    cmd()
        .arg(&file)
        .arg("--strict")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("⟦error⟧"));
}

#[test]
fn no_documents_found_is_distinct_failure() {
    let temp = TempDir::new().unwrap();

    cmd()
        .arg(temp.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No workflow files found"));
}

#[test]
fn fix_rewrites_file_and_reports_clean() {
    let temp = TempDir::new().unwrap();
    let file = workflows(&temp).join("ci.yml");
    fs::write(
        &file,
        "on: push\njobs:\n\tbuild:\n\t\truns-on: ubuntu-latest\n\t\tsteps:\n\t\t\t- uses: actions/checkout@v2\n",
    )
    .unwrap();

    cmd()
        .arg(temp.path())
        .arg("--fix")
        .assert()
        .success()
        .stdout(predicate::str::contains("fixed:"))
        .stdout(predicate::str::contains("errors=0 warnings=0 files=1 fixed=1"));

    assert_eq!(
        fs::read_to_string(&file).unwrap(),
        "on: push\njobs:\n  build:\n    runs-on: ubuntu-latest\n    steps:\n      - uses: actions/checkout@v4\n"
    );
}

#[test]
fn json_output_is_machine_readable() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("ci.yml");
    fs::write(&file, "password: \"hunter2\"\n").unwrap();

    let out = cmd().arg(&file).arg("--json").assert().code(1).get_output().stdout.clone();
    let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(v["summary"]["files"], 1);
    assert_eq!(v["summary"]["errors"], 3);
    let rules: Vec<&str> = v["reports"][0]["diagnostics"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|d| d["rule"].as_str())
        .collect();
    assert_eq!(
        rules,
        vec!["missing-trigger", "missing-jobs", "unknown-top-level-key", "hardcoded-secret"]
    );
}

#[test]
fn config_file_disables_rules() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("wflint.toml"), "[rules]\ndisable = [\"unknown-top-level-key\"]\n").unwrap();
    fs::write(workflows(&temp).join("ci.yml"), format!("{CLEAN}custom: 1\n")).unwrap();

    cmd()
        .arg(temp.path())
        .arg("--strict")
        .assert()
        .success();
}

#[test]
fn empty_file_reports_single_error() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("empty.yml");
    fs::write(&file, "  \n").unwrap();

    cmd()
        .arg(&file)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("file is empty"))
        .stdout(predicate::str::contains("errors=1 warnings=0"));
}
