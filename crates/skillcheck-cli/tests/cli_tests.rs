//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn skillcheck() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("skillcheck").unwrap()
}

#[test]
fn init_creates_roster_and_data_dir() {
    let dir = TempDir::new().unwrap();

    skillcheck()
        .arg("init")
        .arg("--dir")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Created"))
        .stdout(predicate::str::contains("Imported starter roster"));

    assert!(dir.path().join("roster.toml").exists());
    assert!(dir.path().join("data").join("students.json").exists());
    assert!(dir.path().join("data").join("checklists.json").exists());
}

#[test]
fn init_refuses_to_overwrite() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("roster.toml"), "# mine").unwrap();

    skillcheck()
        .arg("init")
        .arg("--dir")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("refusing to overwrite"));
}

#[test]
fn validate_starter_roster() {
    let dir = TempDir::new().unwrap();
    skillcheck()
        .arg("init")
        .arg("--dir")
        .arg(dir.path())
        .assert()
        .success();

    skillcheck()
        .arg("validate")
        .arg("--roster")
        .arg(dir.path().join("roster.toml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("2 checklists"))
        .stdout(predicate::str::contains("Roster valid"));
}

#[test]
fn validate_flags_problems() {
    let dir = TempDir::new().unwrap();
    let roster = dir.path().join("roster.toml");
    std::fs::write(
        &roster,
        r#"
[[checklists]]
id = "c1"
title = "Empty"
subject_id = "missing"
year_level = "1"
steps = []
"#,
    )
    .unwrap();

    skillcheck()
        .arg("validate")
        .arg("--roster")
        .arg(&roster)
        .assert()
        .success()
        .stdout(predicate::str::contains("checklist has no steps"))
        .stdout(predicate::str::contains("unknown subject_id"))
        .stdout(predicate::str::contains("warning(s) found"));
}

#[test]
fn validate_nonexistent_file_fails() {
    skillcheck()
        .arg("validate")
        .arg("--roster")
        .arg("/no/such/roster.toml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn results_empty_data_dir() {
    let dir = TempDir::new().unwrap();

    skillcheck()
        .arg("results")
        .arg("--data-dir")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No assessment records found"));
}

#[test]
fn assess_requires_checklist_and_suggests() {
    let dir = TempDir::new().unwrap();
    skillcheck()
        .arg("init")
        .arg("--dir")
        .arg(dir.path())
        .assert()
        .success();

    skillcheck()
        .arg("assess")
        .arg("--data-dir")
        .arg(dir.path().join("data"))
        .arg("--student")
        .arg("s1")
        .arg("--assessor")
        .arg("a1")
        .arg("--scores")
        .arg("2,2")
        .arg("--pin")
        .arg("4321")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Available checklists"))
        .stderr(predicate::str::contains("--checklist is required"));
}

#[test]
fn assess_rejects_invalid_scores() {
    let dir = TempDir::new().unwrap();
    skillcheck()
        .arg("init")
        .arg("--dir")
        .arg(dir.path())
        .assert()
        .success();

    skillcheck()
        .arg("assess")
        .arg("--data-dir")
        .arg(dir.path().join("data"))
        .arg("--student")
        .arg("s1")
        .arg("--checklist")
        .arg("c-iv")
        .arg("--assessor")
        .arg("a1")
        .arg("--scores")
        .arg("2,3,1")
        .arg("--pin")
        .arg("4321")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid score 3"));
}

#[test]
fn osce_delete_session_requires_confirmation() {
    let dir = TempDir::new().unwrap();

    skillcheck()
        .args(["osce", "delete-session", "--data-dir"])
        .arg(dir.path())
        .args(["--session", "00000000-0000-0000-0000-000000000000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("pass --yes to confirm"));
}

#[test]
fn osce_list_empty() {
    let dir = TempDir::new().unwrap();

    skillcheck()
        .args(["osce", "list", "--data-dir"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No exams scheduled"));
}
