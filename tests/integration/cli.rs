//! The `inliner` binary.

use assert_cmd::Command;
use inline_imports::test_utils::TestProject;
use predicates::prelude::*;

fn inliner(project: &TestProject) -> Command {
    let mut cmd = Command::cargo_bin("inliner").unwrap();
    cmd.current_dir(project.root()).env_remove("RUST_LOG");
    cmd
}

fn project() -> TestProject {
    let project = TestProject::new().unwrap();
    project.write("lib.txt", "line one\nline two\n").unwrap();
    project.write("src.txt", "header\n@import \"./lib.txt\";\nfooter\n").unwrap();
    project
}

#[test]
fn test_resolve_to_stdout() {
    let project = project();

    inliner(&project)
        .args(["--quiet", "resolve", "src.txt"])
        .assert()
        .success()
        .stdout("header\nline one\nline two\n\nfooter\n");
}

#[test]
fn test_resolve_streamed_to_out_dir() {
    let project = project();
    project.write("pages/a.txt", "import '../lib.txt'").unwrap();

    inliner(&project)
        .args(["resolve", "src.txt", "pages/*.txt", "--stream", "--out-dir", "dist"])
        .assert()
        .success();

    assert_eq!(project.read("dist/src.txt").unwrap(), "header\nline one\nline two\n\nfooter\n");
    assert_eq!(project.read("dist/pages/a.txt").unwrap(), "line one\nline two\n");
}

#[test]
fn test_missing_dependency_fails_only_that_file() {
    let project = project();
    project.write("broken.txt", "@import \"./nope.txt\";").unwrap();

    inliner(&project)
        .args(["-q", "resolve", "*.txt", "--out-dir", "dist"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope.txt"))
        .stderr(predicate::str::contains("1 of 3 file(s) failed"));

    assert!(project.path("dist/src.txt").exists());
    assert!(!project.path("dist/broken.txt").exists());
}

#[test]
fn test_config_file_is_honoured() {
    let project = project();
    project.write("inliner.toml", "pattern = '<<(.+)>>'\n").unwrap();
    project.write("custom.txt", "<<lib.txt>>").unwrap();

    inliner(&project)
        .args(["-q", "resolve", "custom.txt"])
        .assert()
        .success()
        .stdout("line one\nline two\n");
}

#[test]
fn test_unknown_config_key_is_rejected() {
    let project = project();
    project.write("other.toml", "recursve = true\n").unwrap();

    inliner(&project)
        .args(["-q", "--config", "other.toml", "resolve", "src.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("recursve"));
}

#[test]
fn test_update_emits_dependents() {
    let project = project();
    project.write("other.txt", "import 'lib.txt'").unwrap();

    inliner(&project)
        .args([
            "-q",
            "update",
            "lib.txt",
            "--files",
            "src.txt",
            "other.txt",
            "--dependency-output",
            "dependant",
            "--out-dir",
            "dist",
        ])
        .assert()
        .success();

    assert_eq!(project.read("dist/other.txt").unwrap(), "line one\nline two\n");
    assert!(project.path("dist/src.txt").exists());
    assert!(!project.path("dist/lib.txt").exists());
}

#[test]
fn test_update_primary_policy_prints_changed_file() {
    let project = project();

    inliner(&project)
        .args(["-q", "update", "lib.txt", "--files", "*.txt"])
        .assert()
        .success()
        .stdout("line one\nline two\n");
}

#[test]
fn test_deps_lists_dependents() {
    let project = project();
    project.write("other.txt", "import 'lib.txt'").unwrap();

    inliner(&project)
        .args(["-q", "deps", "*.txt"])
        .env("NO_COLOR", "1")
        .assert()
        .success()
        .stdout(predicate::str::contains("lib.txt\n  <- other.txt\n  <- src.txt\n"));
}

#[test]
fn test_invalid_capture_group_is_reported() {
    let project = project();

    inliner(&project)
        .args(["-q", "resolve", "src.txt", "--capture-group", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Capture group 3"));
}
