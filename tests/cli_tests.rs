//! CLI integration tests using the REAL installer binary

mod common;

use assert_cmd::Command;
use predicates::prelude::*;

fn installer_cmd() -> Command {
    Command::new(common::installer_bin())
}

#[test]
fn test_help_output() {
    installer_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Installation wizard for the Gooey Framework"))
        .stdout(predicate::str::contains("install"))
        .stdout(predicate::str::contains("validate"))
        .stdout(predicate::str::contains("plan"));
}

#[test]
fn test_version_output() {
    installer_cmd()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("gooey-installer"))
        .stdout(predicate::str::contains("Gooey Framework"))
        .stdout(predicate::str::contains("Build info"));
}

#[test]
fn test_completions_bash() {
    installer_cmd()
        .args(["completions", "--shell", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("gooey-installer"));
}

#[test]
fn test_completions_unknown_shell() {
    installer_cmd()
        .args(["completions", "--shell", "tcsh"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Unknown shell: tcsh"));
}

#[test]
fn test_missing_subcommand_fails() {
    installer_cmd().assert().failure();
}

#[test]
fn test_install_help_lists_flags() {
    installer_cmd()
        .args(["install", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--accept-terms"))
        .stdout(predicate::str::contains("--no-profile"))
        .stdout(predicate::str::contains("--picoflasher"))
        .stdout(predicate::str::contains("--launch-docs"));
}
