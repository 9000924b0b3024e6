#![allow(clippy::expect_used, clippy::unwrap_used)]
//! End-to-end checks of the `vimfiles` binary's exit codes.

use assert_cmd::Command;
use predicates::prelude::*;

fn vimfiles(home: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("vimfiles").unwrap();
    cmd.env_clear()
        .env("HOME", home)
        .env("PATH", "")
        .env("XDG_CACHE_HOME", home.join(".cache"));
    cmd
}

#[test]
fn unknown_flag_prints_usage_and_changes_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    vimfiles(tmp.path())
        .arg("--bogus")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Usage"));
    assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
}

#[test]
fn help_exits_successfully() {
    let tmp = tempfile::tempdir().unwrap();
    vimfiles(tmp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--non-interactive"));
}

#[test]
fn version_flag_prints_version() {
    let tmp = tempfile::tempdir().unwrap();
    vimfiles(tmp.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("vimfiles "));
}

#[test]
fn missing_home_is_an_environment_error() {
    Command::cargo_bin("vimfiles")
        .unwrap()
        .env_clear()
        .assert()
        .code(4)
        .stderr(predicate::str::contains("HOME"));
}

#[test]
fn malformed_settings_is_an_environment_error() {
    let tmp = tempfile::tempdir().unwrap();
    let settings = tmp.path().join(".config/vimfiles/settings.toml");
    std::fs::create_dir_all(settings.parent().unwrap()).unwrap();
    std::fs::write(&settings, "[repository\n").unwrap();

    vimfiles(tmp.path()).assert().code(4);
    assert!(!tmp.path().join(".vim").exists());
}
