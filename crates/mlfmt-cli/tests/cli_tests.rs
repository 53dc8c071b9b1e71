//! CLI end-to-end tests (spec §6), in the same `assert_cmd`-based e2e
//! style used elsewhere in this workspace.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn mlfmt() -> Command {
    Command::cargo_bin("mlfmt").unwrap()
}

#[test]
fn prints_help() {
    mlfmt().arg("--help").assert().success().stdout(predicate::str::contains("Usage"));
}

#[test]
fn prints_version() {
    mlfmt().arg("--version").assert().success().stdout(predicate::str::contains("mlfmt"));
}

#[test]
fn formats_a_file_in_place_with_force() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("a.sml");
    fs::write(&path, "val   x   =   1").unwrap();

    mlfmt().arg(&path).arg("--force").assert().success();
    assert_eq!(fs::read_to_string(&path).unwrap(), "val x = 1");
}

#[test]
fn preview_only_leaves_the_file_untouched() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("a.sml");
    fs::write(&path, "val   x   =   1").unwrap();

    mlfmt()
        .arg(&path)
        .arg("--preview-only")
        .assert()
        .success()
        .stdout(predicate::str::contains("val x = 1"));
    assert_eq!(fs::read_to_string(&path).unwrap(), "val   x   =   1");
}

#[test]
fn preview_only_and_force_conflict() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("a.sml");
    fs::write(&path, "val x = 1").unwrap();

    mlfmt().arg(&path).arg("--preview-only").arg("--force").assert().failure();
}

#[test]
fn expands_a_build_manifest() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.sml"), "val   x   =   1").unwrap();
    let manifest = dir.path().join("project.mlb");
    fs::write(&manifest, "a.sml").unwrap();

    mlfmt().arg(&manifest).arg("--force").assert().success();
    assert_eq!(fs::read_to_string(dir.path().join("a.sml")).unwrap(), "val x = 1");
}

#[test]
fn reports_diagnostics_with_a_nonzero_exit_code() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("a.sml");
    fs::write(&path, "val x = \"unterminated").unwrap();

    mlfmt().arg(&path).arg("--force").assert().failure();
}

#[test]
fn rejects_an_out_of_range_ribbon_frac() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("a.sml");
    fs::write(&path, "val x = 1").unwrap();

    mlfmt().arg(&path).arg("--force").arg("--ribbon-frac").arg("2.0").assert().failure();
}
