//! CLI integration tests for the xa-server binary.
#![allow(deprecated)] // Command::cargo_bin – macro replacement not yet stable

use assert_cmd::Command;
use predicates::prelude::*;

fn xanadu() -> Command {
    Command::cargo_bin("xanadu").unwrap()
}

#[test]
fn help_lists_options() {
    xanadu()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--port"))
        .stdout(predicate::str::contains("--max-players"))
        .stdout(predicate::str::contains("--seed"));
}

#[test]
fn version_flag() {
    xanadu()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("xanadu"));
}

#[test]
fn too_few_players_is_rejected() {
    xanadu()
        .args(["--max-players", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("max-players"));
}

#[test]
fn bad_port_is_rejected() {
    xanadu()
        .args(["--port", "not-a-port"])
        .assert()
        .failure();
}

#[test]
fn missing_map_file_fails() {
    xanadu()
        .args(["--map", "/definitely/not/a/map.txt", "--port", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}
