//! End-to-end CLI integration tests.

use assert_cmd::Command;
use predicates::prelude::*;

fn negafft() -> Command {
    Command::cargo_bin("negafft").expect("binary not found")
}

#[test]
fn help_flag() {
    negafft()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("2^N+1"));
}

#[test]
fn version_flag() {
    negafft()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("negafft"));
}

#[test]
fn mul_verifies() {
    negafft()
        .args(["--bits", "20000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("mul ok"));
}

#[test]
fn square_verifies() {
    negafft()
        .args(["--mode", "square", "-b", "4096", "--seed", "9"])
        .assert()
        .success()
        .stdout(predicate::str::contains("square ok"));
}

#[test]
fn roundtrip_verifies_in_parallel() {
    negafft()
        .args(["--mode", "roundtrip", "--depth", "6", "-w", "1", "--parallel-threshold", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("roundtrip ok").and(predicate::str::contains("n=64")));
}

#[test]
fn quiet_prints_nothing() {
    negafft()
        .args(["-b", "1000", "-q"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn json_report() {
    let output = negafft()
        .args(["--mode", "roundtrip", "--depth", "5", "--json"])
        .output()
        .expect("failed to run");
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("invalid JSON");
    assert_eq!(report["mode"], "roundtrip");
    assert_eq!(report["n"], 32);
    assert_eq!(report["trunc"], 128);
}

#[test]
fn env_selects_mode() {
    negafft()
        .env("NEGAFFT_MODE", "roundtrip")
        .env("NEGAFFT_DEPTH", "3")
        .assert()
        .success()
        .stdout(predicate::str::contains("roundtrip ok"));
}

#[test]
fn invalid_transform_exits_with_config_code() {
    negafft()
        .args(["--mode", "roundtrip", "--depth", "1", "-w", "1"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("configuration error"));
}

#[test]
fn unknown_flag_fails() {
    negafft().arg("--bogus").assert().failure();
}
