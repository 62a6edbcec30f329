//! CLI integration tests for pack-tally
//!
//! Tests the binary as a user would interact with it.

use assert_cmd::Command;
use predicates::prelude::*;

fn pack_tally() -> Command {
    Command::cargo_bin("pack-tally").unwrap()
}

#[test]
fn test_help() {
    pack_tally()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("package totals"));
}

#[test]
fn test_decode_reference_input() {
    pack_tally()
        .args(["decode", "abbcc"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[2,6]"));
}

#[test]
fn test_decode_empty_input() {
    pack_tally()
        .args(["decode", ""])
        .assert()
        .success()
        .stdout(predicate::str::contains("[]"));
}

#[test]
fn test_decode_placeholder() {
    pack_tally()
        .args(["decode", "_"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[0]"));
}

#[test]
fn test_decode_input_is_taken_verbatim() {
    // No trimming, no case folding: uppercase defaults to value 1.
    pack_tally()
        .args(["decode", "aB"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[1]"));
}

#[test]
fn test_missing_subcommand_fails() {
    pack_tally()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}
