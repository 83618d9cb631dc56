//! Process-level smoke tests for the `prlc` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn prlc() -> Command {
    Command::cargo_bin("prlc").expect("prlc binary should build")
}

fn fixture(source: &str) -> NamedTempFile {
    let mut file = NamedTempFile::with_suffix(".prl").expect("failed to create temp fixture");
    file.write_all(source.as_bytes()).expect("failed to write fixture");
    file
}

#[test]
fn runs_a_file_and_prints_its_output() {
    let file = fixture(r#"print("Hello, World!")"#);

    prlc()
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::eq("Hello, World!\n"));
}

#[test]
fn reports_a_runtime_error_with_nonzero_exit_and_no_stdout() {
    let file = fixture("let x = 1\nx = 2");

    prlc()
        .arg(file.path())
        .assert()
        .failure()
        .stdout(predicate::eq(""))
        .stderr(predicate::str::contains("Error:").and(predicate::str::contains("immutable")));
}

#[test]
fn reports_a_parse_error_with_line_and_column() {
    let file = fixture("let x = \n");

    prlc()
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Line").and(predicate::str::contains("Column")));
}

#[test]
fn no_color_flag_strips_ansi_from_diagnostics() {
    let file = fixture("let a: i32 = 1\nprint(a / 0)");

    prlc()
        .arg(file.path())
        .arg("--no-color")
        .assert()
        .failure()
        .stderr(predicate::str::contains("\x1b[").not());
}

#[test]
fn missing_file_fails_cleanly_without_panicking() {
    prlc()
        .arg("/no/such/file.prl")
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not read"));
}

#[test]
fn version_flag_reports_the_crate_version() {
    prlc()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("prlc"));
}
