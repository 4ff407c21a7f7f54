//! Black-box tests of the `falsec` binary: no arguments, a valid
//! source file, and a source with a lex/parse error.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn falsec() -> Command {
    Command::cargo_bin("falsec").unwrap()
}

#[test]
fn no_arguments_exits_one_and_reports_missing_filename() {
    falsec()
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Filename required"));
}

#[test]
fn valid_source_writes_default_output_and_prints_progress() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("hello.f");
    fs::write(&input, "\"Hello, World!\"").unwrap();

    falsec()
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Parsed AST"))
        .stdout(predicate::str::contains("Compiled to"));

    let output = dir.path().join("hello.ll");
    assert!(output.exists(), "expected {} to exist", output.display());

    let ir = fs::read_to_string(&output).unwrap();
    assert!(ir.contains("define i32 @main()"));
}

#[test]
fn explicit_output_path_is_honored() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("prog.f");
    let output = dir.path().join("custom.ll");
    fs::write(&input, "1 2 + .").unwrap();

    falsec().arg(&input).arg(&output).assert().success();

    assert!(output.exists());
}

#[test]
fn lex_error_exits_nonzero_with_one_line() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("bad.f");
    fs::write(&input, "{unterminated").unwrap();

    let assert = falsec().arg(&input).assert().failure();
    let output = assert.get_output();
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.lines().count(), 1, "expected exactly one error line, got: {stderr:?}");
}

#[test]
fn parse_error_exits_nonzero_with_one_line() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("asm.f");
    fs::write(&input, "`7").unwrap();

    let assert = falsec().arg(&input).assert().failure();
    let output = assert.get_output();
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.lines().count(), 1, "expected exactly one error line, got: {stderr:?}");
}
