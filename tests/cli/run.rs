//! Tests for the `run` command.

#![cfg(unix)]

use crate::support::*;

fn with_environment(t: &Test, table: &str) {
    t.write(
        "stagenv.toml",
        &format!("{}\n[environment]\n{}\n", CONFIG, table),
    );
}

#[test]
fn test_run_passes_variables() {
    let t = Test::plain();

    let output = t
        .cmd()
        .args(["run", "--", "sh", "-c", "echo \"$foo $bar\""])
        .output()
        .unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "foo baar");
}

#[test]
fn test_run_does_not_write_env_file() {
    let t = Test::plain();

    assert_success(&t.cmd().args(["run", "--", "true"]).output().unwrap());
    assert!(!t.exists(".env"));
}

#[test]
fn test_run_provider_environment_wins() {
    let t = Test::plain();
    with_environment(&t, "foo = \"provider\"");

    let output = t
        .cmd()
        .args(["run", "--", "sh", "-c", "echo \"$foo\""])
        .output()
        .unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "provider");
    assert_stderr_contains(&output, "variable 'foo' is already defined");
}

#[test]
fn test_run_warns_once_per_occurrence() {
    let t = Test::plain();
    with_environment(&t, "bar = \"provider\"");

    let output = t.cmd().args(["run", "--", "true"]).output().unwrap();
    assert_success(&output);
    let warnings = stderr(&output)
        .matches("variable 'bar' is already defined")
        .count();
    assert_eq!(warnings, 2);
}

#[test]
fn test_run_local_override() {
    let t = Test::plain();
    t.write(
        "stagenv.toml",
        &format!("{}local = \".env.local\"\n", CONFIG),
    );
    t.write(".env.local", "baz=local\n");

    let output = t
        .cmd()
        .args(["run", "--", "sh", "-c", "echo \"$baz\""])
        .output()
        .unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "local");
}

#[test]
fn test_run_propagates_exit_code() {
    let t = Test::plain();

    let output = t
        .cmd()
        .args(["run", "--", "sh", "-c", "exit 7"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(7));
}

#[test]
fn test_run_without_command_fails() {
    let t = Test::plain();

    let output = t.cmd().arg("run").output().unwrap();
    assert_failure(&output);
    assert_stderr_contains(&output, "required");
}

#[test]
fn test_run_survives_interrupt_and_propagates_exit_code() {
    let t = Test::plain();

    let output = t
        .cmd()
        .args(["run", "--", "sh", "-c", "kill -INT $PPID; sleep 0.2; exit 3"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
}
