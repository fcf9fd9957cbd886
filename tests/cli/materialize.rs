//! Tests for the `materialize` and `cleanup` commands.

use crate::support::*;

#[test]
fn test_materialize_writes_env_file() {
    let t = Test::plain();

    let output = t.materialize(&[]);
    assert_success(&output);
    assert_stdout_contains(&output, "wrote 5 variables");

    assert_eq!(
        t.read(".env"),
        "foo=foo\nbar=bar\nbaz=baz\nbar=baar\nbaz=baaz"
    );
}

#[test]
fn test_materialize_other_stage() {
    let t = Test::plain();

    let output = t.cmd().args(["-s", "prod", "materialize"]).output().unwrap();
    assert_success(&output);
    assert_eq!(t.read(".env"), "foo=prodfoo");
}

#[test]
fn test_materialize_custom_path() {
    let t = Test::plain();
    t.write(
        "stagenv.toml",
        &format!("{}dotenv = \"build/.env.local\"\n", CONFIG),
    );

    assert_success(&t.materialize(&[]));
    assert!(t.exists("build/.env.local"));
    assert!(!t.exists(".env"));
}

#[test]
fn test_materialize_overwrites_existing_file() {
    let t = Test::plain();
    t.write(".env", "STALE=1\n");

    assert_success(&t.materialize(&[]));
    assert!(!t.read(".env").contains("STALE"));
}

#[cfg(unix)]
#[test]
fn test_materialize_file_exists_while_command_runs() {
    let t = Test::plain();

    let output = t.materialize(&["--", "cat", ".env"]);
    assert_success(&output);
    assert_stdout_contains(&output, "foo=foo");
    assert_stdout_contains(&output, "removed .env file");
    assert!(!t.exists(".env"));
}

#[cfg(unix)]
#[test]
fn test_materialize_keep_leaves_file() {
    let t = Test::plain();

    let output = t.materialize(&["--keep", "--", "true"]);
    assert_success(&output);
    assert!(t.exists(".env"));
}

#[cfg(unix)]
#[test]
fn test_materialize_removes_file_when_command_fails() {
    let t = Test::plain();

    let output = t.materialize(&["--", "sh", "-c", "exit 4"]);
    assert_eq!(output.status.code(), Some(4));
    assert!(!t.exists(".env"));
}

#[cfg(unix)]
#[test]
fn test_materialize_removes_file_after_interrupt() {
    let t = Test::plain();

    let output = t.materialize(&[
        "--",
        "sh",
        "-c",
        "kill -INT $PPID; sleep 0.2; cp .env seen.env",
    ]);
    assert_success(&output);
    assert!(t.read("seen.env").contains("foo=foo"));
    assert!(!t.exists(".env"));
}

#[cfg(unix)]
#[test]
fn test_materialize_child_keeps_default_interrupt_handling() {
    let t = Test::plain();

    let output = t.materialize(&["--", "sh", "-c", "kill -INT $$; sleep 1"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(!t.exists(".env"));
}

#[test]
fn test_materialize_help_mentions_interrupts() {
    let t = Test::new();

    let output = t.cmd().args(["materialize", "--help"]).output().unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "SIGKILL");
}

#[test]
fn test_cleanup_removes_file() {
    let t = Test::plain();
    assert_success(&t.materialize(&[]));

    let output = t.cleanup();
    assert_success(&output);
    assert_stdout_contains(&output, "removed");
    assert!(!t.exists(".env"));
}

#[test]
fn test_cleanup_without_file_succeeds() {
    let t = Test::plain();

    let output = t.cleanup();
    assert_success(&output);
    assert_stdout_contains(&output, "nothing to remove");
}

#[cfg(not(any(feature = "aws", feature = "test-kms")))]
#[test]
fn test_materialize_encrypted_without_kms_fails() {
    let t = Test::init();

    let output = t.materialize(&[]);
    assert_failure(&output);
    assert_stderr_contains(&output, "AWS KMS support not compiled");
    assert_stderr_contains(&output, "--features aws");
    assert!(!t.exists(".env"));
}
