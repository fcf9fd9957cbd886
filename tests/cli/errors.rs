//! Tests for error handling and CLI flags.

use crate::support::*;

#[test]
fn test_help_lists_commands() {
    let t = Test::new();

    let output = t.cmd().arg("--help").output().unwrap();
    assert_success(&output);
    let out = stdout(&output);
    for command in ["list", "set", "materialize", "cleanup", "run"] {
        assert!(out.contains(command), "help missing '{}'", command);
    }
}

#[test]
fn test_version_flag() {
    let t = Test::new();

    let output = t.cmd().arg("--version").output().unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "stagenv");
}

#[test]
fn test_unknown_command_fails() {
    let t = Test::new();

    let output = t.cmd().arg("unknown-command").output().unwrap();
    assert_failure(&output);
}

#[test]
fn test_missing_config_fails_with_hint() {
    let t = Test::new();

    let output = t.list(&[]);
    assert_failure(&output);
    assert_eq!(output.status.code(), Some(1));
    assert_stderr_contains(&output, "config file not found");
    assert_stderr_contains(&output, "create stagenv.toml");
}

#[test]
fn test_invalid_config_fails() {
    let t = Test::new();
    t.write("stagenv.toml", "[stagenv\nfiles = ");

    let output = t.list(&[]);
    assert_failure(&output);
    assert_stderr_contains(&output, "invalid config file");
}

#[test]
fn test_config_flag() {
    let t = Test::plain();
    t.write(
        "conf/other.toml",
        "[stagenv]\nfiles = [\"../some/otherPath.yml\"]\n",
    );

    let output = t.cmd().args(["-c", "conf/other.toml", "list"]).output().unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "bar: baar");
    assert_stdout_excludes(&output, "foo: foo");
}

#[test]
fn test_config_env_var() {
    let t = Test::plain();
    t.write(
        "conf/other.toml",
        "[stagenv]\nfiles = [\"../some/otherPath.yml\"]\n",
    );

    let output = t
        .cmd()
        .env("STAGENV_CONFIG", "conf/other.toml")
        .arg("list")
        .output()
        .unwrap();
    assert_success(&output);
    assert_stdout_excludes(&output, "foo: foo");
}

#[test]
fn test_missing_key_id_fails_with_hint() {
    let t = Test::plain();
    t.write("stagenv.toml", "[stagenv]\nfiles = [\"some/path.yml\"]\n");

    let output = t.set_encrypted("SECRET", "value");
    assert_failure(&output);
    assert_stderr_contains(&output, "no encryption key id configured for stage 'dev'");
    assert_stderr_contains(&output, "set key_id");
    assert!(!t.read("some/path.yml").contains("SECRET"));
}

#[cfg(not(any(feature = "aws", feature = "test-kms")))]
#[test]
fn test_decrypt_without_kms_support_fails() {
    let t = Test::init();

    let output = t.list(&["--decrypt"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "AWS KMS support not compiled");
}

#[test]
fn test_error_goes_to_stderr_only() {
    use predicates::prelude::*;

    let t = Test::new();

    t.cmd()
        .args(["set", "-a", "foo", "-v", "bar"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("config file not found").and(predicate::str::contains("stagenv.toml")));
}

#[test]
fn test_cleanup_reports_path() {
    use predicates::prelude::*;

    let t = Test::plain();

    t.cmd()
        .arg("cleanup")
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing to remove at").and(predicate::str::contains(".env")));
}
