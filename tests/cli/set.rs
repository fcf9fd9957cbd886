//! Tests for the `set` command.

use crate::support::*;

#[test]
fn test_set_writes_first_file() {
    let t = Test::plain();

    let output = t.set("NEW_KEY", "new_value");
    assert_success(&output);
    assert_stdout_contains(&output, "set NEW_KEY for stage dev");

    let yaml = t.read("some/path.yml");
    assert!(yaml.contains("NEW_KEY: new_value"));
    assert!(!t.read("some/otherPath.yml").contains("NEW_KEY"));
}

#[test]
fn test_set_then_list() {
    let t = Test::plain();

    assert_success(&t.set("NEW_KEY", "new_value"));

    let output = t.list(&["-a", "NEW_KEY"]);
    assert_success(&output);
    assert_stdout_contains(&output, "NEW_KEY: new_value");
}

#[test]
fn test_set_overwrites_existing_value() {
    let t = Test::plain();

    assert_success(&t.set("foo", "changed"));

    let output = t.list(&["-a", "foo"]);
    assert_stdout_contains(&output, "foo: changed");
    assert_stdout_excludes(&output, "foo: foo");
}

#[test]
fn test_set_keeps_other_stages() {
    let t = Test::plain();

    assert_success(&t.set("foo", "changed"));

    let output = t.cmd().args(["-s", "prod", "list"]).output().unwrap();
    assert_stdout_contains(&output, "foo: prodfoo");
}

#[test]
fn test_set_creates_stage() {
    let t = Test::plain();

    let output = t
        .cmd()
        .args(["set", "-s", "staging", "-a", "foo", "-v", "stagefoo"])
        .output()
        .unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "for stage staging");

    let yaml = t.read("some/path.yml");
    assert!(yaml.contains("staging:"));
    assert!(yaml.contains("stagefoo"));
}

#[test]
fn test_set_creates_missing_file() {
    let t = Test::new();
    t.write("stagenv.toml", "[stagenv]\nfiles = [\"env/fresh.yml\"]\n");

    let output = t.set("foo", "bar");
    assert_success(&output);
    assert!(t.exists("env/fresh.yml"));
    assert!(t.read("env/fresh.yml").contains("foo: bar"));
}

#[test]
fn test_set_without_attribute_fails() {
    let t = Test::plain();

    let output = t.cmd().args(["set", "-v", "value"]).output().unwrap();
    assert_failure(&output);
    assert_stderr_contains(&output, "requires --attribute");
}

#[test]
fn test_set_without_files_fails() {
    let t = Test::new();
    t.write("stagenv.toml", "[stagenv]\nfiles = []\n");

    let output = t.set("foo", "bar");
    assert_failure(&output);
    assert_stderr_contains(&output, "no environment files specified");
}

#[test]
fn test_set_empty_value() {
    let t = Test::plain();

    let output = t.set("EMPTY", "");
    assert_success(&output);

    let output = t.list(&["-a", "EMPTY"]);
    assert_stdout_contains(&output, "EMPTY: ");
}

#[test]
fn test_set_empty_attribute_rejected() {
    let t = Test::plain();
    let before = t.read("some/path.yml");

    let output = t.cmd().args(["set", "-a", "", "-v", "x"]).output().unwrap();
    assert_failure(&output);
    assert_eq!(t.read("some/path.yml"), before);
}

#[test]
fn test_set_malformed_file_left_untouched() {
    let t = Test::plain();
    let broken = "dev:\n  foo: bar\n  keep: [unclosed\nprod:\n  secret: important\n";
    t.write("some/path.yml", broken);

    let output = t.set("x", "1");
    assert_failure(&output);
    assert_stderr_contains(&output, "invalid YAML");
    assert_stderr_contains(&output, "left unchanged");
    assert_eq!(t.read("some/path.yml"), broken);
}
