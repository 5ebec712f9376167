//! Integration tests for `agent-editor config`.
//!
//! Every test points `AGENT_EDITOR_CONFIG` at a temp path so nothing reads or
//! writes `~/.agent-editor/config.yaml`.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use predicates::prelude::*;

use crate::sandbox::{Sandbox, stdout_json};

#[test]
fn test_config_help_shows_subcommands() {
    let sb = Sandbox::new();
    sb.cmd()
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("show"))
        .stdout(predicate::str::contains("set"))
        .stdout(predicate::str::contains("set-token"));
}

#[test]
fn test_config_show_defaults_without_file() {
    let sb = Sandbox::new();
    sb.cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("store.max_backups:"))
        .stdout(predicate::str::contains("30"))
        .stdout(predicate::str::contains("(none)"));
}

#[test]
fn test_config_set_then_show_json() {
    let sb = Sandbox::new();
    sb.cmd()
        .args(["config", "set", "remote.owner", "octo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Set remote.owner = octo"));
    sb.cmd()
        .args(["config", "set", "store.max_backups", "5"])
        .assert()
        .success();

    let output = sb.cmd().args(["--json", "config", "show"]).output().unwrap();
    assert!(output.status.success());
    let shown = stdout_json(&output);
    assert_eq!(shown["config"]["remote"]["owner"], "octo");
    assert_eq!(shown["config"]["store"]["max_backups"], 5);
    assert_eq!(shown["token"], "(none)");
}

#[test]
fn test_config_set_unknown_key_fails() {
    let sb = Sandbox::new();
    sb.cmd()
        .args(["config", "set", "remote.password", "x"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unknown setting"));
    assert!(!sb.config_path().exists());
}

#[test]
fn test_config_set_invalid_value_fails() {
    let sb = Sandbox::new();
    sb.cmd()
        .args(["config", "set", "store.max_backups", "0"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid value"));
}

#[test]
fn test_set_token_reads_stdin_when_non_interactive() {
    let sb = Sandbox::new();
    sb.cmd()
        .args(["config", "set-token"])
        .write_stdin("ghp_exampletoken\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Token saved"));
    let saved = std::fs::read_to_string(sb.root().join("github_token")).unwrap();
    assert_eq!(saved, "ghp_exampletoken\n");

    sb.cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("token file"))
        .stdout(predicate::str::contains("ghp_exampletoken").not());
}
