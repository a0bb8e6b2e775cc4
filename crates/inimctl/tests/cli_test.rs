//! Integration tests for the `inimctl` binary.
//!
//! Argument parsing, help output, completions and configuration errors,
//! all without talking to INIM Cloud.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a command with env isolation: config dirs point at `home`, and
/// every `INIM_*` variable the CLI reads is cleared.
fn inimctl_cmd(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("inimctl");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home)
        .env("NO_COLOR", "1")
        .env_remove("INIM_PROFILE")
        .env_remove("INIM_DEVICE")
        .env_remove("INIM_OUTPUT")
        .env_remove("INIM_PASSWORD")
        .env_remove("INIM_USER_CODE")
        .env_remove("RUST_LOG");
    cmd
}

fn write_config(home: &Path, contents: &str) {
    let dir = home.join("inimctl");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("config.toml"), contents).unwrap();
}

const PROFILE: &str = r#"
default_profile = "home"

[profiles.home]
username = "user@example.com"
password = "hunter2"
user_code = "97531864"
"#;

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let home = tempfile::tempdir().unwrap();
    let output = inimctl_cmd(home.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("Usage"));
}

#[test]
fn test_help_lists_commands() {
    let home = tempfile::tempdir().unwrap();
    inimctl_cmd(home.path()).arg("--help").assert().success().stdout(
        predicate::str::contains("INIM")
            .and(predicate::str::contains("status"))
            .and(predicate::str::contains("arm"))
            .and(predicate::str::contains("bypass"))
            .and(predicate::str::contains("watch")),
    );
}

#[test]
fn test_version_flag() {
    let home = tempfile::tempdir().unwrap();
    inimctl_cmd(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("inimctl"));
}

#[test]
fn test_completions_zsh() {
    let home = tempfile::tempdir().unwrap();
    inimctl_cmd(home.path())
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Argument validation ─────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let home = tempfile::tempdir().unwrap();
    inimctl_cmd(home.path())
        .arg("explode")
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_invalid_output_format() {
    let home = tempfile::tempdir().unwrap();
    let output = inimctl_cmd(home.path())
        .args(["--output", "yaml", "status"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(combined_output(&output).contains("possible values"));
}

#[test]
fn test_area_requires_ids() {
    let home = tempfile::tempdir().unwrap();
    inimctl_cmd(home.path())
        .args(["area", "arm"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_bypass_zone_must_be_numeric() {
    let home = tempfile::tempdir().unwrap();
    inimctl_cmd(home.path())
        .args(["bypass", "front-door"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_arm_rejects_unknown_mode() {
    let home = tempfile::tempdir().unwrap();
    inimctl_cmd(home.path())
        .args(["arm", "night"])
        .assert()
        .failure()
        .code(2);
}

// ── Configuration errors ────────────────────────────────────────────

#[test]
fn test_status_without_config() {
    let home = tempfile::tempdir().unwrap();
    inimctl_cmd(home.path())
        .arg("status")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("config init"));
}

#[test]
fn test_unknown_profile_lists_available() {
    let home = tempfile::tempdir().unwrap();
    write_config(home.path(), PROFILE);
    inimctl_cmd(home.path())
        .args(["--profile", "cabin", "devices"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("cabin").and(predicate::str::contains("home")));
}

#[test]
fn test_watch_interval_out_of_range() {
    let home = tempfile::tempdir().unwrap();
    write_config(home.path(), PROFILE);
    inimctl_cmd(home.path())
        .env("INIM_USER_CODE", "97531864")
        .args(["watch", "--interval", "5"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("scan_interval"));
}

#[test]
fn test_watch_interval_above_maximum() {
    let home = tempfile::tempdir().unwrap();
    write_config(home.path(), PROFILE);
    inimctl_cmd(home.path())
        .env("INIM_USER_CODE", "97531864")
        .args(["watch", "--interval", "600"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("scan_interval"));
}

// ── Config commands ─────────────────────────────────────────────────

#[test]
fn test_config_show_without_file() {
    let home = tempfile::tempdir().unwrap();
    inimctl_cmd(home.path())
        .args(["config", "show"])
        .assert()
        .success();
}

#[test]
fn test_config_show_redacts_secrets() {
    let home = tempfile::tempdir().unwrap();
    write_config(home.path(), PROFILE);
    inimctl_cmd(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("user@example.com")
                .and(predicate::str::contains("hunter2").not())
                .and(predicate::str::contains("97531864").not()),
        );
}

#[test]
fn test_config_show_json() {
    let home = tempfile::tempdir().unwrap();
    write_config(home.path(), PROFILE);
    let output = inimctl_cmd(home.path())
        .args(["--output", "json", "config", "show"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["default_profile"], "home");
    assert_eq!(parsed["profiles"]["home"]["password"], "********");
}

#[test]
fn test_config_path() {
    let home = tempfile::tempdir().unwrap();
    inimctl_cmd(home.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}
