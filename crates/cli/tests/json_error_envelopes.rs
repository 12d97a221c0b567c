//! Ensure CLI command failures honor `--output json`.

use std::fs;
use std::process::Command;

use assert_cmd::cargo;

fn argstree_cmd() -> Command {
    Command::new(cargo::cargo_bin!("argstree"))
}

fn write_temp_spec(content: &str) -> (tempfile::TempDir, String) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("spec.json");
    fs::write(&path, content).expect("write temp spec");
    (dir, path.to_string_lossy().to_string())
}

#[test]
fn missing_spec_file_emits_json_error_envelope() {
    let output = argstree_cmd()
        .args([
            "--output",
            "json",
            "parse",
            "--spec",
            "nope-does-not-exist.json",
        ])
        .output()
        .expect("run parse command");

    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("valid json envelope");
    assert_eq!(json["ok"], false);
    assert_eq!(json["error"], "command_failed");
    assert!(
        json["message"]
            .as_str()
            .is_some_and(|m| m.contains("failed to read spec file")),
        "unexpected message: {}",
        json["message"]
    );
}

#[test]
fn malformed_spec_file_emits_json_error_envelope() {
    let (_dir, path) = write_temp_spec(r#"{ "options": [{ "max": 1 }] }"#);
    let output = argstree_cmd()
        .args(["--output", "json", "parse", "--spec", &path])
        .output()
        .expect("run parse command");

    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("valid json envelope");
    assert_eq!(json["ok"], false);
    assert_eq!(json["error"], "command_failed");
    assert!(
        json["message"]
            .as_str()
            .is_some_and(|m| m.contains("failed to parse spec file") && m.contains("arg")),
        "unexpected message: {}",
        json["message"]
    );
}

#[test]
fn missing_spec_file_pretty_goes_to_stderr() {
    let output = argstree_cmd()
        .args([
            "--output",
            "pretty",
            "parse",
            "--spec",
            "nope-does-not-exist.json",
        ])
        .output()
        .expect("run parse command");

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.starts_with("error: failed to read spec file"),
        "unexpected stderr: {stderr}"
    );
}

#[test]
fn invalid_options_emit_parse_error_envelope() {
    let (_dir, path) = write_temp_spec(r#"{ "options": [{ "arg": "--foo", "min": 2, "max": 1 }] }"#);
    let output = argstree_cmd()
        .args(["--output", "json", "parse", "--spec", &path, "--", "--foo"])
        .output()
        .expect("run parse command");

    assert_eq!(output.status.code(), Some(1));
    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("valid json envelope");
    assert_eq!(json["ok"], false);
    assert_eq!(json["error"]["cause"], "invalid-options");
    assert_eq!(
        json["error"]["message"],
        "Option '--foo' has invalid min and max range: 2-1."
    );
    assert_eq!(json["error"]["raw"], "--foo");
    assert!(json["error"].get("options").is_none());
}
