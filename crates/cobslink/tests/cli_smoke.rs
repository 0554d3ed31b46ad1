#![cfg(all(unix, feature = "cli"))]

//! Smoke tests against the built binary: everything that can be
//! exercised without a serial device on the other end.

use std::process::Command;

fn cobslink() -> Command {
    Command::new(env!("CARGO_BIN_EXE_cobslink"))
}

#[test]
fn version_prints_name_and_version() {
    let out = cobslink()
        .args(["version", "--format", "pretty"])
        .output()
        .expect("binary should run");

    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("cobslink"));
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn version_json_is_parseable() {
    let out = cobslink()
        .args(["version", "--format", "json"])
        .output()
        .expect("binary should run");

    assert!(out.status.success());
    let parsed: serde_json::Value =
        serde_json::from_slice(&out.stdout).expect("stdout should be JSON");
    assert_eq!(parsed["name"], "cobslink");
}

#[test]
fn malformed_field_is_a_usage_error() {
    let out = cobslink()
        .args(["send", "/dev/null", "--field", "u8=notanumber"])
        .output()
        .expect("binary should run");

    // clap argument validation exits with its own usage code before any
    // device is touched.
    assert!(!out.status.success());
    assert_eq!(out.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("invalid u8 value"));
}

#[test]
fn unknown_field_type_is_reported() {
    let out = cobslink()
        .args(["send", "/dev/null", "--field", "u64=1"])
        .output()
        .expect("binary should run");

    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("unknown field type"));
}

#[test]
fn missing_device_fails_cleanly() {
    let out = cobslink()
        .args(["send", "/dev/does-not-exist-cobslink", "--field", "u8=1"])
        .output()
        .expect("binary should run");

    assert!(!out.status.success());
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("open failed"));
}
