// tests/integration_test.rs
use std::fs;
use std::process::Command;

use tempfile::TempDir;

fn binary() -> Command {
    Command::new(env!("CARGO_BIN_EXE_pkg-publish"))
}

#[test]
fn test_pkg_publish_help() {
    let output = binary()
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("pkg-publish"));
    assert!(stdout.contains("--otp"));
    assert!(stdout.contains("--config"));
}

#[test]
fn test_pkg_publish_version() {
    let output = binary()
        .arg("--version")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_missing_config_file_exits_with_failure() {
    let output = binary()
        .args(["--config", "/nonexistent/pkgpublish.toml"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Error loading config"));
}

#[test]
fn test_malformed_manifest_version_exits_with_failure() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("package.json"),
        r#"{"name": "tool", "version": "1.0"}"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("pkgpublish.toml"),
        "[registry]\nclient = \"/nonexistent/npm\"\n",
    )
    .unwrap();

    let output = binary()
        .current_dir(dir.path())
        .stdin(std::process::Stdio::null())
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Invalid version format"), "stderr: {}", stderr);
}
