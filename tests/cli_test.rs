#![cfg(feature = "cli")]

use std::process::{Command, Output};

fn run_cli(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_transform-runner"))
        .args(args)
        .env("NO_COLOR", "1")
        .env_remove("TRANSFORM_LOG_LEVEL")
        .output()
        .unwrap()
}

#[test]
fn test_usage_error_is_logged_and_exits_6() {
    let output = run_cli(&["--bogus"]);

    assert_eq!(output.status.code(), Some(6));
    assert!(output.stdout.is_empty());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR"));
    assert!(stderr.contains("Invalid command line"));
    assert!(stderr.contains("--bogus"));
    assert!(stderr.contains("config"));
}

#[test]
fn test_help_goes_to_stdout_and_exits_0() {
    let output = run_cli(&["--help"]);

    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stdout).contains("--input"));
    assert!(output.stderr.is_empty());
}
