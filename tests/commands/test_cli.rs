//! Tests for the notifier binary's observable protocol
//!
//! Only paths that never reach the network are exercised here.

use std::process::{Command, Output};

use tempfile::tempdir;

fn notifier(args: &[&str]) -> Output {
    let workdir = tempdir().expect("tempdir");
    Command::new(env!("CARGO_BIN_EXE_notifier"))
        .args(args)
        .current_dir(workdir.path())
        // Present but unparsable, so neither .env nor config.yml supplies one
        .env("TELEGRAM_API_ID", "")
        .env_remove("METRICS_ADDR")
        .env_remove("RUST_LOG")
        .output()
        .expect("run notifier")
}

#[test]
fn test_unknown_command_prints_nothing() {
    let output = notifier(&["bogus"]);
    assert!(output.stdout.is_empty());
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_missing_command_prints_nothing() {
    let output = notifier(&[]);
    assert!(output.stdout.is_empty());
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_send_without_text_prints_nothing() {
    let output = notifier(&["send"]);
    assert!(output.stdout.is_empty());
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_help_exits_zero() {
    let output = notifier(&["--help"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("send"));
}

#[test]
fn test_login_failure_marker_for_every_command() {
    for args in [&["init"][..], &["test"][..], &["send", "hello"][..]] {
        let output = notifier(args);
        let stdout = String::from_utf8(output.stdout).unwrap();

        assert_eq!(output.status.code(), Some(1), "args: {:?}", args);
        assert_eq!(stdout, "LOGIN_FAILED: Missing credential: api_id\n");
    }
}

#[test]
fn test_help_words_after_a_command_are_not_help() {
    for args in [
        &["send", "--help"][..],
        &["send", "-h"][..],
        &["send", "--"][..],
        &["test", "--help"][..],
    ] {
        let output = notifier(args);
        let stdout = String::from_utf8(output.stdout).unwrap();

        assert_eq!(output.status.code(), Some(1), "args: {:?}", args);
        assert_eq!(stdout, "LOGIN_FAILED: Missing credential: api_id\n");
    }
}

#[test]
fn test_extra_arguments_are_ignored() {
    for args in [&["send", "a", "b"][..], &["test", "x"][..], &["init", "x"][..]] {
        let output = notifier(args);
        let stdout = String::from_utf8(output.stdout).unwrap();

        assert_eq!(output.status.code(), Some(1), "args: {:?}", args);
        assert_eq!(stdout, "LOGIN_FAILED: Missing credential: api_id\n");
    }
}

#[test]
fn test_help_subcommand_is_unknown() {
    let output = notifier(&["help"]);
    assert!(output.stdout.is_empty());
    assert_eq!(output.status.code(), Some(2));
}
