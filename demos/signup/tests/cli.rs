//! End-to-end tests running the `formpipe-signup` binary.

use std::io::Write;
use std::process::{Command, Output};

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_formpipe-signup"))
        .args(args)
        .env_remove("FORMPIPE_DEBUG")
        .env_remove("FORMPIPE_LOG_LEVEL")
        .env_remove("FORMPIPE_RECOVER_PLUGIN_PANICS")
        .output()
        .expect("failed to run formpipe-signup")
}

fn stdout_json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout is not JSON")
}

const VALID: &[&str] = &[
    "username=grace",
    "email=grace@example.com",
    "age=36",
    "birthday=1906-12-09",
    "newsletter=on",
    "password=cobol-rules",
    "confirm=cobol-rules",
];

#[test]
fn test_valid_submission_exits_zero() {
    let output = run(VALID);
    assert!(output.status.success());

    let json = stdout_json(&output);
    assert_eq!(json["valid"], true);
    assert_eq!(json["user"]["username"], "grace");
    assert_eq!(json["user"]["age"], 36);
    assert_eq!(json["user"]["newsletter"], true);
    assert_eq!(json["raw_values"]["confirm"], "***********");
}

#[test]
fn test_invalid_submission_exits_one() {
    let output = run(&["--compact", "username=", "age=old"]);
    assert_eq!(output.status.code(), Some(1));

    let json = stdout_json(&output);
    assert_eq!(json["valid"], false);
    assert!(json["user"].is_null());
    assert_eq!(json["field_errors"]["username"]["code"], "required");
    assert_eq!(json["field_errors"]["age"]["code"], "not_a_number");
    assert_eq!(json["field_errors"]["email"]["code"], "invalid_email");
}

#[test]
fn test_config_file_is_read() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "debug = false\nlog_level = \"error\"").unwrap();
    let path = file.path().to_str().unwrap();

    let mut args = vec!["--config", path];
    args.extend_from_slice(VALID);
    let output = run(&args);
    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["valid"], true);
}

#[test]
fn test_bad_config_exits_two() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "debug = \"not a bool").unwrap();
    let output = run(&["--config", file.path().to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
}
