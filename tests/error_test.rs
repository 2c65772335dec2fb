//! Tests for error types

use std::path::PathBuf;

use bench_sweep::Error;

#[test]
fn test_invalid_option_error() {
    let error = Error::InvalidOption("unrecognized option 'lsz'".to_string());
    let error_str = format!("{error}");
    assert!(error_str.contains("Invalid option"));
    assert!(error_str.contains("lsz"));
    assert!(error.is_fatal());
}

#[test]
fn test_child_process_failure_error() {
    let error = Error::ChildProcessFailure {
        command: "sort -quiet=1 -size=18 -lsz=256 > sort.dat".to_string(),
        reason: "exit status: 139".to_string(),
    };
    let error_str = format!("{error}");
    assert!(error_str.contains("Child process failed"));
    assert!(error_str.contains("-size=18"));
    assert!(error_str.contains("139"));
    assert!(!error.is_fatal());
}

#[test]
fn test_filesystem_error() {
    let error = Error::FileSystem {
        path: PathBuf::from("/readonly/out.dat"),
        source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
    };
    let error_str = format!("{error}");
    assert!(error_str.contains("/readonly/out.dat"));
    assert!(error_str.contains("No data can be recorded"));
    assert!(std::error::Error::source(&error).is_some());
    assert!(!error.is_fatal());
}

#[test]
fn test_json_error_from() {
    let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let error: Error = json_err.into();
    assert!(format!("{error}").contains("JSON error"));
    assert!(error.is_fatal());
}

#[test]
fn test_io_error_from() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "plan.json");
    let error: Error = io_err.into();
    assert!(format!("{error}").contains("IO error"));
}

#[test]
fn test_invalid_option_shorthand() {
    let error = Error::invalid_option("bad");
    assert!(matches!(error, Error::InvalidOption(ref msg) if msg == "bad"));
}
