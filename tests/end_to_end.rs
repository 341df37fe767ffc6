//! End-to-end tests for the postal-extremes binary
//!
//! Run the built executable against small datasets and check the reports it
//! writes and the exit code it returns.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const HEADER: &str = "zip,place,state,county,latitude,longitude\n";

fn run(args: &[&str], cwd: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_postal_extremes"))
        .args(args)
        .current_dir(cwd)
        // Keep a developer's per-user config out of the run
        .env("HOME", cwd)
        .env("XDG_CONFIG_HOME", cwd)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to launch postal_extremes")
}

/// Purpose: the two-region scenario through the real binary
#[test]
fn test_reports_to_stdout() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("codes.csv");
    fs::write(
        &input,
        format!(
            "{}10001,New York,NY,New York,40.7128,-74.0060\n\
             90001,Los Angeles,CA,Los Angeles,33.9731,-118.2437\n",
            HEADER
        ),
    )
    .unwrap();

    let output = run(
        &[input.to_str().unwrap(), "--format", "csv", "-q"],
        temp_dir.path(),
    );

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(
        stdout,
        "Region,Code,Latitude,Longitude\n\
         NY,10001,40.7128,-74.0060\n\
         CA,90001,33.9731,-118.2437\n\
         \n\
         Region,Easternmost,Westernmost,Northernmost,Southernmost\n\
         CA,90001,90001,90001,90001\n\
         NY,10001,10001,10001,10001\n"
    );
}

/// Purpose: header-only input succeeds with empty reports
#[test]
fn test_header_only_input_to_files() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("codes.csv");
    fs::write(&input, HEADER).unwrap();

    let output = run(
        &[
            input.to_str().unwrap(),
            "-e",
            "reports/extremes.txt",
            "-l",
            "reports/listing.txt",
            "-q",
        ],
        temp_dir.path(),
    );

    assert_eq!(output.status.code(), Some(0));
    assert!(output.stdout.is_empty());

    let extremes = fs::read_to_string(temp_dir.path().join("reports/extremes.txt")).unwrap();
    let listing = fs::read_to_string(temp_dir.path().join("reports/listing.txt")).unwrap();
    // Header and separator only
    assert_eq!(extremes.lines().count(), 2);
    assert_eq!(listing.lines().count(), 2);
}

/// Purpose: a missing input exits 1 without writing any report
#[test]
fn test_missing_input_exits_with_failure() {
    let temp_dir = TempDir::new().unwrap();

    let output = run(
        &["does_not_exist.csv", "-e", "extremes.txt", "-l", "listing.txt"],
        temp_dir.path(),
    );

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("does_not_exist.csv"));
    assert!(!temp_dir.path().join("extremes.txt").exists());
}

/// Purpose: an output that cannot be created exits 1
#[test]
fn test_uncreatable_output_exits_with_failure() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("codes.csv");
    fs::write(&input, HEADER).unwrap();
    fs::create_dir(temp_dir.path().join("taken")).unwrap();

    let output = run(
        &[input.to_str().unwrap(), "-e", "taken", "-l", "listing.txt", "-q"],
        temp_dir.path(),
    );

    assert_eq!(output.status.code(), Some(1));
}

/// Purpose: a listing larger than the stdout buffer stays complete and ordered
#[test]
fn test_large_listing_to_stdout() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("codes.csv");
    let mut content = String::from(HEADER);
    for i in 0..5_000 {
        content.push_str(&format!("{:05},Place,NY,County,40.0,-74.0\n", i));
    }
    fs::write(&input, content).unwrap();

    let output = run(
        &[input.to_str().unwrap(), "--format", "csv", "-q"],
        temp_dir.path(),
    );

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();

    // Listing header, 5000 rows, blank line, extremes header, one region
    assert_eq!(lines.len(), 5_004);
    assert_eq!(lines[1], "NY,00000,40.0000,-74.0000");
    assert_eq!(lines[5_000], "NY,04999,40.0000,-74.0000");
    assert_eq!(lines[5_001], "");
    assert_eq!(lines[5_003], "NY,00000,00000,00000,00000");
}
