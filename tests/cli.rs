//! Integration tests for CLI commands.
use itertools::Itertools;
use tempfile::tempdir;

mod common;
use common::{assert_scenlca_fails, assert_scenlca_runs, get_scenlca_stdout};

const EXAMPLE_NAME: &str = "simple";
const PROJECT_DIR: &str = "demos/simple";

/// Test the `run` command
#[test]
fn check_run_command() {
    // Save results to non-existent directory to check that directory creation works
    let tempdir = tempdir().unwrap();
    let output_dir = tempdir.path().join("results");
    assert_scenlca_runs(&[
        "run",
        PROJECT_DIR,
        "--output-dir",
        &output_dir.to_string_lossy(),
        "--years",
        "2030",
    ]);

    for file_name in [
        "electricity_sectoral.csv",
        "electricity_technologies.csv",
        "ldv.csv",
        "ldv_endpoint.csv",
        "metadata.toml",
        "scenlca_info.log",
    ] {
        assert!(output_dir.join(file_name).is_file(), "Missing {file_name}");
    }

    // Not empty, so can't be reused without --overwrite
    let output_dir_str = output_dir.to_string_lossy();
    let args = ["run", PROJECT_DIR, "--output-dir", &output_dir_str];
    assert_scenlca_fails(&args);
    let mut args = args.to_vec();
    args.push("--overwrite");
    assert_scenlca_runs(&args);
}

/// Test the `run` command with years which aren't in the project
#[test]
fn check_run_command_invalid_years() {
    let tempdir = tempdir().unwrap();
    let output_dir = tempdir.path().join("results");
    assert_scenlca_fails(&[
        "run",
        PROJECT_DIR,
        "--output-dir",
        &output_dir.to_string_lossy(),
        "--years",
        "2040",
    ]);
}

/// Test the `validate` command
#[test]
fn check_validate_command() {
    assert_scenlca_runs(&["validate", PROJECT_DIR]);
}

/// Test the `validate` command on a directory which isn't a project
#[test]
fn check_validate_command_missing_project() {
    let tempdir = tempdir().unwrap();
    assert_scenlca_fails(&["validate", &tempdir.path().to_string_lossy()]);
}

/// Test the `example list` command
#[test]
fn check_example_list_command() {
    let stdout = get_scenlca_stdout(&["example", "list"]);
    let lines = stdout.split('\n').collect_vec();
    assert!(lines.contains(&EXAMPLE_NAME));
    assert!(lines.last().is_some_and(|s| s.is_empty()));
}

/// Test the `example info` command
#[test]
fn check_example_info_command() {
    assert!(!get_scenlca_stdout(&["example", "info", EXAMPLE_NAME]).is_empty());
}

/// Test the `example extract` command
#[test]
fn check_example_extract_command() {
    let tmp = tempdir().unwrap();
    let output_dir = tmp.path().join("out");
    assert_scenlca_runs(&[
        "example",
        "extract",
        EXAMPLE_NAME,
        &output_dir.to_string_lossy(),
    ]);
    assert!(output_dir.join("project.toml").is_file());
}

/// Test the `settings show-default` command
#[test]
fn check_settings_show_default_command() {
    let stdout = get_scenlca_stdout(&["settings", "show-default"]);
    assert!(stdout.contains("log_level"));
}

// NB: `example run` is covered by regression tests
