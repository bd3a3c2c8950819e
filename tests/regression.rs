//! Common code for running regression tests.
use float_cmp::approx_eq;
use itertools::Itertools;
use scenlca::cli::RunOpts;
use scenlca::cli::example::handle_example_run_command;
use scenlca::settings::Settings;
use std::env;
use std::fs::read_dir;
use std::path::{Path, PathBuf};
use tempfile::{TempDir, tempdir};

/// Relative tolerance for comparing floating-point values
const FLOAT_CMP_TOLERANCE: f64 = 1e-10;

// The function below gives a spurious warning about being unused because of the multiple `mod
// regression` declarations in different test files, so we suppress the warning manually

/// Run a regression test for a demo project
#[allow(dead_code)]
pub fn run_regression_test(example_name: &str) {
    unsafe { env::set_var("SCENLCA_LOG_LEVEL", "off") };

    // Allow user to set output dir for regression tests so they can examine results
    let tmp: TempDir;
    let output_dir = if let Ok(dir) = env::var("SCENLCA_TEST_OUTPUT_DIR") {
        [dir.as_str(), example_name].iter().collect()
    } else {
        tmp = tempdir().unwrap();
        tmp.path().join(example_name)
    };

    let opts = RunOpts {
        output_dir: Some(output_dir.clone()),
        overwrite: true,
        years: None,
    };
    handle_example_run_command(example_name, &opts, Some(Settings::default())).unwrap();

    let test_data_dir = PathBuf::from(format!("tests/data/{example_name}"));
    compare_output_dirs(&output_dir, &test_data_dir);
}

fn compare_output_dirs(output_dir: &Path, test_data_dir: &Path) {
    let file_names1 = get_csv_file_names(output_dir);
    let file_names2 = get_csv_file_names(test_data_dir);

    // Check that output files haven't been added/removed
    assert_eq!(file_names1, file_names2);

    let mut errors = Vec::new();
    for file_name in file_names1 {
        compare_records(output_dir, test_data_dir, &file_name, &mut errors);
    }

    assert!(
        errors.is_empty(),
        "The following errors occurred:\n  * {}",
        errors.join("\n  * ")
    );
}

fn compare_records(
    output_dir1: &Path,
    output_dir2: &Path,
    file_name: &str,
    errors: &mut Vec<String>,
) {
    let records1 = read_records(&output_dir1.join(file_name));
    let records2 = read_records(&output_dir2.join(file_name));

    // Check for different number of records
    if records1.len() != records2.len() {
        errors.push(format!(
            "{}: Different number of records: {} vs {}",
            file_name,
            records1.len(),
            records2.len()
        ));
    }

    for (num, (record1, record2)) in records1.into_iter().zip(records2).enumerate() {
        if !compare_record(&record1, &record2) {
            errors.push(format!(
                "{file_name}: record {num}:\n    + {record1:?}\n    - {record2:?}"
            ));
        }
    }
}

fn compare_record(record1: &[String], record2: &[String]) -> bool {
    record1.len() == record2.len()
        && record1.iter().zip(record2).all(|(f1, f2)| {
            // First try to compare fields as floating-point values, falling back on string
            // comparison
            try_compare_floats(f1, f2).unwrap_or_else(|| f1 == f2)
        })
}

/// Parse a string into an `f64`, returning `None` if parsing fails or value is infinite/NaN
fn parse_finite(s: &str) -> Option<f64> {
    s.parse().ok().filter(|f: &f64| f.is_finite())
}

fn try_compare_floats(s1: &str, s2: &str) -> Option<bool> {
    let float1 = parse_finite(s1)?;
    let float2 = parse_finite(s2)?;
    let scale = float1.abs().max(float2.abs()).max(1.0);

    Some(approx_eq!(
        f64,
        float1 / scale,
        float2 / scale,
        epsilon = FLOAT_CMP_TOLERANCE
    ))
}

/// Get the names of CSV files expected to appear in the given folder
fn get_csv_file_names(dir_path: &Path) -> Vec<String> {
    read_dir(dir_path)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|file_name| file_name.ends_with(".csv"))
        .sorted()
        .collect()
}

/// Read all records from a CSV file, including the header
fn read_records(path: &Path) -> Vec<Vec<String>> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .unwrap()
        .into_records()
        .map(|record| record.unwrap().iter().map(str::to_string).collect())
        .collect()
}
