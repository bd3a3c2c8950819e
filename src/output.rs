//! The module responsible for writing report output to file.
use crate::report::{
    ElectricitySectoralRow, ElectricityTechnologyRow, LdvEndpointRow, LdvRow, Reports,
};
use anyhow::{Context, Result, ensure};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

pub mod metadata;

/// The output file name for electricity sectoral scores
const ELECTRICITY_SECTORAL_FILE_NAME: &str = "electricity_sectoral.csv";

/// The output file name for electricity technology scores
const ELECTRICITY_TECHNOLOGIES_FILE_NAME: &str = "electricity_technologies.csv";

/// The output file name for LDV transport scores
const LDV_FILE_NAME: &str = "ldv.csv";

/// The output file name for LDV fleet endpoint scores
const LDV_ENDPOINT_FILE_NAME: &str = "ldv_endpoint.csv";

/// Get the default output directory for the project.
///
/// This is a folder named after the project, under `results_root`.
pub fn get_output_dir(project_dir: &Path, results_root: PathBuf) -> Result<PathBuf> {
    // The project name comes from the directory name, so the path needs resolving first
    let project_dir = project_dir
        .canonicalize()
        .context("Could not resolve path to project")?;
    let project_name = project_dir
        .file_name()
        .context("Project cannot be in root folder")?
        .to_str()
        .context("Invalid chars in project dir name")?;

    Ok([results_root, project_name.into()].iter().collect())
}

/// Create a new output directory, optionally deleting existing data.
///
/// # Returns
///
/// `true` if an existing, non-empty directory was deleted, otherwise `false`.
pub fn create_output_directory(output_dir: &Path, allow_overwrite: bool) -> Result<bool> {
    let overwrite = if let Ok(mut entries) = fs::read_dir(output_dir) {
        if entries.next().is_none() {
            // Already exists and is empty
            return Ok(false);
        }

        ensure!(
            allow_overwrite,
            "Output folder already exists and is not empty. Please delete the folder or pass the \
            --overwrite command-line option."
        );

        fs::remove_dir_all(output_dir)?;
        true
    } else {
        false
    };

    fs::create_dir_all(output_dir)?;

    Ok(overwrite)
}

/// A row of a CSV report file
trait ReportRow: Serialize {
    /// The column names, matching the serialised field names
    const HEADER: &'static [&'static str];
}

impl ReportRow for ElectricitySectoralRow {
    const HEADER: &'static [&'static str] = &[
        "year",
        "region",
        "method",
        "total_score",
        "demand_kwh",
        "score_per_kwh",
    ];
}

impl ReportRow for ElectricityTechnologyRow {
    const HEADER: &'static [&'static str] = &[
        "year",
        "region",
        "technology",
        "method",
        "score_per_kwh",
        "demand_kwh",
        "total_score",
    ];
}

impl ReportRow for LdvRow {
    const HEADER: &'static [&'static str] = &[
        "year",
        "region",
        "variable",
        "method",
        "demand_pkm",
        "total_score",
        "score_pkm",
    ];
}

impl ReportRow for LdvEndpointRow {
    const HEADER: &'static [&'static str] = &["year", "region", "method", "total_score"];
}

/// Write rows to a CSV file with a header row.
///
/// serde only writes the header along with the first row, so for an empty report it is written
/// explicitly.
fn write_rows<T: ReportRow>(file_path: &Path, rows: &[T]) -> Result<()> {
    let mut writer = csv::Writer::from_path(file_path)?;
    if rows.is_empty() {
        writer.write_record(T::HEADER)?;
    }
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}

/// Write all reports to CSV files in the output directory
pub fn write_reports(output_path: &Path, reports: &Reports) -> Result<()> {
    let files = [
        ELECTRICITY_SECTORAL_FILE_NAME,
        ELECTRICITY_TECHNOLOGIES_FILE_NAME,
        LDV_FILE_NAME,
        LDV_ENDPOINT_FILE_NAME,
    ]
    .map(|file_name| output_path.join(file_name));

    let [sectoral, technologies, ldv, ldv_endpoint] = &files;
    write_rows(sectoral, &reports.electricity_sectoral)
        .and_then(|()| write_rows(technologies, &reports.electricity_technologies))
        .and_then(|()| write_rows(ldv, &reports.ldv))
        .and_then(|()| write_rows(ldv_endpoint, &reports.ldv_endpoint))
        .with_context(|| format!("Failed to write reports to {}", output_path.display()))
}
