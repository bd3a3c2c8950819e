//! Common routines for handling input data.
use crate::engine::UnitScoreEngine;
use crate::project::{Project, ProjectParameters};
use crate::region::{Geomap, RegionID};
use crate::scenario::ScenarioTable;
use anyhow::{Context, Result, bail, ensure};
use indexmap::IndexSet;
use itertools::Itertools;
use log::warn;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

mod geomap;
use geomap::read_geomap;
mod inventory;
use inventory::read_inventory;
mod scenario;
use scenario::read_scenario;
mod technology;
use technology::read_technologies;
mod unit_scores;
use unit_scores::read_unit_scores;
mod volumes;
use volumes::read_production_volumes;

/// Read a series of type `T`s from a CSV file.
///
/// Will raise an error if the file is empty.
///
/// # Arguments
///
/// * `file_path` - Path to the CSV file
pub fn read_csv<'a, T: DeserializeOwned + 'a>(
    file_path: &'a Path,
) -> Result<impl Iterator<Item = T> + 'a> {
    let vec = read_csv_internal(file_path)?;
    if vec.is_empty() {
        bail!("CSV file {} cannot be empty", file_path.display());
    }
    Ok(vec.into_iter())
}

/// Read a series of type `T`s from a CSV file.
///
/// If the file is not present, an empty iterator is returned.
///
/// # Arguments
///
/// * `file_path` - Path to the CSV file
pub fn read_csv_optional<'a, T: DeserializeOwned + 'a>(
    file_path: &'a Path,
) -> Result<impl Iterator<Item = T> + 'a> {
    if !file_path.exists() {
        return Ok(Vec::new().into_iter());
    }

    let vec = read_csv_internal(file_path)?;
    Ok(vec.into_iter())
}

fn read_csv_internal<'a, T: DeserializeOwned + 'a>(file_path: &'a Path) -> Result<Vec<T>> {
    let vec = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(file_path)
        .with_context(|| input_err_msg(file_path))?
        .into_deserialize()
        .process_results(|iter| iter.collect_vec())
        .with_context(|| input_err_msg(file_path))?;

    Ok(vec)
}

/// Parse a TOML file at the specified path.
///
/// # Arguments
///
/// * `file_path` - Path to the TOML file
///
/// # Returns
///
/// * The deserialised TOML data or an error if the file could not be read or parsed.
pub fn read_toml<T: DeserializeOwned>(file_path: &Path) -> Result<T> {
    let toml_str = fs::read_to_string(file_path).with_context(|| input_err_msg(file_path))?;
    let toml_data = toml::from_str(&toml_str).with_context(|| input_err_msg(file_path))?;
    Ok(toml_data)
}

/// Format an error message to include the file path. To be used with `anyhow::Context`.
pub fn input_err_msg<P: AsRef<Path>>(file_path: P) -> String {
    format!("Error reading {}", file_path.as_ref().display())
}

/// Indicates that the slice is sorted and contains no duplicates
pub fn is_sorted_and_unique<T, I>(iter: I) -> bool
where
    T: PartialOrd + Clone,
    I: IntoIterator<Item = T>,
{
    iter.into_iter().tuple_windows().all(|(a, b)| a < b)
}

/// Choose the regions to report on.
///
/// If the project parameters name regions, each must appear in both the scenario and the geomap.
/// Otherwise, every scenario region in the geomap is used (aggregates like `World` usually have no
/// geomap entry).
fn select_regions(
    regions: Option<&[RegionID]>,
    scenario: &ScenarioTable,
    geomap: &Geomap,
) -> Result<IndexSet<RegionID>> {
    let scenario_regions = scenario.regions();

    if let Some(regions) = regions {
        for region_id in regions {
            ensure!(
                scenario_regions.contains(region_id),
                "Region {region_id} not found in scenario"
            );
            ensure!(
                geomap.contains(region_id),
                "Region {region_id} not found in geomap"
            );
        }

        return Ok(regions.iter().cloned().collect());
    }

    let (selected, skipped): (IndexSet<_>, IndexSet<_>) = scenario_regions
        .into_iter()
        .partition(|region_id| geomap.contains(region_id));
    if !skipped.is_empty() {
        warn!(
            "Skipping scenario regions missing from the geomap: {}",
            skipped.iter().join(", ")
        );
    }
    ensure!(!selected.is_empty(), "No scenario regions found in geomap");

    Ok(selected)
}

/// Read a project from the specified directory.
///
/// # Arguments
///
/// * `project_dir` - Folder containing project configuration files
///
/// # Returns
///
/// The static project data and the scoring engine, or an error.
pub fn load_project<P: AsRef<Path>>(project_dir: P) -> Result<(Project, UnitScoreEngine)> {
    let project_dir = project_dir.as_ref();
    let parameters = ProjectParameters::from_path(project_dir)?;
    let scenario = read_scenario(project_dir)?;
    let inventory = read_inventory(project_dir)?;
    let technologies = read_technologies(project_dir)?;
    let volumes = read_production_volumes(project_dir)?;
    let geomap = read_geomap(project_dir)?;
    let engine = read_unit_scores(project_dir, &inventory)?;

    let scenario_years = scenario.years();
    for year in parameters.years.iter().copied() {
        ensure!(
            scenario_years.contains(&year),
            "Year {year} not found in scenario"
        );
    }

    let regions = select_regions(parameters.regions.as_deref(), &scenario, &geomap)?;

    let project = Project {
        project_path: project_dir.to_path_buf(),
        parameters,
        scenario,
        inventory,
        technologies,
        volumes,
        geomap,
        regions,
    };

    // Each year needs its own database
    for year in project.iter_years() {
        project.database(year)?;
    }

    Ok((project, engine))
}
