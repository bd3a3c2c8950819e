//! Read and validate project parameters from `project.toml`.
use crate::activity::DatabaseID;
use crate::input::{input_err_msg, is_sorted_and_unique, read_toml};
use crate::region::RegionID;
use anyhow::{Context, Result, ensure};
use itertools::Itertools;
use serde::Deserialize;
use std::path::Path;

const PROJECT_PARAMETERS_FILE_NAME: &str = "project.toml";

macro_rules! define_param_default {
    ($name:ident, $type: ty, $value: expr) => {
        fn $name() -> $type {
            $value
        }
    };
}

define_param_default!(
    default_indicator_group,
    String,
    "ReCiPe Midpoint (H) V1.13".into()
);
define_param_default!(
    default_endpoint_indicator_group,
    String,
    "ReCiPe Endpoint (H,A)".into()
);

/// Project parameters as defined in the `project.toml` file.
#[derive(Debug, Deserialize, PartialEq)]
pub struct ProjectParameters {
    /// The energy model which produced the scenario (e.g. `remind`)
    pub model: String,
    /// The scenario name (e.g. `BAU`)
    pub scenario: String,
    /// The years to report on
    pub years: Vec<u32>,
    /// The regions to report on.
    ///
    /// If omitted, all scenario regions present in the geomap are used.
    #[serde(default)]
    pub regions: Option<Vec<RegionID>>,
    /// Impact-assessment methods whose names contain this are used for the midpoint reports
    #[serde(default = "default_indicator_group")]
    pub indicator_group: String,
    /// Impact-assessment methods whose names contain this are used for the endpoint report
    #[serde(default = "default_endpoint_indicator_group")]
    pub endpoint_indicator_group: String,
}

/// Check that the `years` parameter is valid
fn check_years(years: &[u32]) -> Result<()> {
    ensure!(!years.is_empty(), "`years` is empty");

    ensure!(
        is_sorted_and_unique(years),
        "`years` must be composed of unique values in order"
    );

    Ok(())
}

/// Check that the `regions` parameter is valid, if present
fn check_regions(regions: Option<&[RegionID]>) -> Result<()> {
    let Some(regions) = regions else {
        return Ok(());
    };

    ensure!(!regions.is_empty(), "`regions` is empty");
    ensure!(regions.iter().all_unique(), "`regions` contains duplicates");

    Ok(())
}

/// Check that a string parameter is not empty
fn check_not_empty(name: &str, value: &str) -> Result<()> {
    ensure!(!value.trim().is_empty(), "`{name}` must not be empty");

    Ok(())
}

impl ProjectParameters {
    /// Read a project file from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `project_dir` - Folder containing project files
    ///
    /// # Returns
    ///
    /// The project file contents as a [`ProjectParameters`] struct or an error if the file is
    /// invalid
    pub fn from_path<P: AsRef<Path>>(project_dir: P) -> Result<ProjectParameters> {
        let file_path = project_dir.as_ref().join(PROJECT_PARAMETERS_FILE_NAME);
        let project_params: ProjectParameters = read_toml(&file_path)?;

        project_params
            .validate()
            .with_context(|| input_err_msg(file_path))?;

        Ok(project_params)
    }

    /// Validate parameters after reading in file
    fn validate(&self) -> Result<()> {
        check_not_empty("model", &self.model)?;
        check_not_empty("scenario", &self.scenario)?;
        check_years(&self.years)?;
        check_regions(self.regions.as_deref())?;
        check_not_empty("indicator_group", &self.indicator_group)?;
        check_not_empty("endpoint_indicator_group", &self.endpoint_indicator_group)?;

        Ok(())
    }

    /// The label of the inventory database for the given year (e.g. `ecoinvent_remind_BAU_2030`)
    pub fn database_label(&self, year: u32) -> DatabaseID {
        format!("ecoinvent_{}_{}_{year}", self.model, self.scenario).into()
    }
}
