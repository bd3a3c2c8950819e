//! Code for reading energy-scenario output from a CSV file.
use super::{input_err_msg, read_csv};
use crate::scenario::ScenarioTable;
use anyhow::{Context, Result};
use std::path::Path;

const SCENARIO_FILE_NAME: &str = "scenario.csv";

/// Read the scenario table from the specified project directory.
///
/// The file is in long form with the columns `Region`, `Variable`, `Unit`, `Year` and `Value`.
pub fn read_scenario(project_dir: &Path) -> Result<ScenarioTable> {
    let file_path = project_dir.join(SCENARIO_FILE_NAME);
    let records = read_csv(&file_path)?.collect();
    ScenarioTable::new(records).with_context(|| input_err_msg(&file_path))
}
