//! Code for reading technologies and their filter specifications from a TOML file.
use super::{input_err_msg, read_toml};
use crate::filter::{Criteria, FilterSpec};
use crate::technology::{Technology, TechnologyID, TechnologyMap};
use anyhow::{Context, Result, ensure};
use indexmap::IndexMap;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use std::rc::Rc;

const TECHNOLOGIES_FILE_NAME: &str = "technologies.toml";

#[derive(PartialEq, Debug, Deserialize)]
struct TechnologyRaw {
    variable: Option<String>,
    filter: Criteria,
    #[serde(default)]
    mask: Criteria,
    #[serde(default)]
    filter_exact: bool,
    #[serde(default)]
    mask_exact: bool,
}

/// Read technologies from the specified project directory.
///
/// The file has one table per technology, keyed by technology ID, e.g.:
///
/// ```toml
/// [Coal]
/// variable = "SE|Electricity|Coal"
/// filter = "electricity production, hard coal"
/// mask = { name = ["mine", "supercritical"] }
/// ```
///
/// Filters are compiled when read, so an invalid filter is reported here.
pub fn read_technologies(project_dir: &Path) -> Result<TechnologyMap> {
    let file_path = project_dir.join(TECHNOLOGIES_FILE_NAME);
    let technologies: IndexMap<TechnologyID, TechnologyRaw> = read_toml(&file_path)?;
    build_technologies(technologies).with_context(|| input_err_msg(&file_path))
}

fn build_technologies(raw: IndexMap<TechnologyID, TechnologyRaw>) -> Result<TechnologyMap> {
    ensure!(!raw.is_empty(), "No technologies defined");

    let mut variables = HashSet::new();
    raw.into_iter()
        .map(|(id, raw)| -> Result<_> {
            if let Some(variable) = &raw.variable {
                ensure!(
                    variables.insert(variable.clone()),
                    "Variable {variable} is reported by more than one technology"
                );
            }

            let filter = FilterSpec {
                filter: raw.filter,
                mask: raw.mask,
                filter_exact: raw.filter_exact,
                mask_exact: raw.mask_exact,
            };
            let technology = Technology::new(id.clone(), raw.variable, filter)?;

            Ok((id, Rc::new(technology)))
        })
        .collect()
}
