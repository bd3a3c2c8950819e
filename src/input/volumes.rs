//! Code for reading production volumes of inventory activities.
use super::{input_err_msg, read_csv};
use crate::supplier::ProductionVolumes;
use anyhow::{Context, Result, ensure};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

const PRODUCTION_VOLUMES_FILE_NAME: &str = "production_volumes.csv";

#[derive(PartialEq, Debug, Deserialize)]
struct ProductionVolumeRaw {
    name: String,
    location: String,
    volume: f64,
}

/// Read production volumes from the specified project directory.
///
/// Volumes must be finite and non-negative, with at most one per activity name and location.
pub fn read_production_volumes(project_dir: &Path) -> Result<ProductionVolumes> {
    let file_path = project_dir.join(PRODUCTION_VOLUMES_FILE_NAME);
    let volumes = read_csv(&file_path)?;
    build_production_volumes(volumes).with_context(|| input_err_msg(&file_path))
}

fn build_production_volumes<I>(iter: I) -> Result<ProductionVolumes>
where
    I: Iterator<Item = ProductionVolumeRaw>,
{
    let mut map = HashMap::new();
    for raw in iter {
        ensure!(
            raw.volume.is_finite() && raw.volume >= 0.0,
            "Invalid production volume for '{}' in {}: {}",
            raw.name,
            raw.location,
            raw.volume
        );

        let key = (raw.name, raw.location);
        ensure!(
            !map.contains_key(&key),
            "Duplicate production volume for '{}' in {}",
            key.0,
            key.1
        );
        map.insert(key, raw.volume);
    }

    Ok(ProductionVolumes::new(map))
}
