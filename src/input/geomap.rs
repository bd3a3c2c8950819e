//! Code for reading the mapping from scenario regions to inventory locations.
use super::read_csv;
use crate::region::{Geomap, RegionID};
use anyhow::Result;
use serde::Deserialize;
use std::path::Path;

const GEOMAP_FILE_NAME: &str = "geomap.csv";

#[derive(PartialEq, Debug, Deserialize)]
struct GeomapRaw {
    region: RegionID,
    location: String,
}

/// Read the geomap from the specified project directory.
///
/// Each row maps a scenario region onto one inventory location. Locations keep the order in which
/// they are listed.
pub fn read_geomap(project_dir: &Path) -> Result<Geomap> {
    let file_path = project_dir.join(GEOMAP_FILE_NAME);
    let geomap = Geomap::from_pairs(
        read_csv::<GeomapRaw>(&file_path)?.map(|raw| (raw.region, raw.location)),
    );

    Ok(geomap)
}
