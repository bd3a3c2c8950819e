//! Regions of the energy scenario and their mapping onto inventory locations.
use crate::error::LcaError;
use crate::id::define_id_type;
use anyhow::Result;
use indexmap::IndexMap;

define_id_type! {RegionID}

/// Location code for the European aggregate, tried when a region's own locations yield nothing
pub const EUROPE_LOCATION: &str = "RER";

/// Location code for "rest of world", the last resort when searching for suppliers
pub const REST_OF_WORLD_LOCATION: &str = "RoW";

/// Location code used by global (non-regionalised) datasets
pub const GLOBAL_LOCATION: &str = "GLO";

/// Maps scenario regions onto the inventory locations they cover.
///
/// A scenario region (e.g. `EUR`) usually spans several inventory locations (e.g. `DE`, `FR`, ...).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Geomap(IndexMap<RegionID, Vec<String>>);

impl Geomap {
    /// Create a geomap from region/location pairs, keeping the order in which they are given
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (RegionID, String)>,
    {
        let mut map: IndexMap<RegionID, Vec<String>> = IndexMap::new();
        for (region_id, location) in pairs {
            let locations = map.entry(region_id).or_default();
            if !locations.contains(&location) {
                locations.push(location);
            }
        }

        Self(map)
    }

    /// Get the inventory locations for the given region
    pub fn locations_for(&self, region_id: &RegionID) -> Result<&[String]> {
        let locations = self.0.get(region_id).ok_or_else(|| {
            LcaError::config(format!("Region {region_id} is missing from the geomap"))
        })?;

        Ok(locations)
    }

    /// Whether the geomap has an entry for this region
    pub fn contains(&self, region_id: &RegionID) -> bool {
        self.0.contains_key(region_id)
    }

    /// Iterate over the regions in the geomap
    pub fn regions(&self) -> impl Iterator<Item = &RegionID> {
        self.0.keys()
    }
}
