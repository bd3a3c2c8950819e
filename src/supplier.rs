//! Finding the supplier activities for each technology in a region and weighting them by production
//! volume.
use crate::activity::{Activity, ActivityKey};
use crate::error::LcaError;
use crate::filter::Predicate;
use crate::inventory::Database;
use crate::region::{EUROPE_LOCATION, Geomap, REST_OF_WORLD_LOCATION, RegionID};
use crate::technology::{TechnologyID, TechnologyMap};
use anyhow::{Context, Result};
use indexmap::IndexMap;
use itertools::Itertools;
use log::debug;
use std::collections::HashMap;
use std::rc::Rc;

/// The share of a technology's supply provided by each activity
pub type SupplierShares = IndexMap<ActivityKey, f64>;

/// Supplier shares for every technology, keyed by technology ID
pub type SupplierShareMap = IndexMap<TechnologyID, SupplierShares>;

/// Production volumes of inventory activities, keyed by activity name and location.
///
/// Only used to weight multiple candidate suppliers against each other.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductionVolumes(HashMap<(String, String), f64>);

impl ProductionVolumes {
    /// Create from a map keyed by (activity name, location)
    pub fn new(volumes: HashMap<(String, String), f64>) -> Self {
        Self(volumes)
    }

    /// Get the production volume of the activity with this name in this location, if known
    pub fn get(&self, name: &str, location: &str) -> Option<f64> {
        self.0.get(&(name.to_string(), location.to_string())).copied()
    }

    /// Get the production volume of an activity, defaulting to zero if not known
    fn get_or_zero(&self, activity: &Activity) -> f64 {
        self.get(&activity.name, &activity.location)
            .unwrap_or_else(|| {
                debug!(
                    "No production volume for '{}' in {}; assuming zero",
                    activity.name, activity.location
                );
                0.0
            })
    }
}

/// Find the activities matching `predicate`, falling back to broader locations if necessary.
///
/// The locations are tried in this order, stopping as soon as any activities are found:
///
/// 1. `preferred_locations` (if empty, no location restriction is applied)
/// 2. Europe (`RER`)
/// 3. Rest of world (`RoW`)
///
/// # Returns
///
/// The matching activities, or [`LcaError::NoSupplierFound`] if none of the locations yield a
/// match.
pub fn find_suppliers(
    db: &Database,
    predicate: &Predicate,
    preferred_locations: &[String],
) -> Result<Vec<Rc<Activity>>> {
    let tiers = [
        preferred_locations.to_vec(),
        vec![EUROPE_LOCATION.to_string()],
        vec![REST_OF_WORLD_LOCATION.to_string()],
    ];

    for (idx, locations) in tiers.iter().enumerate() {
        let found = db.select(predicate, locations);
        if !found.is_empty() {
            if idx > 0 {
                debug!(
                    "Falling back to locations [{}] for {predicate}",
                    locations.join(", ")
                );
            }
            return Ok(found);
        }
    }

    Err(LcaError::NoSupplierFound {
        searched: tiers.into_iter().flatten().collect(),
    }
    .into())
}

/// Calculate the share of supply for each of a technology's candidate suppliers.
///
/// A single supplier gets the whole share. Multiple suppliers are weighted by production volume,
/// with unknown volumes treated as zero. If the total volume is zero, all suppliers get an equal
/// share.
pub fn shares_for_suppliers(
    suppliers: &[Rc<Activity>],
    volumes: &ProductionVolumes,
) -> SupplierShares {
    if let [supplier] = suppliers {
        return [(supplier.key.clone(), 1.0)].into_iter().collect();
    }

    let supplier_volumes = suppliers
        .iter()
        .map(|supplier| volumes.get_or_zero(supplier))
        .collect_vec();
    let total: f64 = supplier_volumes.iter().sum();

    if total == 0.0 {
        debug!("No production volumes for candidate suppliers; weighting equally");
        let share = 1.0 / suppliers.len() as f64;
        return suppliers
            .iter()
            .map(|supplier| (supplier.key.clone(), share))
            .collect();
    }

    suppliers
        .iter()
        .zip(supplier_volumes)
        .map(|(supplier, volume)| (supplier.key.clone(), volume / total))
        .collect()
}

/// Calculate supplier shares for every technology in a region.
///
/// # Arguments
///
/// * `db` - The inventory database to search
/// * `region_id` - The scenario region
/// * `technologies` - The technologies and their filters
/// * `geomap` - Maps the region to inventory locations
/// * `volumes` - Production volumes for weighting multiple suppliers
///
/// # Returns
///
/// A map of technology ID to supplier shares, which sum to one for each technology. An error is
/// returned if any technology has no supplier.
pub fn supplier_shares(
    db: &Database,
    region_id: &RegionID,
    technologies: &TechnologyMap,
    geomap: &Geomap,
    volumes: &ProductionVolumes,
) -> Result<SupplierShareMap> {
    let locations = geomap.locations_for(region_id)?;

    technologies
        .values()
        .map(|technology| -> Result<_> {
            let suppliers = find_suppliers(db, &technology.predicate, locations)
                .with_context(|| {
                    format!(
                        "No supplier for technology {} in region {region_id} (database {})",
                        technology.id,
                        db.id()
                    )
                })?;

            Ok((
                technology.id.clone(),
                shares_for_suppliers(&suppliers, volumes),
            ))
        })
        .try_collect()
}
