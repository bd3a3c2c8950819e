//! The project represents the static input data provided by the user.
use crate::inventory::{Database, Inventory};
use crate::region::{Geomap, RegionID};
use crate::resolve::{Resolver, is_ldv_variable};
use crate::scenario::ScenarioTable;
use crate::supplier::{ProductionVolumes, supplier_shares};
use crate::technology::TechnologyMap;
use anyhow::{Context, Result};
use indexmap::IndexSet;
use itertools::iproduct;
use log::info;
use std::path::PathBuf;

pub mod parameters;
pub use parameters::ProjectParameters;

/// Project definition
#[derive(Debug)]
pub struct Project {
    /// Path to project folder
    pub project_path: PathBuf,
    /// Parameters from the project TOML file
    pub parameters: ProjectParameters,
    /// Energy-scenario output
    pub scenario: ScenarioTable,
    /// The life-cycle inventory, one database per year
    pub inventory: Inventory,
    /// Technologies and their filters
    pub technologies: TechnologyMap,
    /// Production volumes for weighting suppliers
    pub volumes: ProductionVolumes,
    /// Maps regions onto inventory locations
    pub geomap: Geomap,
    /// The regions to report on
    pub regions: IndexSet<RegionID>,
}

impl Project {
    /// Iterate over the project's years.
    pub fn iter_years(&self) -> impl Iterator<Item = u32> + '_ {
        self.parameters.years.iter().copied()
    }

    /// Iterate over the regions to report on.
    pub fn iter_regions(&self) -> impl Iterator<Item = &RegionID> + Clone {
        self.regions.iter()
    }

    /// Get the inventory database for a year
    pub fn database(&self, year: u32) -> Result<&Database> {
        self.inventory
            .get_database(&self.parameters.database_label(year))
    }

    /// Create a resolver for this project's technologies
    pub fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&self.technologies, &self.geomap, &self.volumes)
    }

    /// Check that every technology and LDV variable can be resolved for the given years.
    ///
    /// Each technology must have at least one supplier in every region and each LDV variable
    /// reported by the scenario must have matching vehicle activities. Nothing is scored.
    pub fn check_resolution(&self, years: &[u32]) -> Result<()> {
        let resolver = self.resolver();

        for (year, region_id) in iproduct!(years.iter().copied(), self.iter_regions()) {
            let db = self.database(year)?;
            supplier_shares(
                db,
                region_id,
                &self.technologies,
                &self.geomap,
                &self.volumes,
            )?;

            for record in self.scenario.records_for(region_id, year) {
                if !is_ldv_variable(&record.variable) {
                    continue;
                }

                resolver
                    .resolve(&record.variable, db, year, region_id, 1.0)
                    .with_context(|| {
                        format!(
                            "Failed to resolve {} in {region_id} ({year})",
                            record.variable
                        )
                    })?;
            }

            info!("Resolved all variables for {region_id} ({year})");
        }

        Ok(())
    }
}
