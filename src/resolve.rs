//! Resolving scenario variables to demand for inventory activities.
//!
//! Only a closed set of variables is understood:
//!
//! * Light-duty vehicle (LDV) transport demand, e.g. `ES|Transport|Pass|Road|LDV|Large|BEV`
//! * Electricity generation by a technology listed in `technologies.toml`
//!
//! Anything else is a configuration error.
use crate::demand::DemandVector;
use crate::error::LcaError;
use crate::inventory::Database;
use crate::region::{GLOBAL_LOCATION, Geomap, RegionID};
use crate::supplier::{ProductionVolumes, find_suppliers, shares_for_suppliers};
use crate::technology::{Technology, TechnologyMap, technology_for_variable};
use anyhow::{Context, Result, ensure};
use log::debug;
use std::rc::Rc;
use std::str::FromStr;

/// The path prefix shared by all LDV transport demand variables
pub const LDV_PREFIX: &str = "ES|Transport|Pass|Road|LDV";

/// Number of segments in an LDV variable which has a vehicle size and drivetrain
const LDV_SEGMENTS: usize = 7;

/// Vehicle "size" used for two-wheelers, which have no passenger car inventory
const TWO_WHEELERS: &str = "Two-Wheelers";

/// Fraction of diesel vehicles in a liquid-fuel fleet
pub const DIESEL_FRACTION: f64 = 0.4;

/// Regions whose liquid-fuel fleets are assumed to be petrol only
pub const PETROL_ONLY_REGIONS: [&str; 3] = ["USA", "CAZ", "JPN"];

/// The drivetrain of a light-duty vehicle, as reported by the scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Drivetrain {
    /// Battery electric
    Bev,
    /// Fuel cell electric
    Fcev,
    /// Plug-in hybrid
    HybridElectric,
    /// Non-plug-in hybrid
    HybridLiquids,
    /// Internal combustion, liquid fuels
    Liquids,
    /// Internal combustion, gas
    Gases,
}

impl FromStr for Drivetrain {
    type Err = LcaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BEV" => Ok(Self::Bev),
            "FCEV" => Ok(Self::Fcev),
            "Hybrid Electric" => Ok(Self::HybridElectric),
            "Hybrid Liquids" => Ok(Self::HybridLiquids),
            "Liquids" => Ok(Self::Liquids),
            "Gases" => Ok(Self::Gases),
            _ => Err(LcaError::config(format!("Unknown drivetrain: {s}"))),
        }
    }
}

impl Drivetrain {
    /// The inventory powertrains for this drivetrain and the fraction of the fleet for each.
    ///
    /// Powertrains with a zero fraction are omitted.
    pub fn powertrains(self, region_id: &RegionID) -> Vec<(&'static str, f64)> {
        let powertrains = match self {
            Self::Bev => vec![("BEV", 1.0)],
            Self::Fcev => vec![("FCEV", 1.0)],
            Self::HybridElectric => blend("PHEV-d", "PHEV-p", region_id),
            Self::HybridLiquids => blend("HEV-d", "HEV-p", region_id),
            Self::Liquids => blend("ICEV-d", "ICEV-p", region_id),
            Self::Gases => vec![("ICEV-g", 1.0)],
        };

        powertrains
            .into_iter()
            .filter(|(_, fraction)| *fraction > 0.0)
            .collect()
    }

    /// Whether vehicles use a regional inventory activity (rather than the global one).
    ///
    /// Regional copies exist for vehicles which draw on the regional electricity mix.
    pub fn is_regional(self) -> bool {
        matches!(self, Self::Bev | Self::Fcev | Self::HybridElectric)
    }
}

/// Split a liquid-fuel fleet into diesel and petrol vehicles
fn blend(
    diesel: &'static str,
    petrol: &'static str,
    region_id: &RegionID,
) -> Vec<(&'static str, f64)> {
    let diesel_fraction = if PETROL_ONLY_REGIONS.contains(&region_id.as_str()) {
        0.0
    } else {
        DIESEL_FRACTION
    };

    vec![(diesel, diesel_fraction), (petrol, 1.0 - diesel_fraction)]
}

/// An LDV transport demand variable for a particular size of vehicle and drivetrain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LdvVariable<'a> {
    /// Vehicle size class (e.g. `Large`)
    pub size: &'a str,
    /// Drivetrain
    pub drivetrain: Drivetrain,
}

impl<'a> LdvVariable<'a> {
    /// Parse an LDV variable.
    ///
    /// # Returns
    ///
    /// `None` if this is not an LDV variable for a passenger car size and drivetrain. An error is
    /// returned if it is, but the drivetrain is unknown.
    pub fn parse(variable: &'a str) -> Result<Option<Self>, LcaError> {
        if !is_ldv_variable(variable) {
            return Ok(None);
        }

        let mut segments = variable.rsplitn(3, '|');
        let (Some(drivetrain), Some(size)) = (segments.next(), segments.next()) else {
            return Ok(None);
        };

        Ok(Some(Self {
            size,
            drivetrain: drivetrain.parse()?,
        }))
    }

    /// The name of the inventory activity for one of this variable's powertrains
    pub fn activity_name(&self, powertrain: &str, year: u32) -> String {
        format!(
            "transport, passenger car, {powertrain}, {}, {year}",
            self.size
        )
    }
}

/// Whether this variable is LDV transport demand for a passenger car size and drivetrain.
///
/// Aggregate variables (e.g. `ES|Transport|Pass|Road|LDV`) and two-wheelers are excluded.
pub fn is_ldv_variable(variable: &str) -> bool {
    variable.starts_with(LDV_PREFIX)
        && variable.split('|').count() == LDV_SEGMENTS
        && !variable.contains(TWO_WHEELERS)
}

/// The kinds of variable which can be resolved
#[derive(Debug)]
enum VariableKind<'a> {
    Ldv(LdvVariable<'a>),
    Electricity(Rc<Technology>),
}

/// Resolves scenario variables to [`DemandVector`]s for a particular inventory database
pub struct Resolver<'a> {
    technologies: &'a TechnologyMap,
    geomap: &'a Geomap,
    volumes: &'a ProductionVolumes,
}

impl<'a> Resolver<'a> {
    /// Create a new resolver
    pub fn new(
        technologies: &'a TechnologyMap,
        geomap: &'a Geomap,
        volumes: &'a ProductionVolumes,
    ) -> Self {
        Self {
            technologies,
            geomap,
            volumes,
        }
    }

    fn classify<'v>(&self, variable: &'v str) -> Result<VariableKind<'v>, LcaError> {
        if let Some(ldv) = LdvVariable::parse(variable)? {
            return Ok(VariableKind::Ldv(ldv));
        }

        if let Some(technology) = technology_for_variable(self.technologies, variable) {
            return Ok(VariableKind::Electricity(Rc::clone(technology)));
        }

        Err(LcaError::config(format!("Unsupported variable: {variable}")))
    }

    /// Resolve a scenario variable to demand for inventory activities.
    ///
    /// # Arguments
    ///
    /// * `variable` - The scenario variable
    /// * `db` - The inventory database for this year
    /// * `year` - The scenario year
    /// * `region_id` - The scenario region
    /// * `scale` - The amount of the variable's output to provide (e.g. in pkm or kWh)
    ///
    /// # Returns
    ///
    /// The demand for each activity, which sums to `scale`.
    pub fn resolve(
        &self,
        variable: &str,
        db: &Database,
        year: u32,
        region_id: &RegionID,
        scale: f64,
    ) -> Result<DemandVector> {
        ensure!(
            scale.is_finite() && scale >= 0.0,
            "Invalid scale for variable {variable}: {scale}"
        );

        match self.classify(variable)? {
            VariableKind::Ldv(ldv) => resolve_ldv(&ldv, db, year, region_id, scale),
            VariableKind::Electricity(technology) => {
                let locations = self.geomap.locations_for(region_id)?;
                let suppliers = find_suppliers(db, &technology.predicate, locations)
                    .with_context(|| {
                        format!(
                            "No supplier for technology {} in region {region_id}",
                            technology.id
                        )
                    })?;

                Ok(shares_for_suppliers(&suppliers, self.volumes)
                    .into_iter()
                    .map(|(key, share)| (key, share * scale))
                    .collect())
            }
        }
    }
}

fn resolve_ldv(
    ldv: &LdvVariable,
    db: &Database,
    year: u32,
    region_id: &RegionID,
    scale: f64,
) -> Result<DemandVector> {
    let location = if ldv.drivetrain.is_regional() {
        region_id.as_str()
    } else {
        GLOBAL_LOCATION
    };

    let mut demand = DemandVector::new();
    for (powertrain, fraction) in ldv.drivetrain.powertrains(region_id) {
        let name = ldv.activity_name(powertrain, year);
        debug!("Using '{name}' in {location} for {fraction} of {} fleet", ldv.size);
        let activity = db.get_exact(&name, location)?;
        demand.add(activity.key.clone(), scale * fraction);
    }

    Ok(demand)
}
