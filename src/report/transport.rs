//! Impact scores for light-duty vehicle (LDV) passenger transport.
use super::{BPKM_TO_PKM, zip_scores};
use crate::demand::DemandVector;
use crate::engine::{MethodID, ScoringEngine, score_methods};
use crate::inventory::Database;
use crate::project::Project;
use crate::region::RegionID;
use crate::resolve::is_ldv_variable;
use anyhow::{Context, Result};
use itertools::{Itertools, iproduct};
use serde::Serialize;

/// Scores for one LDV transport variable
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LdvRow {
    /// Scenario year
    pub year: u32,
    /// Scenario region
    pub region: RegionID,
    /// The scenario variable (e.g. `ES|Transport|Pass|Road|LDV|Large|BEV`)
    pub variable: String,
    /// Impact-assessment method
    pub method: MethodID,
    /// Transport demand (pkm)
    pub demand_pkm: f64,
    /// Score for all transport demand
    pub total_score: f64,
    /// Score per pkm, if there is any demand
    pub score_pkm: Option<f64>,
}

/// Endpoint scores for the whole LDV fleet of a region
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LdvEndpointRow {
    /// Scenario year
    pub year: u32,
    /// Scenario region
    pub region: RegionID,
    /// Impact-assessment method
    pub method: MethodID,
    /// Score for all LDV transport demand
    pub total_score: f64,
}

/// Resolve the demand for each LDV variable reported for a region and year
fn ldv_demands(
    project: &Project,
    db: &Database,
    year: u32,
    region_id: &RegionID,
) -> Result<Vec<(String, f64, DemandVector)>> {
    let resolver = project.resolver();

    project
        .scenario
        .records_for(region_id, year)
        .filter(|record| is_ldv_variable(&record.variable))
        .map(|record| -> Result<_> {
            let demand_pkm = record.value * BPKM_TO_PKM;
            let demand = resolver
                .resolve(&record.variable, db, year, region_id, demand_pkm)
                .with_context(|| {
                    format!(
                        "Failed to resolve {} in {region_id} ({year})",
                        record.variable
                    )
                })?;

            Ok((record.variable.clone(), demand_pkm, demand))
        })
        .try_collect()
}

/// Score each LDV variable in each region.
pub fn ldv(
    project: &Project,
    engine: &dyn ScoringEngine,
    years: &[u32],
    methods: &[MethodID],
) -> Result<Vec<LdvRow>> {
    iproduct!(years.iter().copied(), project.iter_regions())
        .map(|(year, region_id)| ldv_rows(project, engine, methods, year, region_id))
        .flatten_ok()
        .try_collect()
}

fn ldv_rows(
    project: &Project,
    engine: &dyn ScoringEngine,
    methods: &[MethodID],
    year: u32,
    region_id: &RegionID,
) -> Result<Vec<LdvRow>> {
    let db = project.database(year)?;

    ldv_demands(project, db, year, region_id)?
        .into_iter()
        .map(|(variable, demand_pkm, demand)| -> Result<Vec<_>> {
            let scores = score_methods(engine, &demand, methods)?;

            Ok(zip_scores(methods, scores)
                .map(|(method, total_score)| LdvRow {
                    year,
                    region: region_id.clone(),
                    variable: variable.clone(),
                    method: method.clone(),
                    demand_pkm,
                    total_score,
                    score_pkm: (demand_pkm > 0.0).then(|| total_score / demand_pkm),
                })
                .collect())
        })
        .flatten_ok()
        .try_collect()
}

/// Score the whole LDV fleet of each region with endpoint methods.
///
/// The demand for every LDV variable is combined into a single demand vector per region.
pub fn ldv_endpoint(
    project: &Project,
    engine: &dyn ScoringEngine,
    years: &[u32],
    methods: &[MethodID],
) -> Result<Vec<LdvEndpointRow>> {
    iproduct!(years.iter().copied(), project.iter_regions())
        .map(|(year, region_id)| -> Result<Vec<_>> {
            let db = project.database(year)?;
            let mut fleet = DemandVector::new();
            for (_, _, demand) in ldv_demands(project, db, year, region_id)? {
                fleet.extend(&demand);
            }

            let scores = score_methods(engine, &fleet, methods)?;
            Ok(zip_scores(methods, scores)
                .map(|(method, total_score)| LdvEndpointRow {
                    year,
                    region: region_id.clone(),
                    method: method.clone(),
                    total_score,
                })
                .collect())
        })
        .flatten_ok()
        .try_collect()
}
