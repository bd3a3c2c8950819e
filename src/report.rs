//! Reports of impact scores for scenario electricity generation and passenger transport.
//!
//! Each report iterates over every (year, region) pair, builds [`DemandVector`]s for the relevant
//! scenario variables and scores them with the engine. Any error aborts the whole report.
//!
//! [`DemandVector`]: crate::demand::DemandVector
use crate::engine::{MethodID, ScoringEngine, select_methods};
use crate::project::Project;
use anyhow::{Context, Result};
use itertools::Itertools;
use log::info;

pub mod electricity;
pub use electricity::{ElectricitySectoralRow, ElectricityTechnologyRow};
pub mod transport;
pub use transport::{LdvEndpointRow, LdvRow};

/// kWh per EJ
pub const EJ_TO_KWH: f64 = 1e18 / 3.6e6;

/// pkm per billion pkm
pub const BPKM_TO_PKM: f64 = 1e9;

/// The results of all reports
#[derive(Debug, Default, PartialEq)]
pub struct Reports {
    /// Scores for the whole electricity sector
    pub electricity_sectoral: Vec<ElectricitySectoralRow>,
    /// Scores for each electricity technology
    pub electricity_technologies: Vec<ElectricityTechnologyRow>,
    /// Scores for each LDV transport variable
    pub ldv: Vec<LdvRow>,
    /// Endpoint scores for the LDV fleet
    pub ldv_endpoint: Vec<LdvEndpointRow>,
}

/// Run all reports for a project.
///
/// # Arguments
///
/// * `project` - The project to report on
/// * `engine` - The scoring engine
/// * `years` - The years to report on (a subset of the project's years)
pub fn generate_reports(
    project: &Project,
    engine: &dyn ScoringEngine,
    years: &[u32],
) -> Result<Reports> {
    let methods = select_methods(engine, &project.parameters.indicator_group)?;
    let endpoint_methods = select_methods(engine, &project.parameters.endpoint_indicator_group)?;
    info!(
        "Reporting on {} years and {} regions with methods: {}",
        years.len(),
        project.regions.len(),
        methods.iter().join("; ")
    );

    let electricity_sectoral = electricity::sectoral(project, engine, years, &methods)
        .context("Failed to generate electricity sectoral report")?;
    info!("Electricity sectoral report complete");

    let electricity_technologies = electricity::technologies(project, engine, years, &methods)
        .context("Failed to generate electricity technology report")?;
    info!("Electricity technology report complete");

    let ldv = transport::ldv(project, engine, years, &methods)
        .context("Failed to generate LDV report")?;
    info!("LDV report complete");

    let ldv_endpoint = transport::ldv_endpoint(project, engine, years, &endpoint_methods)
        .context("Failed to generate LDV endpoint report")?;
    info!("LDV endpoint report complete");

    Ok(Reports {
        electricity_sectoral,
        electricity_technologies,
        ldv,
        ldv_endpoint,
    })
}

/// Pair up methods with their scores
fn zip_scores<'a>(
    methods: &'a [MethodID],
    scores: Vec<f64>,
) -> impl Iterator<Item = (&'a MethodID, f64)> {
    methods.iter().zip(scores)
}
