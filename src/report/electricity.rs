//! Impact scores for electricity generation.
use super::{EJ_TO_KWH, zip_scores};
use crate::demand::DemandVector;
use crate::engine::{MethodID, ScoringEngine, score_methods};
use crate::project::Project;
use crate::region::RegionID;
use crate::supplier::supplier_shares;
use crate::technology::{Technology, TechnologyID};
use anyhow::{Result, ensure};
use itertools::{Itertools, iproduct};
use serde::Serialize;

/// Scores for the whole electricity sector of a region
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElectricitySectoralRow {
    /// Scenario year
    pub year: u32,
    /// Scenario region
    pub region: RegionID,
    /// Impact-assessment method
    pub method: MethodID,
    /// Score for all electricity generated in the region
    pub total_score: f64,
    /// Electricity generated in the region (kWh)
    pub demand_kwh: f64,
    /// Score per kWh generated
    pub score_per_kwh: f64,
}

/// Scores for a single electricity technology in a region
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElectricityTechnologyRow {
    /// Scenario year
    pub year: u32,
    /// Scenario region
    pub region: RegionID,
    /// The technology
    pub technology: TechnologyID,
    /// Impact-assessment method
    pub method: MethodID,
    /// Score per kWh generated by this technology
    pub score_per_kwh: f64,
    /// Electricity generated by this technology (kWh), if reported by the scenario
    pub demand_kwh: Option<f64>,
    /// Score for all electricity generated by this technology, if reported by the scenario
    pub total_score: Option<f64>,
}

/// The electricity generated by a technology in kWh, if the scenario reports it
fn generation_kwh(
    project: &Project,
    technology: &Technology,
    region_id: &RegionID,
    year: u32,
) -> Result<Option<f64>> {
    let Some(variable) = technology.variable.as_deref() else {
        return Ok(None);
    };
    let Some(value) = project.scenario.value(region_id, variable, year) else {
        return Ok(None);
    };

    ensure!(
        value >= 0.0,
        "Negative generation for {variable} in {region_id} ({year}): {value}"
    );
    let kwh = value * EJ_TO_KWH;
    ensure!(
        kwh.is_finite(),
        "Generation for {variable} in {region_id} ({year}) is too large to convert to kWh"
    );

    Ok(Some(kwh))
}

/// Score all electricity generated in each region.
///
/// The supplier shares of every technology are weighted by the technology's generation and
/// combined into a single demand vector for the region.
pub fn sectoral(
    project: &Project,
    engine: &dyn ScoringEngine,
    years: &[u32],
    methods: &[MethodID],
) -> Result<Vec<ElectricitySectoralRow>> {
    iproduct!(years.iter().copied(), project.iter_regions())
        .map(|(year, region_id)| sectoral_rows(project, engine, methods, year, region_id))
        .flatten_ok()
        .try_collect()
}

fn sectoral_rows(
    project: &Project,
    engine: &dyn ScoringEngine,
    methods: &[MethodID],
    year: u32,
    region_id: &RegionID,
) -> Result<Vec<ElectricitySectoralRow>> {
    let db = project.database(year)?;
    let shares = supplier_shares(
        db,
        region_id,
        &project.technologies,
        &project.geomap,
        &project.volumes,
    )?;

    let mut generation = Vec::new();
    for technology in project.technologies.values() {
        if let Some(kwh) = generation_kwh(project, technology, region_id, year)? {
            generation.push((technology, kwh));
        }
    }

    // No activity's demand can exceed the total, so this bounds the accumulated demand too
    let demand_kwh: f64 = generation.iter().map(|(_, kwh)| kwh).sum();
    ensure!(
        demand_kwh.is_finite(),
        "Total electricity generation in {region_id} ({year}) is too large"
    );
    ensure!(
        demand_kwh > 0.0,
        "No electricity generation in {region_id} ({year})"
    );

    let mut demand = DemandVector::new();
    for (technology, kwh) in generation {
        for (key, share) in &shares[&technology.id] {
            demand.add(key.clone(), kwh * share);
        }
    }

    let scores = score_methods(engine, &demand, methods)?;
    Ok(zip_scores(methods, scores)
        .map(|(method, total_score)| ElectricitySectoralRow {
            year,
            region: region_id.clone(),
            method: method.clone(),
            total_score,
            demand_kwh,
            score_per_kwh: total_score / demand_kwh,
        })
        .collect())
}

/// Score one kWh from each technology in each region.
///
/// Where the scenario reports a technology's generation, its total score is given too.
pub fn technologies(
    project: &Project,
    engine: &dyn ScoringEngine,
    years: &[u32],
    methods: &[MethodID],
) -> Result<Vec<ElectricityTechnologyRow>> {
    iproduct!(years.iter().copied(), project.iter_regions())
        .map(|(year, region_id)| technology_rows(project, engine, methods, year, region_id))
        .flatten_ok()
        .try_collect()
}

fn technology_rows(
    project: &Project,
    engine: &dyn ScoringEngine,
    methods: &[MethodID],
    year: u32,
    region_id: &RegionID,
) -> Result<Vec<ElectricityTechnologyRow>> {
    let db = project.database(year)?;
    let shares = supplier_shares(
        db,
        region_id,
        &project.technologies,
        &project.geomap,
        &project.volumes,
    )?;

    project
        .technologies
        .values()
        .map(|technology| -> Result<Vec<_>> {
            // Supplier shares are the demand for one kWh
            let demand: DemandVector = shares[&technology.id]
                .iter()
                .map(|(key, share)| (key.clone(), *share))
                .collect();
            let demand_kwh = generation_kwh(project, technology, region_id, year)?;
            let scores = score_methods(engine, &demand, methods)?;

            Ok(zip_scores(methods, scores)
                .map(|(method, score_per_kwh)| ElectricityTechnologyRow {
                    year,
                    region: region_id.clone(),
                    technology: technology.id.clone(),
                    method: method.clone(),
                    score_per_kwh,
                    demand_kwh,
                    total_score: demand_kwh.map(|kwh| kwh * score_per_kwh),
                })
                .collect())
        })
        .flatten_ok()
        .try_collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::select_methods;
    use crate::fixture::simple_project;
    use crate::input::load_project;
    use crate::scenario::ScenarioTable;
    use float_cmp::approx_eq;

    const GWP: &str = "ReCiPe Midpoint (H) V1.13|climate change|GWP100";

    fn sectoral_row<'a>(
        rows: &'a [ElectricitySectoralRow],
        year: u32,
        region: &str,
    ) -> &'a ElectricitySectoralRow {
        rows.iter()
            .find(|row| {
                row.year == year && row.region.as_str() == region && row.method.as_str() == GWP
            })
            .unwrap()
    }

    #[test]
    fn sectoral_simple() {
        let (project, engine) = load_project(simple_project()).unwrap();
        let methods = select_methods(&engine, "ReCiPe Midpoint (H) V1.13").unwrap();
        let rows = sectoral(&project, &engine, &[2030], &methods).unwrap();

        // Coal is a 1:3 mix of 1.0 and 0.8; gas is a 1:1 mix of 0.4 and 0.6
        let eur = sectoral_row(&rows, 2030, "EUR");
        assert!(approx_eq!(f64, eur.demand_kwh, 4.0 * EJ_TO_KWH, epsilon = 1.0));
        assert!(approx_eq!(f64, eur.score_per_kwh, 0.55625, epsilon = 1e-9));
        assert!(approx_eq!(
            f64,
            eur.total_score,
            eur.score_per_kwh * eur.demand_kwh,
            ulps = 4
        ));

        // Gas falls back to RoW, no solar generation
        let usa = sectoral_row(&rows, 2030, "USA");
        assert!(approx_eq!(f64, usa.score_per_kwh, 0.478, epsilon = 1e-9));
    }

    #[test]
    fn sectoral_no_generation() {
        let (mut project, engine) = load_project(simple_project()).unwrap();
        let methods = select_methods(&engine, "ReCiPe Midpoint (H) V1.13").unwrap();
        project.technologies.retain(|id, _| id.as_str() == "Solar");

        // No solar in USA
        let err = sectoral(&project, &engine, &[2030], &methods).unwrap_err();
        assert_eq!(err.to_string(), "No electricity generation in USA (2030)");
    }

    /// Replace a value in the project's scenario
    fn set_scenario_value(project: &mut Project, region: &str, variable: &str, value: f64) {
        let region_id = RegionID::new(region);
        let records = project
            .scenario
            .regions()
            .iter()
            .flat_map(|region_id| {
                project
                    .scenario
                    .years()
                    .into_iter()
                    .flat_map(|year| project.scenario.records_for(region_id, year).cloned())
                    .collect_vec()
            })
            .map(|mut record| {
                if record.region == region_id && record.variable == variable && record.year == 2030
                {
                    record.value = value;
                }
                record
            })
            .collect();
        project.scenario = ScenarioTable::new(records).unwrap();
    }

    #[test]
    fn sectoral_generation_too_large() {
        let (mut project, engine) = load_project(simple_project()).unwrap();
        let methods = [MethodID::new(GWP)];
        set_scenario_value(&mut project, "EUR", "SE|Electricity|Coal", 1e300);

        let err = sectoral(&project, &engine, &[2030], &methods).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Generation for SE|Electricity|Coal in EUR (2030) is too large to convert to kWh"
        );
    }

    #[test]
    fn sectoral_total_generation_too_large() {
        let (mut project, engine) = load_project(simple_project()).unwrap();
        let methods = [MethodID::new(GWP)];

        // Each value converts to a finite amount, but the sum does not
        let value = 0.9 * f64::MAX / EJ_TO_KWH;
        set_scenario_value(&mut project, "EUR", "SE|Electricity|Coal", value);
        set_scenario_value(&mut project, "EUR", "SE|Electricity|Gas", value);

        let err = sectoral(&project, &engine, &[2030], &methods).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Total electricity generation in EUR (2030) is too large"
        );
    }

    #[test]
    fn technologies_simple() {
        let (project, engine) = load_project(simple_project()).unwrap();
        let methods = [MethodID::new(GWP)];
        let rows = technologies(&project, &engine, &[2030], &methods).unwrap();
        assert_eq!(rows.len(), 8);

        let row = |region: &str, technology: &str| {
            rows.iter()
                .find(|row| {
                    row.region.as_str() == region && row.technology.as_str() == technology
                })
                .unwrap()
        };

        let coal = row("EUR", "Coal");
        assert!(approx_eq!(f64, coal.score_per_kwh, 0.85, epsilon = 1e-12));
        let coal_kwh = coal.demand_kwh.unwrap();
        assert!(approx_eq!(f64, coal_kwh, 2.0 * EJ_TO_KWH, epsilon = 1.0));
        assert!(approx_eq!(
            f64,
            coal.total_score.unwrap(),
            0.85 * coal_kwh,
            epsilon = 1.0
        ));

        // Solar in USA comes from the European dataset
        let solar = row("USA", "Solar");
        assert!(approx_eq!(f64, solar.score_per_kwh, 0.05, epsilon = 1e-12));
        assert_eq!(solar.demand_kwh, Some(0.0));
        assert_eq!(solar.total_score, Some(0.0));
    }
}
