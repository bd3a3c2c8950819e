//! The energy-scenario table: one value per region, variable and year.
use crate::region::RegionID;
use anyhow::{Result, ensure};
use indexmap::IndexSet;
use itertools::Itertools;
use serde::Deserialize;
use std::collections::HashMap;

/// A single row of scenario output, in long form
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScenarioRecord {
    /// The scenario region (e.g. `EUR`)
    #[serde(rename = "Region")]
    pub region: RegionID,
    /// A pipe-delimited variable path (e.g. `SE|Electricity|Coal`)
    #[serde(rename = "Variable")]
    pub variable: String,
    /// The unit of `value` (e.g. `EJ/yr`)
    #[serde(rename = "Unit")]
    pub unit: String,
    /// The year this value is for
    #[serde(rename = "Year")]
    pub year: u32,
    /// The value
    #[serde(rename = "Value")]
    pub value: f64,
}

/// Scenario output, indexed by region, variable and year
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScenarioTable {
    records: Vec<ScenarioRecord>,
    index: HashMap<(RegionID, String, u32), usize>,
}

impl ScenarioTable {
    /// Create a table from records.
    ///
    /// Each (region, variable, year) combination may only appear once and values must be finite.
    pub fn new(records: Vec<ScenarioRecord>) -> Result<Self> {
        let mut index = HashMap::with_capacity(records.len());
        for (idx, record) in records.iter().enumerate() {
            ensure!(
                record.value.is_finite(),
                "Invalid value for {} in {} ({}): {}",
                record.variable,
                record.region,
                record.year,
                record.value
            );

            let key = (record.region.clone(), record.variable.clone(), record.year);
            ensure!(
                index.insert(key, idx).is_none(),
                "Duplicate scenario entry for {} in {} ({})",
                record.variable,
                record.region,
                record.year
            );
        }

        Ok(Self { records, index })
    }

    /// Get the value of a variable for a region and year, if present
    pub fn value(&self, region_id: &RegionID, variable: &str, year: u32) -> Option<f64> {
        self.index
            .get(&(region_id.clone(), variable.to_string(), year))
            .map(|idx| self.records[*idx].value)
    }

    /// All the years in the table, sorted
    pub fn years(&self) -> Vec<u32> {
        self.records
            .iter()
            .map(|record| record.year)
            .sorted_unstable()
            .dedup()
            .collect()
    }

    /// All the regions in the table, in order of first appearance
    pub fn regions(&self) -> IndexSet<RegionID> {
        self.records
            .iter()
            .map(|record| record.region.clone())
            .collect()
    }

    /// Iterate over the records for a region and year, in the order they were given
    pub fn records_for<'a>(
        &'a self,
        region_id: &'a RegionID,
        year: u32,
    ) -> impl Iterator<Item = &'a ScenarioRecord> {
        self.records
            .iter()
            .filter(move |record| record.year == year && record.region == *region_id)
    }

    /// The number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::assert_error;

    fn record(region: &str, variable: &str, year: u32, value: f64) -> ScenarioRecord {
        ScenarioRecord {
            region: region.into(),
            variable: variable.into(),
            unit: "EJ/yr".into(),
            year,
            value,
        }
    }

    fn table() -> ScenarioTable {
        ScenarioTable::new(vec![
            record("USA", "SE|Electricity|Coal", 2050, 3.0),
            record("EUR", "SE|Electricity|Coal", 2030, 1.0),
            record("EUR", "SE|Electricity|Gas", 2030, 2.0),
            record("EUR", "SE|Electricity|Coal", 2050, 0.5),
        ])
        .unwrap()
    }

    #[test]
    fn value_lookup() {
        let table = table();
        assert_eq!(table.value(&"EUR".into(), "SE|Electricity|Gas", 2030), Some(2.0));
        assert_eq!(table.value(&"EUR".into(), "SE|Electricity|Gas", 2050), None);
        assert_eq!(table.value(&"CHA".into(), "SE|Electricity|Coal", 2030), None);
    }

    #[test]
    fn years_and_regions() {
        let table = table();
        assert_eq!(table.years(), [2030, 2050]);
        assert_eq!(
            table.regions().into_iter().collect_vec(),
            [RegionID::new("USA"), RegionID::new("EUR")]
        );
    }

    #[test]
    fn records_for_region_and_year() {
        let table = table();
        let region_id = "EUR".into();
        let variables = table
            .records_for(&region_id, 2030)
            .map(|record| record.variable.as_str())
            .collect_vec();
        assert_eq!(variables, ["SE|Electricity|Coal", "SE|Electricity|Gas"]);
    }

    #[test]
    fn duplicate_entry() {
        let result = ScenarioTable::new(vec![
            record("EUR", "SE|Electricity|Coal", 2030, 1.0),
            record("EUR", "SE|Electricity|Coal", 2030, 2.0),
        ]);
        assert_error!(
            result,
            "Duplicate scenario entry for SE|Electricity|Coal in EUR (2030)"
        );
    }

    #[test]
    fn non_finite_value() {
        let result = ScenarioTable::new(vec![record("EUR", "SE|Electricity|Coal", 2030, f64::NAN)]);
        assert_error!(result, "Invalid value for SE|Electricity|Coal in EUR (2030): NaN");
    }
}
