//! Fixtures for tests
use crate::activity::{Activity, ActivityKey};
use crate::filter::{Criteria, FilterSpec};
use crate::inventory::Inventory;
use crate::region::Geomap;
use crate::supplier::ProductionVolumes;
use crate::technology::{Technology, TechnologyMap};
use rstest::fixture;
use std::collections::HashMap;
use std::path::PathBuf;
use std::rc::Rc;

/// Assert that an error with the given message occurs
macro_rules! assert_error {
    ($result:expr, $msg:expr) => {
        assert_eq!(
            $result.unwrap_err().chain().next().unwrap().to_string(),
            $msg
        );
    };
}
pub(crate) use assert_error;

/// Path to the bundled `simple` example project
pub fn simple_project() -> PathBuf {
    [env!("CARGO_MANIFEST_DIR"), "demos", "simple"]
        .iter()
        .collect()
}

/// Create an activity with no exchanges
pub fn activity(db: &str, code: &str, name: &str, product: &str, location: &str) -> Activity {
    Activity {
        key: ActivityKey::new(db, code),
        name: name.into(),
        product: product.into(),
        location: location.into(),
        unit: "kilowatt hour".into(),
        exchanges: Vec::new(),
    }
}

/// A filter specification matching activity names starting with any of `names`
pub fn filter_spec(names: &[&str]) -> FilterSpec {
    FilterSpec {
        filter: Criteria::Names(names.iter().map(|name| name.to_string()).collect()),
        mask: Criteria::default(),
        filter_exact: false,
        mask_exact: false,
    }
}

const HARD_COAL: &str = "electricity production, hard coal";
const HARD_COAL_CHP: &str = "electricity production, hard coal, combined heat and power";

/// Twenty German activities in the `dummy_db` database, covering power generation and its
/// upstream supply
#[fixture]
pub fn power_inventory() -> Inventory {
    let activities = [
        (HARD_COAL, "electricity, high voltage"),
        (HARD_COAL_CHP, "electricity, high voltage"),
        (
            "electricity production, natural gas, combined cycle power plant",
            "electricity, high voltage",
        ),
        (
            "electricity production, natural gas, conventional power plant",
            "electricity, high voltage",
        ),
        (
            "electricity production, natural gas, combined heat and power",
            "electricity, high voltage",
        ),
        (
            "electricity production, nuclear, pressure water reactor",
            "electricity, high voltage",
        ),
        (
            "electricity production, photovoltaic, 3kWp slanted-roof installation, multi-Si",
            "electricity, low voltage",
        ),
        ("electricity production, lignite", "electricity, high voltage"),
        ("electricity production, oil", "electricity, high voltage"),
        (
            "electricity production, hydro, run-of-river",
            "electricity, high voltage",
        ),
        (
            "electricity production, wind, 1-3MW turbine, onshore",
            "electricity, high voltage",
        ),
        (
            "electricity production, wind, >3MW turbine, offshore",
            "electricity, high voltage",
        ),
        (
            "heat and power co-generation, biogas, gas engine",
            "electricity, high voltage",
        ),
        (
            "heat and power co-generation, wood chips",
            "electricity, high voltage",
        ),
        (
            "electricity production, deep geothermal",
            "electricity, high voltage",
        ),
        ("hard coal mine operation", "hard coal"),
        ("natural gas production", "natural gas, high pressure"),
        (
            "market for electricity, high voltage",
            "electricity, high voltage",
        ),
        (
            "electricity voltage transformation from high to medium voltage",
            "electricity, medium voltage",
        ),
        (
            "photovoltaic panel production, multi-Si wafer",
            "photovoltaic panel, multi-Si wafer",
        ),
    ];

    Inventory::from_activities(activities.iter().enumerate().map(|(idx, (name, product))| {
        activity("dummy_db", &idx.to_string(), name, product, "DE")
    }))
    .unwrap()
}

/// Coal, gas, nuclear and solar power technologies
#[fixture]
pub fn power_technologies() -> TechnologyMap {
    [
        ("Coal", "SE|Electricity|Coal", vec![HARD_COAL]),
        (
            "Gas",
            "SE|Electricity|Gas",
            vec!["electricity production, natural gas"],
        ),
        (
            "Nuclear",
            "SE|Electricity|Nuclear",
            vec!["electricity production, nuclear"],
        ),
        (
            "Solar",
            "SE|Electricity|Solar",
            vec![
                "electricity production, photovoltaic",
                "electricity production, solar thermal",
            ],
        ),
    ]
    .into_iter()
    .map(|(id, variable, names)| {
        let technology =
            Technology::new(id.into(), Some(variable.into()), filter_spec(&names)).unwrap();
        (technology.id.clone(), Rc::new(technology))
    })
    .collect()
}

/// Maps `DE` onto itself and `EUR` onto Germany and France
#[fixture]
pub fn power_geomap() -> Geomap {
    Geomap::from_pairs([
        ("DE".into(), "DE".to_string()),
        ("EUR".into(), "DE".to_string()),
        ("EUR".into(), "FR".to_string()),
    ])
}

/// Volumes for the two hard coal power plants
#[fixture]
pub fn power_volumes() -> ProductionVolumes {
    ProductionVolumes::new(HashMap::from([
        ((HARD_COAL.to_string(), "DE".to_string()), 100.0),
        ((HARD_COAL_CHP.to_string(), "DE".to_string()), 300.0),
    ]))
}
