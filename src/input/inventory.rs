//! Code for reading the life-cycle inventory from CSV files.
use super::{input_err_msg, read_csv, read_csv_optional};
use crate::activity::{Activity, ActivityKey, DatabaseID, Exchange, ExchangeType};
use crate::inventory::Inventory;
use anyhow::{Context, Result, bail, ensure};
use log::info;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

const ACTIVITIES_FILE_NAME: &str = "activities.csv";
const EXCHANGES_FILE_NAME: &str = "exchanges.csv";

#[derive(PartialEq, Debug, Deserialize)]
struct ActivityRaw {
    database: DatabaseID,
    code: String,
    name: String,
    #[serde(rename = "reference product")]
    product: String,
    location: String,
    unit: String,
}

#[derive(PartialEq, Debug, Deserialize)]
struct ExchangeRaw {
    database: DatabaseID,
    code: String,
    input_database: DatabaseID,
    input_code: String,
    amount: f64,
    unit: String,
    #[serde(rename = "type")]
    kind: ExchangeType,
}

/// Read the inventory from the specified project directory.
///
/// Exchanges are optional. Technosphere exchanges must refer to activities in the inventory.
pub fn read_inventory(project_dir: &Path) -> Result<Inventory> {
    let activities_path = project_dir.join(ACTIVITIES_FILE_NAME);
    let exchanges_path = project_dir.join(EXCHANGES_FILE_NAME);

    let activities: Vec<ActivityRaw> = read_csv(&activities_path)?.collect();
    let exchanges = read_csv_optional(&exchanges_path)?;
    let inventory = build_inventory(activities, exchanges)
        .with_context(|| input_err_msg(&activities_path))?;

    for db in inventory.iter_databases() {
        info!("Loaded {} activities for database {}", db.len(), db.id());
    }

    Ok(inventory)
}

fn build_inventory<I>(activities: Vec<ActivityRaw>, exchanges: I) -> Result<Inventory>
where
    I: IntoIterator<Item = ExchangeRaw>,
{
    let mut exchange_map: HashMap<ActivityKey, Vec<Exchange>> = HashMap::new();
    for raw in exchanges {
        ensure!(
            raw.amount.is_finite(),
            "Invalid amount for exchange of activity ({}, {}): {}",
            raw.database,
            raw.code,
            raw.amount
        );
        exchange_map
            .entry(ActivityKey::new(raw.database, raw.code))
            .or_default()
            .push(Exchange {
                input: ActivityKey::new(raw.input_database, raw.input_code),
                amount: raw.amount,
                unit: raw.unit,
                kind: raw.kind,
            });
    }

    let inventory = Inventory::from_activities(activities.into_iter().map(|raw| {
        let key = ActivityKey::new(raw.database, raw.code);
        let exchanges = exchange_map.remove(&key).unwrap_or_default();
        Activity {
            key,
            name: raw.name,
            product: raw.product,
            location: raw.location,
            unit: raw.unit,
            exchanges,
        }
    }))?;

    if let Some(key) = exchange_map.keys().next() {
        bail!("Exchanges given for unknown activity {key}");
    }

    for db in inventory.iter_databases() {
        for activity in db.iter() {
            for exchange in activity.technosphere() {
                ensure!(
                    inventory.get(&exchange.input).is_some(),
                    "Activity {} has a technosphere input from unknown activity {}",
                    activity.key,
                    exchange.input
                );
            }
        }
    }

    Ok(inventory)
}
