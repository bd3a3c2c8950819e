//! Code for reading precomputed unit scores for the scoring engine.
use super::{input_err_msg, read_csv};
use crate::activity::{ActivityKey, DatabaseID};
use crate::engine::{MethodID, UnitScoreEngine};
use crate::inventory::Inventory;
use anyhow::{Context, Result, ensure};
use serde::Deserialize;
use std::path::Path;

const UNIT_SCORES_FILE_NAME: &str = "unit_scores.csv";

#[derive(PartialEq, Debug, Deserialize)]
struct UnitScoreRaw {
    database: DatabaseID,
    code: String,
    method: MethodID,
    score: f64,
}

/// Read unit scores from the specified project directory.
///
/// Every score must be for an activity in the inventory.
pub fn read_unit_scores(project_dir: &Path, inventory: &Inventory) -> Result<UnitScoreEngine> {
    let file_path = project_dir.join(UNIT_SCORES_FILE_NAME);
    let scores = read_csv(&file_path)?;
    build_engine(scores, inventory).with_context(|| input_err_msg(&file_path))
}

fn build_engine<I>(iter: I, inventory: &Inventory) -> Result<UnitScoreEngine>
where
    I: Iterator<Item = UnitScoreRaw>,
{
    let entries: Vec<_> = iter
        .map(|raw| {
            let key = ActivityKey::new(raw.database, raw.code);
            ensure!(
                inventory.get(&key).is_some(),
                "Unit score given for unknown activity {key}"
            );

            Ok((key, raw.method, raw.score))
        })
        .collect::<Result<_>>()?;

    UnitScoreEngine::from_scores(entries)
}
