//! Report life-cycle assessment (LCA) impact scores for energy-scenario projections.
//!
//! Scenario variables (e.g. electricity generation by technology or passenger transport demand by
//! drivetrain) are resolved to weighted demand for activities in a life-cycle inventory, which is
//! then handed to a scoring engine for each impact-assessment method.
use std::path::PathBuf;

pub mod activity;
pub mod cli;
pub mod demand;
pub mod engine;
pub mod error;
pub mod example;
pub mod filter;
pub mod id;
pub mod input;
pub mod inventory;
pub mod log;
pub mod output;
pub mod project;
pub mod region;
pub mod report;
pub mod resolve;
pub mod scenario;
pub mod settings;
pub mod supplier;
pub mod technology;
pub mod year;

#[cfg(test)]
mod fixture;

/// Get the path to the folder where program settings are stored
pub fn get_scenlca_config_dir() -> PathBuf {
    let Some(mut config_dir) = dirs::config_dir() else {
        // No config dir (e.g. no home folder). Fall back to the current directory.
        return PathBuf::new();
    };

    config_dir.push("scenlca");
    config_dir
}
