//! Code for loading program settings.
use crate::get_scenlca_config_dir;
use crate::input::read_toml;
use crate::log::DEFAULT_LOG_LEVEL;
use anyhow::{Context, Result};
use documented::DocumentedFields;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt::Write;
use std::path::{Path, PathBuf};

const SETTINGS_FILE_NAME: &str = "settings.toml";

/// If this environment variable is set, the settings file is ignored
const USE_DEFAULT_SETTINGS_ENV_VAR: &str = "SCENLCA_USE_DEFAULT_SETTINGS";

/// Opening lines of a generated settings file
fn settings_file_header() -> String {
    format!(
        "# scenlca {version} settings. Every option is shown with its default value, commented out.
# Uncomment an option to change it. `scenlca settings show-default` prints this file.
",
        version = env!("CARGO_PKG_VERSION")
    )
}

/// Get the path to where the settings file will be read from
pub fn get_settings_file_path() -> PathBuf {
    let mut path = get_scenlca_config_dir();
    path.push(SETTINGS_FILE_NAME);

    path
}

/// Program settings from config file
#[derive(Debug, DocumentedFields, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// The default program log level
    pub log_level: String,
    /// Whether to overwrite output files by default
    pub overwrite: bool,
    /// Results root path to save reports. Defaults to `scenlca_results`.
    pub results_root: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            overwrite: false,
            results_root: PathBuf::from("scenlca_results"),
        }
    }
}

impl Settings {
    /// Read the contents of the user's settings file.
    ///
    /// If the file is not present or `SCENLCA_USE_DEFAULT_SETTINGS` is set, default settings will
    /// be used.
    ///
    /// # Returns
    ///
    /// The program settings as a `Settings` struct or an error if loading fails.
    pub fn load() -> Result<Settings> {
        if env::var_os(USE_DEFAULT_SETTINGS_ENV_VAR).is_some() {
            return Ok(Settings::default());
        }

        Self::load_from_path(&get_settings_file_path())
    }

    /// Read from the specified path, falling back to defaults if there is no file
    fn load_from_path(file_path: &Path) -> Result<Settings> {
        if !file_path.is_file() {
            return Ok(Settings::default());
        }

        read_toml(file_path)
    }

    /// The contents of the default settings file.
    ///
    /// Each option is preceded by its doc comment.
    pub fn default_file_contents() -> Result<String> {
        let table = toml::Table::try_from(Settings::default())
            .context("Could not convert settings to TOML")?;

        let mut out = settings_file_header();
        for (field, value) in &table {
            let docs = Settings::get_field_docs(field)
                .ok()
                .with_context(|| format!("Missing doc comment for field {field}"))?;
            writeln!(&mut out)?;
            for line in docs.lines() {
                writeln!(&mut out, "# # {}", line.trim())?;
            }
            writeln!(&mut out, "# {field} = {value}")?;
        }

        Ok(out)
    }
}
