//! Code related to the CLI commands for managing the settings file.
use crate::settings::{Settings, get_settings_file_path};
use anyhow::{Context, Result, ensure};
use clap::Subcommand;
use std::fs;
use std::path::Path;

/// The available subcommands for managing the settings file.
#[derive(Subcommand)]
pub enum SettingsSubcommands {
    /// Write a settings file containing the default options.
    Create {
        /// Whether to overwrite an existing settings file
        #[arg(long)]
        overwrite: bool,
    },
    /// Show the path to the settings file.
    Path,
    /// Show the contents of the settings file.
    Show,
    /// Show the default settings.
    ShowDefault,
}

impl SettingsSubcommands {
    /// Execute the supplied settings subcommand
    pub fn execute(self) -> Result<()> {
        match self {
            Self::Create { overwrite } => {
                handle_settings_create_command(&get_settings_file_path(), overwrite)?;
            }
            Self::Path => println!("{}", get_settings_file_path().display()),
            Self::Show => handle_settings_show_command(&get_settings_file_path())?,
            Self::ShowDefault => print!("{}", Settings::default_file_contents()?),
        }

        Ok(())
    }
}

/// Handle the `settings create` command.
fn handle_settings_create_command(file_path: &Path, overwrite: bool) -> Result<()> {
    ensure!(
        overwrite || !file_path.exists(),
        "Settings file already exists: {}. Pass --overwrite to replace it.",
        file_path.display()
    );

    if let Some(dir) = file_path.parent() {
        fs::create_dir_all(dir).context("Could not create config directory")?;
    }
    fs::write(file_path, Settings::default_file_contents()?)
        .with_context(|| format!("Could not write {}", file_path.display()))?;
    println!("Settings file written to {}", file_path.display());

    Ok(())
}

/// Handle the `settings show` command.
fn handle_settings_show_command(file_path: &Path) -> Result<()> {
    if !file_path.is_file() {
        println!(
            "No settings file found at {}. Default settings are used.",
            file_path.display()
        );
        return Ok(());
    }

    let contents = fs::read_to_string(file_path)
        .with_context(|| format!("Could not read {}", file_path.display()))?;
    print!("{contents}");

    Ok(())
}
