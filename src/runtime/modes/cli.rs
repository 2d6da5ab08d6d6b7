//! CLI mode
//!
//! One-shot commands that run without starting the listeners.

use std::path::Path;

use colored::Colorize;

use crate::cli::{Commands, ConfigCommands};
use crate::config::StaticConfig;
use crate::errors::{Result, ShortkeyError};
use crate::storage::StorageFactory;

const DEFAULT_SAMPLE_PATH: &str = "config.example.toml";

/// Run a non-serve command.
pub fn run_cli(command: Commands, config: &StaticConfig) -> Result<()> {
    match command {
        Commands::Serve => Err(ShortkeyError::config(
            "serve is handled by server mode",
        )),
        Commands::Backup { output } => backup_to_file(config, Path::new(&output)),
        Commands::Config {
            action: ConfigCommands::Generate { output_path },
        } => generate_config(output_path.as_deref().unwrap_or(DEFAULT_SAMPLE_PATH)),
    }
}

/// Snapshot the configured store into `output`.
pub fn backup_to_file(config: &StaticConfig, output: &Path) -> Result<()> {
    let store = StorageFactory::create(&config.store)?;
    let snapshot = store.export_snapshot()?;
    snapshot.write_to(output)?;

    println!(
        "{} {} ({} records, {} bytes)",
        "Backup written:".green(),
        output.display().to_string().blue(),
        snapshot.records,
        snapshot.len()
    );
    Ok(())
}

fn generate_config(path: &str) -> Result<()> {
    println!(
        "{} {}",
        "Generating configuration file...".yellow(),
        path.blue()
    );
    StaticConfig::default().save_to_file(path)?;
    println!(
        "  {} {}",
        "Configuration file generated successfully".green(),
        path.blue()
    );
    Ok(())
}
