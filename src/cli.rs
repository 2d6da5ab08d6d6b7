//! Command-line interface definitions using clap

use clap::{Parser, Subcommand};

use crate::config::StaticConfig;

/// Shortkey - hash-addressed URL shortener backend
#[derive(Parser, Debug)]
#[command(name = "shortkey")]
#[command(version)]
#[command(about = "Hash-addressed URL shortener backend", long_about = None)]
pub struct Cli {
    /// Path to the TOML config file (default: ./config.toml if present)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    /// Management API bind address
    #[arg(long, global = true)]
    pub api_address: Option<String>,

    /// Redirect server bind address
    #[arg(long, global = true)]
    pub redirect_address: Option<String>,

    /// Store file path
    #[arg(long, global = true)]
    pub database: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Command-line flags win over file and environment values.
    pub fn apply_overrides(&self, config: &mut StaticConfig) {
        if let Some(addr) = &self.api_address {
            config.server.api_address = addr.clone();
        }
        if let Some(addr) = &self.redirect_address {
            config.server.redirect_address = addr.clone();
        }
        if let Some(path) = &self.database {
            config.store.path = path.clone();
        }
    }
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Run both listeners (default)
    Serve,

    /// Write a consistent store image to a file
    Backup {
        /// Output file path
        output: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output path (default: config.example.toml)
        output_path: Option<String>,
    },
}
