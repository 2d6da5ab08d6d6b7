//! Mode routing
//!
//! - Server mode: both HTTP listeners (default)
//! - CLI mode: one-shot maintenance commands

pub mod cli;
pub mod server;

pub use cli::run_cli;
pub use server::run_server;

use crate::cli::Commands;

#[derive(Debug, PartialEq)]
pub enum Mode {
    Server,
    Cli(Commands),
}

/// `None` and `serve` start the listeners; anything else is a CLI command.
pub fn detect_mode(command: Option<Commands>) -> Mode {
    match command {
        None | Some(Commands::Serve) => Mode::Server,
        Some(other) => Mode::Cli(other),
    }
}
