//! System-level modules
//!
//! This module contains process-wide plumbing:
//! - Logging initialization

pub mod logging;

pub use logging::init_logging;
