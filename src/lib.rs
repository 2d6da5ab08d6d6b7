//! Shortkey - hash-addressed URL shortener backend
//!
//! Links are stored under a 12-byte key made of a `YYMM` month bucket and a
//! truncated base-36 content hash, so keys sort by creation month and
//! re-adding the same URL in the same month is idempotent.
//!
//! # Architecture
//! - `storage`: key derivation and the redb-backed ordered store
//! - `services`: management operations and redirect resolution
//! - `api`: the management API and the public redirect surface
//! - `config`: static configuration (TOML + env)
//! - `runtime`: startup, shutdown and execution modes
//! - `system`: logging setup

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
