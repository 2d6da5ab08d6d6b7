//! Service layer for business logic
//!
//! Management operations and redirect resolution, shared by the HTTP
//! listeners and the CLI.

mod link_service;
mod redirect;

pub use link_service::*;
pub use redirect::{RedirectResolver, key_window};
