//! HTTP surfaces
//!
//! - `redirect`: public `GET /<key>` → 302
//! - `admin`: private management API

pub mod services;
