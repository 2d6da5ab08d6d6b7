//! Redirect resolution
//!
//! Read-only, exact-match lookup backing the public redirect listener.

use std::sync::Arc;

use tracing::trace;

use crate::errors::Result;
use crate::storage::{KEY_LEN, LinkStore};

pub struct RedirectResolver {
    store: Arc<LinkStore>,
}

impl RedirectResolver {
    pub fn new(store: Arc<LinkStore>) -> Self {
        Self { store }
    }

    /// Stored URL for `key`, if any. Never modifies the store.
    pub fn resolve(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        if key.is_empty() {
            return Ok(None);
        }
        let found = self.store.with_read_transaction(|txn| txn.get(key))?;
        trace!(
            "Resolve {} -> {}",
            String::from_utf8_lossy(key),
            if found.is_some() { "hit" } else { "miss" }
        );
        Ok(found)
    }
}

/// The key window of a request path: the first [`KEY_LEN`] bytes after the
/// leading `/`. Shorter paths have no key.
pub fn key_window(path: &str) -> Option<&[u8]> {
    let rest = path.strip_prefix('/').unwrap_or(path).as_bytes();
    rest.get(..KEY_LEN)
}
