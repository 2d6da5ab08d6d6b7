//! Link management service
//!
//! Every management operation runs as exactly one store transaction, so a
//! batch either lands completely or not at all. Methods are blocking; HTTP
//! handlers call them from the blocking thread pool.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::errors::{Result, ShortkeyError};
use crate::storage::{Entry, LinkKey, LinkStore, Snapshot};

/// Maximum number of rows a single list call returns.
pub const LIST_LIMIT: usize = 30;

/// One stored link as reported back to the caller of `add`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddedLink {
    pub url: String,
    pub key: LinkKey,
}

/// Key bounds for list/cleanup. Empty bounds are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyRange {
    pub start: Option<Vec<u8>>,
    pub end: Option<Vec<u8>>,
}

impl KeyRange {
    pub fn new(start: Option<&str>, end: Option<&str>) -> Self {
        Self {
            start: non_empty(start),
            end: non_empty(end),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<Vec<u8>> {
    value
        .filter(|v| !v.is_empty())
        .map(|v| v.as_bytes().to_vec())
}

/// Non-empty lines of a newline-separated form field.
fn input_lines(input: &str) -> impl Iterator<Item = &str> {
    input.lines().filter(|line| !line.is_empty())
}

pub struct LinkService {
    store: Arc<LinkStore>,
}

impl LinkService {
    pub fn new(store: Arc<LinkStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<LinkStore> {
        &self.store
    }

    /// Store every URL in `input`, keyed for the current month.
    pub fn add_links(&self, input: &str) -> Result<Vec<AddedLink>> {
        self.add_links_at(input, Utc::now())
    }

    /// Store every URL in `input`, keyed for the month of `now`.
    ///
    /// Re-adding a URL in the same month rewrites the same key.
    pub fn add_links_at(&self, input: &str, now: DateTime<Utc>) -> Result<Vec<AddedLink>> {
        let urls: Vec<&str> = input_lines(input).collect();
        if urls.is_empty() {
            return Err(ShortkeyError::validation("Empty 'link' argument"));
        }

        let added = self.store.with_write_transaction(|txn| {
            let mut added = Vec::with_capacity(urls.len());
            for url in &urls {
                let key = LinkKey::derive(url, now);
                txn.put(key.as_bytes(), url.as_bytes())?;
                added.push(AddedLink {
                    url: (*url).to_string(),
                    key,
                });
            }
            Ok(added)
        })?;

        info!("Added {} links", added.len());
        Ok(added)
    }

    /// Exact-match lookup. `None` means the key is not stored.
    pub fn lookup(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        if key.is_empty() {
            return Ok(None);
        }
        self.store.with_read_transaction(|txn| txn.get(key))
    }

    /// Up to [`LIST_LIMIT`] entries in ascending key order, from `start`
    /// (or the first key) through `end` inclusive (or unbounded).
    pub fn list(&self, range: &KeyRange) -> Result<Vec<Entry>> {
        self.store.with_read_transaction(|txn| {
            let start = match &range.start {
                Some(start) => start.clone(),
                None => match txn.first_key()? {
                    Some(first) => first,
                    None => return Ok(Vec::new()),
                },
            };

            let mut rows = Vec::new();
            for entry in txn.cursor_from(&start)? {
                let (key, value) = entry?;
                if rows.len() >= LIST_LIMIT {
                    break;
                }
                if let Some(end) = &range.end
                    && key.as_slice() > end.as_slice()
                {
                    break;
                }
                rows.push((key, value));
            }

            debug!("Listed {} links", rows.len());
            Ok(rows)
        })
    }

    /// Delete every key in `input`; absent keys are ignored.
    ///
    /// Returns the requested keys, whether or not they existed.
    pub fn remove_keys(&self, input: &str) -> Result<Vec<String>> {
        let keys: Vec<&str> = input_lines(input).collect();
        if keys.is_empty() {
            return Err(ShortkeyError::validation("Empty 'hash' argument"));
        }

        let removed = self.store.with_write_transaction(|txn| {
            let mut removed = 0usize;
            for key in &keys {
                if txn.delete(key.as_bytes())? {
                    removed += 1;
                }
            }
            Ok(removed)
        })?;

        info!(
            "Remove request for {} keys, {} existed",
            keys.len(),
            removed
        );
        Ok(keys.into_iter().map(str::to_string).collect())
    }

    /// Delete every key in `[start, end]` and return how many went away.
    ///
    /// A missing `start` means the first stored key; a missing `end` is
    /// rejected so a cleanup never runs unbounded.
    pub fn cleanup(&self, range: &KeyRange) -> Result<usize> {
        let end = match (&range.start, &range.end) {
            (None, None) => {
                return Err(ShortkeyError::validation("Both empty: 'start' 'end'"));
            }
            (_, None) => return Err(ShortkeyError::validation("Empty 'end' argument")),
            (_, Some(end)) => end.clone(),
        };

        let total = self.store.with_write_transaction(|txn| {
            let start = match &range.start {
                Some(start) => start.clone(),
                None => match txn.first_key()? {
                    Some(first) => first,
                    None => return Ok(0),
                },
            };

            // 先收集再删除，游标不能和写操作交错
            let mut doomed = Vec::new();
            for entry in txn.cursor_from(&start)? {
                let (key, _) = entry?;
                if key > end {
                    break;
                }
                doomed.push(key);
            }

            for key in &doomed {
                txn.delete(key)?;
            }
            Ok(doomed.len())
        })?;

        info!("Cleanup removed {} links", total);
        Ok(total)
    }

    /// Full binary image of the store.
    pub fn backup(&self) -> Result<Snapshot> {
        self.store.export_snapshot()
    }
}
