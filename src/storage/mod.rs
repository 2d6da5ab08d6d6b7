use std::sync::Arc;
use std::time::Duration;

use crate::config::StoreConfig;
use crate::errors::Result;

pub mod key;
pub mod store;

pub use key::{KEY_LEN, LinkKey};
pub use store::{Entry, LinkStore, ReadTxn, Snapshot, WriteTxn};

pub struct StorageFactory;

impl StorageFactory {
    /// Open the link store described by `[store]`.
    pub fn create(config: &StoreConfig) -> Result<Arc<LinkStore>> {
        let store = LinkStore::open(
            &config.path,
            Duration::from_millis(config.write_timeout_ms),
        )?;
        Ok(Arc::new(store))
    }
}
