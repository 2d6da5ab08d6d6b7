use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::config::StaticConfig;
use crate::services::{LinkService, RedirectResolver};
use crate::storage::{LinkStore, StorageFactory};

pub struct StartupContext {
    pub store: Arc<LinkStore>,
    pub link_service: Arc<LinkService>,
    pub resolver: Arc<RedirectResolver>,
}

/// 准备服务器启动的上下文
///
/// Opens the store; a store that cannot be opened aborts startup.
pub fn prepare_server_startup(config: &StaticConfig) -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let store = StorageFactory::create(&config.store)
        .with_context(|| format!("Failed to open link store at {}", config.store.path))?;
    info!(
        "Using link store: {} (write timeout {}ms)",
        store.path().display(),
        store.write_timeout().as_millis()
    );

    let link_service = Arc::new(LinkService::new(store.clone()));
    let resolver = Arc::new(RedirectResolver::new(store.clone()));

    debug!(
        "Pre-startup processing completed in {}ms",
        start_time.elapsed().as_millis()
    );

    Ok(StartupContext {
        store,
        link_service,
        resolver,
    })
}
