//! Server mode
//!
//! Starts the two listeners: the public redirect surface and the private
//! management API. Both run under one lifecycle; a shutdown signal, or
//! either listener exiting, stops both.

use std::time::Duration;

use actix_web::{App, HttpServer, middleware::DefaultHeaders, web};
use anyhow::{Context, Result};
use tracing::{error, warn};

use crate::api::services::{management_routes, redirect_routes};
use crate::config::get_config;
use crate::runtime::lifetime;

/// Largest accepted management form body.
const MAX_FORM_SIZE: usize = 4 * 1024 * 1024;

/// Run both HTTP listeners until shutdown.
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server() -> Result<()> {
    let config = get_config();

    let startup = lifetime::startup::prepare_server_startup(&config).map_err(|e| {
        error!("Server startup failed: {:#}", e);
        e
    })?;

    let link_service = startup.link_service.clone();
    let resolver = startup.resolver.clone();
    let workers = config.server.workers.max(1);
    let shutdown_timeout = config.server.shutdown_timeout;

    let management = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(link_service.clone()))
            .app_data(web::FormConfig::default().limit(MAX_FORM_SIZE))
            .wrap(
                DefaultHeaders::new().add(("Cache-Control", "no-cache, no-store, must-revalidate")),
            )
            .configure(management_routes)
    })
    .workers(workers)
    .shutdown_timeout(shutdown_timeout)
    .disable_signals()
    .bind(config.server.api_address.as_str())
    .with_context(|| format!("Failed to bind management API to {}", config.server.api_address))?
    .run();

    let redirect = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(resolver.clone()))
            .service(redirect_routes())
    })
    .keep_alive(Duration::from_secs(30))
    .workers(workers)
    .shutdown_timeout(shutdown_timeout)
    .disable_signals()
    .bind(config.server.redirect_address.as_str())
    .with_context(|| format!("Failed to bind redirect server to {}", config.server.redirect_address))?
    .run();

    warn!(
        "Management API listening on http://{}",
        config.server.api_address
    );
    warn!(
        "Redirect server listening on http://{}",
        config.server.redirect_address
    );

    let handles = [management.handle(), redirect.handle()];
    let stop_limit = Duration::from_secs(shutdown_timeout);
    let mut management = management;
    let mut redirect = redirect;

    // 任意一个监听器退出都会带停另一个
    tokio::select! {
        res = &mut management => {
            warn!("Management API stopped, stopping redirect server");
            lifetime::shutdown::stop_servers(&handles, stop_limit).await;
            res.context("Management API failed")?;
        }
        res = &mut redirect => {
            warn!("Redirect server stopped, stopping management API");
            lifetime::shutdown::stop_servers(&handles, stop_limit).await;
            res.context("Redirect server failed")?;
        }
        _ = lifetime::shutdown::listen_for_shutdown() => {
            lifetime::shutdown::stop_servers(&handles, stop_limit).await;
            warn!("Graceful shutdown completed");
        }
    }

    // store 句柄随 startup 一起在这里释放
    drop(startup);
    Ok(())
}
