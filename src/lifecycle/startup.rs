//! Startup orchestration.
//!
//! # Responsibilities
//! - Connect the durable store (creating its table if needed)
//! - Start the metrics exporter when enabled
//! - Bind the listener and serve until shutdown
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Subsystems initialize in order, not concurrently
//! - The listener binds last, so traffic only arrives once the store is ready

use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::AppConfig;
use crate::http::HttpServer;
use crate::lifecycle::Shutdown;
use crate::observability::metrics;
use crate::store::{SharedStore, SqliteAccountStore, StoreError};

/// Fatal errors raised while bringing the service up.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Account store unavailable: {0}")]
    Store(#[from] StoreError),

    #[error("Metrics exporter failed: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("Invalid address {0:?}")]
    Address(String),

    #[error("Listener error: {0}")]
    Io(#[from] std::io::Error),
}

/// Connect the configured store.
pub async fn connect_store(config: &AppConfig) -> Result<(SqliteAccountStore, SharedStore), StartupError> {
    let store = SqliteAccountStore::connect(&config.database).await?;
    let shared: SharedStore = Arc::new(store.clone());
    Ok((store, shared))
}

/// Run the service with `config` until `shutdown` fires.
pub async fn run(config: AppConfig, shutdown: &Shutdown) -> Result<(), StartupError> {
    let (store, shared) = connect_store(&config).await?;

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config
            .observability
            .metrics_address
            .parse()
            .map_err(|_| StartupError::Address(config.observability.metrics_address.clone()))?;
        metrics::init_metrics(addr)?;
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        "Listening for connections"
    );

    let server = HttpServer::new(config, shared);
    server.run(listener, shutdown.subscribe()).await?;

    store.close().await;
    Ok(())
}
