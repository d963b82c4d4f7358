//! Account REST API Service
//!
//! A small CRUD microservice over a durable account table.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http::server (middleware stack)
//!                         │
//!                         ▼
//!                     http::routes ──▶ http::handlers
//!                                           │
//!                                           ▼
//!                                     models (validation, typestate)
//!                                           │
//!                                           ▼
//!                                     store (SQLite via sqlx)
//!
//!     Cross-cutting: config, observability, security, lifecycle
//! ```

use std::path::PathBuf;

use clap::Parser;

use account_service::config;
use account_service::lifecycle::{startup, Shutdown};
use account_service::observability::logging;

#[derive(Parser)]
#[command(name = "account-service")]
#[command(about = "Account REST API Service", long_about = None)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = config::resolve(args.config.as_deref(), |key| std::env::var(key).ok())?;
    logging::init(&config.observability)?;

    tracing::info!("account-service v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        database_url = %config.database.url,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let shutdown = Shutdown::new();
    let signal_task = shutdown.trigger_on_os_signal();

    let result = startup::run(config, &shutdown).await;
    signal_task.abort();

    if let Err(e) = &result {
        tracing::error!(error = %e, "Service failed");
    }
    result?;

    tracing::info!("Shutdown complete");
    Ok(())
}
