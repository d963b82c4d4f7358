//! Account REST API Service library.
//!
//! Persistence (`store`) and validation (`models`) sit underneath an axum
//! HTTP surface (`http`), with config, logging, metrics, security headers
//! and lifecycle handling around them.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod models;
pub mod observability;
pub mod security;
pub mod store;

pub use config::AppConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use models::{Account, AccountData};
pub use store::{AccountStore, SqliteAccountStore};
