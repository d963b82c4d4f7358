//! Route table.
//!
//! # Responsibilities
//! - Declare every (method, path) pair the service answers, once
//! - Build the axum router from that declaration
//! - Answer unlisted methods on a known path with 405
//!
//! # Design Decisions
//! - The table is plain data, so the mapping can be checked without a socket
//! - Entries sharing a path are merged into one method router
//! - Deterministic: same table always yields the same router

use std::collections::BTreeMap;

use axum::{
    handler::Handler,
    http::Method,
    routing::{self, MethodRouter},
    Router,
};

use crate::http::handlers;
use crate::http::server::AppState;

/// One row of the route table.
pub struct RouteEntry {
    pub method: Method,
    pub path: &'static str,
    /// Route identifier for logging.
    pub name: &'static str,
    handler: MethodRouter<AppState>,
}

impl std::fmt::Debug for RouteEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteEntry")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("name", &self.name)
            .finish()
    }
}

impl RouteEntry {
    pub fn get<H, T>(path: &'static str, name: &'static str, handler: H) -> Self
    where
        H: Handler<T, AppState>,
        T: 'static,
    {
        Self {
            method: Method::GET,
            path,
            name,
            handler: routing::get(handler),
        }
    }

    pub fn post<H, T>(path: &'static str, name: &'static str, handler: H) -> Self
    where
        H: Handler<T, AppState>,
        T: 'static,
    {
        Self {
            method: Method::POST,
            path,
            name,
            handler: routing::post(handler),
        }
    }

    pub fn put<H, T>(path: &'static str, name: &'static str, handler: H) -> Self
    where
        H: Handler<T, AppState>,
        T: 'static,
    {
        Self {
            method: Method::PUT,
            path,
            name,
            handler: routing::put(handler),
        }
    }

    pub fn delete<H, T>(path: &'static str, name: &'static str, handler: H) -> Self
    where
        H: Handler<T, AppState>,
        T: 'static,
    {
        Self {
            method: Method::DELETE,
            path,
            name,
            handler: routing::delete(handler),
        }
    }
}

pub const ACCOUNTS_PATH: &str = "/accounts";
pub const ACCOUNT_PATH: &str = "/accounts/{id}";

/// Every route the service answers.
pub fn route_table() -> Vec<RouteEntry> {
    vec![
        RouteEntry::get("/health", "health", handlers::health),
        RouteEntry::get("/", "index", handlers::index),
        RouteEntry::post(ACCOUNTS_PATH, "create_account", handlers::create_account),
        RouteEntry::get(ACCOUNTS_PATH, "list_accounts", handlers::list_accounts),
        RouteEntry::get(ACCOUNT_PATH, "read_account", handlers::read_account),
        RouteEntry::put(ACCOUNT_PATH, "update_account", handlers::update_account),
        RouteEntry::delete(ACCOUNT_PATH, "delete_account", handlers::delete_account),
    ]
}

/// Build a router from `table`.
///
/// Unlisted methods on a listed path answer 405.
pub fn build_router(table: Vec<RouteEntry>) -> Router<AppState> {
    let mut by_path: BTreeMap<&'static str, MethodRouter<AppState>> = BTreeMap::new();

    for entry in table {
        tracing::debug!(method = %entry.method, path = entry.path, name = entry.name, "Registering route");
        let merged = match by_path.remove(entry.path) {
            Some(existing) => existing.merge(entry.handler),
            None => entry.handler,
        };
        by_path.insert(entry.path, merged);
    }

    by_path
        .into_iter()
        .fold(Router::new(), |router, (path, method_router)| {
            router.route(path, method_router.fallback(handlers::method_not_allowed))
        })
}
