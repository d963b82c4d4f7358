//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Outgoing response:
//!     → headers.rs (frame options, nosniff, CSP, referrer policy)
//!     → cors.rs (Access-Control-* headers, preflight answers)
//!     → client
//! ```
//!
//! # Design Decisions
//! - Both layers wrap the whole router, including fallbacks and errors
//! - Authentication is out of scope for this service

pub mod cors;
pub mod headers;

use axum::Router;

use crate::config::SecurityConfig;

/// Apply the configured security layers to `router`.
pub fn apply(router: Router, config: &SecurityConfig) -> Router {
    let router = if config.enable_headers {
        headers::apply_security_headers(router)
    } else {
        router
    };

    if config.cors_enabled {
        router.layer(cors::cors_layer(config))
    } else {
        router
    }
}
