//! Cross-origin resource sharing policy.

use axum::http::{header, HeaderValue};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::config::SecurityConfig;

/// Build the CORS layer for the configured origins.
///
/// An empty list, or a list containing "*", allows any origin.
pub fn cors_layer(config: &SecurityConfig) -> CorsLayer {
    let allow_any = config.cors_allowed_origins.is_empty()
        || config.cors_allowed_origins.iter().any(|o| o == "*");

    let origin = if allow_any {
        AllowOrigin::from(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .cors_allowed_origins
            .iter()
            .filter_map(|o| HeaderValue::from_str(o).ok())
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([header::LOCATION])
}
