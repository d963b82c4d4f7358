//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → routes.rs (route table lookup, 405 for unknown verbs)
//!     → request.rs (request ID, media type check, JSON body, path id)
//!     → handlers.rs (entity model calls)
//!     → response.rs (errors to status + JSON body)
//!     → Send to client
//! ```

pub mod handlers;
pub mod middleware;
pub mod request;
pub mod response;
pub mod routes;
pub mod server;

pub use request::{AccountId, JsonPayload, JSON_MEDIA_TYPE, X_REQUEST_ID};
pub use response::{ApiError, ErrorBody};
pub use server::{AppState, HttpServer};
