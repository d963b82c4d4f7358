//! Request handling and extraction.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) and echo it on the response
//! - Enforce the JSON media type on body-bearing requests
//! - Turn the body into a JSON value for the model layer
//! - Parse the `{id}` path segment
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - An empty body is passed on as `null`; the model reports it as a
//!   validation failure (400), not a media type failure (415)
//! - The media type is checked before the body is parsed
//! - A non-numeric id is treated like an unknown id (404)

use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::{header, request::Parts, HeaderName, StatusCode},
};
use serde_json::Value;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

use crate::http::response::ApiError;

/// Media type every request body must declare.
pub const JSON_MEDIA_TYPE: &str = "application/json";

/// Header carrying the request ID.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Layer that assigns `x-request-id` when the client did not send one.
pub fn set_request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid)
}

/// Layer that copies `x-request-id` onto the response.
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(X_REQUEST_ID)
}

/// Check a declared media type against the expected one.
pub fn check_content_type(declared: Option<&str>, expected: &str) -> Result<(), ApiError> {
    match declared {
        Some(media_type) if media_type == expected => Ok(()),
        other => {
            tracing::error!(content_type = ?other, "Invalid Content-Type");
            Err(ApiError::UnsupportedMediaType(format!(
                "Content-Type must be {expected}"
            )))
        }
    }
}

/// JSON request body, or `null` when the request had no body.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonPayload(pub Value);

impl<S> FromRequest<S> for JsonPayload
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        let body = Bytes::from_request(req, state).await.map_err(|rejection| {
            if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                ApiError::PayloadTooLarge(rejection.body_text())
            } else {
                ApiError::BadRequest(rejection.body_text())
            }
        })?;

        if body.is_empty() {
            return Ok(Self(Value::Null));
        }

        check_content_type(content_type.as_deref(), JSON_MEDIA_TYPE)?;

        serde_json::from_slice(&body)
            .map(Self)
            .map_err(|e| ApiError::BadRequest(format!("Malformed JSON body: {e}")))
    }
}

/// The `{id}` segment of `/accounts/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountId(pub i64);

impl<S> FromRequestParts<S> for AccountId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

        raw.parse()
            .map(AccountId)
            .map_err(|_| ApiError::account_not_found(&raw))
    }
}
