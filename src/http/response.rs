//! Error responses.
//!
//! # Responsibilities
//! - Map model and store failures to HTTP status codes
//! - Render every error with the same JSON body shape
//!
//! # Design Decisions
//! - Store failures are logged here and answered with a generic message,
//!   so database details never reach clients
//! - `ApiError` is the only error type handlers return

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{AccountError, DataValidationError};
use crate::store::StoreError;

/// Failure answered to a client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed, absent or invalid payload (400).
    #[error("{0}")]
    BadRequest(String),

    /// Unknown resource or route (404).
    #[error("{0}")]
    NotFound(String),

    /// Verb not defined for the path (405).
    #[error("The method is not allowed for the requested URL.")]
    MethodNotAllowed,

    /// Request not answered within the configured timeout (408).
    #[error("The request took too long to process.")]
    RequestTimeout,

    /// Body larger than the configured limit (413).
    #[error("{0}")]
    PayloadTooLarge(String),

    /// Body declared with a media type other than JSON (415).
    #[error("{0}")]
    UnsupportedMediaType(String),

    /// Store or other server-side failure (500).
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn account_not_found(id: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("Account with id [{id}] could not be found."))
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::RequestTimeout => StatusCode::REQUEST_TIMEOUT,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_body(&self) -> ErrorBody {
        let status = self.status_code();
        ErrorBody {
            status: status.as_u16(),
            error: status.canonical_reason().unwrap_or("Error").to_string(),
            message: self.to_string(),
        }
    }
}

/// JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub status: u16,
    pub error: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.to_body())).into_response()
    }
}

impl From<DataValidationError> for ApiError {
    fn from(err: DataValidationError) -> Self {
        tracing::warn!(error = %err, "Rejected account payload");
        Self::BadRequest(err.to_string())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Missing(id) => Self::account_not_found(id),
            StoreError::Database(e) => {
                tracing::error!(error = %e, "Account store failure");
                Self::Internal("The account store is unavailable.".to_string())
            }
        }
    }
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::Validation(e) => e.into(),
            AccountError::Store(e) => e.into(),
        }
    }
}
