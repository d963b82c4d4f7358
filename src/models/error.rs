//! Error types raised by the entity model.

use thiserror::Error;

use crate::store::StoreError;

/// Rejection of an inbound account document before anything is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataValidationError {
    /// Payload was absent, null, or not a JSON object.
    #[error("Invalid Account: body of request contained bad or no data")]
    NotAnObject,

    /// A required field was absent or null.
    #[error("Invalid Account: missing {0}")]
    MissingField(&'static str),

    /// A field carried the wrong JSON value kind.
    #[error("Invalid Account: {field} must be {expected}")]
    WrongKind {
        field: &'static str,
        expected: &'static str,
    },

    /// A field that must carry text was empty.
    #[error("Invalid Account: {0} must not be empty")]
    Empty(&'static str),

    /// A date field could not be parsed.
    #[error("Invalid Account: {field} value {value:?} is not a YYYY-MM-DD date")]
    BadDate { field: &'static str, value: String },
}

/// Failure of a model operation that both validates and persists.
#[derive(Debug, Error)]
pub enum AccountError {
    #[error(transparent)]
    Validation(#[from] DataValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
