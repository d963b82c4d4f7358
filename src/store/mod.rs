//! Persistence subsystem.
//!
//! # Data Flow
//! ```text
//! models (AccountData / Account)
//!     → AccountStore trait (insert, get, update, delete, list_all)
//!     → sqlite.rs (sqlx pool, one connection per operation)
//! ```
//!
//! # Design Decisions
//! - The store alone assigns ids
//! - Absence on `get` is `Ok(None)`; `delete` of an absent id is `Ok(())`
//! - Each operation is a single statement, so a failure never leaves a
//!   partially written row behind

pub mod sqlite;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Account, AccountData};

pub use sqlite::SqliteAccountStore;

/// Errors raised by a durable store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Connectivity loss, constraint violation or any other database failure.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// An update targeted a row that no longer exists.
    #[error("Account {0} does not exist")]
    Missing(i64),
}

/// Durable store of accounts, queryable by identifier.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Persist a new record and return its freshly assigned id.
    async fn insert(&self, data: &AccountData) -> Result<i64, StoreError>;

    /// Fetch one record.
    async fn get(&self, id: i64) -> Result<Option<Account>, StoreError>;

    /// Overwrite the stored fields of an existing record.
    async fn update(&self, account: &Account) -> Result<(), StoreError>;

    /// Remove a record if present.
    async fn delete(&self, id: i64) -> Result<(), StoreError>;

    /// All records in ascending id order.
    async fn list_all(&self) -> Result<Vec<Account>, StoreError>;
}

/// Store handle shared by every request.
pub type SharedStore = Arc<dyn AccountStore>;
