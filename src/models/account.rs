//! The Account entity.
//!
//! # Responsibilities
//! - Build an `AccountData` from an inbound JSON document
//! - Serialize persisted accounts for responses
//! - Run create/find/all/update/delete against an injected `AccountStore`
//!
//! # Design Decisions
//! - Unsaved (`AccountData`) and persisted (`Account`) records are distinct
//!   types, so update and delete cannot be called without an `id`
//! - `id` and `date_joined` never change after creation
//! - A validation failure returns before the store is touched

use chrono::{Local, NaiveDate};
use serde::Serialize;
use serde_json::Value;

use super::error::{AccountError, DataValidationError};
use super::schema::{self, CheckedPayload, ACCOUNT_SCHEMA};
use crate::store::{AccountStore, StoreError};

/// Current local date, used when a payload omits `date_joined`.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Fields of an account that are supplied by clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountData {
    pub name: String,
    pub email: String,
    pub address: String,
    pub phone_number: String,
    pub date_joined: NaiveDate,
}

impl AccountData {
    /// Deserialize an inbound document, checking it against `ACCOUNT_SCHEMA`.
    ///
    /// `date_joined` falls back to today when absent or null. Any `id` in the
    /// payload is ignored.
    pub fn from_json(payload: &Value) -> Result<Self, DataValidationError> {
        let mut checked = schema::check(ACCOUNT_SCHEMA, payload)?;
        let date_joined = checked.date("date_joined").unwrap_or_else(today);

        Ok(Self {
            name: required_text(&mut checked, "name")?,
            email: required_text(&mut checked, "email")?,
            address: required_text(&mut checked, "address")?,
            phone_number: required_text(&mut checked, "phone_number")?,
            date_joined,
        })
    }

    /// Persist as a new account. The store assigns the `id`.
    pub async fn create(self, store: &dyn AccountStore) -> Result<Account, StoreError> {
        let id = store.insert(&self).await?;
        tracing::debug!(account_id = id, "Account persisted");
        Ok(Account { id, data: self })
    }
}

fn required_text(
    checked: &mut CheckedPayload,
    name: &'static str,
) -> Result<String, DataValidationError> {
    checked
        .take_text(name)
        .ok_or(DataValidationError::MissingField(name))
}

/// An account that exists in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    pub id: i64,
    #[serde(flatten)]
    pub data: AccountData,
}

impl Account {
    /// Look up an account. Absence is `Ok(None)`, never an error.
    pub async fn find(store: &dyn AccountStore, id: i64) -> Result<Option<Self>, StoreError> {
        store.get(id).await
    }

    /// Every persisted account in ascending `id` order.
    pub async fn all(store: &dyn AccountStore) -> Result<Vec<Self>, StoreError> {
        store.list_all().await
    }

    /// Overwrite the client-supplied fields from `payload` and persist.
    ///
    /// `id` and `date_joined` are kept. On any failure `self` is unchanged.
    pub async fn update(
        &mut self,
        store: &dyn AccountStore,
        payload: &Value,
    ) -> Result<(), AccountError> {
        let incoming = AccountData::from_json(payload)?;
        let updated = Account {
            id: self.id,
            data: AccountData {
                date_joined: self.data.date_joined,
                ..incoming
            },
        };

        store.update(&updated).await?;
        *self = updated;
        Ok(())
    }

    /// Remove this account. Removing an already deleted account succeeds.
    pub async fn delete(self, store: &dyn AccountStore) -> Result<(), StoreError> {
        store.delete(self.id).await
    }
}
