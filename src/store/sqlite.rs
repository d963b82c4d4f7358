//! SQLite-backed account store.
//!
//! # Responsibilities
//! - Open (and create if missing) the database named by `database.url`
//! - Bootstrap the `accounts` table on connect
//! - Implement `AccountStore` with one statement per operation
//!
//! # Design Decisions
//! - `INTEGER PRIMARY KEY AUTOINCREMENT`: ids are never reused, even after delete
//! - In-memory databases are pinned to a single pooled connection so the data
//!   lives as long as the store
//! - Connections are borrowed from the pool per call and returned on drop

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;

use super::{AccountStore, StoreError};
use crate::config::DatabaseConfig;
use crate::models::{Account, AccountData};

const SELECT_BY_ID: &str = r#"
    SELECT id, name, email, address, phone_number, date_joined
    FROM accounts
    WHERE id = ?
"#;

const SELECT_ALL: &str = r#"
    SELECT id, name, email, address, phone_number, date_joined
    FROM accounts
    ORDER BY id ASC
"#;

/// Account store on top of an `sqlx` SQLite pool.
#[derive(Clone)]
pub struct SqliteAccountStore {
    pool: SqlitePool,
}

impl SqliteAccountStore {
    /// Connect to the configured database and make sure the schema exists.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(&config.url)?.create_if_missing(true);

        let mut pool_options = SqlitePoolOptions::new()
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs));
        pool_options = if is_in_memory(&config.url) {
            pool_options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            pool_options.max_connections(config.max_connections)
        };

        let pool = pool_options.connect_with(options).await?;
        let store = Self { pool };
        store.setup_schema().await?;

        tracing::info!(
            url = %config.url,
            max_connections = config.max_connections,
            "Account store ready"
        );
        Ok(store)
    }

    /// A private in-memory database, mostly for tests and local runs.
    pub async fn in_memory() -> Result<Self, StoreError> {
        Self::connect(&DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            ..DatabaseConfig::default()
        })
        .await
    }

    /// Close every pooled connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    async fn setup_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS accounts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                email TEXT NOT NULL,
                address TEXT NOT NULL,
                phone_number TEXT NOT NULL,
                date_joined TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

fn account_from_row(row: &SqliteRow) -> Result<Account, sqlx::Error> {
    Ok(Account {
        id: row.try_get("id")?,
        data: AccountData {
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            address: row.try_get("address")?,
            phone_number: row.try_get("phone_number")?,
            date_joined: row.try_get("date_joined")?,
        },
    })
}

#[async_trait]
impl AccountStore for SqliteAccountStore {
    async fn insert(&self, data: &AccountData) -> Result<i64, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO accounts (name, email, address, phone_number, date_joined)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&data.name)
        .bind(&data.email)
        .bind(&data.address)
        .bind(&data.phone_number)
        .bind(data.date_joined)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    async fn get(&self, id: i64) -> Result<Option<Account>, StoreError> {
        let row = sqlx::query(SELECT_BY_ID)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(account_from_row(&row)?)),
            None => Ok(None),
        }
    }

    async fn update(&self, account: &Account) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET name = ?, email = ?, address = ?, phone_number = ?, date_joined = ?
            WHERE id = ?
            "#,
        )
        .bind(&account.data.name)
        .bind(&account.data.email)
        .bind(&account.data.address)
        .bind(&account.data.phone_number)
        .bind(account.data.date_joined)
        .bind(account.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Missing(account.id));
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            tracing::debug!(account_id = id, "Delete of absent account ignored");
        }
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Account>, StoreError> {
        let rows = sqlx::query(SELECT_ALL)
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| account_from_row(row).map_err(StoreError::from))
            .collect()
    }
}
