//! Request handlers.
//!
//! Each handler translates one route into Entity Model calls and the result
//! into a response. Failures leave through `ApiError`.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};

use crate::http::request::{AccountId, JsonPayload};
use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::models::{Account, AccountData};

/// Service metadata served at `/`.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceInfo {
    pub name: &'static str,
    pub version: &'static str,
}

impl Default for ServiceInfo {
    fn default() -> Self {
        Self {
            name: "Account REST API Service",
            version: "1.0",
        }
    }
}

/// Liveness probe.
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "OK" }))
}

pub async fn index(State(state): State<AppState>) -> Json<ServiceInfo> {
    Json(state.service.clone())
}

/// Create an account from the posted document.
pub async fn create_account(
    State(state): State<AppState>,
    JsonPayload(payload): JsonPayload,
) -> Result<impl IntoResponse, ApiError> {
    tracing::info!("Request to create an Account");

    let data = AccountData::from_json(&payload)?;
    let account = data.create(state.store.as_ref()).await?;
    let location = format!("/accounts/{}", account.id);

    tracing::info!(account_id = account.id, "Account created");
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(account),
    ))
}

pub async fn list_accounts(State(state): State<AppState>) -> Result<Json<Vec<Account>>, ApiError> {
    tracing::info!("Request to list Accounts");

    let accounts = Account::all(state.store.as_ref()).await?;
    tracing::debug!(count = accounts.len(), "Accounts listed");
    Ok(Json(accounts))
}

pub async fn read_account(
    State(state): State<AppState>,
    AccountId(id): AccountId,
) -> Result<Json<Account>, ApiError> {
    tracing::info!(account_id = id, "Request to read an Account");

    Account::find(state.store.as_ref(), id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::account_not_found(id))
}

/// Overwrite an existing account. 404 wins over payload problems.
pub async fn update_account(
    State(state): State<AppState>,
    AccountId(id): AccountId,
    JsonPayload(payload): JsonPayload,
) -> Result<Json<Account>, ApiError> {
    tracing::info!(account_id = id, "Request to update an Account");

    let mut account = Account::find(state.store.as_ref(), id)
        .await?
        .ok_or_else(|| ApiError::account_not_found(id))?;
    account.update(state.store.as_ref(), &payload).await?;

    tracing::info!(account_id = id, "Account updated");
    Ok(Json(account))
}

/// Delete an account. Always 204, whether or not it existed.
pub async fn delete_account(
    State(state): State<AppState>,
    AccountId(id): AccountId,
) -> Result<StatusCode, ApiError> {
    tracing::info!(account_id = id, "Request to delete an Account");

    if let Some(account) = Account::find(state.store.as_ref(), id).await? {
        account.delete(state.store.as_ref()).await?;
        tracing::info!(account_id = id, "Account deleted");
    }
    Ok(StatusCode::NO_CONTENT)
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound(
        "The requested URL was not found on the server.".to_string(),
    )
}
