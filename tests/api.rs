//! Request-level tests for the account API, driven through the router.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use account_service::config::AppConfig;
use account_service::models::{today, Account, AccountData};
use account_service::store::{AccountStore, SharedStore, SqliteAccountStore, StoreError};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};

mod common;

use common::{account_payload, empty_request, json_request, send, test_app};

#[tokio::test]
async fn test_create_account() {
    let (app, _store) = test_app().await;
    let payload = json!({
        "name": "Alice",
        "email": "a@x.com",
        "address": "1 Main St",
        "phone_number": "555-0100",
    });

    let (status, headers, body) = send(&app, json_request("POST", "/accounts", &payload)).await;

    assert_eq!(status, StatusCode::CREATED);
    let id = body["id"].as_i64().unwrap();
    assert_eq!(body["name"], "Alice");
    assert_eq!(body["email"], "a@x.com");
    assert_eq!(body["address"], "1 Main St");
    assert_eq!(body["phone_number"], "555-0100");
    assert_eq!(body["date_joined"], today().to_string());
    assert_eq!(
        headers.get(header::LOCATION).unwrap(),
        &format!("/accounts/{}", id)
    );
}

#[tokio::test]
async fn test_create_keeps_supplied_date_joined() {
    let (app, _store) = test_app().await;
    let mut payload = account_payload("Carol");
    payload["date_joined"] = json!("2019-04-01");

    let (status, _, body) = send(&app, json_request("POST", "/accounts", &payload)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["date_joined"], "2019-04-01");
}

#[tokio::test]
async fn test_create_ignores_client_id() {
    let (app, _store) = test_app().await;
    let mut payload = account_payload("Dan");
    payload["id"] = json!(4242);

    let (status, _, body) = send(&app, json_request("POST", "/accounts", &payload)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_ne!(body["id"], 4242);
}

#[tokio::test]
async fn test_create_with_missing_fields() {
    let (app, store) = test_app().await;

    let (status, _, body) =
        send(&app, json_request("POST", "/accounts", &json!({ "name": "Bob" }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
    assert_eq!(body["error"], "Bad Request");
    assert_eq!(body["message"], "Invalid Account: missing email");
    assert!(store.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_without_name_leaves_store_unchanged() {
    let (app, store) = test_app().await;
    send(&app, json_request("POST", "/accounts", &account_payload("Eve"))).await;

    let mut payload = account_payload("Frank");
    payload.as_object_mut().unwrap().remove("name");
    let (status, _, _) = send(&app, json_request("POST", "/accounts", &payload)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(store.list_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_create_accepts_blank_name() {
    let (app, _store) = test_app().await;
    let mut payload = account_payload("Blank");
    payload["name"] = json!(" ");

    let (status, _, body) = send(&app, json_request("POST", "/accounts", &payload)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], " ");
}

#[tokio::test]
async fn test_create_with_empty_name() {
    let (app, store) = test_app().await;
    let mut payload = account_payload("Empty");
    payload["name"] = json!("");

    let (status, _, _) = send(&app, json_request("POST", "/accounts", &payload)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(store.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_with_bad_date() {
    let (app, _store) = test_app().await;
    let mut payload = account_payload("Gail");
    payload["date_joined"] = json!("01/04/2019");

    let (status, _, _) = send(&app, json_request("POST", "/accounts", &payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_with_no_body() {
    let (app, _store) = test_app().await;

    let (status, _, body) = send(&app, empty_request("POST", "/accounts")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Invalid Account: body of request contained bad or no data"
    );
}

#[tokio::test]
async fn test_create_with_malformed_json() {
    let (app, _store) = test_app().await;
    let request = Request::builder()
        .method("POST")
        .uri("/accounts")
        .header("content-type", "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();

    let (status, _, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
}

#[tokio::test]
async fn test_create_with_wrong_content_type() {
    let (app, store) = test_app().await;
    let request = Request::builder()
        .method("POST")
        .uri("/accounts")
        .header("content-type", "test/html")
        .body(Body::from(account_payload("Hank").to_string()))
        .unwrap();

    let (status, _, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(body["error"], "Unsupported Media Type");
    assert!(store.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_with_oversized_body() {
    let mut config = AppConfig::default();
    config.security.max_body_size = 64;
    let (app, store) = common::test_app_with(config).await;

    let mut payload = account_payload("Ivy");
    payload["address"] = json!("x".repeat(256));
    let (status, _, body) = send(&app, json_request("POST", "/accounts", &payload)).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["status"], 413);
    assert!(store.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_read_account() {
    let (app, _store) = test_app().await;
    let (_, _, created) = send(&app, json_request("POST", "/accounts", &account_payload("Jane"))).await;
    let id = created["id"].as_i64().unwrap();

    let (status, _, body) = send(&app, empty_request("GET", &format!("/accounts/{}", id))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, created);
}

#[tokio::test]
async fn test_read_missing_account() {
    let (app, _store) = test_app().await;

    let (status, _, body) = send(&app, empty_request("GET", "/accounts/0")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Account with id [0] could not be found.");
}

#[tokio::test]
async fn test_read_non_numeric_id() {
    let (app, _store) = test_app().await;

    let (status, _, body) = send(&app, empty_request("GET", "/accounts/abc")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], 404);
}

#[tokio::test]
async fn test_update_account() {
    let (app, _store) = test_app().await;
    let (_, _, created) = send(&app, json_request("POST", "/accounts", &account_payload("Kim"))).await;
    let id = created["id"].as_i64().unwrap();
    let uri = format!("/accounts/{}", id);

    let mut payload = account_payload("Kim");
    payload["name"] = json!("Kimberly");
    payload["date_joined"] = json!("2001-01-01");
    let (status, _, body) = send(&app, json_request("PUT", &uri, &payload)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id);
    assert_eq!(body["name"], "Kimberly");
    assert_eq!(body["date_joined"], created["date_joined"]);

    let (_, _, fetched) = send(&app, empty_request("GET", &uri)).await;
    assert_eq!(fetched["name"], "Kimberly");
}

#[tokio::test]
async fn test_update_missing_account() {
    let (app, store) = test_app().await;
    send(&app, json_request("POST", "/accounts", &account_payload("Lee"))).await;
    let before = store.list_all().await.unwrap();

    let (status, _, _) =
        send(&app, json_request("PUT", "/accounts/999", &account_payload("Lee"))).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(store.list_all().await.unwrap(), before);
}

#[tokio::test]
async fn test_update_with_invalid_payload() {
    let (app, store) = test_app().await;
    let (_, _, created) = send(&app, json_request("POST", "/accounts", &account_payload("Mo"))).await;
    let id = created["id"].as_i64().unwrap();

    let (status, _, _) = send(
        &app,
        json_request("PUT", &format!("/accounts/{}", id), &json!({ "name": "" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let stored = store.get(id).await.unwrap().unwrap();
    assert_eq!(stored.data.name, "Mo");
}

#[tokio::test]
async fn test_update_with_wrong_content_type() {
    let (app, store) = test_app().await;
    let (_, _, created) = send(&app, json_request("POST", "/accounts", &account_payload("Nia"))).await;
    let id = created["id"].as_i64().unwrap();

    let mut payload = account_payload("Nia");
    payload["name"] = json!("Nina");
    let request = Request::builder()
        .method("PUT")
        .uri(format!("/accounts/{}", id))
        .header("content-type", "text/plain")
        .body(Body::from(payload.to_string()))
        .unwrap();
    let (status, _, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(body["status"], 415);
    let stored = store.get(id).await.unwrap().unwrap();
    assert_eq!(stored.data.name, "Nia");
}

#[tokio::test]
async fn test_update_with_no_body() {
    let (app, store) = test_app().await;
    let (_, _, created) = send(&app, json_request("POST", "/accounts", &account_payload("Odo"))).await;
    let id = created["id"].as_i64().unwrap();

    let (status, _, body) = send(&app, empty_request("PUT", &format!("/accounts/{}", id))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Invalid Account: body of request contained bad or no data"
    );
    let stored = store.get(id).await.unwrap().unwrap();
    assert_eq!(stored.data.name, "Odo");
}

#[tokio::test]
async fn test_put_to_unknown_route() {
    let (app, _store) = test_app().await;

    let (status, _, body) = send(
        &app,
        json_request("PUT", "/accounts/accounts/999", &account_payload("Ned")),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not Found");
}

#[tokio::test]
async fn test_delete_account() {
    let (app, store) = test_app().await;
    let (_, _, created) = send(&app, json_request("POST", "/accounts", &account_payload("Oz"))).await;
    let uri = format!("/accounts/{}", created["id"]);

    let (status, _, body) = send(&app, empty_request("DELETE", &uri)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, _, _) = send(&app, empty_request("DELETE", &uri)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _, _) = send(&app, empty_request("GET", &uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(store.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_missing_account() {
    let (app, _store) = test_app().await;

    let (status, _, _) = send(&app, empty_request("DELETE", "/accounts/999")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_list_empty() {
    let (app, _store) = test_app().await;

    let (status, _, body) = send(&app, empty_request("GET", "/accounts")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_list_accounts() {
    let (app, _store) = test_app().await;
    for name in ["Pat", "Quin", "Ray", "Sam", "Tao"] {
        send(&app, json_request("POST", "/accounts", &account_payload(name))).await;
    }

    let (status, _, body) = send(&app, empty_request("GET", "/accounts")).await;

    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Pat", "Quin", "Ray", "Sam", "Tao"]);
}

#[tokio::test]
async fn test_method_not_allowed() {
    let (app, _store) = test_app().await;

    let (status, _, body) = send(&app, empty_request("DELETE", "/accounts")).await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["status"], 405);
}

#[tokio::test]
async fn test_index_and_health() {
    let (app, _store) = test_app().await;

    let (status, _, body) = send(&app, empty_request("GET", "/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Account REST API Service");
    assert_eq!(body["version"], "1.0");

    let (status, _, body) = send(&app, empty_request("GET", "/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "OK" }));
}

#[tokio::test]
async fn test_security_headers() {
    let (app, _store) = test_app().await;
    let request = Request::builder()
        .method("GET")
        .uri("/")
        .header(header::ORIGIN, "https://example.com")
        .body(Body::empty())
        .unwrap();

    let (status, headers, _) = send(&app, request).await;

    assert_eq!(status, StatusCode::OK);
    let expected = [
        ("x-frame-options", "SAMEORIGIN"),
        ("x-xss-protection", "1; mode=block"),
        ("x-content-type-options", "nosniff"),
        ("content-security-policy", "default-src 'self'; object-src 'none'"),
        ("referrer-policy", "strict-origin-when-cross-origin"),
        ("access-control-allow-origin", "*"),
    ];
    for (name, value) in expected {
        assert_eq!(headers.get(name).unwrap(), value, "header {}", name);
    }
}

#[tokio::test]
async fn test_error_responses_carry_security_headers() {
    let (app, _store) = test_app().await;

    let (status, headers, _) = send(&app, empty_request("GET", "/nowhere")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(headers.get("x-frame-options").unwrap(), "SAMEORIGIN");
}

#[tokio::test]
async fn test_security_headers_can_be_disabled() {
    let mut config = AppConfig::default();
    config.security.enable_headers = false;
    let (app, _store) = common::test_app_with(config).await;

    let (_, headers, _) = send(&app, empty_request("GET", "/")).await;
    assert!(headers.get("x-frame-options").is_none());
}

#[tokio::test]
async fn test_request_id() {
    let (app, _store) = test_app().await;

    let (_, headers, _) = send(&app, empty_request("GET", "/health")).await;
    assert!(headers.get("x-request-id").is_some());

    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "abc-123")
        .body(Body::empty())
        .unwrap();
    let (_, headers, _) = send(&app, request).await;
    assert_eq!(headers.get("x-request-id").unwrap(), "abc-123");
}

/// SQLite store whose writes can be switched off.
struct FlakyStore {
    inner: SqliteAccountStore,
    fail_writes: AtomicBool,
}

impl FlakyStore {
    fn write_guard(&self) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(StoreError::Database(sqlx::Error::PoolTimedOut))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl AccountStore for FlakyStore {
    async fn insert(&self, data: &AccountData) -> Result<i64, StoreError> {
        self.write_guard()?;
        self.inner.insert(data).await
    }

    async fn get(&self, id: i64) -> Result<Option<Account>, StoreError> {
        self.inner.get(id).await
    }

    async fn update(&self, account: &Account) -> Result<(), StoreError> {
        self.write_guard()?;
        self.inner.update(account).await
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        self.write_guard()?;
        self.inner.delete(id).await
    }

    async fn list_all(&self) -> Result<Vec<Account>, StoreError> {
        self.inner.list_all().await
    }
}

#[tokio::test]
async fn test_store_failure_is_internal_error() {
    let store = Arc::new(FlakyStore {
        inner: SqliteAccountStore::in_memory().await.unwrap(),
        fail_writes: AtomicBool::new(false),
    });
    let app = common::app_over(store.clone() as SharedStore);

    let (_, _, created) = send(&app, json_request("POST", "/accounts", &account_payload("Uma"))).await;
    let uri = format!("/accounts/{}", created["id"]);
    store.fail_writes.store(true, Ordering::SeqCst);

    let mut payload = account_payload("Uma");
    payload["name"] = json!("Ursula");
    let (status, _, body) = send(&app, json_request("PUT", &uri, &payload)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "The account store is unavailable.");

    let (status, _, _) = send(&app, json_request("POST", "/accounts", &account_payload("Vic"))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    store.fail_writes.store(false, Ordering::SeqCst);
    let (_, _, body) = send(&app, empty_request("GET", "/accounts")).await;
    assert_eq!(body, json!([created]));
}
