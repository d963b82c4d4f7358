use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};

/// Fields sent when creating or updating an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub address: String,
    pub phone_number: String,
    /// `YYYY-MM-DD`; the service stamps today when omitted on create.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_joined: Option<String>,
}

/// A persisted account as returned by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub address: String,
    pub phone_number: String,
    pub date_joined: String,
}

#[derive(Debug)]
pub enum ClientError {
    Http(reqwest::Error),
    /// The service answered with an unexpected status.
    Status { status: StatusCode, body: String },
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::Http(e) => write!(f, "HTTP error: {}", e),
            ClientError::Status { status, body } => {
                write!(f, "Service returned error status {}: {}", status, body)
            }
        }
    }
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::Http(e)
    }
}

pub struct AccountClient {
    client: Client,
    base_url: String,
}

impl AccountClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Create an account. Returns it with its assigned id.
    pub async fn create(&self, account: &NewAccount) -> Result<Account, ClientError> {
        let resp = self
            .client
            .post(format!("{}/accounts", self.base_url))
            .json(account)
            .send()
            .await?;
        Ok(expect_status(resp, StatusCode::CREATED).await?.json().await?)
    }

    /// Fetch one account; `None` when it does not exist.
    pub async fn get(&self, id: i64) -> Result<Option<Account>, ClientError> {
        let resp = self
            .client
            .get(format!("{}/accounts/{}", self.base_url, id))
            .send()
            .await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Ok(Some(expect_status(resp, StatusCode::OK).await?.json().await?))
    }

    pub async fn list(&self) -> Result<Vec<Account>, ClientError> {
        let resp = self
            .client
            .get(format!("{}/accounts", self.base_url))
            .send()
            .await?;
        Ok(expect_status(resp, StatusCode::OK).await?.json().await?)
    }

    /// Overwrite an account; `None` when it does not exist.
    pub async fn update(&self, id: i64, account: &NewAccount) -> Result<Option<Account>, ClientError> {
        let resp = self
            .client
            .put(format!("{}/accounts/{}", self.base_url, id))
            .json(account)
            .send()
            .await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Ok(Some(expect_status(resp, StatusCode::OK).await?.json().await?))
    }

    /// Delete an account. Succeeds whether or not it existed.
    pub async fn delete(&self, id: i64) -> Result<(), ClientError> {
        let resp = self
            .client
            .delete(format!("{}/accounts/{}", self.base_url, id))
            .send()
            .await?;
        expect_status(resp, StatusCode::NO_CONTENT).await?;
        Ok(())
    }

    /// True when the service answers its health probe.
    pub async fn health(&self) -> Result<bool, ClientError> {
        let resp = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;
        Ok(resp.status().is_success())
    }
}

async fn expect_status(resp: Response, expected: StatusCode) -> Result<Response, ClientError> {
    let status = resp.status();
    if status == expected {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(ClientError::Status { status, body })
}
