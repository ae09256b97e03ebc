use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::error::{SessionError, SessionResult};

/// What the balance API said about a wallet
#[derive(Debug, Clone, PartialEq)]
pub enum BalanceOutcome {
    Balance(f64),
    /// The response carried no `balance` field
    NotFound,
}

#[async_trait]
pub trait BalanceApi: Send + Sync {
    async fn fetch_balance(&self, wallet: &str) -> SessionResult<BalanceOutcome>;
}

#[derive(Debug, Deserialize)]
struct BalanceBody {
    balance: Option<f64>,
}

/// `GET {base_url}/api/balance/{wallet}` over HTTP
pub struct HttpBalanceApi {
    base_url: String,
    client: reqwest::Client,
}

impl HttpBalanceApi {
    pub fn new(base_url: impl Into<String>) -> SessionResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| SessionError::FetchFailed(e.to_string()))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn balance_url(&self, wallet: &str) -> String {
        format!("{}/api/balance/{}", self.base_url, wallet)
    }
}

#[async_trait]
impl BalanceApi for HttpBalanceApi {
    async fn fetch_balance(&self, wallet: &str) -> SessionResult<BalanceOutcome> {
        let url = self.balance_url(wallet);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SessionError::FetchFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SessionError::FetchFailed(format!("balance API returned {}", status)));
        }

        let body: BalanceBody = response
            .json()
            .await
            .map_err(|e| SessionError::FetchFailed(format!("invalid response body: {}", e)))?;

        Ok(body
            .balance
            .map_or(BalanceOutcome::NotFound, BalanceOutcome::Balance))
    }
}
