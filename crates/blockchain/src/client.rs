use async_trait::async_trait;
use shared::{Error, Result, TokenHolding};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_request::TokenAccountsFilter;
use solana_sdk::{commitment_config::CommitmentConfig, pubkey::Pubkey};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::ledger::LedgerRpc;
use crate::parse::parse_token_holding;
use crate::retry::{retry_with_backoff, RetryConfig};

/// Solana RPC client wrapper with a per-call timeout and bounded retry
pub struct SolanaClient {
    rpc: RpcClient,
    timeout: Duration,
    retry_config: RetryConfig,
}

impl SolanaClient {
    /// Create a client with a 10 second timeout and the default retry policy
    pub fn new(rpc_url: String) -> Self {
        Self::new_with_config(rpc_url, Duration::from_secs(10), RetryConfig::default())
    }

    pub fn new_with_config(rpc_url: String, timeout: Duration, retry_config: RetryConfig) -> Self {
        info!(
            "Initializing Solana client (timeout={:?}, max_attempts={})",
            timeout, retry_config.max_attempts
        );

        let rpc = RpcClient::new_with_timeout_and_commitment(
            rpc_url,
            timeout,
            CommitmentConfig::confirmed(),
        );

        Self {
            rpc,
            timeout,
            retry_config,
        }
    }

    /// Run one RPC call under the timeout, retrying per the configured policy
    async fn call<F, Fut, T>(&self, operation_name: &str, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let timeout = self.timeout;

        retry_with_backoff(operation_name, &self.retry_config, || {
            let fut = operation();
            async move {
                match tokio::time::timeout(timeout, fut).await {
                    Ok(result) => result,
                    Err(_) => Err(Error::Timeout(format!(
                        "{} did not complete within {:?}",
                        operation_name, timeout
                    ))),
                }
            }
        })
        .await
    }
}

#[async_trait]
impl LedgerRpc for SolanaClient {
    async fn token_holdings(&self, owner: &Pubkey, program_id: &Pubkey) -> Result<Vec<TokenHolding>> {
        debug!("Fetching token accounts for owner: {}", owner);

        let accounts = self
            .call("get_token_accounts_by_owner", || async {
                self.rpc
                    .get_token_accounts_by_owner(owner, TokenAccountsFilter::ProgramId(*program_id))
                    .await
                    .map_err(|e| Error::SolanaRpc(format!("getTokenAccountsByOwner failed: {}", e)))
            })
            .await?;

        let mut holdings = Vec::with_capacity(accounts.len());
        for keyed in accounts {
            match parse_token_holding(&keyed.account.data) {
                Ok(holding) => holdings.push(holding),
                Err(e) => {
                    warn!("Skipping unparseable token account {}: {}", keyed.pubkey, e);
                }
            }
        }

        debug!("Retrieved {} token accounts for {}", holdings.len(), owner);
        Ok(holdings)
    }

    async fn current_slot(&self) -> Result<u64> {
        self.call("get_slot", || async {
            self.rpc
                .get_slot()
                .await
                .map_err(|e| Error::SolanaRpc(format!("getSlot failed: {}", e)))
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_endpoint_surfaces_rpc_error() {
        // Nothing listens on port 9 of localhost; the call fails fast
        let client = SolanaClient::new_with_config(
            "http://127.0.0.1:9".to_string(),
            Duration::from_secs(2),
            RetryConfig::no_retry(),
        );

        let err = client.current_slot().await.unwrap_err();
        assert!(err.is_upstream(), "unexpected error: {}", err);
    }

    #[tokio::test]
    async fn test_silent_endpoint_times_out() {
        // Accepts connections but never answers
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let timeout = Duration::from_millis(300);
        let client = SolanaClient::new_with_config(
            format!("http://{}", addr),
            timeout,
            RetryConfig::new(2, Duration::from_millis(10)),
        );

        let started = std::time::Instant::now();
        let err = client.current_slot().await.unwrap_err();
        let elapsed = started.elapsed();

        assert!(err.is_upstream(), "unexpected error: {}", err);
        assert!(elapsed >= timeout, "returned after {:?}", elapsed);
        assert!(elapsed < Duration::from_secs(3), "took {:?}", elapsed);
    }

    #[tokio::test]
    #[ignore] // Requires network access to a live RPC endpoint
    async fn test_current_slot_live() {
        let rpc_url = std::env::var("HELIUS_RPC_URL")
            .unwrap_or_else(|_| "https://api.mainnet-beta.solana.com".to_string());
        let client = SolanaClient::new(rpc_url);

        let slot = client.current_slot().await.unwrap();
        assert!(slot > 0);
    }
}
