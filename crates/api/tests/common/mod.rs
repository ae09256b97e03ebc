#![allow(dead_code)]

use api::{AppState, BalanceService, RateLimitConfig, RateLimiter, TokenSettings};
use async_trait::async_trait;
use blockchain::LedgerRpc;
use shared::{Error, Result, TokenHolding};
use solana_sdk::pubkey::Pubkey;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const TARGET_MINT: &str = "BEyp5W9oQosUDD2hPt2Qeg6fuAkNUbnvR6ZJhD8Ybonk";
pub const OTHER_MINT: &str = "DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263";
pub const WRAPPED_SOL: &str = "So11111111111111111111111111111111111111112";
pub const EMPTY_WALLET: &str = "11111111111111111111111111111111";
pub const HOLDER_WALLET: &str = "83astBRguLMdt2h5U1Tpdq5tjFoJ6noeGwaY3mDLVcri";

/// In-memory ledger keyed by owner
#[derive(Default)]
pub struct MockLedger {
    holdings: Mutex<HashMap<Pubkey, Vec<TokenHolding>>>,
    failure: Mutex<Option<String>>,
    slot: u64,
    pub calls: AtomicUsize,
    pub last_program: Mutex<Option<Pubkey>>,
}

impl MockLedger {
    pub fn new() -> Self {
        Self {
            slot: 250_000_000,
            ..Default::default()
        }
    }

    pub fn with_holdings(self, owner: &str, holdings: Vec<TokenHolding>) -> Self {
        let owner: Pubkey = owner.parse().unwrap();
        self.holdings.lock().unwrap().insert(owner, holdings);
        self
    }

    pub fn failing(self, message: &str) -> Self {
        *self.failure.lock().unwrap() = Some(message.to_string());
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LedgerRpc for MockLedger {
    async fn token_holdings(&self, owner: &Pubkey, program_id: &Pubkey) -> Result<Vec<TokenHolding>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_program.lock().unwrap() = Some(*program_id);

        if let Some(message) = self.failure.lock().unwrap().clone() {
            return Err(Error::SolanaRpc(message));
        }

        Ok(self
            .holdings
            .lock()
            .unwrap()
            .get(owner)
            .cloned()
            .unwrap_or_default())
    }

    async fn current_slot(&self) -> Result<u64> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(message) = self.failure.lock().unwrap().clone() {
            return Err(Error::SolanaRpc(message));
        }
        Ok(self.slot)
    }
}

pub fn balance_service(ledger: Arc<MockLedger>, include_holdings: bool) -> BalanceService {
    BalanceService::new(
        ledger,
        TokenSettings::new(TARGET_MINT).with_holdings(include_holdings),
    )
}

pub fn app_state(ledger: Arc<MockLedger>, max_requests: u32, static_dir: &str) -> Arc<AppState> {
    let rate_limiter = RateLimiter::new(RateLimitConfig {
        max_requests,
        window: Duration::from_secs(60),
        trust_proxy: false,
    });

    Arc::new(AppState::new(
        Arc::new(balance_service(ledger, false)),
        Arc::new(rate_limiter),
        "BONKBOY",
        static_dir,
    ))
}
