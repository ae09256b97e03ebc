use blockchain::{token_program_id, validate_address, LedgerRpc};
use shared::{BalanceResult, Result, TokenHolding};
use solana_sdk::pubkey::Pubkey;
use std::sync::Arc;
use tracing::{info, warn};

/// Fixed token identifiers the lookup is scoped to
#[derive(Debug, Clone)]
pub struct TokenSettings {
    /// Mint of the tracked token, compared against each holding's mint
    pub mint: String,
    /// Owning token program; anything else is not a token account
    pub program_id: Pubkey,
    /// Echo every holding back to the caller
    pub include_holdings: bool,
}

impl TokenSettings {
    pub fn new(mint: impl Into<String>) -> Self {
        Self {
            mint: mint.into(),
            program_id: token_program_id(),
            include_holdings: false,
        }
    }

    pub fn with_holdings(mut self, include_holdings: bool) -> Self {
        self.include_holdings = include_holdings;
        self
    }
}

/// Outcome of scanning an account's holdings for one mint
#[derive(Debug, PartialEq)]
pub struct Selection<'a> {
    /// First holding whose mint matched
    pub holding: Option<&'a TokenHolding>,
    pub matches: usize,
}

/// Scan every holding for `mint`
///
/// The ledger keeps one token account per (owner, mint) for associated accounts,
/// but owners may create extra ones. The whole list is scanned and the first
/// match wins.
pub fn select_holding<'a>(holdings: &'a [TokenHolding], mint: &str) -> Selection<'a> {
    let mut matching = holdings.iter().filter(|h| h.mint == mint);
    let holding = matching.next();
    let matches = holding.map_or(0, |_| 1 + matching.count());

    Selection { holding, matches }
}

/// Resolves a wallet's balance of the configured token
pub struct BalanceService {
    ledger: Arc<dyn LedgerRpc>,
    settings: TokenSettings,
}

impl BalanceService {
    pub fn new(ledger: Arc<dyn LedgerRpc>, settings: TokenSettings) -> Self {
        Self { ledger, settings }
    }

    /// Balance of the configured mint held by `wallet`
    ///
    /// A valid wallet with no matching token account has a balance of 0.
    pub async fn get_balance(&self, wallet: &str) -> Result<BalanceResult> {
        let owner = validate_address(wallet)?;

        let holdings = self
            .ledger
            .token_holdings(&owner, &self.settings.program_id)
            .await?;

        if holdings.is_empty() {
            warn!("No token accounts found for {}", wallet);
            return Ok(self.result(0.0, holdings));
        }

        let selection = select_holding(&holdings, &self.settings.mint);
        if selection.matches > 1 {
            warn!(
                "{} holds {} token accounts for mint {}; using the first",
                wallet, selection.matches, self.settings.mint
            );
        }

        let balance = selection.holding.map_or(0.0, |h| h.amount);
        info!("Balance for {}: {}", wallet, balance);

        Ok(self.result(balance, holdings))
    }

    /// Current slot of the upstream node
    pub async fn chain_height(&self) -> Result<u64> {
        self.ledger.current_slot().await
    }

    fn result(&self, balance: f64, holdings: Vec<TokenHolding>) -> BalanceResult {
        BalanceResult {
            balance,
            tokens: self.settings.include_holdings.then_some(holdings),
        }
    }
}
