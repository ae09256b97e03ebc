use serde::{Deserialize, Serialize};

/// One token account owned by a wallet, reduced to what the balance lookup needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenHolding {
    pub mint: String,
    /// UI-formatted amount (raw amount scaled by the mint's decimals)
    pub amount: f64,
}

impl TokenHolding {
    pub fn new(mint: impl Into<String>, amount: f64) -> Self {
        Self {
            mint: mint.into(),
            amount,
        }
    }
}

/// Payload of `GET /api/balance/:wallet`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceResult {
    pub balance: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens: Option<Vec<TokenHolding>>,
}
