use async_trait::async_trait;
use shared::{Error, Result, TokenHolding};
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;
use tracing::warn;

/// Read-only view of the ledger used by the balance lookup and health probe
///
/// `SolanaClient` is the production implementation; tests substitute their own.
#[async_trait]
pub trait LedgerRpc: Send + Sync {
    /// All token accounts owned by `owner` under the given token program
    async fn token_holdings(&self, owner: &Pubkey, program_id: &Pubkey) -> Result<Vec<TokenHolding>>;

    /// Current slot (chain height) as seen by the upstream node
    async fn current_slot(&self) -> Result<u64>;
}

/// The SPL Token program, which owns every "real" token account
pub fn token_program_id() -> Pubkey {
    spl_token::id()
}

/// Decode a base58 wallet address into a public key
pub fn validate_address(address: &str) -> Result<Pubkey> {
    Pubkey::from_str(address).map_err(|e| {
        warn!("Invalid wallet address format: {} - {}", address, e);
        Error::InvalidWalletAddress(format!("Invalid Solana address format: {}", e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_address_valid() {
        let result = validate_address("11111111111111111111111111111111");
        assert!(result.is_ok());
    }

    #[test]
    fn test_validate_address_invalid() {
        let result = validate_address("invalid_address");

        if let Err(Error::InvalidWalletAddress(msg)) = result {
            assert!(msg.contains("Invalid Solana address format"));
        } else {
            panic!("Expected InvalidWalletAddress error");
        }
    }

    #[test]
    fn test_validate_address_empty() {
        assert!(validate_address("").is_err());
    }

    #[test]
    fn test_validate_address_wrong_alphabet() {
        // '0', 'O', 'I' and 'l' are not in the base58 alphabet
        assert!(validate_address("0OIl0OIl0OIl0OIl0OIl0OIl0OIl0OIl").is_err());
    }

    #[test]
    fn test_validate_address_too_short() {
        assert!(validate_address("So11111111").is_err());
    }

    #[test]
    fn test_token_program_id() {
        assert_eq!(
            token_program_id().to_string(),
            "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA"
        );
    }
}
