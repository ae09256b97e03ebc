use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid wallet address: {0}")]
    InvalidWalletAddress(String),

    #[error("Solana RPC error: {0}")]
    SolanaRpc(String),

    #[error("Timeout: {0}")]
    Timeout(String),
}

impl Error {
    /// Whether the failure came from the upstream ledger rather than the caller
    pub fn is_upstream(&self) -> bool {
        matches!(self, Error::SolanaRpc(_) | Error::Timeout(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
