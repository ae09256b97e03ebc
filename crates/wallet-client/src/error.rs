use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("No wallet provider is installed")]
    WalletNotInstalled,

    #[error("Wallet connection rejected: {0}")]
    ConnectionRejected(String),

    #[error("Balance fetch failed: {0}")]
    FetchFailed(String),

    #[error("Session storage error: {0}")]
    Storage(String),
}

pub type SessionResult<T> = Result<T, SessionError>;
