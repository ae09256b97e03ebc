use async_trait::async_trait;
use solana_sdk::signature::{read_keypair_file, Signer};
use std::path::PathBuf;
use tracing::debug;

use crate::error::{SessionError, SessionResult};

/// A wallet that can hand out its public address once the user allows it
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Human-readable provider name
    fn name(&self) -> &str;

    /// Presence probe; false means no wallet of this kind is installed
    fn is_available(&self) -> bool;

    /// Ask the wallet for access and return the base58 account address
    async fn request_connection(&self) -> SessionResult<String>;
}

/// Local Solana CLI keypair file (`solana-keygen new` output)
pub struct KeypairFileWallet {
    path: PathBuf,
}

impl KeypairFileWallet {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `~/.config/solana/id.json`, the Solana CLI default
    pub fn default_path() -> Option<PathBuf> {
        std::env::var_os("HOME").map(|home| {
            PathBuf::from(home)
                .join(".config")
                .join("solana")
                .join("id.json")
        })
    }
}

#[async_trait]
impl WalletProvider for KeypairFileWallet {
    fn name(&self) -> &str {
        "Solana CLI keypair"
    }

    fn is_available(&self) -> bool {
        self.path.is_file()
    }

    async fn request_connection(&self) -> SessionResult<String> {
        debug!("Reading keypair from {}", self.path.display());

        let keypair = read_keypair_file(&self.path).map_err(|e| {
            SessionError::ConnectionRejected(format!("{}: {}", self.path.display(), e))
        })?;

        Ok(keypair.pubkey().to_string())
    }
}
