//! Wallet session client for the BONKBOY balance API
//!
//! Connects a wallet, remembers it between runs and renders the balance the
//! API reports for it.

pub mod api_client;
pub mod error;
pub mod provider;
pub mod session;
pub mod storage;

pub use api_client::{BalanceApi, BalanceOutcome, HttpBalanceApi};
pub use error::{SessionError, SessionResult};
pub use provider::{KeypairFileWallet, WalletProvider};
pub use session::{BalanceDisplay, SessionState, WalletSession, WalletView};
pub use storage::{FileStore, MemoryStore, SessionStore};
