pub mod client;
pub mod ledger;
pub mod parse;
pub mod retry;

pub use client::SolanaClient;
pub use ledger::{token_program_id, validate_address, LedgerRpc};
pub use parse::parse_token_holding;
pub use retry::{retry_with_backoff, RetryConfig};
