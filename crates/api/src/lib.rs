pub mod balance_service;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod rate_limit;
pub mod routes;
pub mod security;

pub use balance_service::{select_holding, BalanceService, Selection, TokenSettings};
pub use error::{ApiError, ApiResult, ErrorResponse};
pub use rate_limit::{RateLimitConfig, RateLimiter};

use std::path::PathBuf;
use std::sync::Arc;

/// Application state shared across handlers
pub struct AppState {
    pub balance_service: Arc<BalanceService>,
    pub rate_limiter: Arc<RateLimiter>,
    pub token_symbol: String,
    pub static_dir: PathBuf,
}

impl AppState {
    pub fn new(
        balance_service: Arc<BalanceService>,
        rate_limiter: Arc<RateLimiter>,
        token_symbol: impl Into<String>,
        static_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            balance_service,
            rate_limiter,
            token_symbol: token_symbol.into(),
            static_dir: static_dir.into(),
        }
    }
}
