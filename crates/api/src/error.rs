use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const BALANCE_FAILED_MESSAGE: &str = "Failed to fetch balance";
pub const RATE_LIMITED_MESSAGE: &str = "Too many requests. Please slow down.";
pub const ROUTE_NOT_FOUND_MESSAGE: &str = "Route not found. Try /api/balance/:wallet or /healthcheck";

/// Errors a request handler can end in
#[derive(Debug)]
pub enum ApiError {
    /// Malformed caller input; safe to describe
    InvalidInput(String),

    /// The ledger RPC failed or timed out; detail is logged, never returned
    Upstream(String),

    RateLimitExceeded,

    NotFound,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            ApiError::Upstream(msg) => write!(f, "Upstream RPC error: {}", msg),
            ApiError::RateLimitExceeded => write!(f, "Rate limit exceeded"),
            ApiError::NotFound => write!(f, "Route not found"),
        }
    }
}

impl std::error::Error for ApiError {}

/// Error body: `{"error": "..."}`
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into() }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "Invalid wallet address"),
            ApiError::Upstream(_) => (StatusCode::INTERNAL_SERVER_ERROR, BALANCE_FAILED_MESSAGE),
            ApiError::RateLimitExceeded => (StatusCode::TOO_MANY_REQUESTS, RATE_LIMITED_MESSAGE),
            ApiError::NotFound => (StatusCode::NOT_FOUND, ROUTE_NOT_FOUND_MESSAGE),
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

impl From<shared::Error> for ApiError {
    fn from(err: shared::Error) -> Self {
        match err {
            shared::Error::InvalidWalletAddress(msg) => ApiError::InvalidInput(msg),
            shared::Error::SolanaRpc(msg) | shared::Error::Timeout(msg) => ApiError::Upstream(msg),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
