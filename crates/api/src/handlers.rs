use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use shared::BalanceResult;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::{ApiError, ApiResult, AppState};

/// `GET /api/balance/:wallet`
pub async fn get_balance(
    State(state): State<Arc<AppState>>,
    Path(wallet): Path<String>,
) -> ApiResult<Json<BalanceResult>> {
    info!("Request received for {} balance: {}", state.token_symbol, wallet);

    match state.balance_service.get_balance(&wallet).await {
        Ok(result) => Ok(Json(result)),
        Err(e) if e.is_upstream() => {
            error!("Failed to fetch balance for {}: {}", wallet, e);
            Err(e.into())
        }
        Err(e) => {
            warn!("Rejected balance request for {}: {}", wallet, e);
            Err(e.into())
        }
    }
}

/// `GET /healthcheck`
pub async fn healthcheck(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.balance_service.chain_height().await {
        Ok(slot) => (StatusCode::OK, format!("Solana RPC live (slot: {})", slot)),
        Err(e) => {
            error!("RPC health check failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "RPC error".to_string())
        }
    }
}

/// Fallback for anything no route or static file matched
pub async fn not_found() -> ApiError {
    ApiError::NotFound
}
