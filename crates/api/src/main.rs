use anyhow::Result;
use api::{logging, AppState, BalanceService, RateLimitConfig, RateLimiter, TokenSettings};
use blockchain::{RetryConfig, SolanaClient};
use shared::config::Config;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    let _log_guard = logging::init_logging(
        Path::new(&config.logging.dir),
        config.logging.max_files,
        config.logging.json,
    )?;

    tracing::info!("Starting {} balance API", config.token.symbol);

    if !config.solana.rpc_configured {
        tracing::warn!(
            "HELIUS_RPC_URL / HELIUS_API_KEY not set; using public endpoint {}",
            config.solana.rpc_url
        );
    }

    let retry_config = RetryConfig::new(
        config.solana.max_attempts,
        Duration::from_millis(config.solana.retry_delay_ms),
    );
    let solana_client = Arc::new(SolanaClient::new_with_config(
        config.solana.rpc_url.clone(),
        Duration::from_secs(config.solana.timeout_secs),
        retry_config,
    ));
    tracing::info!("Solana client initialized");

    let settings = TokenSettings::new(config.token.mint.clone())
        .with_holdings(config.token.debug_tokens);
    if settings.include_holdings {
        tracing::warn!("BALANCE_DEBUG_TOKENS is on; balance responses include every holding");
    }
    let balance_service = Arc::new(BalanceService::new(solana_client, settings));

    let rate_limiter = Arc::new(RateLimiter::new(RateLimitConfig::from(&config)));
    tracing::info!(
        "Rate limit: {} requests per {}s per client (trust proxy: {})",
        config.rate_limit.max_requests,
        config.rate_limit.window_secs,
        config.server.trust_proxy
    );

    let app_state = Arc::new(AppState::new(
        balance_service,
        rate_limiter,
        config.token.symbol.clone(),
        config.server.static_dir.clone(),
    ));

    let app = api::routes::create_router(app_state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Backend server running on port {}", config.server.port);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
