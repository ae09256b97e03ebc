use axum::{
    extract::{ConnectInfo, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::warn;

use crate::{ApiError, AppState};

/// Windows tracked before expired ones are swept
const PRUNE_THRESHOLD: usize = 10_000;

/// Rate limit configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub max_requests: u32,
    pub window: Duration,
    /// Derive the client address from `X-Forwarded-For`
    pub trust_proxy: bool,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 30,
            window: Duration::from_secs(60),
            trust_proxy: false,
        }
    }
}

impl From<&shared::config::Config> for RateLimitConfig {
    fn from(config: &shared::config::Config) -> Self {
        Self {
            max_requests: config.rate_limit.max_requests,
            window: Duration::from_secs(config.rate_limit.window_secs),
            trust_proxy: config.server.trust_proxy,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

/// Fixed-window request counter per client address
pub struct RateLimiter {
    config: RateLimitConfig,
    windows: Mutex<HashMap<String, Window>>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Count a request from `client`; false once the window's cap is reached
    pub async fn check(&self, client: &str) -> bool {
        self.check_at(client, Instant::now()).await
    }

    async fn check_at(&self, client: &str, now: Instant) -> bool {
        let window_len = self.config.window;
        let mut windows = self.windows.lock().await;

        if windows.len() >= PRUNE_THRESHOLD {
            windows.retain(|_, w| now.duration_since(w.started) < window_len);
        }

        let window = windows.entry(client.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });

        if now.duration_since(window.started) >= window_len {
            *window = Window {
                started: now,
                count: 0,
            };
        }

        if window.count >= self.config.max_requests {
            return false;
        }

        window.count += 1;
        true
    }

    /// Address requests are counted against
    pub fn client_key(&self, headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
        if self.config.trust_proxy {
            let forwarded = headers
                .get("x-forwarded-for")
                .and_then(|h| h.to_str().ok())
                .and_then(|v| v.split(',').next())
                .map(str::trim)
                .filter(|v| !v.is_empty());

            if let Some(ip) = forwarded {
                return ip.to_string();
            }
        }

        peer.map(|addr| addr.ip().to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }
}

/// Rejects requests over the per-address limit before they reach a handler
pub async fn rate_limit_middleware(
    State(state): State<Arc<AppState>>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    req: Request,
    next: Next,
) -> Response {
    let peer = connect_info.map(|ConnectInfo(addr)| addr);
    let client = state.rate_limiter.client_key(req.headers(), peer);

    if state.rate_limiter.check(&client).await {
        next.run(req).await
    } else {
        warn!("Rate limit exceeded for {} on {}", client, req.uri().path());
        ApiError::RateLimitExceeded.into_response()
    }
}
