use anyhow::Context;
use solana_sdk::pubkey::Pubkey;
use std::env;
use std::str::FromStr;

/// BONKBOY mint on mainnet
pub const DEFAULT_TOKEN_MINT: &str = "BEyp5W9oQosUDD2hPt2Qeg6fuAkNUbnvR6ZJhD8Ybonk";
pub const DEFAULT_TOKEN_SYMBOL: &str = "BONKBOY";
pub const HELIUS_MAINNET_URL: &str = "https://mainnet.helius-rpc.com/";
pub const PUBLIC_MAINNET_URL: &str = "https://api.mainnet-beta.solana.com";

#[derive(Debug, Clone)]
pub struct Config {
    pub solana: SolanaConfig,
    pub token: TokenConfig,
    pub server: ServerConfig,
    pub rate_limit: RateLimitConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone)]
pub struct SolanaConfig {
    pub rpc_url: String,
    /// False when neither `HELIUS_RPC_URL` nor `HELIUS_API_KEY` was set
    pub rpc_configured: bool,
    pub timeout_secs: u64,
    pub max_attempts: u32,
    pub retry_delay_ms: u64,
}

#[derive(Debug, Clone)]
pub struct TokenConfig {
    pub mint: String,
    pub symbol: String,
    /// Include every token holding in balance responses
    pub debug_tokens: bool,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub trust_proxy: bool,
    pub static_dir: String,
}

#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub max_requests: u32,
    pub window_secs: u64,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub dir: String,
    pub max_files: usize,
    pub json: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source
    pub fn from_vars<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let (rpc_url, rpc_configured) = match (lookup("HELIUS_RPC_URL"), lookup("HELIUS_API_KEY")) {
            (Some(url), _) if !url.trim().is_empty() => (url, true),
            (_, Some(key)) if !key.trim().is_empty() => {
                (format!("{}?api-key={}", HELIUS_MAINNET_URL, key.trim()), true)
            }
            _ => (PUBLIC_MAINNET_URL.to_string(), false),
        };

        let mint = lookup("TOKEN_MINT").unwrap_or_else(|| DEFAULT_TOKEN_MINT.to_string());
        Pubkey::from_str(&mint).with_context(|| format!("TOKEN_MINT is not a valid mint: {}", mint))?;

        let max_attempts: u32 = parse_or(&lookup, "RPC_MAX_ATTEMPTS", 2)?;
        if max_attempts == 0 {
            anyhow::bail!("RPC_MAX_ATTEMPTS must be at least 1");
        }

        Ok(Config {
            solana: SolanaConfig {
                rpc_url,
                rpc_configured,
                timeout_secs: parse_or(&lookup, "RPC_TIMEOUT_SECS", 10)?,
                max_attempts,
                retry_delay_ms: parse_or(&lookup, "RPC_RETRY_DELAY_MS", 200)?,
            },
            token: TokenConfig {
                mint,
                symbol: lookup("TOKEN_SYMBOL").unwrap_or_else(|| DEFAULT_TOKEN_SYMBOL.to_string()),
                debug_tokens: parse_flag(&lookup, "BALANCE_DEBUG_TOKENS")?,
            },
            server: ServerConfig {
                host: lookup("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port: parse_or(&lookup, "PORT", 3001)?,
                trust_proxy: parse_flag(&lookup, "TRUST_PROXY")?,
                static_dir: lookup("STATIC_DIR").unwrap_or_else(|| "public".to_string()),
            },
            rate_limit: RateLimitConfig {
                max_requests: parse_or(&lookup, "RATE_LIMIT_MAX_REQUESTS", 30)?,
                window_secs: parse_or(&lookup, "RATE_LIMIT_WINDOW_SECS", 60)?,
            },
            logging: LoggingConfig {
                dir: lookup("LOG_DIR").unwrap_or_else(|| "logs".to_string()),
                max_files: parse_or(&lookup, "LOG_MAX_FILES", 14)?,
                json: lookup("LOG_FORMAT")
                    .map(|v| v.eq_ignore_ascii_case("json"))
                    .unwrap_or(false),
            },
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid value for {}: {}", key, raw)),
        None => Ok(default),
    }
}

/// Accepts the usual spellings of a boolean environment flag
fn parse_flag<F>(lookup: &F, key: &str) -> anyhow::Result<bool>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).as_deref().map(str::trim) {
        None | Some("") => Ok(false),
        Some(v) if ["1", "true", "yes", "on"].iter().any(|t| v.eq_ignore_ascii_case(t)) => Ok(true),
        Some(v) if ["0", "false", "no", "off"].iter().any(|t| v.eq_ignore_ascii_case(t)) => Ok(false),
        Some(v) => anyhow::bail!("Invalid value for {}: {}", key, v),
    }
}
