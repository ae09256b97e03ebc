use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Bounded retry policy for upstream RPC calls
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total attempts, including the first one. 1 disables retrying.
    pub max_attempts: u32,
    /// Delay before the first retry
    pub initial_delay: Duration,
    /// Upper bound for any single delay
    pub max_delay: Duration,
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            initial_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(2),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    pub fn new(max_attempts: u32, initial_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_delay,
            ..Self::default()
        }
    }

    /// A policy that makes exactly one attempt
    pub fn no_retry() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Delay after the given (0-indexed) failed attempt
    pub fn calculate_delay(&self, attempt: u32) -> Duration {
        let delay_ms = (self.initial_delay.as_millis() as f64)
            * self.backoff_multiplier.powi(attempt as i32);

        Duration::from_millis(delay_ms as u64).min(self.max_delay)
    }
}

/// Run `operation` until it succeeds or the policy is exhausted
///
/// Returns the error of the final attempt.
pub async fn retry_with_backoff<F, Fut, T, E>(
    operation_name: &str,
    config: &RetryConfig,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let max_attempts = config.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        debug!(
            "Executing '{}' - attempt {}/{}",
            operation_name,
            attempt + 1,
            max_attempts
        );

        match operation().await {
            Ok(result) => {
                if attempt > 0 {
                    debug!("'{}' succeeded on attempt {}", operation_name, attempt + 1);
                }
                return Ok(result);
            }
            Err(e) if attempt + 1 >= max_attempts => {
                warn!(
                    "'{}' failed on final attempt {}/{}: {}",
                    operation_name,
                    attempt + 1,
                    max_attempts,
                    e
                );
                return Err(e);
            }
            Err(e) => {
                let delay = config.calculate_delay(attempt);
                warn!(
                    "'{}' failed on attempt {}/{}: {} (retrying in {:?})",
                    operation_name,
                    attempt + 1,
                    max_attempts,
                    e,
                    delay
                );
                sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
