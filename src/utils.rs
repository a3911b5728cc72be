use std::future::Future;

use tokio::time::{Duration, sleep};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use crate::models::retry::RetryConfig;

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_current_span(true)
        .init();
}

/// Runs `operation` until it succeeds or `max_attempts` is spent, sleeping with
/// jittered exponential backoff in between. Only use for idempotent calls.
pub async fn retry_with_backoff<F, Fut, T, E>(
    config: &RetryConfig,
    operation_name: &str,
    operation: F,
) -> Result<T, E>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let max_attempts = config.max_attempts.max(1);
    let mut attempt = 0;
    let mut delay_ms = config.initial_delay_ms;

    loop {
        attempt += 1;

        let error = match operation().await {
            Ok(result) => {
                if attempt > 1 {
                    debug!(operation = operation_name, attempt, "Call succeeded after retry");
                }
                return Ok(result);
            }
            Err(e) => e,
        };

        if attempt >= max_attempts {
            warn!(
                operation = operation_name,
                max_attempts,
                error = %error,
                "Giving up after exhausting retries"
            );
            return Err(error);
        }

        debug!(
            operation = operation_name,
            attempt,
            delay_ms,
            error = %error,
            "Call failed, backing off"
        );

        let jitter = rand::random_range(-0.1..=0.1);
        let jittered_delay = (delay_ms as f64 * (1.0 + jitter)) as u64;
        sleep(Duration::from_millis(jittered_delay)).await;

        delay_ms = std::cmp::min(
            delay_ms.saturating_mul(config.backoff_multiplier),
            config.max_delay_ms,
        );
    }
}
