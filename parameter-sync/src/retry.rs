//! Bounded retry with exponential backoff for remote store calls.

use std::time::Duration;

use tracing::warn;

#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub backoff_factor: f64,
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(5),
            backoff_factor: 2.0,
            jitter: true,
        }
    }
}

impl RetryConfig {
    /// Single attempt, no waiting.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            backoff_factor: 1.0,
            jitter: false,
        }
    }
}

pub trait RetryableError {
    fn is_retryable(&self) -> bool;
}

fn calculate_delay(cfg: &RetryConfig, attempt: u32) -> Duration {
    let exponential_delay = cfg.base_delay.as_secs_f64() * cfg.backoff_factor.powi(attempt as i32);
    let capped_delay = exponential_delay.min(cfg.max_delay.as_secs_f64());

    let final_delay = if cfg.jitter {
        capped_delay * (0.5 + fastrand::f64())
    } else {
        capped_delay
    };

    Duration::from_secs_f64(final_delay)
}

pub async fn retry<F, Fut, T, E>(cfg: &RetryConfig, mut f: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    E: RetryableError + std::fmt::Display,
{
    let max_attempts = cfg.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        match f().await {
            Ok(result) => return Ok(result),
            Err(err) => {
                attempt += 1;

                if !err.is_retryable() {
                    return Err(err);
                }

                if attempt >= max_attempts {
                    warn!(error = %err, attempt, max_attempts, "Max retry attempts exhausted");
                    return Err(err);
                }

                let delay = calculate_delay(cfg, attempt - 1);
                warn!(
                    error = %err,
                    attempt,
                    max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    "Retrying remote call after transient error"
                );

                tokio::time::sleep(delay).await;
            }
        }
    }
}
