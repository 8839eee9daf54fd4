//! Retry policy for idempotent catalog reads.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use super::error::CatalogError;
use crate::config::CatalogSettings;

/// Exponential backoff policy applied to read operations.
///
/// Writes (`create_playlist`, `add_tracks`) bypass this entirely: a retry
/// after an ambiguous failure could duplicate remote state.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    pub backoff_multiplier: f64,
}

impl RetryPolicy {
    pub fn new(settings: &CatalogSettings) -> Self {
        Self {
            max_retries: settings.max_retries,
            initial_backoff_ms: settings.initial_backoff_ms,
            max_backoff_ms: settings.max_backoff_ms,
            backoff_multiplier: settings.backoff_multiplier,
        }
    }

    /// Whether `error` warrants another attempt after `retry_count` failures.
    pub fn should_retry(&self, error: &CatalogError, retry_count: u32) -> bool {
        retry_count < self.max_retries && error.is_retryable()
    }

    /// Backoff before retry number `retry_count + 1`.
    pub fn backoff_duration(&self, retry_count: u32) -> Duration {
        let backoff_ms =
            self.initial_backoff_ms as f64 * self.backoff_multiplier.powi(retry_count as i32);
        let capped_ms = (backoff_ms as u64).min(self.max_backoff_ms);
        Duration::from_millis(capped_ms)
    }

    /// Runs `f`, retrying on retryable failures with exponential backoff.
    pub async fn run<T, F, Fut>(&self, operation: &'static str, f: F) -> Result<T, CatalogError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, CatalogError>>,
    {
        let mut retry_count = 0;
        loop {
            match f().await {
                Ok(value) => return Ok(value),
                Err(e) if self.should_retry(&e, retry_count) => {
                    let backoff = self.backoff_duration(retry_count);
                    retry_count += 1;
                    warn!(
                        operation,
                        attempt = retry_count,
                        backoff_ms = backoff.as_millis() as u64,
                        "retrying after: {e}"
                    );
                    tokio::time::sleep(backoff).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_backoff_ms: 500,
            max_backoff_ms: 5000,
            backoff_multiplier: 2.0,
        }
    }
}
