//! Exponential backoff retry for Spotify API calls.
//!
//! Transient failures (rate limiting, server errors, network errors) are
//! retried with exponentially growing delays, while permanent failures fail
//! immediately.

use super::error::SpotifyError;
use log::*;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

/// Bounds for retrying a failed operation.
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_retries: u32,
    #[serde(rename = "base_delay_ms", with = "millis")]
    pub base_delay: Duration,
    #[serde(rename = "max_delay_ms", with = "millis")]
    pub max_delay: Duration,
    pub backoff_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        RetryConfig {
            max_retries: 3,
            base_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(10_000),
            backoff_factor: 2.0,
        }
    }
}

impl RetryConfig {
    /// Return the delay after the given failed attempt (1-based), capped at
    /// the maximum delay.
    ///
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1) as i32;
        let millis = self.base_delay.as_millis() as f64 * self.backoff_factor.powi(exponent);
        let cap = self.max_delay.as_millis() as f64;
        Duration::from_millis(millis.min(cap).max(0.0) as u64)
    }

    /// Return the delay before retrying after the given error, honoring a
    /// server-provided retry-after hint up to the cap.
    ///
    fn delay_after(&self, attempt: u32, error: &SpotifyError) -> Duration {
        let backoff = self.delay_for_attempt(attempt);
        match error {
            SpotifyError::RateLimited {
                retry_after: Some(hint),
                ..
            } => backoff.max(*hint).min(self.max_delay),
            _ => backoff,
        }
    }
}

/// Invoke the operation, retrying retryable failures until the configured
/// number of retries is spent. Returns the first success or the last error.
///
pub async fn retry_with_backoff<T, F, Fut>(config: &RetryConfig, mut operation: F) -> Result<T, SpotifyError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, SpotifyError>>,
{
    let mut attempt: u32 = 0;
    loop {
        attempt += 1;
        match operation().await {
            Ok(value) => return Ok(value),
            Err(error) if error.is_retryable() && attempt <= config.max_retries => {
                let delay = config.delay_after(attempt, &error);
                warn!(
                    "Attempt {} of {} failed ({}); retrying in {}ms...",
                    attempt,
                    config.max_retries + 1,
                    error,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }
            Err(error) => {
                if attempt > 1 {
                    debug!("Giving up after {} attempts: {}", attempt, error);
                }
                return Err(error);
            }
        }
    }
}

mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(deserializer)?))
    }
}
