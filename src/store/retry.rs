//! Retry support for store clients
//!
//! The search engine never retries on its own. Hosts that want backoff on
//! transient store failures wrap their store in [`RetryingStore`], which
//! re-issues a single `count`/`find` call with exponential backoff.

use std::future::Future;
use std::time::Duration;

use super::{FindRequest, OfferStore, StorePage, StoreResult};
use crate::search::conditions::ConditionSet;

/// Retry configuration for store operations
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts
    pub max_attempts: u32,
    /// Initial retry delay
    pub initial_delay: Duration,
    /// Backoff multiplier for exponential backoff
    pub backoff_multiplier: f64,
    /// Maximum retry delay
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(100),
            backoff_multiplier: 2.0,
            max_delay: Duration::from_secs(5),
        }
    }
}

impl RetryConfig {
    /// Calculate delay for given attempt number (0-based)
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_possible_wrap,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let multiplier = self.backoff_multiplier.powi(attempt as i32);
        let delay_ms = (self.initial_delay.as_millis() as f64 * multiplier) as u64;
        let delay = Duration::from_millis(delay_ms);

        // Cap at max_delay
        if delay > self.max_delay {
            self.max_delay
        } else {
            delay
        }
    }
}

/// Retry an operation while it fails with a transient store error
///
/// Permanent errors are returned immediately; transient ones are retried
/// up to `config.max_attempts` times.
pub async fn retry_task<F, Fut, T>(config: &RetryConfig, mut operation: F) -> StoreResult<T>
where
    F: FnMut() -> Fut + Send,
    Fut: Future<Output = StoreResult<T>> + Send,
    T: Send,
{
    let mut attempt = 0u32;

    loop {
        match operation().await {
            Ok(value) => {
                if attempt > 0 {
                    tracing::info!(attempt = attempt + 1, "Store call succeeded after retry");
                }
                return Ok(value);
            }
            Err(e) => {
                if !e.is_transient() {
                    return Err(e);
                }

                if attempt >= config.max_attempts {
                    tracing::error!(
                        attempts = attempt + 1,
                        error = %e,
                        "Max retry attempts exceeded"
                    );
                    return Err(e);
                }

                let delay = config.delay_for_attempt(attempt);
                attempt += 1;

                tracing::warn!(
                    attempt = attempt,
                    max_attempts = config.max_attempts,
                    delay_ms = delay.as_millis(),
                    error = %e,
                    "Transient store error, retrying after delay"
                );

                tokio::time::sleep(delay).await;
            }
        }
    }
}

/// Store decorator that retries transient failures
#[derive(Debug, Clone)]
pub struct RetryingStore<S> {
    inner: S,
    config: RetryConfig,
}

impl<S: OfferStore> RetryingStore<S> {
    #[must_use]
    pub fn new(inner: S, config: RetryConfig) -> Self {
        Self { inner, config }
    }

    #[must_use]
    pub fn inner(&self) -> &S {
        &self.inner
    }

    #[must_use]
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: OfferStore> OfferStore for RetryingStore<S> {
    async fn count(&self, conditions: &ConditionSet) -> StoreResult<usize> {
        retry_task(&self.config, || self.inner.count(conditions)).await
    }

    async fn find(&self, conditions: &ConditionSet, request: FindRequest) -> StoreResult<StorePage> {
        retry_task(&self.config, || self.inner.find(conditions, request)).await
    }
}
