//! Retry on operational database failures.
//!
//! Only [`UserError::Operational`] is retried (dropped connections, pool
//! timeouts, a locked SQLite file). Anything else is returned after the first
//! attempt.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use backon::{ConstantBuilder, Retryable};

use crate::user::{UserError, UserResult};

/// Default number of attempts, including the first one.
pub const DEFAULT_MAX_ATTEMPTS: usize = 3;

/// Default pause between attempts.
pub const DEFAULT_DELAY: Duration = Duration::from_secs(2);

/// Configuration for retry operations.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Total attempts, including the first one.
    pub max_attempts: usize,
    /// Fixed delay between attempts.
    pub delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay: DEFAULT_DELAY,
        }
    }
}

impl RetryConfig {
    /// Create a new retry configuration with custom values.
    #[must_use]
    pub fn new(max_attempts: usize, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    /// A single attempt, no retries.
    #[must_use]
    pub fn disabled() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Build a constant backoff strategy from this configuration.
    #[must_use]
    pub fn into_backoff(self) -> ConstantBuilder {
        ConstantBuilder::default()
            .with_delay(self.delay)
            .with_max_times(self.max_attempts.saturating_sub(1))
    }
}

/// Run `operation`, retrying operational failures.
///
/// When every attempt fails with a retryable error the result is
/// [`UserError::RetriesExhausted`], naming `name` and the number of attempts.
///
/// # Example
///
/// ```ignore
/// let users = with_retry(&RetryConfig::default(), "list_users", || repo.list()).await?;
/// ```
pub async fn with_retry<T, F, Fut>(
    config: &RetryConfig,
    name: &str,
    mut operation: F,
) -> UserResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = UserResult<T>>,
{
    let max_attempts = config.max_attempts.max(1);
    let attempt = AtomicUsize::new(0);

    let counted = || {
        attempt.fetch_add(1, Ordering::SeqCst);
        operation()
    };

    let result = counted
        .retry(config.clone().into_backoff())
        .when(UserError::is_retryable)
        .notify(|err, dur| {
            tracing::warn!(
                operation = name,
                retry_in_ms = dur.as_millis() as u64,
                "Attempt {}/{} failed: {}",
                attempt.load(Ordering::SeqCst),
                max_attempts,
                err
            );
        })
        .await;

    match result {
        Err(err) if err.is_retryable() => {
            let attempts = attempt.load(Ordering::SeqCst);
            tracing::error!(operation = name, attempts, "All retries failed: {}", err);
            Err(UserError::RetriesExhausted {
                operation: name.to_string(),
                attempts,
                last: err.to_string(),
            })
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::AtomicU32;

    fn fast(max_attempts: usize) -> RetryConfig {
        RetryConfig::new(max_attempts, Duration::from_millis(1))
    }

    #[test]
    fn test_retry_config_default() {
        let config = RetryConfig::default();
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.delay, Duration::from_secs(2));
    }

    #[test]
    fn test_into_backoff() {
        let _backoff = RetryConfig::default().into_backoff();
        let _single = RetryConfig::disabled().into_backoff();
    }

    #[tokio::test]
    async fn retries_operational_errors_until_success() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_capture = Arc::clone(&calls);

        let result = with_retry(&fast(3), "flaky", move || {
            let calls_capture = Arc::clone(&calls_capture);
            async move {
                let n = calls_capture.fetch_add(1, Ordering::SeqCst);
                if n < 2 {
                    Err(UserError::Operational("database is locked".to_string()))
                } else {
                    Ok(42u32)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_capture = Arc::clone(&calls);

        let err = with_retry(&fast(3), "fetch_users", move || {
            let calls_capture = Arc::clone(&calls_capture);
            async move {
                calls_capture.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(UserError::Operational("connection refused".to_string()))
            }
        })
        .await
        .expect_err("expected error");

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        match err {
            UserError::RetriesExhausted {
                operation,
                attempts,
                last,
            } => {
                assert_eq!(operation, "fetch_users");
                assert_eq!(attempts, 3);
                assert!(last.contains("connection refused"));
            }
            other => panic!("Expected RetriesExhausted, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn does_not_retry_other_errors() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_capture = Arc::clone(&calls);

        let err = with_retry(&fast(5), "get_user", move || {
            let calls_capture = Arc::clone(&calls_capture);
            async move {
                calls_capture.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(UserError::NotFound("u-1".to_string()))
            }
        })
        .await
        .expect_err("expected error");

        assert!(matches!(err, UserError::NotFound(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
