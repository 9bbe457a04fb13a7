//! Bounded retry with exponential backoff for idempotent requests.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::error::Error;

/// How a single attempt failed, deciding whether another attempt is
/// worth making.
#[derive(Debug)]
pub enum FetchFailure {
    /// Connection errors, timeouts, 5xx and other transient statuses.
    Transient(Error),
    /// Bad credential, missing resource, undecodable body. Retrying the
    /// same request cannot succeed.
    Terminal(Error),
}

impl FetchFailure {
    pub fn into_error(self) -> Error {
        match self {
            FetchFailure::Transient(e) | FetchFailure::Terminal(e) => e,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total number of tries, including the first.
    pub attempts: u32,
    pub delay: Duration,
    pub backoff_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            delay: Duration::from_millis(1000),
            backoff_factor: 2.0,
        }
    }
}

impl RetryPolicy {
    /// Delay before attempt `attempt + 1`: `delay * backoff_factor^attempt`.
    /// Not jittered.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        self.delay.mul_f64(self.backoff_factor.powi(attempt as i32))
    }
}

/// Drive `op` until it succeeds, fails terminally, or the policy's
/// attempts are spent. Exhaustion degrades to `None`; no error escapes
/// to the caller. Every failed attempt is logged.
pub async fn with_retry<T, F, Fut>(policy: &RetryPolicy, what: &str, mut op: F) -> Option<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<T, FetchFailure>>,
{
    for attempt in 0..policy.attempts {
        match op().await {
            Ok(value) => return Some(value),
            Err(FetchFailure::Terminal(e)) => {
                warn!("{}: terminal failure, not retrying: {}", what, e);
                return None;
            }
            Err(FetchFailure::Transient(e)) => {
                warn!(
                    "{}: attempt {}/{} failed: {}",
                    what,
                    attempt + 1,
                    policy.attempts,
                    e
                );
                if attempt + 1 < policy.attempts {
                    tokio::time::sleep(policy.backoff_delay(attempt)).await;
                }
            }
        }
    }

    warn!("{}: giving up after {} attempts", what, policy.attempts);
    None
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    fn fast_policy(attempts: u32) -> RetryPolicy {
        RetryPolicy {
            attempts,
            delay: Duration::from_millis(1),
            backoff_factor: 2.0,
        }
    }

    #[test]
    fn backoff_delay_sequence() {
        let policy = RetryPolicy {
            attempts: 4,
            delay: Duration::from_millis(100),
            backoff_factor: 2.0,
        };
        assert_eq!(policy.backoff_delay(0), Duration::from_millis(100));
        assert_eq!(policy.backoff_delay(1), Duration::from_millis(200));
        assert_eq!(policy.backoff_delay(2), Duration::from_millis(400));
    }

    #[tokio::test]
    async fn exhaustion_degrades_to_none() {
        let tries = AtomicU32::new(0);
        let result: Option<u32> = with_retry(&fast_policy(3), "test", || {
            tries.fetch_add(1, Ordering::SeqCst);
            async { Err(FetchFailure::Transient(Error::Http("timeout".into()))) }
        })
        .await;

        assert!(result.is_none());
        assert_eq!(tries.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn terminal_failure_stops_immediately() {
        let tries = AtomicU32::new(0);
        let result: Option<u32> = with_retry(&fast_policy(5), "test", || {
            tries.fetch_add(1, Ordering::SeqCst);
            async { Err(FetchFailure::Terminal(Error::Unauthorized("401".into()))) }
        })
        .await;

        assert!(result.is_none());
        assert_eq!(tries.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn recovers_after_transient_failures() {
        let tries = AtomicU32::new(0);
        let result = with_retry(&fast_policy(3), "test", || {
            let n = tries.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(FetchFailure::Transient(Error::Http("503".into())))
                } else {
                    Ok(42)
                }
            }
        })
        .await;

        assert_eq!(result, Some(42));
        assert_eq!(tries.load(Ordering::SeqCst), 3);
    }
}
