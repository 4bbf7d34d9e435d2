//! Retry with exponential backoff.
//!
//! `with_retry` re-runs an async operation while its error is retryable
//! (see `ApiError::is_retryable`). Client errors and validation failures are
//! returned after the first attempt.

use std::future::Future;
use std::time::Duration;

use crate::error::ApiError;

/// How many times to try and how long to wait in between.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryOptions {
    /// Total attempts, including the first. Values below 1 act as 1.
    pub attempts: u32,
    /// Wait after the first failed attempt.
    pub delay: Duration,
    /// Multiplier applied to `delay` for each further attempt.
    pub backoff: f64,
}

impl Default for RetryOptions {
    fn default() -> Self {
        Self {
            attempts: 3,
            delay: Duration::from_secs(1),
            backoff: 2.0,
        }
    }
}

impl RetryOptions {
    /// Single attempt, no waiting.
    pub fn none() -> Self {
        Self {
            attempts: 1,
            delay: Duration::ZERO,
            backoff: 1.0,
        }
    }

    /// Wait after the given failed attempt (1-indexed):
    /// `delay * backoff^(attempt - 1)`.
    ///
    /// A negative or NaN result means no wait. A result too large for
    /// `Duration` is capped at `Duration::MAX`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let secs = self.delay.as_secs_f64() * self.backoff.powi(exponent);
        match Duration::try_from_secs_f64(secs) {
            Ok(wait) => wait,
            Err(_) if secs > 0.0 => Duration::MAX,
            Err(_) => Duration::ZERO,
        }
    }
}

/// Run `operation` until it succeeds, fails with a non-retryable error, or
/// runs out of attempts. The last error is returned on exhaustion.
pub async fn with_retry<T, F, Fut>(mut operation: F, options: &RetryOptions) -> Result<T, ApiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let attempts = options.attempts.max(1);
    let mut attempt = 1;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if !err.is_retryable() || attempt >= attempts => return Err(err),
            Err(err) => {
                let wait = options.delay_for(attempt);
                tracing::warn!(
                    attempt,
                    max_attempts = attempts,
                    delay_ms = wait.as_millis() as u64,
                    error = %err,
                    "request failed, retrying"
                );
                tokio::time::sleep(wait).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use tokio::time::Instant;

    use super::*;
    use crate::http::HttpResponse;

    fn status_error(status: u16) -> ApiError {
        ApiError::from_response(HttpResponse {
            status,
            headers: Vec::new(),
            body: String::new(),
        })
    }

    fn options(attempts: u32) -> RetryOptions {
        RetryOptions {
            attempts,
            delay: Duration::from_millis(100),
            backoff: 2.0,
        }
    }

    #[test]
    fn delay_schedule_is_exponential() {
        let opts = options(4);
        assert_eq!(opts.delay_for(1), Duration::from_millis(100));
        assert_eq!(opts.delay_for(2), Duration::from_millis(200));
        assert_eq!(opts.delay_for(3), Duration::from_millis(400));
    }

    #[test]
    fn unusable_backoff_does_not_wait() {
        let negative = RetryOptions {
            backoff: -2.0,
            ..options(3)
        };
        assert_eq!(negative.delay_for(1), Duration::from_millis(100));
        assert_eq!(negative.delay_for(2), Duration::ZERO);

        let nan = RetryOptions {
            backoff: f64::NAN,
            ..options(3)
        };
        assert_eq!(nan.delay_for(2), Duration::ZERO);
    }

    #[test]
    fn huge_backoff_is_capped() {
        let opts = RetryOptions {
            backoff: f64::MAX,
            ..options(3)
        };
        assert_eq!(opts.delay_for(3), Duration::MAX);
    }

    #[tokio::test(start_paused = true)]
    async fn negative_backoff_still_retries() {
        let calls = RefCell::new(0);
        let opts = RetryOptions {
            backoff: -2.0,
            ..options(3)
        };

        let result: Result<(), _> = with_retry(
            || {
                *calls.borrow_mut() += 1;
                async { Err(ApiError::transport("boom")) }
            },
            &opts,
        )
        .await;

        assert!(matches!(result, Err(ApiError::Transport { .. })));
        assert_eq!(*calls.borrow(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn server_errors_use_every_attempt_with_backoff() {
        let start = Instant::now();
        let calls = RefCell::new(Vec::new());

        let result: Result<(), _> = with_retry(
            || {
                calls.borrow_mut().push(start.elapsed());
                async { Err(status_error(503)) }
            },
            &options(4),
        )
        .await;

        let err = result.unwrap_err();
        assert_eq!(err.status(), Some(503));
        assert_eq!(
            *calls.borrow(),
            vec![
                Duration::ZERO,
                Duration::from_millis(100),
                Duration::from_millis(300),
                Duration::from_millis(700),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn client_errors_are_not_retried() {
        let calls = RefCell::new(0);
        let result: Result<(), _> = with_retry(
            || {
                *calls.borrow_mut() += 1;
                async { Err(status_error(404)) }
            },
            &options(5),
        )
        .await;

        assert!(result.unwrap_err().is_not_found());
        assert_eq!(*calls.borrow(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn transport_errors_are_retried_until_success() {
        let calls = RefCell::new(0);
        let result = with_retry(
            || {
                *calls.borrow_mut() += 1;
                let n = *calls.borrow();
                async move {
                    if n < 3 {
                        Err(ApiError::transport("connection reset"))
                    } else {
                        Ok(n)
                    }
                }
            },
            &options(5),
        )
        .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(*calls.borrow(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn first_success_stops_immediately() {
        let calls = RefCell::new(0);
        let result = with_retry(
            || {
                *calls.borrow_mut() += 1;
                async { Ok::<_, ApiError>("ok") }
            },
            &options(3),
        )
        .await;

        assert_eq!(result.unwrap(), "ok");
        assert_eq!(*calls.borrow(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_attempts_still_runs_once() {
        let calls = RefCell::new(0);
        let result: Result<(), _> = with_retry(
            || {
                *calls.borrow_mut() += 1;
                async { Err(ApiError::transport("down")) }
            },
            &options(0),
        )
        .await;

        assert!(result.is_err());
        assert_eq!(*calls.borrow(), 1);
    }
}
