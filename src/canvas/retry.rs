//! Retry and backoff policy for Canvas requests.
//!
//! - **429 (Rate Limited)**: waits for the `Retry-After` header value in
//!   seconds, or 1 second if it is missing or not an integer.
//! - **5xx (Server Error)**: exponential backoff, `2^n` seconds for the n-th
//!   retry (2s, 4s, 8s, ...). A `Retry-After` header on a 5xx is ignored.
//! - **Anything else**: no retry.
//!
//! Requests that never got a response are not retried at all; the client
//! surfaces them as transport errors before the policy is consulted.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;

/// Delay used for a 429 without a usable `Retry-After` header.
pub const DEFAULT_RETRY_AFTER_SECS: u64 = 1;

/// Outcome of consulting the [`RetryPolicy`] for one failed response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Re-issue the same request after `delay`.
    Retry { delay: Duration },
    /// Give up and report the response as an API error.
    Stop,
}

/// Decides whether a failed response should be retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u32,
}

impl RetryPolicy {
    pub fn new(max_retries: u32) -> Self {
        Self { max_retries }
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Decide for a response with `status`, given how many retries of the
    /// same logical request have already been made (`attempt`, from 0).
    pub fn decide(
        &self,
        status: StatusCode,
        retry_after: Option<&str>,
        attempt: u32,
    ) -> RetryDecision {
        if attempt >= self.max_retries {
            return RetryDecision::Stop;
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            return RetryDecision::Retry {
                delay: retry_after_delay(retry_after),
            };
        }

        if status.as_u16() >= 500 {
            return RetryDecision::Retry {
                delay: exponential_delay(attempt + 1),
            };
        }

        RetryDecision::Stop
    }
}

/// Delay requested by a `Retry-After` header given in seconds.
pub fn retry_after_delay(header: Option<&str>) -> Duration {
    let secs = header
        .and_then(|value| value.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
    Duration::from_secs(secs)
}

/// `2^retry_number` seconds.
pub fn exponential_delay(retry_number: u32) -> Duration {
    let secs = 1u64.checked_shl(retry_number).unwrap_or(u64::MAX);
    Duration::from_secs(secs)
}

/// Suspends the current request between retries.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, delay: Duration);
}

/// Sleeps on the tokio timer.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_honours_retry_after() {
        let policy = RetryPolicy::new(3);
        assert_eq!(
            policy.decide(StatusCode::TOO_MANY_REQUESTS, Some("7"), 0),
            RetryDecision::Retry {
                delay: Duration::from_secs(7)
            }
        );
        // The server-dictated wait does not grow with the attempt number.
        assert_eq!(
            policy.decide(StatusCode::TOO_MANY_REQUESTS, Some("7"), 2),
            RetryDecision::Retry {
                delay: Duration::from_secs(7)
            }
        );
    }

    #[test]
    fn test_rate_limit_defaults_to_one_second() {
        let policy = RetryPolicy::new(3);
        let expected = RetryDecision::Retry {
            delay: Duration::from_secs(1),
        };
        assert_eq!(policy.decide(StatusCode::TOO_MANY_REQUESTS, None, 0), expected);
        assert_eq!(
            policy.decide(StatusCode::TOO_MANY_REQUESTS, Some("soon"), 0),
            expected
        );
    }

    #[test]
    fn test_server_errors_back_off_exponentially() {
        let policy = RetryPolicy::new(3);
        let delays: Vec<_> = (0..3)
            .map(|attempt| policy.decide(StatusCode::SERVICE_UNAVAILABLE, None, attempt))
            .collect();
        assert_eq!(
            delays,
            vec![
                RetryDecision::Retry {
                    delay: Duration::from_secs(2)
                },
                RetryDecision::Retry {
                    delay: Duration::from_secs(4)
                },
                RetryDecision::Retry {
                    delay: Duration::from_secs(8)
                },
            ]
        );
    }

    #[test]
    fn test_server_error_ignores_retry_after() {
        let policy = RetryPolicy::new(3);
        assert_eq!(
            policy.decide(StatusCode::BAD_GATEWAY, Some("30"), 0),
            RetryDecision::Retry {
                delay: Duration::from_secs(2)
            }
        );
    }

    #[test]
    fn test_stops_when_retries_exhausted() {
        let policy = RetryPolicy::new(3);
        assert_eq!(
            policy.decide(StatusCode::SERVICE_UNAVAILABLE, None, 3),
            RetryDecision::Stop
        );
        assert_eq!(
            policy.decide(StatusCode::TOO_MANY_REQUESTS, Some("1"), 3),
            RetryDecision::Stop
        );

        let never = RetryPolicy::new(0);
        assert_eq!(
            never.decide(StatusCode::INTERNAL_SERVER_ERROR, None, 0),
            RetryDecision::Stop
        );
    }

    #[test]
    fn test_client_errors_are_not_retried() {
        let policy = RetryPolicy::new(5);
        for status in [
            StatusCode::BAD_REQUEST,
            StatusCode::UNAUTHORIZED,
            StatusCode::FORBIDDEN,
            StatusCode::NOT_FOUND,
            StatusCode::UNPROCESSABLE_ENTITY,
        ] {
            assert_eq!(policy.decide(status, None, 0), RetryDecision::Stop);
        }
    }

    #[test]
    fn test_exponential_delay_saturates() {
        assert_eq!(exponential_delay(1), Duration::from_secs(2));
        assert_eq!(exponential_delay(3), Duration::from_secs(8));
        assert_eq!(exponential_delay(200), Duration::from_secs(u64::MAX));
    }
}
