//! Retry policy and the timeout-bounded request executor.
//!
//! A [`RetryPolicy`] is pure decision state: how many retries remain, how
//! long to wait between attempts, and a named predicate deciding whether a
//! given failure is worth another attempt. [`execute`] composes it with a
//! per-attempt timeout to produce a resilient call: at most
//! `max_retries + 1` attempts, first success short-circuits, last failure
//! propagates intact.

use std::{fmt, future::Future, sync::Arc, time::Duration};

use crate::error::{ClientError, Result};

/// Predicate deciding whether an error is eligible for another attempt.
///
/// Receives the failure and the remaining retry budget. Conditions are pure
/// functions; the executor never mutates or decays them between attempts.
pub type RetryCondition = Arc<dyn Fn(&ClientError, u32) -> bool + Send + Sync>;

/// The default retry condition: retry only when the attempt timed out.
///
/// Timeouts are the one failure mode where the platform may simply have been
/// slow; everything else propagates immediately unless the caller opts in
/// with a broader condition.
pub fn retry_on_timeout(error: &ClientError, _remaining: u32) -> bool {
    matches!(error, ClientError::Timeout { .. })
}

/// Retry condition covering all transient failures.
///
/// Extends the default to network errors and 5xx responses via
/// [`ClientError::is_transient`].
pub fn retry_on_transient(error: &ClientError, _remaining: u32) -> bool {
    error.is_transient()
}

/// Retry configuration for outbound requests.
#[derive(Clone)]
pub struct RetryPolicy {
    /// Maximum number of retries after the initial attempt.
    pub max_retries: u32,

    /// Delay between attempts. Zero means retry immediately.
    pub delay: Duration,

    /// Predicate consulted before each retry.
    pub condition: RetryCondition,
}

impl RetryPolicy {
    /// Creates a policy with the default timeout-only condition.
    pub fn new(max_retries: u32, delay: Duration) -> Self {
        Self { max_retries, delay, condition: Arc::new(retry_on_timeout) }
    }

    /// Replaces the retry condition.
    #[must_use]
    pub fn with_condition(
        mut self,
        condition: impl Fn(&ClientError, u32) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.condition = Arc::new(condition);
        self
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(0, Duration::ZERO)
    }
}

impl fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("max_retries", &self.max_retries)
            .field("delay", &self.delay)
            .finish_non_exhaustive()
    }
}

/// Runs `op` under the policy, bounding every attempt by `timeout`.
///
/// Each attempt is independently timeout-bounded; an elapsed timer surfaces
/// as [`ClientError::Timeout`]. On failure with budget remaining, the
/// condition is consulted with the remaining count: `false` propagates the
/// error immediately without consuming a retry, `true` waits `delay` and
/// tries again with one retry fewer. A `timeout` of zero disables the timer.
///
/// # Errors
///
/// Returns the final attempt's error once the budget is exhausted or the
/// condition declines, with the original error identity preserved.
pub async fn execute<T, F, Fut>(policy: &RetryPolicy, timeout: Duration, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut remaining = policy.max_retries;

    loop {
        match bounded(timeout, op()).await {
            Ok(value) => return Ok(value),
            Err(error) => {
                if remaining == 0 || !(policy.condition)(&error, remaining) {
                    return Err(error);
                }

                tracing::debug!(
                    error = %error,
                    remaining,
                    delay_ms = policy.delay.as_millis() as u64,
                    "retrying request"
                );

                if !policy.delay.is_zero() {
                    tokio::time::sleep(policy.delay).await;
                }
                remaining -= 1;
            },
        }
    }
}

/// Bounds a single attempt by the request timeout.
async fn bounded<T, Fut>(timeout: Duration, attempt: Fut) -> Result<T>
where
    Fut: Future<Output = Result<T>>,
{
    if timeout.is_zero() {
        return attempt.await;
    }

    let timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
    match tokio::time::timeout(timeout, attempt).await {
        Ok(result) => result,
        Err(_) => Err(ClientError::timeout(timeout_ms)),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    /// Runs the executor against an op failing `failures` times before
    /// succeeding, returning (result, attempts made).
    async fn run(
        policy: RetryPolicy,
        failures: u32,
        error: ClientError,
    ) -> (Result<&'static str>, u32) {
        let attempts = AtomicU32::new(0);
        let result = execute(&policy, Duration::ZERO, || {
            let n = attempts.fetch_add(1, Ordering::SeqCst);
            let error = error.clone();
            async move {
                if n < failures {
                    Err(error)
                } else {
                    Ok("delivered")
                }
            }
        })
        .await;
        (result, attempts.load(Ordering::SeqCst))
    }

    #[tokio::test]
    async fn success_short_circuits() {
        let (result, attempts) = run(RetryPolicy::new(5, Duration::ZERO), 0, ClientError::timeout(1)).await;

        assert_eq!(result.unwrap(), "delivered");
        assert_eq!(attempts, 1);
    }

    #[tokio::test]
    async fn exhausted_budget_makes_max_retries_plus_one_attempts() {
        for max_retries in [0u32, 1, 3] {
            let (result, attempts) =
                run(RetryPolicy::new(max_retries, Duration::ZERO), u32::MAX, ClientError::timeout(1))
                    .await;

            assert!(matches!(result, Err(ClientError::Timeout { .. })));
            assert_eq!(attempts, max_retries + 1);
        }
    }

    #[tokio::test]
    async fn declining_condition_stops_after_one_attempt() {
        let policy = RetryPolicy::new(5, Duration::ZERO).with_condition(|_, _| false);
        let (result, attempts) = run(policy, u32::MAX, ClientError::timeout(1)).await;

        assert!(result.is_err());
        assert_eq!(attempts, 1);
    }

    #[tokio::test]
    async fn default_condition_ignores_api_errors() {
        let (result, attempts) =
            run(RetryPolicy::new(5, Duration::ZERO), u32::MAX, ClientError::api(500, "boom")).await;

        assert!(matches!(result, Err(ClientError::Api { status: 500, .. })));
        assert_eq!(attempts, 1);
    }

    #[tokio::test]
    async fn transient_condition_retries_server_errors() {
        let policy = RetryPolicy::new(2, Duration::ZERO).with_condition(retry_on_transient);
        let (result, attempts) = run(policy, 2, ClientError::api(502, "bad gateway")).await;

        assert_eq!(result.unwrap(), "delivered");
        assert_eq!(attempts, 3);
    }

    #[tokio::test]
    async fn success_on_kth_attempt_returns_that_result() {
        let (result, attempts) = run(RetryPolicy::new(4, Duration::ZERO), 2, ClientError::timeout(1)).await;

        assert_eq!(result.unwrap(), "delivered");
        assert_eq!(attempts, 3);
    }

    #[tokio::test]
    async fn condition_sees_remaining_budget() {
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let log = seen.clone();
        let policy = RetryPolicy::new(3, Duration::ZERO).with_condition(move |_, remaining| {
            log.lock().unwrap().push(remaining);
            true
        });

        let (result, _) = run(policy, u32::MAX, ClientError::timeout(1)).await;

        assert!(result.is_err());
        assert_eq!(*seen.lock().unwrap(), vec![3, 2, 1]);
    }

    #[tokio::test]
    async fn slow_attempt_times_out() {
        let policy = RetryPolicy::default();
        let result: Result<()> = execute(&policy, Duration::from_millis(20), || async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await;

        assert!(matches!(result, Err(ClientError::Timeout { timeout_ms: 20 })));
    }

    #[tokio::test]
    async fn zero_timeout_disables_the_timer() {
        let policy = RetryPolicy::default();
        let result = execute(&policy, Duration::ZERO, || async {
            tokio::time::sleep(Duration::from_millis(30)).await;
            Ok("slow but fine")
        })
        .await;

        assert_eq!(result.unwrap(), "slow but fine");
    }

    #[tokio::test]
    async fn delay_waits_between_attempts() {
        let policy = RetryPolicy::new(1, Duration::from_millis(40));
        let started = std::time::Instant::now();
        let (result, attempts) = {
            let attempts = AtomicU32::new(0);
            let result = execute(&policy, Duration::ZERO, || {
                let n = attempts.fetch_add(1, Ordering::SeqCst);
                async move { if n == 0 { Err(ClientError::timeout(1)) } else { Ok(()) } }
            })
            .await;
            (result, attempts.load(Ordering::SeqCst))
        };

        assert!(result.is_ok());
        assert_eq!(attempts, 2);
        assert!(started.elapsed() >= Duration::from_millis(40));
    }
}
