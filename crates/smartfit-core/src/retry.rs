//! Bounded timeout and linear-backoff retry around async calls.
//!
//! Each attempt is raced against [`RetryPolicy::timeout`]. A timed-out
//! attempt is dropped (not cancelled at the network layer) and counts as a
//! failure. Retries are strictly sequential.

use std::future::Future;
use std::time::Duration;

use crate::generator::GenerationError;

/// Timeout and retry budget for one kind of AI call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Upper bound on a single attempt.
    pub timeout: Duration,
    /// Retries after the first attempt (total attempts = `max_retries + 1`).
    pub max_retries: u32,
    /// Delay before retry `n` (1-based) is `base_delay * n`.
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// Budget for full plan generation: 30s per attempt, 2 retries, 2s/4s backoff.
    pub const PLAN: Self = Self {
        timeout: Duration::from_secs(30),
        max_retries: 2,
        base_delay: Duration::from_secs(2),
    };

    /// Budget for alternative-exercise lookups: 20s per attempt, 1 retry, 1s backoff.
    pub const ALTERNATIVES: Self = Self {
        timeout: Duration::from_secs(20),
        max_retries: 1,
        base_delay: Duration::from_secs(1),
    };

    /// Total number of attempts this policy allows.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }

    /// Backoff before the retry that follows failed attempt `attempt` (0-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt + 1)
    }

    /// Run `op` under this policy.
    ///
    /// Returns the first successful result, or the error of the final
    /// attempt once the budget is exhausted.
    pub async fn run<T, F, Fut>(&self, label: &str, mut op: F) -> Result<T, GenerationError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, GenerationError>>,
    {
        let mut attempt = 0;
        loop {
            let outcome = match tokio::time::timeout(self.timeout, op()).await {
                Ok(result) => result,
                Err(_elapsed) => Err(GenerationError::Timeout(self.timeout)),
            };

            match outcome {
                Ok(value) => {
                    if attempt > 0 {
                        tracing::info!(label, attempt = attempt + 1, "request succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(e) if attempt < self.max_retries => {
                    let delay = self.delay_after(attempt);
                    tracing::warn!(
                        label,
                        attempt = attempt + 1,
                        max_attempts = self.max_attempts(),
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    tracing::warn!(
                        label,
                        attempts = attempt + 1,
                        error = %e,
                        "request failed, giving up"
                    );
                    return Err(e);
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::PLAN
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
