//! Bounded exponential-backoff retry policy.
//!
//! Timeout/retry is an explicit, inspectable policy rather than an operator
//! chain: attempt, classify the failure, then either sleep-and-retry or fail
//! terminally. Only transient failures (timeout, transport) consume retries;
//! remote/business failures never do.

use std::time::Duration;

/// Retry budget and backoff schedule for transient FX failures.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Retries after the initial attempt (2 retries = 3 attempts total).
    pub max_retries: u32,
    /// Delay before the first retry; doubles on each subsequent retry.
    pub first_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            first_backoff: Duration::from_millis(200),
        }
    }
}

impl RetryPolicy {
    /// Total number of attempts allowed, including the first.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }

    /// Backoff before the retry following attempt number `attempt` (1-based),
    /// or `None` when the budget is exhausted.
    pub fn backoff_after(&self, attempt: u32) -> Option<Duration> {
        if attempt >= self.max_attempts() {
            return None;
        }
        // 200ms, 400ms, 800ms, ...
        Some(self.first_backoff * 2u32.saturating_pow(attempt - 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_budget_is_three_attempts() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts(), 3);
    }

    #[test]
    fn backoff_doubles_then_exhausts() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff_after(1), Some(Duration::from_millis(200)));
        assert_eq!(policy.backoff_after(2), Some(Duration::from_millis(400)));
        assert_eq!(policy.backoff_after(3), None);
    }

    #[test]
    fn zero_retries_never_backs_off() {
        let policy = RetryPolicy {
            max_retries: 0,
            first_backoff: Duration::from_millis(200),
        };
        assert_eq!(policy.backoff_after(1), None);
    }
}
