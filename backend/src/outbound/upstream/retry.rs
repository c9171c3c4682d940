//! Retry policy for upstream calls.
//!
//! Delays grow exponentially from a configured initial delay, are capped at
//! a configured maximum, and get ±50% multiplicative jitter per attempt so a
//! shared outage does not turn into a synchronized retry storm. Sleeping and
//! jitter go through traits so tests stay deterministic and never sleep.

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;

use crate::domain::ports::EmployeeSourceError;

/// Bounded retry policy applied by the upstream source adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum attempts per logical call, including the first one.
    pub max_attempts: u32,
    /// Backoff before the second attempt.
    pub initial_delay: Duration,
    /// Cap applied to the exponential delay before jitter.
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_delay: Duration::from_millis(500),
            max_backoff: Duration::from_millis(10_000),
        }
    }
}

impl RetryPolicy {
    /// Build a policy; the attempt budget is clamped to at least one.
    pub fn new(max_attempts: u32, initial_delay: Duration, max_backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_delay,
            max_backoff,
        }
    }

    /// Decide whether another attempt should be scheduled after `attempt`
    /// (1-based) failed with `error`.
    pub fn should_retry(&self, error: &EmployeeSourceError, attempt: u32) -> bool {
        attempt < self.max_attempts && error.is_retryable()
    }

    /// Exponential delay for the given 1-based attempt, before jitter.
    pub fn base_delay(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(32);
        let initial_ms = u64::try_from(self.initial_delay.as_millis()).unwrap_or(u64::MAX);
        let cap_ms = u64::try_from(self.max_backoff.as_millis()).unwrap_or(u64::MAX);
        let delay_ms = initial_ms
            .saturating_mul(2u64.saturating_pow(exponent))
            .min(cap_ms);
        Duration::from_millis(delay_ms)
    }
}

/// Jitter strategy applied to each computed backoff delay.
pub trait BackoffJitter: Send + Sync {
    /// Spread `base` into the ±50% band around it.
    fn jittered(&self, base: Duration) -> Duration;
}

/// Production jitter drawing uniformly from `[base/2, 3*base/2]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomJitter;

impl BackoffJitter for RandomJitter {
    fn jittered(&self, base: Duration) -> Duration {
        let base_ms = u64::try_from(base.as_millis()).unwrap_or(u64::MAX);
        if base_ms == 0 {
            return base;
        }
        let extra = rand::thread_rng().gen_range(0..=base_ms);
        Duration::from_millis((base_ms / 2).saturating_add(extra))
    }
}

/// Async sleep abstraction so retry tests never block on real time.
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Suspend the calling task for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// Tokio-based sleeper used in production.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
