//! Bounded retry with linear backoff.

use std::time::Duration;

/// Status codes the upstream uses for conditions that may clear on retry.
///
/// Includes `400` and `403`, which the catalog API also returns for
/// conditions that clear on their own.
pub const TRANSIENT_STATUSES: [u16; 7] = [400, 403, 429, 500, 502, 503, 504];

/// Backoff strategy applied between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// Same delay after every failed attempt.
    Fixed {
        delay: Duration,
    },
    /// Delay grows by `step` with each failed attempt: `step * attempt`.
    Linear {
        step: Duration,
    },
}

impl Default for Backoff {
    fn default() -> Self {
        Self::Linear {
            step: Duration::from_millis(500),
        }
    }
}

impl Backoff {
    /// Delay to wait after the given failed attempt.
    ///
    /// `attempt` is 1-based: the wait after the first failure is `delay(1)`.
    pub fn delay(self, attempt: u32) -> Duration {
        match self {
            Self::Fixed { delay } => delay,
            Self::Linear { step } => step.saturating_mul(attempt.max(1)),
        }
    }
}

/// Configuration for upstream retries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Total number of attempts per page, including the first one.
    pub max_attempts: u32,
    pub backoff: Backoff,
    /// HTTP status codes that should trigger another attempt.
    pub retry_on_status: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            backoff: Backoff::default(),
            retry_on_status: TRANSIENT_STATUSES.to_vec(),
        }
    }
}

impl RetryConfig {
    pub fn linear(max_attempts: u32, step: Duration) -> Self {
        Self {
            max_attempts,
            backoff: Backoff::Linear { step },
            ..Self::default()
        }
    }

    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            backoff: Backoff::Fixed { delay },
            ..Self::default()
        }
    }

    /// A single attempt, no retries.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    pub fn should_retry_status(&self, status: u16) -> bool {
        self.retry_on_status.contains(&status)
    }

    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.backoff.delay(attempt)
    }

    /// Sum of the waits taken when the first `failures` attempts fail.
    pub fn cumulative_delay(&self, failures: u32) -> Duration {
        (1..=failures)
            .map(|attempt| self.delay_for_attempt(attempt))
            .sum()
    }
}
