// caseline-core/src/domain/retry.rs

use std::time::Duration;

/// Per-task retry budget: `retries` extra attempts, fixed delay between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub retries: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 2,
            delay: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            retries: 0,
            delay: Duration::ZERO,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.retries.saturating_add(1)
    }

    /// Whether attempt number `attempt` (1-based) that failed with a
    /// retriable error earns another try.
    pub fn should_retry(&self, attempt: u32, retriable: bool) -> bool {
        retriable && attempt < self.max_attempts()
    }
}
