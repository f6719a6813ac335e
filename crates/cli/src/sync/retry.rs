// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Retry scheduling for records that failed transiently.

use std::time::Duration;

/// How failed records are retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Schedule another pass after a pass with transient failures.
    pub auto_retry: bool,
    /// Delay before the first automatic retry.
    pub initial_delay: Duration,
    /// Upper bound for the retry delay.
    pub max_delay: Duration,
    /// Failed attempts after which a record is dead-lettered.
    /// `None` retries forever.
    pub max_attempts: Option<u32>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            auto_retry: true,
            initial_delay: Duration::from_millis(1_000),
            max_delay: Duration::from_secs(60),
            max_attempts: None,
        }
    }
}

impl RetryPolicy {
    /// Returns true if a record with `attempts` failures should be abandoned.
    pub fn is_exhausted(&self, attempts: u32) -> bool {
        self.max_attempts.is_some_and(|max| attempts >= max)
    }
}

/// Exponential backoff state: doubles after every failed pass, capped at
/// the policy's maximum, and reset by a clean pass.
#[derive(Debug)]
pub struct Backoff {
    initial: Duration,
    max: Duration,
    next: Duration,
}

impl Backoff {
    pub fn new(policy: &RetryPolicy) -> Self {
        Backoff {
            initial: policy.initial_delay,
            max: policy.max_delay,
            next: policy.initial_delay.min(policy.max_delay),
        }
    }

    /// Returns the delay to wait now and advances to the following one.
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.next;
        self.next = std::cmp::min(self.next.saturating_mul(2), self.max);
        delay
    }

    /// Starts over from the initial delay.
    pub fn reset(&mut self) {
        self.next = self.initial.min(self.max);
    }
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod tests;
