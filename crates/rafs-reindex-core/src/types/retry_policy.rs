//! Retry policy for the outbound request
//!
//! The delay between attempts is constant. There is no backoff and no jitter.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Fixed-attempt, fixed-delay retry policy
///
/// Invariant: `max_attempts >= 1`. Enforced by [`RetryPolicy::new`] and on
/// deserialization, so a constructed policy is always valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RetryPolicyRepr", into = "RetryPolicyRepr")]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Result<Self> {
        if max_attempts == 0 {
            return Err(Error::invalid_retry_policy(
                "max-attempts must be at least 1",
            ));
        }
        Ok(Self {
            max_attempts,
            delay,
        })
    }

    /// A policy that makes exactly one attempt
    pub fn single_attempt() -> Self {
        Self {
            max_attempts: 1,
            delay: Duration::ZERO,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn with_max_attempts(self, max_attempts: u32) -> Result<Self> {
        Self::new(max_attempts, self.delay)
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Upper bound on time spent sleeping between attempts
    pub fn total_delay(&self) -> Duration {
        self.delay * self.max_attempts.saturating_sub(1)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            delay: Duration::from_millis(default_delay_ms()),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct RetryPolicyRepr {
    #[serde(default = "default_max_attempts")]
    max_attempts: u32,
    #[serde(default = "default_delay_ms")]
    delay_ms: u64,
}

impl TryFrom<RetryPolicyRepr> for RetryPolicy {
    type Error = Error;

    fn try_from(repr: RetryPolicyRepr) -> Result<Self> {
        RetryPolicy::new(repr.max_attempts, Duration::from_millis(repr.delay_ms))
    }
}

impl From<RetryPolicy> for RetryPolicyRepr {
    fn from(policy: RetryPolicy) -> Self {
        Self {
            max_attempts: policy.max_attempts,
            delay_ms: policy.delay.as_millis() as u64,
        }
    }
}

fn default_max_attempts() -> u32 {
    5
}
fn default_delay_ms() -> u64 {
    4000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts(), 5);
        assert_eq!(policy.delay(), Duration::from_secs(4));
        assert_eq!(policy.total_delay(), Duration::from_secs(16));
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let result = RetryPolicy::new(0, Duration::from_secs(1));
        assert!(matches!(result, Err(Error::InvalidRetryPolicy { .. })));

        let result = RetryPolicy::default().with_max_attempts(0);
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialize_partial() {
        let policy: RetryPolicy = serde_yaml_ng::from_str("max-attempts: 3").unwrap();
        assert_eq!(policy.max_attempts(), 3);
        assert_eq!(policy.delay(), Duration::from_millis(4000));
    }

    #[test]
    fn test_deserialize_rejects_zero_attempts() {
        let result: std::result::Result<RetryPolicy, _> =
            serde_yaml_ng::from_str("max-attempts: 0\ndelay-ms: 10");
        let err = result.unwrap_err().to_string();
        assert!(err.contains("at least 1"), "unexpected error: {}", err);
    }

    #[test]
    fn test_single_attempt_has_no_delay() {
        let policy = RetryPolicy::single_attempt();
        assert_eq!(policy.max_attempts(), 1);
        assert_eq!(policy.total_delay(), Duration::ZERO);
    }
}
