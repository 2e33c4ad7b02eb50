//! Retry observation and logging
//!
//! This module provides the `RetryObserver` trait for monitoring retry attempts
//! and a `TracingObserver` implementation that logs using the `tracing` crate.

use std::error::Error;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

/// Observer trait for retry attempt events
///
/// `on_retry` is the retry callback: it fires once for every retryable
/// failure, including the one on the final attempt, which is then followed
/// by `on_exhausted` instead of a wait.
///
/// # Example
///
/// ```rust
/// use rafs_reindex_core::retry::RetryObserver;
/// use std::error::Error;
/// use std::time::Duration;
///
/// struct CountingObserver;
///
/// impl RetryObserver for CountingObserver {
///     fn on_attempt_start(&self, _attempt: u32, _max_attempts: u32) {}
///     fn on_retry(&self, attempt: u32, error: &dyn Error, _delay: Duration) {
///         eprintln!("retry #{}: {}", attempt, error);
///     }
///     fn on_success(&self, _attempt: u32, _total_duration: Duration) {}
///     fn on_exhausted(&self, _attempts: u32, _final_error: &dyn Error) {}
/// }
/// ```
pub trait RetryObserver: Send + Sync {
    /// Called when an attempt is about to start
    ///
    /// # Arguments
    ///
    /// * `attempt` - The attempt number (1-indexed)
    /// * `max_attempts` - The maximum number of attempts configured
    fn on_attempt_start(&self, attempt: u32, max_attempts: u32);

    /// Called when an attempt fails with a retryable error
    ///
    /// # Arguments
    ///
    /// * `attempt` - The attempt number that failed (1-indexed)
    /// * `error` - The error that caused the failure
    /// * `delay` - The delay before the next attempt; zero after the final one
    fn on_retry(&self, attempt: u32, error: &dyn Error, delay: Duration);

    /// Called when the operation succeeds
    fn on_success(&self, attempt: u32, total_duration: Duration);

    /// Called when all retry attempts are exhausted
    fn on_exhausted(&self, attempts: u32, final_error: &dyn Error);

    /// Called when a predicate rejects an error as non-retryable
    fn on_cancelled(&self, attempt: u32, error: &dyn Error) {
        let _ = (attempt, error);
    }
}

/// A no-op observer that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpObserver;

impl RetryObserver for NoOpObserver {
    fn on_attempt_start(&self, _attempt: u32, _max_attempts: u32) {}

    fn on_retry(&self, _attempt: u32, _error: &dyn Error, _delay: Duration) {}

    fn on_success(&self, _attempt: u32, _total_duration: Duration) {}

    fn on_exhausted(&self, _attempts: u32, _final_error: &dyn Error) {}
}

/// An observer that logs retry events using the `tracing` crate
///
/// # Log Levels
///
/// - `on_attempt_start`: DEBUG
/// - `on_retry`: WARN
/// - `on_success`: INFO (if > 1 attempt) or DEBUG (first attempt)
/// - `on_exhausted`: DEBUG (the caller reports the final failure)
/// - `on_cancelled`: WARN
#[derive(Debug, Clone)]
pub struct TracingObserver {
    /// Name of the operation being retried (for log context)
    operation: String,
}

impl TracingObserver {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
        }
    }

    /// Get the operation name
    pub fn operation(&self) -> &str {
        &self.operation
    }
}

impl Default for TracingObserver {
    fn default() -> Self {
        Self::new("retry")
    }
}

impl RetryObserver for TracingObserver {
    fn on_attempt_start(&self, attempt: u32, max_attempts: u32) {
        tracing::debug!(
            operation = %self.operation,
            attempt = attempt,
            max_attempts = max_attempts,
            "starting attempt"
        );
    }

    fn on_retry(&self, attempt: u32, error: &dyn Error, delay: Duration) {
        tracing::warn!(
            operation = %self.operation,
            attempt = attempt,
            error = %error,
            delay_ms = delay.as_millis() as u64,
            "attempt failed"
        );
    }

    fn on_success(&self, attempt: u32, total_duration: Duration) {
        if attempt > 1 {
            tracing::info!(
                operation = %self.operation,
                attempt = attempt,
                total_duration_ms = total_duration.as_millis() as u64,
                "succeeded after retry"
            );
        } else {
            tracing::debug!(
                operation = %self.operation,
                duration_ms = total_duration.as_millis() as u64,
                "succeeded on first attempt"
            );
        }
    }

    fn on_exhausted(&self, attempts: u32, final_error: &dyn Error) {
        tracing::debug!(
            operation = %self.operation,
            attempts = attempts,
            error = %final_error,
            "all retry attempts exhausted"
        );
    }

    fn on_cancelled(&self, attempt: u32, error: &dyn Error) {
        tracing::warn!(
            operation = %self.operation,
            attempt = attempt,
            error = %error,
            "retry cancelled due to non-retryable error"
        );
    }
}

/// Adapts a plain `(attempt, error)` closure into an observer
///
/// Only `on_retry` is forwarded.
pub struct OnRetry<F> {
    callback: F,
}

impl<F> OnRetry<F>
where
    F: Fn(u32, &dyn Error) + Send + Sync,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> RetryObserver for OnRetry<F>
where
    F: Fn(u32, &dyn Error) + Send + Sync,
{
    fn on_attempt_start(&self, _attempt: u32, _max_attempts: u32) {}

    fn on_retry(&self, attempt: u32, error: &dyn Error, _delay: Duration) {
        (self.callback)(attempt, error)
    }

    fn on_success(&self, _attempt: u32, _total_duration: Duration) {}

    fn on_exhausted(&self, _attempts: u32, _final_error: &dyn Error) {}
}

/// An observer that collects statistics about retry attempts
#[derive(Debug, Default)]
pub struct StatsObserver {
    attempt_starts: AtomicU32,
    retries: AtomicU32,
    successes: AtomicU32,
    exhaustions: AtomicU32,
    cancellations: AtomicU32,
}

impl StatsObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attempt_starts(&self) -> u32 {
        self.attempt_starts.load(Ordering::SeqCst)
    }

    pub fn retries(&self) -> u32 {
        self.retries.load(Ordering::SeqCst)
    }

    pub fn successes(&self) -> u32 {
        self.successes.load(Ordering::SeqCst)
    }

    pub fn exhaustions(&self) -> u32 {
        self.exhaustions.load(Ordering::SeqCst)
    }

    pub fn cancellations(&self) -> u32 {
        self.cancellations.load(Ordering::SeqCst)
    }
}

impl RetryObserver for StatsObserver {
    fn on_attempt_start(&self, _attempt: u32, _max_attempts: u32) {
        self.attempt_starts.fetch_add(1, Ordering::SeqCst);
    }

    fn on_retry(&self, _attempt: u32, _error: &dyn Error, _delay: Duration) {
        self.retries.fetch_add(1, Ordering::SeqCst);
    }

    fn on_success(&self, _attempt: u32, _total_duration: Duration) {
        self.successes.fetch_add(1, Ordering::SeqCst);
    }

    fn on_exhausted(&self, _attempts: u32, _final_error: &dyn Error) {
        self.exhaustions.fetch_add(1, Ordering::SeqCst);
    }

    fn on_cancelled(&self, _attempt: u32, _error: &dyn Error) {
        self.cancellations.fetch_add(1, Ordering::SeqCst);
    }
}

/// Fan events out to two observers, left first
impl<A: RetryObserver, B: RetryObserver> RetryObserver for (A, B) {
    fn on_attempt_start(&self, attempt: u32, max_attempts: u32) {
        self.0.on_attempt_start(attempt, max_attempts);
        self.1.on_attempt_start(attempt, max_attempts);
    }

    fn on_retry(&self, attempt: u32, error: &dyn Error, delay: Duration) {
        self.0.on_retry(attempt, error, delay);
        self.1.on_retry(attempt, error, delay);
    }

    fn on_success(&self, attempt: u32, total_duration: Duration) {
        self.0.on_success(attempt, total_duration);
        self.1.on_success(attempt, total_duration);
    }

    fn on_exhausted(&self, attempts: u32, final_error: &dyn Error) {
        self.0.on_exhausted(attempts, final_error);
        self.1.on_exhausted(attempts, final_error);
    }

    fn on_cancelled(&self, attempt: u32, error: &dyn Error) {
        self.0.on_cancelled(attempt, error);
        self.1.on_cancelled(attempt, error);
    }
}

/// Implement RetryObserver for Arc<T> where T: RetryObserver
impl<T: RetryObserver + ?Sized> RetryObserver for std::sync::Arc<T> {
    fn on_attempt_start(&self, attempt: u32, max_attempts: u32) {
        (**self).on_attempt_start(attempt, max_attempts)
    }

    fn on_retry(&self, attempt: u32, error: &dyn Error, delay: Duration) {
        (**self).on_retry(attempt, error, delay)
    }

    fn on_success(&self, attempt: u32, total_duration: Duration) {
        (**self).on_success(attempt, total_duration)
    }

    fn on_exhausted(&self, attempts: u32, final_error: &dyn Error) {
        (**self).on_exhausted(attempts, final_error)
    }

    fn on_cancelled(&self, attempt: u32, error: &dyn Error) {
        (**self).on_cancelled(attempt, error)
    }
}

/// Implement RetryObserver for Box<T> where T: RetryObserver
impl<T: RetryObserver + ?Sized> RetryObserver for Box<T> {
    fn on_attempt_start(&self, attempt: u32, max_attempts: u32) {
        (**self).on_attempt_start(attempt, max_attempts)
    }

    fn on_retry(&self, attempt: u32, error: &dyn Error, delay: Duration) {
        (**self).on_retry(attempt, error, delay)
    }

    fn on_success(&self, attempt: u32, total_duration: Duration) {
        (**self).on_success(attempt, total_duration)
    }

    fn on_exhausted(&self, attempts: u32, final_error: &dyn Error) {
        (**self).on_exhausted(attempts, final_error)
    }

    fn on_cancelled(&self, attempt: u32, error: &dyn Error) {
        (**self).on_cancelled(attempt, error)
    }
}
