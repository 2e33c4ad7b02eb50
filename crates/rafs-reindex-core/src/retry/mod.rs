//! Retry execution engine with policy-based configuration
//!
//! # Features
//!
//! - Fixed attempt count and fixed inter-attempt delay from `RetryPolicy`
//! - Observable retry attempts via the `RetryObserver` trait
//! - Built-in `TracingObserver` for logging and `OnRetry` for plain callbacks
//! - Optional `RetryPredicate` to stop early on errors not worth retrying
//!
//! # Example
//!
//! ```rust,no_run
//! use rafs_reindex_core::retry::{RetryError, RetryExecutorBuilder, TracingObserver};
//! use rafs_reindex_core::types::RetryPolicy;
//!
//! async fn example() -> Result<u16, RetryError<std::io::Error>> {
//!     RetryExecutorBuilder::new()
//!         .with_policy(RetryPolicy::default())
//!         .with_observer(TracingObserver::new("reindex"))
//!         .build()
//!         .execute(|_attempt| async { Ok(200) })
//!         .await
//! }
//! ```

mod error;
mod executor;
mod observer;
mod predicate;

pub use error::RetryError;
pub use executor::{RetryExecutor, RetryExecutorBuilder};
pub use observer::{NoOpObserver, OnRetry, RetryObserver, StatsObserver, TracingObserver};
pub use predicate::{AlwaysRetry, ClosurePredicate, RetryPredicate};
