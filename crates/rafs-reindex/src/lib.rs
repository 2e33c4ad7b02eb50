//! # rafs-reindex
//!
//! Batch job that triggers the RAFS DDMS reindex endpoint. The binary wraps
//! [`ReindexJob`] with config loading, logging and exit-code mapping.

pub mod error;
pub mod job;

pub use error::{JobError, EXIT_CONFIG, EXIT_FAILURE, EXIT_SUCCESS};
pub use job::ReindexJob;
