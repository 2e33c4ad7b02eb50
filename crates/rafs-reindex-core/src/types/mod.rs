//! Type definitions for rafs-reindex configuration

mod job_config;
mod retry_policy;

pub use job_config::*;
pub use retry_policy::RetryPolicy;
