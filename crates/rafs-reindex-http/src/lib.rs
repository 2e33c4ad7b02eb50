//! # rafs-reindex-http
//!
//! The job's single outbound request: a bearer-authenticated GET executed
//! under a fixed-delay retry policy until the expected status is returned.

pub mod error;
pub mod executor;
pub mod outcome;
pub mod request;

pub use error::{RequestError, SpecError};
pub use executor::RetryingRequestExecutor;
pub use outcome::RequestOutcome;
pub use request::{join_path, RequestSpec};
