//! Job-level error composing every stage's failures

use rafs_reindex_auth::AuthError;
use rafs_reindex_http::{RequestError, SpecError};
use rafs_reindex_secrets::SecretError;
use thiserror::Error;

/// Process exit status for a successful run
pub const EXIT_SUCCESS: u8 = 0;
/// Process exit status for any runtime failure
pub const EXIT_FAILURE: u8 = 1;
/// Process exit status for missing or invalid configuration
pub const EXIT_CONFIG: u8 = 2;

#[derive(Error, Debug)]
pub enum JobError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Secret resolution, store credential or identity assembly failed
    #[error(transparent)]
    Secrets(SecretError),

    #[error(transparent)]
    Authentication(#[from] AuthError),

    #[error("Request failed after {attempts} attempt(s): {source}")]
    RequestFailed { attempts: u32, source: RequestError },
}

impl JobError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Configuration(_) => EXIT_CONFIG,
            _ => EXIT_FAILURE,
        }
    }

    /// Stage label for logs
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration",
            Self::Secrets(SecretError::IncompleteCredential { .. }) => "credential",
            Self::Secrets(_) => "secrets",
            Self::Authentication(_) => "authentication",
            Self::RequestFailed { .. } => "request",
        }
    }
}

impl From<rafs_reindex_core::Error> for JobError {
    fn from(err: rafs_reindex_core::Error) -> Self {
        Self::Configuration(err.to_string())
    }
}

impl From<SpecError> for JobError {
    fn from(err: SpecError) -> Self {
        Self::Configuration(err.to_string())
    }
}

impl From<SecretError> for JobError {
    fn from(err: SecretError) -> Self {
        match err {
            SecretError::InvalidName { .. } => Self::Configuration(err.to_string()),
            other => Self::Secrets(other),
        }
    }
}
