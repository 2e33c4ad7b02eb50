//! Error types for the outbound request

use std::error::Error as StdError;

use thiserror::Error;

/// Why one attempt did not succeed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// DNS, connect, TLS or timeout failure; no response was received
    #[error("Transport error: {cause}")]
    Transport { cause: String },

    #[error("Unexpected status {actual} (expected {expected})")]
    UnexpectedStatus { expected: u16, actual: u16 },

    /// The request could not be prepared; retrying cannot help
    #[error("Could not prepare request: {cause}")]
    Client { cause: String },
}

impl RequestError {
    pub fn transport(cause: impl Into<String>) -> Self {
        Self::Transport {
            cause: cause.into(),
        }
    }

    pub fn client(cause: impl Into<String>) -> Self {
        Self::Client {
            cause: cause.into(),
        }
    }

    /// Observed status, when a response was received
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::UnexpectedStatus { actual, .. } => Some(*actual),
            _ => None,
        }
    }

    /// Transport failures and unexpected statuses are retried alike
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::Client { .. })
    }

    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            "timed out"
        } else if err.is_connect() {
            "connection failed"
        } else {
            "request failed"
        };

        let mut cause = kind.to_string();
        let mut source = err.source();
        while let Some(inner) = source {
            cause.push_str(": ");
            cause.push_str(&inner.to_string());
            source = inner.source();
        }
        Self::transport(cause)
    }
}

/// Invalid request settings
#[derive(Error, Debug)]
pub enum SpecError {
    #[error(transparent)]
    Config(#[from] rafs_reindex_core::Error),

    #[error("Invalid header {name}: {message}")]
    InvalidHeader { name: String, message: String },

    #[error("Invalid expected status {0}")]
    InvalidStatus(u16),
}
