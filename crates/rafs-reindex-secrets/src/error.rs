//! Error types for secret resolution and credential assembly

use rafs_reindex_auth::{CredentialError, IdentityField, IncompleteIdentity};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SecretError>;

#[derive(Error, Debug)]
pub enum SecretError {
    /// The secret does not exist or the caller may not read it
    #[error("Secret '{name}' is unavailable: {reason}")]
    SecretUnavailable { name: String, reason: String },

    #[error("Secret store {endpoint} is unreachable: {cause}")]
    StoreUnreachable { endpoint: String, cause: String },

    #[error("Could not obtain a secret store credential: {0}")]
    Credential(#[from] CredentialError),

    #[error("Credential is incomplete: {field} is missing or empty")]
    IncompleteCredential { field: IdentityField },

    #[error("Invalid secret name '{name}': {reason}")]
    InvalidName { name: String, reason: String },
}

impl SecretError {
    pub fn unavailable(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SecretUnavailable {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub fn unreachable(endpoint: impl Into<String>, cause: impl Into<String>) -> Self {
        Self::StoreUnreachable {
            endpoint: endpoint.into(),
            cause: cause.into(),
        }
    }

    pub fn invalid_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidName {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

impl From<IncompleteIdentity> for SecretError {
    fn from(err: IncompleteIdentity) -> Self {
        Self::IncompleteCredential { field: err.field }
    }
}
