//! Ambient credentials
//!
//! The job authenticates to the secret store with whatever identity its host
//! provides. Sources are tried in a fixed order:
//!
//! 1. `EnvironmentCredential` (`AZURE_TENANT_ID`, `AZURE_CLIENT_ID`, `AZURE_CLIENT_SECRET`)
//! 2. `WorkloadIdentityCredential` (`AZURE_FEDERATED_TOKEN_FILE`)
//! 3. `ManagedIdentityCredential` (App Service endpoint or IMDS)
//!
//! A source that is not configured is skipped. A source that cannot reach its
//! endpoint falls through to the next one. A source whose request is refused
//! stops the chain.

mod chain;
mod environment;
mod managed;
mod workload;

use async_trait::async_trait;
use rafs_reindex_core::AccessToken;

use crate::error::CredentialError;
use crate::oauth::TokenFailure;

pub use chain::DefaultCredentialChain;
pub use environment::EnvironmentCredential;
pub use managed::{ManagedIdentityCredential, IMDS_ENDPOINT};
pub use workload::WorkloadIdentityCredential;

pub const TENANT_ID_ENV: &str = "AZURE_TENANT_ID";
pub const CLIENT_ID_ENV: &str = "AZURE_CLIENT_ID";
pub const CLIENT_SECRET_ENV: &str = "AZURE_CLIENT_SECRET";
pub const FEDERATED_TOKEN_FILE_ENV: &str = "AZURE_FEDERATED_TOKEN_FILE";
pub const IDENTITY_ENDPOINT_ENV: &str = "IDENTITY_ENDPOINT";
pub const IDENTITY_HEADER_ENV: &str = "IDENTITY_HEADER";

/// A source of tokens for the job's own identity
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn get_token(&self, scopes: &[&str]) -> Result<AccessToken, CredentialError>;

    /// Credential name for logs
    fn name(&self) -> &'static str;
}

/// A fixed, pre-issued token
///
/// Used when the caller already holds a store token, and in tests.
#[derive(Debug, Clone)]
pub struct StaticCredential {
    token: AccessToken,
}

impl StaticCredential {
    pub fn new(token: AccessToken) -> Self {
        Self { token }
    }
}

#[async_trait]
impl CredentialProvider for StaticCredential {
    async fn get_token(&self, _scopes: &[&str]) -> Result<AccessToken, CredentialError> {
        Ok(self.token.clone())
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

fn required_var<F>(lookup: &F, credential: &'static str, name: &str) -> Result<String, CredentialError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| CredentialError::not_configured(credential, format!("{} is not set", name)))
}

fn map_failure(credential: &'static str, failure: TokenFailure) -> CredentialError {
    match failure {
        TokenFailure::Transport(cause) => CredentialError::unavailable(credential, cause),
        TokenFailure::Rejected(cause) => CredentialError::rejected(credential, cause),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_credential_returns_its_token() {
        let credential = StaticCredential::new(AccessToken::new("store-token", None));
        let token = credential.get_token(&["scope"]).await.unwrap();
        assert_eq!(token.secret(), "store-token");
        assert_eq!(credential.name(), "static");
    }

    #[test]
    fn test_required_var_treats_blank_as_missing() {
        let lookup = |name: &str| match name {
            "SET" => Some("value".to_string()),
            "BLANK" => Some("  ".to_string()),
            _ => None,
        };

        assert_eq!(required_var(&lookup, "environment", "SET").unwrap(), "value");

        let err = required_var(&lookup, "environment", "BLANK").unwrap_err();
        assert!(matches!(err, CredentialError::NotConfigured { .. }));
        assert!(err.to_string().contains("BLANK is not set"));

        assert!(required_var(&lookup, "environment", "UNSET").is_err());
    }

    #[test]
    fn test_map_failure() {
        assert!(map_failure("x", TokenFailure::Transport("down".into())).is_fallthrough());
        assert!(!map_failure("x", TokenFailure::Rejected("no".into())).is_fallthrough());
    }
}
