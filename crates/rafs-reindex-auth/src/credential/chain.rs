use async_trait::async_trait;
use rafs_reindex_core::AccessToken;
use tracing::{debug, warn};
use url::Url;

use super::{
    CredentialProvider, EnvironmentCredential, ManagedIdentityCredential,
    WorkloadIdentityCredential,
};
use crate::error::CredentialError;

/// Ordered list of ambient credentials
pub struct DefaultCredentialChain {
    members: Vec<Box<dyn CredentialProvider>>,
    skipped: Vec<String>,
}

impl DefaultCredentialChain {
    pub fn new(members: Vec<Box<dyn CredentialProvider>>) -> Self {
        Self {
            members,
            skipped: Vec::new(),
        }
    }

    /// Build the chain from the process environment
    pub fn from_env(authority: &Url) -> Self {
        Self::from_lookup(|name| std::env::var(name).ok(), authority)
    }

    /// Build the chain from an environment lookup, skipping unconfigured sources
    pub fn from_lookup<F>(lookup: F, authority: &Url) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let candidates: Vec<Result<Box<dyn CredentialProvider>, CredentialError>> = vec![
            EnvironmentCredential::from_lookup(&lookup, authority)
                .map(|c| Box::new(c) as Box<dyn CredentialProvider>),
            WorkloadIdentityCredential::from_lookup(&lookup, authority)
                .map(|c| Box::new(c) as Box<dyn CredentialProvider>),
            ManagedIdentityCredential::from_lookup(&lookup)
                .map(|c| Box::new(c) as Box<dyn CredentialProvider>),
        ];

        let mut members = Vec::new();
        let mut skipped = Vec::new();
        for candidate in candidates {
            match candidate {
                Ok(member) => members.push(member),
                Err(err) => {
                    debug!("Skipping ambient credential: {}", err);
                    skipped.push(err.to_string());
                }
            }
        }

        Self { members, skipped }
    }

    /// Names of the configured members, in order
    pub fn member_names(&self) -> Vec<&'static str> {
        self.members.iter().map(|m| m.name()).collect()
    }
}

#[async_trait]
impl CredentialProvider for DefaultCredentialChain {
    async fn get_token(&self, scopes: &[&str]) -> Result<AccessToken, CredentialError> {
        let mut attempted = self.skipped.clone();

        for member in &self.members {
            match member.get_token(scopes).await {
                Ok(token) => {
                    debug!(credential = member.name(), "Ambient credential selected");
                    return Ok(token);
                }
                Err(err) if err.is_fallthrough() => {
                    warn!(credential = member.name(), "Ambient credential unavailable: {}", err);
                    attempted.push(err.to_string());
                }
                Err(err) => return Err(err),
            }
        }

        Err(CredentialError::Exhausted { attempted })
    }

    fn name(&self) -> &'static str {
        "default-chain"
    }
}
