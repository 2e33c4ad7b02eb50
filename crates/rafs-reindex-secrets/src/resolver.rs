//! Secret resolution orchestration
//!
//! Resolves a batch of names against one store:
//! - names in the order given, duplicates fetched once
//! - all or nothing: the first failure aborts the batch
//! - no retry at this layer

use std::sync::Arc;

use rafs_reindex_auth::CredentialProvider;
use tracing::{debug, info};
use url::Url;

use crate::error::Result;
use crate::security::AuditLog;
use crate::store::{KeyVaultStore, SecretStore};
use crate::types::{ResolvedSecrets, SecretName};

/// Secret resolver backed by the job's ambient credential
pub struct SecretResolver {
    credential: Arc<dyn CredentialProvider>,
}

impl SecretResolver {
    pub fn new(credential: Arc<dyn CredentialProvider>) -> Self {
        Self { credential }
    }

    /// Resolve `names` from the Key Vault at `endpoint`
    pub async fn resolve(&self, endpoint: &Url, names: &[SecretName]) -> Result<ResolvedSecrets> {
        let store = KeyVaultStore::new(endpoint.clone(), Arc::clone(&self.credential));
        Self::resolve_from(&store, names).await
    }

    /// Resolve `names` from any store
    pub async fn resolve_from(store: &dyn SecretStore, names: &[SecretName]) -> Result<ResolvedSecrets> {
        let mut resolved = ResolvedSecrets::new();

        for name in names {
            if resolved.contains(name.as_str()) {
                debug!(secret_name = %name, "Secret already resolved in this batch");
                continue;
            }

            match store.get_secret(name).await {
                Ok(value) => {
                    AuditLog::new("get", name.as_str(), store.endpoint()).log();
                    resolved.insert(name.clone(), value);
                }
                Err(err) => {
                    AuditLog::new("get", name.as_str(), store.endpoint())
                        .with_error(&err.to_string())
                        .log();
                    return Err(err);
                }
            }
        }

        info!(
            store = store.name(),
            endpoint = store.endpoint(),
            count = resolved.len(),
            "Resolved secrets"
        );
        Ok(resolved)
    }
}
