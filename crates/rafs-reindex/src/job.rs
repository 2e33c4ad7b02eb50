//! The reindex job pipeline
//!
//! resolve secrets → build identity → acquire token → retrying GET.
//! Every stage before the request is fatal on its first failure; only the
//! request itself is retried.

use std::sync::Arc;

use rafs_reindex_auth::{CredentialProvider, EntraTokenProvider, TokenAcquirer};
use rafs_reindex_core::JobConfig;
use rafs_reindex_http::{RequestOutcome, RequestSpec, RetryingRequestExecutor};
use rafs_reindex_secrets::{CredentialBuilder, CredentialSecretNames, SecretResolver};
use tracing::{debug, info};

use crate::error::JobError;

/// One configured run of the reindex job
pub struct ReindexJob {
    config: JobConfig,
    store_credential: Arc<dyn CredentialProvider>,
}

impl ReindexJob {
    /// `store_credential` authenticates the job to its secret store
    pub fn new(config: JobConfig, store_credential: Arc<dyn CredentialProvider>) -> Self {
        Self {
            config,
            store_credential,
        }
    }

    pub fn config(&self) -> &JobConfig {
        &self.config
    }

    /// Run the job once; returns the target's status on success
    pub async fn run(&self) -> Result<u16, JobError> {
        let config = &self.config;

        // Everything that can be rejected locally is checked before the
        // first network call.
        config.validate()?;
        let vault = config.key_vault_url()?;
        let authority = config.authority_url()?;
        let spec = RequestSpec::from_config(config)?;
        let builder = CredentialBuilder::new(CredentialSecretNames::from_config(&config.secrets)?);

        debug!(
            store_credential = self.store_credential.name(),
            vault = vault.host_str().unwrap_or_default(),
            "Resolving access secrets"
        );
        let secrets = SecretResolver::new(self.store_credential.clone())
            .resolve(&vault, &builder.names().all())
            .await?;
        info!("Retrieved access secrets correctly");

        let identity = builder.build(&secrets)?;
        drop(secrets);

        let token = TokenAcquirer::new(EntraTokenProvider::new(authority))
            .acquire(identity, &config.identity.scopes)
            .await?;

        let outcome = RetryingRequestExecutor::new(spec, config.retry)
            .execute(token)
            .await;

        match outcome {
            RequestOutcome::Success { status } => Ok(status),
            RequestOutcome::Failure {
                attempts,
                last_error,
            } => Err(JobError::RequestFailed {
                attempts,
                source: last_error,
            }),
        }
    }
}
