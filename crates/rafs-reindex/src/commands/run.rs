//! Run command

use std::sync::Arc;
use std::time::Duration;

use camino::Utf8Path;
use rafs_reindex::{JobError, ReindexJob};
use rafs_reindex_auth::{CredentialProvider, DefaultCredentialChain, StaticCredential};
use rafs_reindex_core::{AccessToken, JobConfig};
use tracing::{debug, info};

use super::load_config;
use crate::cli::RunArgs;

pub async fn run(args: RunArgs, path: Option<&Utf8Path>) -> Result<(), JobError> {
    let mut config = load_config(path)?;
    apply_flags(&mut config, &args)?;

    let credential: Arc<dyn CredentialProvider> = match args.store_token {
        Some(token) => Arc::new(StaticCredential::new(AccessToken::new(token, None))),
        None => {
            let chain = DefaultCredentialChain::from_env(&config.authority_url()?);
            debug!(members = ?chain.member_names(), "Using ambient credential chain");
            Arc::new(chain)
        }
    };

    let status = ReindexJob::new(config, credential).run().await?;
    info!(status, "Reindex completed");
    Ok(())
}

/// CLI flags take precedence over file and environment
fn apply_flags(config: &mut JobConfig, args: &RunArgs) -> Result<(), JobError> {
    if args.insecure {
        config.target.insecure_skip_verify = true;
    }
    if let Some(max_attempts) = args.max_attempts {
        config.retry = config.retry.with_max_attempts(max_attempts)?;
    }
    if let Some(delay_ms) = args.retry_delay_ms {
        config.retry = config.retry.with_delay(Duration::from_millis(delay_ms));
    }
    Ok(())
}
