//! Service token acquisition
//!
//! One attempt, no retry. The identity is consumed so its secret is dropped
//! (and zeroed) as soon as the exchange finishes.

use rafs_reindex_core::AccessToken;
use tracing::{debug, info};

use crate::error::AuthError;
use crate::identity::ClientIdentity;
use crate::provider::{EntraTokenProvider, TokenProvider};

/// Exchanges a client identity for an access token
pub struct TokenAcquirer<P = EntraTokenProvider> {
    provider: P,
}

impl<P: TokenProvider> TokenAcquirer<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Acquire a token for `scopes`, or for `<audience>/.default` when empty
    pub async fn acquire(
        &self,
        identity: ClientIdentity,
        scopes: &[String],
    ) -> Result<AccessToken, AuthError> {
        let scopes = if scopes.is_empty() {
            vec![identity.default_scope()]
        } else {
            scopes.to_vec()
        };

        info!("Retrieving service account token");
        debug!(
            provider = self.provider.name(),
            scope_count = scopes.len(),
            "Requesting token with client credentials"
        );

        let token = self.provider.request_token(&identity, &scopes).await?;
        drop(identity);

        info!(
            expires_at = ?token.expires_at(),
            "Service account token acquired"
        );
        Ok(token)
    }
}
