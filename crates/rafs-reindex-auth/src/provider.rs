//! Identity platform adapters
//!
//! A `TokenProvider` exchanges a `ClientIdentity` for an access token. The
//! production adapter talks to the Microsoft identity platform's v2.0 token
//! endpoint using the client-credentials grant.

use async_trait::async_trait;
use rafs_reindex_core::AccessToken;
use url::Url;

use crate::error::AuthError;
use crate::identity::ClientIdentity;
use crate::oauth::{self, GRANT_CLIENT_CREDENTIALS};

/// Default Entra ID authority host
pub const DEFAULT_AUTHORITY: &str = "https://login.microsoftonline.com";

/// Trait for identity providers able to mint service tokens
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Request a token for `scopes` on behalf of `identity`
    async fn request_token(
        &self,
        identity: &ClientIdentity,
        scopes: &[String],
    ) -> Result<AccessToken, AuthError>;

    /// Provider name for logs
    fn name(&self) -> &'static str;
}

/// Client-credentials grant against an Entra ID authority
#[derive(Debug, Clone)]
pub struct EntraTokenProvider {
    client: reqwest::Client,
    authority: Url,
}

impl EntraTokenProvider {
    pub fn new(authority: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            authority,
        }
    }

    pub fn authority(&self) -> &Url {
        &self.authority
    }
}

#[async_trait]
impl TokenProvider for EntraTokenProvider {
    async fn request_token(
        &self,
        identity: &ClientIdentity,
        scopes: &[String],
    ) -> Result<AccessToken, AuthError> {
        let endpoint = oauth::token_endpoint(&self.authority, identity.tenant_id())
            .map_err(AuthError::authentication_failed)?;
        let scope = scopes.join(" ");

        let form = [
            ("grant_type", GRANT_CLIENT_CREDENTIALS),
            ("client_id", identity.client_id()),
            ("client_secret", identity.client_secret()),
            ("scope", scope.as_str()),
        ];

        oauth::send_form(&self.client, endpoint, &form)
            .await
            .map_err(|failure| AuthError::authentication_failed(failure.into_cause()))
    }

    fn name(&self) -> &'static str {
        "entra-id"
    }
}
