use async_trait::async_trait;
use rafs_reindex_core::{AccessToken, SecureString};
use url::Url;

use super::{map_failure, required_var, CredentialProvider};
use super::{CLIENT_ID_ENV, CLIENT_SECRET_ENV, TENANT_ID_ENV};
use crate::error::CredentialError;
use crate::oauth::{self, GRANT_CLIENT_CREDENTIALS};

/// Service principal secret taken from the process environment
pub struct EnvironmentCredential {
    tenant_id: String,
    client_id: String,
    client_secret: SecureString,
    authority: Url,
    client: reqwest::Client,
}

impl EnvironmentCredential {
    pub const NAME: &'static str = "environment";

    pub fn new(
        tenant_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<SecureString>,
        authority: Url,
    ) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            authority,
            client: reqwest::Client::new(),
        }
    }

    /// Build from `AZURE_TENANT_ID`, `AZURE_CLIENT_ID` and `AZURE_CLIENT_SECRET`
    pub fn from_lookup<F>(lookup: F, authority: &Url) -> Result<Self, CredentialError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let tenant_id = required_var(&lookup, Self::NAME, TENANT_ID_ENV)?;
        let client_id = required_var(&lookup, Self::NAME, CLIENT_ID_ENV)?;
        let client_secret = required_var(&lookup, Self::NAME, CLIENT_SECRET_ENV)?;
        Ok(Self::new(tenant_id, client_id, client_secret, authority.clone()))
    }
}

#[async_trait]
impl CredentialProvider for EnvironmentCredential {
    async fn get_token(&self, scopes: &[&str]) -> Result<AccessToken, CredentialError> {
        let endpoint = oauth::token_endpoint(&self.authority, &self.tenant_id)
            .map_err(|e| CredentialError::rejected(Self::NAME, e))?;
        let scope = scopes.join(" ");

        let form = [
            ("grant_type", GRANT_CLIENT_CREDENTIALS),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.expose()),
            ("scope", scope.as_str()),
        ];

        oauth::send_form(&self.client, endpoint, &form)
            .await
            .map_err(|failure| map_failure(Self::NAME, failure))
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }
}
