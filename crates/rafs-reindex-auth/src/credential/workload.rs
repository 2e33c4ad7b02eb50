use std::path::PathBuf;

use async_trait::async_trait;
use rafs_reindex_core::AccessToken;
use url::Url;

use super::{map_failure, required_var, CredentialProvider};
use super::{CLIENT_ID_ENV, FEDERATED_TOKEN_FILE_ENV, TENANT_ID_ENV};
use crate::error::CredentialError;
use crate::oauth::{self, GRANT_CLIENT_CREDENTIALS, JWT_BEARER_ASSERTION};

/// Federated service account token exchanged for an Entra ID token
///
/// The projected token file is re-read on every request since the kubelet
/// rotates it in place.
pub struct WorkloadIdentityCredential {
    tenant_id: String,
    client_id: String,
    token_file: PathBuf,
    authority: Url,
    client: reqwest::Client,
}

impl WorkloadIdentityCredential {
    pub const NAME: &'static str = "workload-identity";

    pub fn new(
        tenant_id: impl Into<String>,
        client_id: impl Into<String>,
        token_file: impl Into<PathBuf>,
        authority: Url,
    ) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            client_id: client_id.into(),
            token_file: token_file.into(),
            authority,
            client: reqwest::Client::new(),
        }
    }

    pub fn from_lookup<F>(lookup: F, authority: &Url) -> Result<Self, CredentialError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token_file = required_var(&lookup, Self::NAME, FEDERATED_TOKEN_FILE_ENV)?;
        let tenant_id = required_var(&lookup, Self::NAME, TENANT_ID_ENV)?;
        let client_id = required_var(&lookup, Self::NAME, CLIENT_ID_ENV)?;
        Ok(Self::new(tenant_id, client_id, token_file, authority.clone()))
    }

    async fn read_assertion(&self) -> Result<String, CredentialError> {
        let assertion = tokio::fs::read_to_string(&self.token_file)
            .await
            .map_err(|e| {
                CredentialError::unavailable(
                    Self::NAME,
                    format!(
                        "cannot read federated token file {}: {}",
                        self.token_file.display(),
                        e
                    ),
                )
            })?;

        let assertion = assertion.trim().to_string();
        if assertion.is_empty() {
            return Err(CredentialError::unavailable(
                Self::NAME,
                format!("federated token file {} is empty", self.token_file.display()),
            ));
        }
        Ok(assertion)
    }
}

#[async_trait]
impl CredentialProvider for WorkloadIdentityCredential {
    async fn get_token(&self, scopes: &[&str]) -> Result<AccessToken, CredentialError> {
        let assertion = self.read_assertion().await?;
        let endpoint = oauth::token_endpoint(&self.authority, &self.tenant_id)
            .map_err(|e| CredentialError::rejected(Self::NAME, e))?;
        let scope = scopes.join(" ");

        let form = [
            ("grant_type", GRANT_CLIENT_CREDENTIALS),
            ("client_id", self.client_id.as_str()),
            ("client_assertion_type", JWT_BEARER_ASSERTION),
            ("client_assertion", assertion.as_str()),
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
