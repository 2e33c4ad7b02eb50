//! Azure Key Vault secret store over the REST API

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rafs_reindex_auth::oauth::describe_transport;
use rafs_reindex_auth::CredentialProvider;
use rafs_reindex_core::AccessToken;
use reqwest::StatusCode;
use serde::Deserialize;
use tokio::sync::OnceCell;
use tracing::debug;
use url::Url;

use super::SecretStore;
use crate::error::{Result, SecretError};
use crate::security::sanitize_error;
use crate::types::{SecretName, SecretReference, SecretValue};

pub const KEY_VAULT_API_VERSION: &str = "7.4";
pub const KEY_VAULT_SCOPE: &str = "https://vault.azure.net/.default";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Deserialize)]
struct SecretBundle {
    value: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    code: String,
}

/// Reads secrets from one vault
///
/// The store token is requested from the injected credential on first use
/// and reused for every secret read through this instance.
pub struct KeyVaultStore {
    vault: Url,
    label: String,
    credential: Arc<dyn CredentialProvider>,
    client: reqwest::Client,
    token: OnceCell<AccessToken>,
}

impl KeyVaultStore {
    pub fn new(vault: Url, credential: Arc<dyn CredentialProvider>) -> Self {
        let label = vault.host_str().unwrap_or(vault.as_str()).to_string();
        Self {
            vault,
            label,
            credential,
            client: reqwest::Client::new(),
            token: OnceCell::new(),
        }
    }

    pub fn vault(&self) -> &Url {
        &self.vault
    }

    async fn store_token(&self) -> Result<&AccessToken> {
        self.token
            .get_or_try_init(|| async {
                debug!(
                    credential = self.credential.name(),
                    vault = %self.label,
                    "Requesting secret store token"
                );
                self.credential.get_token(&[KEY_VAULT_SCOPE]).await
            })
            .await
            .map_err(SecretError::from)
    }
}

#[async_trait]
impl SecretStore for KeyVaultStore {
    async fn get_secret(&self, name: &SecretName) -> Result<SecretValue> {
        let token = self.store_token().await?;
        let url = SecretReference::new(self.vault.clone(), name.clone()).url()?;

        let response = self
            .client
            .get(url)
            .query(&[("api-version", KEY_VAULT_API_VERSION)])
            .header(reqwest::header::AUTHORIZATION, token.bearer_header())
            .header(reqwest::header::ACCEPT, "application/json")
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| SecretError::unreachable(&self.label, describe_transport(e)))?;

        let status = response.status();
        debug!(secret_name = %name, status = status.as_u16(), "Key Vault responded");

        if status == StatusCode::OK {
            let bundle: SecretBundle = response.json().await.map_err(|_| {
                SecretError::unavailable(name.as_str(), "malformed secret bundle")
            })?;
            return Ok(SecretValue::new(bundle.value));
        }

        if status.is_server_error() {
            return Err(SecretError::unreachable(
                &self.label,
                format!("status {}", status.as_u16()),
            ));
        }

        let body = response.text().await.unwrap_or_default();
        let reason = match serde_json::from_str::<ErrorBody>(&body) {
            Ok(err) => format!("status {} ({})", status.as_u16(), sanitize_error(&err.error.code)),
            Err(_) => format!("status {}", status.as_u16()),
        };
        Err(SecretError::unavailable(name.as_str(), reason))
    }

    fn name(&self) -> &'static str {
        "azure-key-vault"
    }

    fn endpoint(&self) -> &str {
        &self.label
    }
}
