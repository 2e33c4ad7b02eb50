use std::time::Duration;

use async_trait::async_trait;
use rafs_reindex_core::{AccessToken, SecureString};
use url::Url;

use super::{CredentialProvider, CLIENT_ID_ENV, IDENTITY_ENDPOINT_ENV, IDENTITY_HEADER_ENV};
use crate::error::CredentialError;
use crate::oauth::{self, TokenFailure};

/// Azure Instance Metadata Service token endpoint
pub const IMDS_ENDPOINT: &str = "http://169.254.169.254/metadata/identity/oauth2/token";

const IMDS_API_VERSION: &str = "2018-02-01";
const APP_SERVICE_API_VERSION: &str = "2019-08-01";
const MANAGED_IDENTITY_TIMEOUT: Duration = Duration::from_secs(10);

enum Endpoint {
    Imds(Url),
    AppService { endpoint: Url, header: SecureString },
}

/// Host-assigned managed identity
///
/// Uses the App Service identity endpoint when `IDENTITY_ENDPOINT` and
/// `IDENTITY_HEADER` are set, IMDS otherwise. `AZURE_CLIENT_ID` selects a
/// user-assigned identity.
pub struct ManagedIdentityCredential {
    endpoint: Endpoint,
    client_id: Option<String>,
    client: reqwest::Client,
}

impl ManagedIdentityCredential {
    pub const NAME: &'static str = "managed-identity";

    /// IMDS at `endpoint`
    pub fn imds(endpoint: Url, client_id: Option<String>) -> Self {
        Self::with_endpoint(Endpoint::Imds(endpoint), client_id)
    }

    /// App Service / Functions identity endpoint
    pub fn app_service(
        endpoint: Url,
        header: impl Into<SecureString>,
        client_id: Option<String>,
    ) -> Self {
        Self::with_endpoint(
            Endpoint::AppService {
                endpoint,
                header: header.into(),
            },
            client_id,
        )
    }

    fn with_endpoint(endpoint: Endpoint, client_id: Option<String>) -> Self {
        Self {
            endpoint,
            client_id,
            client: reqwest::Client::new(),
        }
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, CredentialError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let client_id = non_blank(CLIENT_ID_ENV);

        if let (Some(endpoint), Some(header)) =
            (non_blank(IDENTITY_ENDPOINT_ENV), non_blank(IDENTITY_HEADER_ENV))
        {
            let endpoint = Url::parse(endpoint.trim()).map_err(|e| {
                CredentialError::not_configured(
                    Self::NAME,
                    format!("{} is not a valid URL: {}", IDENTITY_ENDPOINT_ENV, e),
                )
            })?;
            return Ok(Self::app_service(endpoint, header, client_id));
        }

        let imds = Url::parse(IMDS_ENDPOINT)
            .map_err(|e| CredentialError::not_configured(Self::NAME, e.to_string()))?;
        Ok(Self::imds(imds, client_id))
    }

    pub fn uses_app_service(&self) -> bool {
        matches!(self.endpoint, Endpoint::AppService { .. })
    }

    fn request(&self, resource: &str) -> reqwest::RequestBuilder {
        let (url, api_version) = match &self.endpoint {
            Endpoint::Imds(url) => (url.clone(), IMDS_API_VERSION),
            Endpoint::AppService { endpoint, .. } => (endpoint.clone(), APP_SERVICE_API_VERSION),
        };

        let mut query = vec![("api-version", api_version), ("resource", resource)];
        if let Some(client_id) = self.client_id.as_deref() {
            query.push(("client_id", client_id));
        }

        let request = self
            .client
            .get(url)
            .query(&query)
            .timeout(MANAGED_IDENTITY_TIMEOUT);

        match &self.endpoint {
            Endpoint::Imds(_) => request.header("Metadata", "true"),
            Endpoint::AppService { header, .. } => {
                request.header("X-IDENTITY-HEADER", header.expose())
            }
        }
    }
}

/// Managed identity speaks in resources, not scopes
fn resource_for(scopes: &[&str]) -> Result<String, CredentialError> {
    match scopes {
        [scope] => Ok(scope
            .strip_suffix("/.default")
            .unwrap_or(*scope)
            .to_string()),
        _ => Err(CredentialError::rejected(
            ManagedIdentityCredential::NAME,
            format!("exactly one scope is supported, got {}", scopes.len()),
        )),
    }
}

#[async_trait]
impl CredentialProvider for ManagedIdentityCredential {
    async fn get_token(&self, scopes: &[&str]) -> Result<AccessToken, CredentialError> {
        let resource = resource_for(scopes)?;

        let response = self.request(&resource).send().await.map_err(|e| {
            CredentialError::unavailable(Self::NAME, oauth::describe_transport(e))
        })?;

        // Any refusal from a managed identity endpoint (e.g. no identity
        // assigned to the host) leaves the job without a credential.
        oauth::read_token_response(response)
            .await
            .map_err(|failure| match failure {
                TokenFailure::Transport(cause) | TokenFailure::Rejected(cause) => {
                    CredentialError::unavailable(Self::NAME, cause)
                }
            })
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_from_scope() {
        assert_eq!(
            resource_for(&["https://vault.azure.net/.default"]).unwrap(),
            "https://vault.azure.net"
        );
        assert_eq!(resource_for(&["api://rafs"]).unwrap(), "api://rafs");
        assert!(resource_for(&[]).is_err());
        assert!(resource_for(&["a/.default", "b/.default"]).is_err());
    }

    #[test]
    fn test_from_lookup_prefers_app_service() {
        let lookup = |name: &str| match name {
            IDENTITY_ENDPOINT_ENV => Some("http://localhost:8081/msi/token".to_string()),
            IDENTITY_HEADER_ENV => Some("header-secret".to_string()),
            _ => None,
        };
        let credential = ManagedIdentityCredential::from_lookup(lookup).unwrap();
        assert!(credential.uses_app_service());
    }

    #[test]
    fn test_from_lookup_defaults_to_imds() {
        let credential = ManagedIdentityCredential::from_lookup(|_| None).unwrap();
        assert!(!credential.uses_app_service());
        assert!(credential.client_id.is_none());

        let lookup = |name: &str| (name == CLIENT_ID_ENV).then(|| "user-assigned".to_string());
        let credential = ManagedIdentityCredential::from_lookup(lookup).unwrap();
        assert_eq!(credential.client_id.as_deref(), Some("user-assigned"));
    }

    #[test]
    fn test_invalid_identity_endpoint() {
        let lookup = |name: &str| match name {
            IDENTITY_ENDPOINT_ENV => Some("not a url".to_string()),
            IDENTITY_HEADER_ENV => Some("h".to_string()),
            _ => None,
        };
        match ManagedIdentityCredential::from_lookup(lookup) {
            Ok(_) => panic!("expected NotConfigured"),
            Err(err) => assert!(matches!(err, CredentialError::NotConfigured { .. })),
        }
    }
}
