//! Client identity assembly from resolved secrets

use rafs_reindex_auth::{ClientIdentity, IdentityField};
use rafs_reindex_core::types::SecretNamesConfig;

use crate::error::Result;
use crate::types::{ResolvedSecrets, SecretName};

pub const DEFAULT_TENANT_ID_SECRET: &str = "tenant-id";
pub const DEFAULT_CLIENT_ID_SECRET: &str = "app-dev-sp-username";
pub const DEFAULT_CLIENT_SECRET_SECRET: &str = "app-dev-sp-password";
pub const DEFAULT_AUDIENCE_SECRET: &str = "aad-client-id";

/// Which store secret holds which identity field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialSecretNames {
    tenant_id: SecretName,
    client_id: SecretName,
    client_secret: SecretName,
    audience: SecretName,
}

impl CredentialSecretNames {
    pub fn new(
        tenant_id: SecretName,
        client_id: SecretName,
        client_secret: SecretName,
        audience: SecretName,
    ) -> Self {
        Self {
            tenant_id,
            client_id,
            client_secret,
            audience,
        }
    }

    pub fn from_config(config: &SecretNamesConfig) -> Result<Self> {
        Ok(Self::new(
            SecretName::new(config.tenant_id.as_str())?,
            SecretName::new(config.client_id.as_str())?,
            SecretName::new(config.client_secret.as_str())?,
            SecretName::new(config.audience.as_str())?,
        ))
    }

    pub fn name_for(&self, field: IdentityField) -> &SecretName {
        match field {
            IdentityField::TenantId => &self.tenant_id,
            IdentityField::ClientId => &self.client_id,
            IdentityField::ClientSecret => &self.client_secret,
            IdentityField::Audience => &self.audience,
        }
    }

    /// The four names, in field order
    pub fn all(&self) -> Vec<SecretName> {
        IdentityField::ALL
            .iter()
            .map(|field| self.name_for(*field).clone())
            .collect()
    }
}

impl Default for CredentialSecretNames {
    fn default() -> Self {
        Self::new(
            SecretName::from_static(DEFAULT_TENANT_ID_SECRET),
            SecretName::from_static(DEFAULT_CLIENT_ID_SECRET),
            SecretName::from_static(DEFAULT_CLIENT_SECRET_SECRET),
            SecretName::from_static(DEFAULT_AUDIENCE_SECRET),
        )
    }
}

/// Assembles a `ClientIdentity` from a resolved batch. No I/O.
#[derive(Debug, Clone, Default)]
pub struct CredentialBuilder {
    names: CredentialSecretNames,
}

impl CredentialBuilder {
    pub fn new(names: CredentialSecretNames) -> Self {
        Self { names }
    }

    pub fn names(&self) -> &CredentialSecretNames {
        &self.names
    }

    /// Fails with `IncompleteCredential` naming the first absent or blank field
    pub fn build(&self, secrets: &ResolvedSecrets) -> Result<ClientIdentity> {
        let value = |field: IdentityField| {
            secrets
                .get(self.names.name_for(field).as_str())
                .map(|v| v.expose())
                .unwrap_or_default()
        };

        let identity = ClientIdentity::new(
            value(IdentityField::TenantId),
            value(IdentityField::ClientId),
            value(IdentityField::ClientSecret),
            value(IdentityField::Audience),
        )?;
        Ok(identity)
    }
}
