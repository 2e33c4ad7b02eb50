//! Secret store trait and implementations

pub mod key_vault;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{SecretName, SecretValue};

/// Trait for secret stores
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Read the current value of `name`
    ///
    /// Returns `SecretUnavailable` when the secret is missing or unreadable,
    /// `StoreUnreachable` when the store cannot be contacted.
    async fn get_secret(&self, name: &SecretName) -> Result<SecretValue>;

    /// Store kind for audit events
    fn name(&self) -> &'static str;

    /// Store location for audit events
    fn endpoint(&self) -> &str;
}

pub use key_vault::{KeyVaultStore, KEY_VAULT_API_VERSION, KEY_VAULT_SCOPE};
