//! # rafs-reindex-secrets
//!
//! Reads the job's service principal from a secret store and assembles it
//! into a `ClientIdentity`.
//!
//! Secret values are held as zeroizing strings, never logged, and never
//! cached beyond the run that read them.

pub mod builder;
pub mod error;
pub mod resolver;
pub mod security;
pub mod store;
pub mod types;

pub use builder::{CredentialBuilder, CredentialSecretNames};
pub use error::{Result, SecretError};
pub use resolver::SecretResolver;
pub use security::{sanitize_error, AuditLog};
pub use store::{KeyVaultStore, SecretStore};
pub use types::{ResolvedSecrets, SecretName, SecretReference, SecretValue};
