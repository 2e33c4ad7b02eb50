//! # rafs-reindex-auth
//!
//! Authentication for rafs-reindex:
//! - `ClientIdentity`, the service principal the job acts as
//! - `TokenAcquirer` and the Entra ID `TokenProvider`
//! - Ambient credentials the job uses to reach its secret store

pub mod acquirer;
pub mod credential;
pub mod error;
pub mod identity;
pub mod oauth;
pub mod provider;

pub use acquirer::TokenAcquirer;
pub use credential::{CredentialProvider, DefaultCredentialChain, StaticCredential};
pub use error::{AuthError, CredentialError, IncompleteIdentity};
pub use identity::{ClientIdentity, IdentityField};
pub use provider::{EntraTokenProvider, TokenProvider, DEFAULT_AUTHORITY};
