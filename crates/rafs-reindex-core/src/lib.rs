//! # rafs-reindex-core
//!
//! Core library for the rafs-reindex job providing:
//! - Job configuration types and the layered config loader
//! - Error types shared by the other crates
//! - `SecureString` and `AccessToken` for secret-bearing values
//! - Retry execution engine with a fixed-delay policy

pub mod config;
pub mod error;
pub mod retry;
pub mod security;
pub mod token;
pub mod types;

pub use config::ConfigLoader;
pub use error::{Error, Result};
pub use security::SecureString;
pub use token::AccessToken;
pub use types::{JobConfig, RetryPolicy};
