//! Error types for rafs-reindex-core

use thiserror::Error;

/// Result type alias using rafs-reindex-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Configuration and policy errors
///
/// Every variant is fatal: the job refuses to start rather than guess.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Invalid configuration value
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Required setting absent
    #[error("Required setting '{name}' is not set (export {env})")]
    MissingSetting { name: String, env: String },

    /// Retry policy violates its invariants
    #[error("Invalid retry policy: {message}")]
    InvalidRetryPolicy { message: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a config not found error
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a missing setting error
    pub fn missing_setting(name: impl Into<String>, env: impl Into<String>) -> Self {
        Self::MissingSetting {
            name: name.into(),
            env: env.into(),
        }
    }

    /// Create an invalid retry policy error
    pub fn invalid_retry_policy(message: impl Into<String>) -> Self {
        Self::InvalidRetryPolicy {
            message: message.into(),
        }
    }
}
