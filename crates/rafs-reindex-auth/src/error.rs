//! Error types for token acquisition and ambient credentials

use thiserror::Error;

use crate::identity::IdentityField;

/// Errors raised while turning a client identity into an access token
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Authentication failed: {cause}")]
    AuthenticationFailed { cause: String },
}

/// A client identity field was absent, empty or whitespace only
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Client identity is missing {field}")]
pub struct IncompleteIdentity {
    pub field: IdentityField,
}

impl AuthError {
    pub fn authentication_failed(cause: impl Into<String>) -> Self {
        Self::AuthenticationFailed {
            cause: cause.into(),
        }
    }
}

/// Errors raised by the job's own ambient credential
#[derive(Error, Debug)]
pub enum CredentialError {
    /// The credential's environment is not present; the chain skips it
    #[error("{credential} is not configured: {reason}")]
    NotConfigured {
        credential: &'static str,
        reason: String,
    },

    /// The credential's endpoint could not be reached; the chain moves on
    #[error("{credential} is unavailable: {cause}")]
    Unavailable {
        credential: &'static str,
        cause: String,
    },

    /// The identity platform answered and refused; the chain stops here
    #[error("{credential} was rejected: {cause}")]
    Rejected {
        credential: &'static str,
        cause: String,
    },

    #[error("No ambient credential could produce a token ({})", attempted.join("; "))]
    Exhausted { attempted: Vec<String> },
}

impl CredentialError {
    pub fn not_configured(credential: &'static str, reason: impl Into<String>) -> Self {
        Self::NotConfigured {
            credential,
            reason: reason.into(),
        }
    }

    pub fn unavailable(credential: &'static str, cause: impl Into<String>) -> Self {
        Self::Unavailable {
            credential,
            cause: cause.into(),
        }
    }

    pub fn rejected(credential: &'static str, cause: impl Into<String>) -> Self {
        Self::Rejected {
            credential,
            cause: cause.into(),
        }
    }

    /// Whether a credential chain may fall through to its next member
    pub fn is_fallthrough(&self) -> bool {
        matches!(self, Self::NotConfigured { .. } | Self::Unavailable { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = AuthError::authentication_failed("invalid_client: bad secret");
        assert_eq!(
            err.to_string(),
            "Authentication failed: invalid_client: bad secret"
        );

        let err = IncompleteIdentity {
            field: IdentityField::Audience,
        };
        assert_eq!(err.to_string(), "Client identity is missing audience");

        let err = CredentialError::Exhausted {
            attempted: vec![
                "environment is not configured: AZURE_CLIENT_SECRET is not set".into(),
                "managed-identity is unavailable: connection refused".into(),
            ],
        };
        assert!(err
            .to_string()
            .contains("AZURE_CLIENT_SECRET is not set; managed-identity is unavailable"));
    }

    #[test]
    fn test_fallthrough() {
        assert!(CredentialError::not_configured("environment", "unset").is_fallthrough());
        assert!(CredentialError::unavailable("managed-identity", "refused").is_fallthrough());
        assert!(!CredentialError::rejected("environment", "invalid_client").is_fallthrough());
    }
}
