//! Bearer access tokens

use crate::security::SecureString;
use chrono::{DateTime, Utc};
use std::fmt;

/// A short-lived bearer token
///
/// Lives for a single run. Nothing in the workspace persists it.
#[derive(Clone)]
pub struct AccessToken {
    token: SecureString,
    expires_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    pub fn new(token: impl Into<SecureString>, expires_at: Option<DateTime<Utc>>) -> Self {
        Self {
            token: token.into(),
            expires_at,
        }
    }

    /// Build from an `expires_in` seconds value as returned by token endpoints
    ///
    /// A lifetime too large to represent leaves the expiry unknown.
    pub fn expiring_in(token: impl Into<SecureString>, expires_in_secs: Option<i64>) -> Self {
        let expires_at = expires_in_secs.and_then(|secs| {
            chrono::Duration::try_seconds(secs.max(0))
                .and_then(|lifetime| Utc::now().checked_add_signed(lifetime))
        });
        Self::new(token, expires_at)
    }

    /// Raw token value (use with caution)
    pub fn secret(&self) -> &str {
        self.token.expose()
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Tokens without an expiry never report expired
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| at <= Utc::now())
    }

    /// Value for an `Authorization` header
    pub fn bearer_header(&self) -> String {
        format!("Bearer {}", self.token.expose())
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &self.token)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
