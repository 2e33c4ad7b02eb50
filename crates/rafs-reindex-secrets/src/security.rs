//! Audit logging and error sanitisation
//!
//! Audit events name the secret and the store, never the value. Messages
//! that may echo remote response bodies go through `sanitize_error` first.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;

/// Audit log entry for a secret operation
#[derive(Debug, Clone)]
pub struct AuditLog {
    pub operation: &'static str,
    pub secret_name: String,
    pub store: String,
    pub success: bool,
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl AuditLog {
    pub fn new(
        operation: &'static str,
        secret_name: impl Into<String>,
        store: impl Into<String>,
    ) -> Self {
        Self {
            operation,
            secret_name: secret_name.into(),
            store: store.into(),
            success: true,
            error: None,
            timestamp: Utc::now(),
        }
    }

    /// Mark as failed; the message is sanitised on the way in
    pub fn with_error(mut self, error: &str) -> Self {
        self.success = false;
        self.error = Some(sanitize_error(error));
        self
    }

    /// Log the audit entry (never logs secret values)
    pub fn log(&self) {
        if self.success {
            tracing::info!(
                operation = self.operation,
                secret_name = %self.secret_name,
                store = %self.store,
                timestamp = %self.timestamp,
                "Secret operation successful"
            );
        } else {
            tracing::warn!(
                operation = self.operation,
                secret_name = %self.secret_name,
                store = %self.store,
                error = ?self.error,
                timestamp = %self.timestamp,
                "Secret operation failed"
            );
        }
    }
}

const REDACTIONS: [(&str, &str); 4] = [
    // JSON Web Tokens
    (
        r"eyJ[A-Za-z0-9_-]+\.[A-Za-z0-9_-]+\.[A-Za-z0-9_-]*",
        "[REDACTED_JWT]",
    ),
    // Authorization header values
    (r"(?i)\bbearer\s+[A-Za-z0-9\-._~+/]+=*", "Bearer [REDACTED]"),
    // key=value and key: value pairs for sensitive keys
    (
        r"(?i)\b(client_secret|client_assertion|access_token|password|secret|token|key)(\s*[=:]\s*)[^\s&,;]+",
        "$1$2[REDACTED]",
    ),
    // Base64-looking strings (48+ chars of base64 characters)
    (r"[A-Za-z0-9+/]{48,}={0,2}", "[REDACTED_BASE64]"),
];

static PATTERNS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    REDACTIONS
        .iter()
        .filter_map(|(pattern, replacement)| {
            Regex::new(pattern).ok().map(|re| (re, *replacement))
        })
        .collect()
});

/// Sanitize error messages to remove potential secret values
pub fn sanitize_error(error: &str) -> String {
    let mut sanitized = error.to_string();

    for (re, replacement) in PATTERNS.iter() {
        sanitized = re.replace_all(&sanitized, *replacement).into_owned();
    }

    sanitized
}
