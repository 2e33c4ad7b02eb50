//! Service principal identity used for the client-credentials grant

use std::fmt;

use rafs_reindex_core::SecureString;

use crate::error::IncompleteIdentity;

/// The four fields a client identity is assembled from
///
/// Declared in the order they are checked for completeness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentityField {
    TenantId,
    ClientId,
    ClientSecret,
    Audience,
}

impl IdentityField {
    pub const ALL: [IdentityField; 4] = [
        IdentityField::TenantId,
        IdentityField::ClientId,
        IdentityField::ClientSecret,
        IdentityField::Audience,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IdentityField::TenantId => "tenant-id",
            IdentityField::ClientId => "client-id",
            IdentityField::ClientSecret => "client-secret",
            IdentityField::Audience => "audience",
        }
    }
}

impl fmt::Display for IdentityField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A service principal able to request tokens for an audience
///
/// Every field is sourced from the secret store, so all of them are held as
/// `SecureString` and none of them is ever printed.
#[derive(Clone)]
pub struct ClientIdentity {
    tenant_id: SecureString,
    client_id: SecureString,
    client_secret: SecureString,
    audience: SecureString,
}

impl ClientIdentity {
    /// Assemble an identity, rejecting empty or whitespace-only fields
    pub fn new(
        tenant_id: impl Into<SecureString>,
        client_id: impl Into<SecureString>,
        client_secret: impl Into<SecureString>,
        audience: impl Into<SecureString>,
    ) -> Result<Self, IncompleteIdentity> {
        let identity = Self {
            tenant_id: tenant_id.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            audience: audience.into(),
        };

        if let Some(field) = identity.first_blank_field() {
            return Err(IncompleteIdentity { field });
        }

        Ok(identity)
    }

    fn first_blank_field(&self) -> Option<IdentityField> {
        IdentityField::ALL
            .into_iter()
            .find(|field| self.field(*field).is_blank())
    }

    fn field(&self, field: IdentityField) -> &SecureString {
        match field {
            IdentityField::TenantId => &self.tenant_id,
            IdentityField::ClientId => &self.client_id,
            IdentityField::ClientSecret => &self.client_secret,
            IdentityField::Audience => &self.audience,
        }
    }

    pub fn tenant_id(&self) -> &str {
        self.tenant_id.expose().trim()
    }

    pub fn client_id(&self) -> &str {
        self.client_id.expose().trim()
    }

    /// Raw client secret (use with caution)
    pub fn client_secret(&self) -> &str {
        self.client_secret.expose()
    }

    pub fn audience(&self) -> &str {
        self.audience.expose().trim()
    }

    /// Scope requested when the caller supplies none: `<audience>/.default`
    pub fn default_scope(&self) -> String {
        format!("{}/.default", self.audience().trim_end_matches('/'))
    }
}

impl fmt::Debug for ClientIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientIdentity")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret)
            .field("audience", &self.audience)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> ClientIdentity {
        ClientIdentity::new("tenant-1", "client-1", "s3cr3t-value", "api://rafs").unwrap()
    }

    #[test]
    fn test_accessors_trim_surrounding_whitespace() {
        let identity =
            ClientIdentity::new(" tenant-1 ", "client-1\n", "s3cr3t", "api://rafs ").unwrap();
        assert_eq!(identity.tenant_id(), "tenant-1");
        assert_eq!(identity.client_id(), "client-1");
        assert_eq!(identity.audience(), "api://rafs");
    }

    #[test]
    fn test_default_scope() {
        assert_eq!(identity().default_scope(), "api://rafs/.default");

        let trailing = ClientIdentity::new("t", "c", "s", "https://rafs.example/").unwrap();
        assert_eq!(trailing.default_scope(), "https://rafs.example/.default");
    }

    #[test]
    fn test_missing_fields_reported_in_order() {
        let err = ClientIdentity::new("", "", "", "").unwrap_err();
        assert_eq!(err.field, IdentityField::TenantId);

        let err = ClientIdentity::new("t", "c", "   ", "").unwrap_err();
        assert_eq!(err.field, IdentityField::ClientSecret);

        let err = ClientIdentity::new("t", "c", "s", "\t").unwrap_err();
        assert_eq!(err.field, IdentityField::Audience);
    }

    #[test]
    fn test_debug_redacts_every_field() {
        let debug_str = format!("{:?}", identity());
        for value in ["tenant-1", "client-1", "s3cr3t-value", "api://rafs"] {
            assert!(!debug_str.contains(value), "leaked {}", value);
        }
        assert!(debug_str.contains("REDACTED"));
    }

    #[test]
    fn test_field_names() {
        let names: Vec<_> = IdentityField::ALL.iter().map(|f| f.to_string()).collect();
        assert_eq!(
            names,
            vec!["tenant-id", "client-id", "client-secret", "audience"]
        );
    }
}
