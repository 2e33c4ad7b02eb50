//! Secret names, values and references

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;

use rafs_reindex_core::SecureString;
use url::Url;

use crate::error::{Result, SecretError};

const MAX_NAME_LEN: usize = 127;

/// A validated store secret name
///
/// Key Vault names are 1-127 characters of ASCII letters, digits and `-`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SecretName(String);

impl SecretName {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();

        if name.is_empty() {
            return Err(SecretError::invalid_name(name, "name is empty"));
        }
        if name.len() > MAX_NAME_LEN {
            return Err(SecretError::invalid_name(
                name,
                format!("name is longer than {} characters", MAX_NAME_LEN),
            ));
        }
        if let Some(c) = name
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-'))
        {
            return Err(SecretError::invalid_name(
                name.clone(),
                format!("character {:?} is not allowed", c),
            ));
        }

        Ok(Self(name))
    }

    /// For names known valid at compile time
    pub(crate) fn from_static(name: &'static str) -> Self {
        debug_assert!(Self::new(name).is_ok(), "invalid secret name {name}");
        Self(name.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SecretName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for SecretName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for SecretName {
    type Error = SecretError;

    fn try_from(value: &str) -> Result<Self> {
        Self::new(value)
    }
}

/// A secret value as read from the store
///
/// Zeroed on drop; `Debug` and `Display` never show the content.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretValue(SecureString);

impl SecretValue {
    pub fn new(value: impl Into<SecureString>) -> Self {
        Self(value.into())
    }

    /// Raw value (use with caution)
    pub fn expose(&self) -> &str {
        self.0.expose()
    }

    pub fn is_blank(&self) -> bool {
        self.0.is_blank()
    }
}

impl fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretValue({:?})", self.0)
    }
}

impl fmt::Display for SecretValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Identifies one secret in one store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretReference {
    store: Url,
    name: SecretName,
}

impl SecretReference {
    pub fn new(store: Url, name: SecretName) -> Self {
        Self { store, name }
    }

    pub fn store(&self) -> &Url {
        &self.store
    }

    pub fn name(&self) -> &SecretName {
        &self.name
    }

    /// `{store}/secrets/{name}` (latest version)
    pub fn url(&self) -> Result<Url> {
        let mut url = self.store.clone();
        url.set_query(None);
        url.path_segments_mut()
            .map_err(|_| {
                SecretError::unreachable(self.store.as_str(), "store endpoint cannot carry a path")
            })?
            .pop_if_empty()
            .extend(["secrets", self.name.as_str()]);
        Ok(url)
    }
}

/// Secrets resolved in one batch, keyed by name
#[derive(Debug, Default)]
pub struct ResolvedSecrets {
    values: HashMap<SecretName, SecretValue>,
}

impl ResolvedSecrets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: SecretName, value: SecretValue) {
        self.values.insert(name, value);
    }

    pub fn get(&self, name: &str) -> Option<&SecretValue> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Resolved names, sorted
    pub fn names(&self) -> Vec<&SecretName> {
        let mut names: Vec<_> = self.values.keys().collect();
        names.sort();
        names
    }
}

impl FromIterator<(SecretName, SecretValue)> for ResolvedSecrets {
    fn from_iter<I: IntoIterator<Item = (SecretName, SecretValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
