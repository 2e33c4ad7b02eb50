//! Job configuration types
//!
//! Every field has a default so a partial YAML file (or none at all) is
//! enough. The two endpoints have no sensible default and are checked by
//! [`JobConfig::validate`].

use crate::error::{Error, Result};
use crate::types::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Environment variable naming the secret store endpoint
pub const KEY_VAULT_URI_ENV: &str = "AZURE_KEY_VAULT_URI";

/// Environment variable naming the target API base URL
pub const TARGET_URI_ENV: &str = "RAFS_URI";

/// Values shorter than this are treated as unset
pub const MIN_ENDPOINT_LEN: usize = 3;

/// Complete job configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct JobConfig {
    /// Secret store endpoint, e.g. `https://my-vault.vault.azure.net`
    #[serde(default)]
    pub key_vault_uri: Option<String>,

    /// Outbound request settings
    #[serde(default)]
    pub target: TargetConfig,

    /// Retry policy for the outbound request
    #[serde(default)]
    pub retry: RetryPolicy,

    /// Store secret names holding the client identity
    #[serde(default)]
    pub secrets: SecretNamesConfig,

    /// Identity provider settings
    #[serde(default)]
    pub identity: IdentityConfig,
}

/// Outbound request settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TargetConfig {
    /// API base URL, e.g. `https://osdu.example.com`
    #[serde(default)]
    pub base_url: Option<String>,

    /// Path appended to the base URL
    #[serde(default = "default_path")]
    pub path: String,

    /// The one status code that counts as success
    #[serde(default = "default_expected_status")]
    pub expected_status: u16,

    /// Header carrying the data partition
    #[serde(default = "default_partition_header")]
    pub partition_header: String,

    /// Data partition id
    #[serde(default = "default_partition_id")]
    pub partition_id: String,

    /// Skip TLS certificate verification. Never enable outside test clusters.
    #[serde(default)]
    pub insecure_skip_verify: bool,

    /// Per-attempt timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            path: default_path(),
            expected_status: default_expected_status(),
            partition_header: default_partition_header(),
            partition_id: default_partition_id(),
            insecure_skip_verify: false,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl TargetConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_path() -> String {
    "api/rafs-ddms/dev/sa_records_index".to_string()
}
fn default_expected_status() -> u16 {
    200
}
fn default_partition_header() -> String {
    "data-partition-id".to_string()
}
fn default_partition_id() -> String {
    "opendes".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}

/// Names of the store secrets that make up the client identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SecretNamesConfig {
    #[serde(default = "default_tenant_secret")]
    pub tenant_id: String,

    #[serde(default = "default_client_id_secret")]
    pub client_id: String,

    #[serde(default = "default_client_secret_secret")]
    pub client_secret: String,

    /// App id of the target API; scopes default to `<audience>/.default`
    #[serde(default = "default_audience_secret")]
    pub audience: String,
}

impl Default for SecretNamesConfig {
    fn default() -> Self {
        Self {
            tenant_id: default_tenant_secret(),
            client_id: default_client_id_secret(),
            client_secret: default_client_secret_secret(),
            audience: default_audience_secret(),
        }
    }
}

impl SecretNamesConfig {
    /// Names in identity field order
    pub fn all(&self) -> [&str; 4] {
        [
            &self.tenant_id,
            &self.client_id,
            &self.client_secret,
            &self.audience,
        ]
    }
}

fn default_tenant_secret() -> String {
    "tenant-id".to_string()
}
fn default_client_id_secret() -> String {
    "app-dev-sp-username".to_string()
}
fn default_client_secret_secret() -> String {
    "app-dev-sp-password".to_string()
}
fn default_audience_secret() -> String {
    "aad-client-id".to_string()
}

/// Identity provider settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct IdentityConfig {
    /// OAuth2 authority host
    #[serde(default = "default_authority_host")]
    pub authority_host: String,

    /// Explicit scopes; empty means `<audience>/.default`
    #[serde(default)]
    pub scopes: Vec<String>,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            authority_host: default_authority_host(),
            scopes: Vec::new(),
        }
    }
}

fn default_authority_host() -> String {
    "https://login.microsoftonline.com".to_string()
}

impl JobConfig {
    /// Secret store endpoint, parsed
    pub fn key_vault_url(&self) -> Result<Url> {
        required_url("key-vault-uri", KEY_VAULT_URI_ENV, self.key_vault_uri.as_deref())
    }

    /// Target API base URL, parsed
    pub fn target_base_url(&self) -> Result<Url> {
        required_url(
            "target.base-url",
            TARGET_URI_ENV,
            self.target.base_url.as_deref(),
        )
    }

    /// Authority host, parsed
    pub fn authority_url(&self) -> Result<Url> {
        Url::parse(&self.identity.authority_host).map_err(|e| {
            Error::invalid_config(format!(
                "identity.authority-host '{}' is not a valid URL: {}",
                self.identity.authority_host, e
            ))
        })
    }

    /// Check everything the job needs before it touches the network
    pub fn validate(&self) -> Result<()> {
        self.key_vault_url()?;
        self.target_base_url()?;
        self.authority_url()?;

        if !(100..=599).contains(&self.target.expected_status) {
            return Err(Error::invalid_config(format!(
                "target.expected-status {} is not an HTTP status code",
                self.target.expected_status
            )));
        }

        if self.target.partition_header.trim().is_empty() {
            return Err(Error::invalid_config(
                "target.partition-header must not be empty",
            ));
        }

        if self.target.timeout_secs == 0 {
            return Err(Error::invalid_config("target.timeout-secs must be positive"));
        }

        for name in self.secrets.all() {
            if name.trim().is_empty() {
                return Err(Error::invalid_config("secret names must not be empty"));
            }
        }

        Ok(())
    }
}

fn required_url(name: &str, env: &str, value: Option<&str>) -> Result<Url> {
    let value = value
        .map(str::trim)
        .filter(|v| v.len() >= MIN_ENDPOINT_LEN)
        .ok_or_else(|| Error::missing_setting(name, env))?;

    let url = Url::parse(value).map_err(|e| {
        Error::invalid_config(format!("{} '{}' is not a valid URL: {}", name, value, e))
    })?;

    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(Error::invalid_config(format!(
            "{} must use http or https, got '{}'",
            name,
            url.scheme()
        )));
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> JobConfig {
        JobConfig {
            key_vault_uri: Some("https://kv.vault.azure.net".to_string()),
            target: TargetConfig {
                base_url: Some("https://osdu.example.com".to_string()),
                ..TargetConfig::default()
            },
            ..JobConfig::default()
        }
    }

    #[test]
    fn test_defaults_match_reindex_job() {
        let config = JobConfig::default();
        assert_eq!(config.target.path, "api/rafs-ddms/dev/sa_records_index");
        assert_eq!(config.target.expected_status, 200);
        assert_eq!(config.target.partition_header, "data-partition-id");
        assert_eq!(config.target.partition_id, "opendes");
        assert!(!config.target.insecure_skip_verify);
        assert_eq!(config.retry.max_attempts(), 5);
        assert_eq!(
            config.secrets.all(),
            [
                "tenant-id",
                "app-dev-sp-username",
                "app-dev-sp-password",
                "aad-client-id"
            ]
        );
    }

    #[test]
    fn test_validate_complete_config() {
        assert!(complete().validate().is_ok());
    }

    #[test]
    fn test_validate_missing_key_vault() {
        let config = JobConfig {
            key_vault_uri: None,
            ..complete()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, Error::MissingSetting { ref env, .. } if env == KEY_VAULT_URI_ENV));
    }

    #[test]
    fn test_validate_short_target_counts_as_missing() {
        let mut config = complete();
        config.target.base_url = Some("ab".to_string());
        let err = config.validate().unwrap_err();
        assert!(matches!(err, Error::MissingSetting { ref env, .. } if env == TARGET_URI_ENV));
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        let mut config = complete();
        config.target.base_url = Some("not a url".to_string());
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_non_http_scheme() {
        let config = JobConfig {
            key_vault_uri: Some("ftp://kv.example.com".to_string()),
            ..complete()
        };
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("http or https"));
    }

    #[test]
    fn test_validate_rejects_bad_status() {
        let mut config = complete();
        config.target.expected_status = 42;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_secret_name() {
        let mut config = complete();
        config.secrets.audience = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_yaml_round_trip_keeps_kebab_keys() {
        let yaml = serde_yaml_ng::to_string(&complete()).unwrap();
        assert!(yaml.contains("key-vault-uri"));
        assert!(yaml.contains("insecure-skip-verify: false"));
        assert!(yaml.contains("delay-ms: 4000"));
    }
}
