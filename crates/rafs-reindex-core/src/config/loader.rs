//! Layered configuration loader
//!
//! Loads configuration from multiple sources with the following precedence (low to high):
//! 1. Built-in defaults
//! 2. YAML config file (`--config` flag or `REINDEX_CONFIG`)
//! 3. Environment variables (`AZURE_KEY_VAULT_URI`, `RAFS_URI`, `REINDEX_*`)
//! 4. CLI flags (handled by caller)

use crate::error::{Error, Result};
use crate::types::{JobConfig, KEY_VAULT_URI_ENV, MIN_ENDPOINT_LEN, TARGET_URI_ENV};
use camino::{Utf8Path, Utf8PathBuf};
use std::env;
use std::fs;
use std::time::Duration;
use tracing::debug;

/// Environment variable naming an optional config file
pub const CONFIG_PATH_ENV: &str = "REINDEX_CONFIG";

/// Configuration loader
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    /// Explicit config file; must exist when set
    config_file: Option<Utf8PathBuf>,
}

impl ConfigLoader {
    /// Loader that only consults `REINDEX_CONFIG` for a file
    pub fn new() -> Self {
        Self::default()
    }

    /// Loader with an explicit config file
    pub fn with_file(path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            config_file: Some(path.into()),
        }
    }

    /// Load configuration from the process environment
    pub fn load(&self) -> Result<JobConfig> {
        self.load_with(|key| env::var(key).ok())
    }

    /// Load configuration using `lookup` in place of the process environment
    pub fn load_with<F>(&self, lookup: F) -> Result<JobConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file = self
            .config_file
            .clone()
            .or_else(|| lookup(CONFIG_PATH_ENV).map(Utf8PathBuf::from));

        let config = match file {
            Some(path) => self.load_yaml_file(&path)?,
            None => JobConfig::default(),
        };

        apply_env_overrides(config, lookup)
    }

    /// Load a YAML file and parse it
    fn load_yaml_file(&self, path: &Utf8Path) -> Result<JobConfig> {
        if !path.exists() {
            return Err(Error::config_not_found(path.as_str()));
        }

        debug!("Loading configuration from {}", path);
        let content = fs::read_to_string(path)?;
        let config: JobConfig = serde_yaml_ng::from_str(&content)
            .map_err(|e| Error::invalid_config(format!("Failed to parse {}: {}", path, e)))?;
        Ok(config)
    }

    /// Get the explicit config file, if any
    pub fn config_file(&self) -> Option<&Utf8Path> {
        self.config_file.as_deref()
    }
}

/// Apply environment variable overrides to a job config
fn apply_env_overrides<F>(mut config: JobConfig, lookup: F) -> Result<JobConfig>
where
    F: Fn(&str) -> Option<String>,
{
    // Endpoints: anything shorter than MIN_ENDPOINT_LEN is treated as unset
    if let Some(val) = lookup(KEY_VAULT_URI_ENV).filter(|v| v.trim().len() >= MIN_ENDPOINT_LEN) {
        config.key_vault_uri = Some(val.trim().to_string());
    }

    if let Some(val) = lookup(TARGET_URI_ENV).filter(|v| v.trim().len() >= MIN_ENDPOINT_LEN) {
        config.target.base_url = Some(val.trim().to_string());
    }

    if let Some(val) = lookup("AZURE_AUTHORITY_HOST") {
        config.identity.authority_host = val;
    }

    // Request
    if let Some(val) = lookup("REINDEX_ENDPOINT_PATH") {
        config.target.path = val;
    }

    if let Some(val) = lookup("REINDEX_PARTITION_ID") {
        config.target.partition_id = val;
    }

    if let Some(val) = lookup("REINDEX_EXPECTED_STATUS") {
        config.target.expected_status = val.parse().map_err(|_| {
            Error::invalid_config("REINDEX_EXPECTED_STATUS must be a valid status code")
        })?;
    }

    if let Some(val) = lookup("REINDEX_TIMEOUT_SECS") {
        config.target.timeout_secs = val
            .parse()
            .map_err(|_| Error::invalid_config("REINDEX_TIMEOUT_SECS must be a valid number"))?;
    }

    if let Some(val) = lookup("REINDEX_INSECURE_SKIP_VERIFY") {
        config.target.insecure_skip_verify = parse_flag(&val).ok_or_else(|| {
            Error::invalid_config("REINDEX_INSECURE_SKIP_VERIFY must be true or false")
        })?;
    }

    // Retry
    if let Some(val) = lookup("REINDEX_MAX_ATTEMPTS") {
        let attempts = val
            .parse()
            .map_err(|_| Error::invalid_config("REINDEX_MAX_ATTEMPTS must be a valid number"))?;
        config.retry = config.retry.with_max_attempts(attempts)?;
    }

    if let Some(val) = lookup("REINDEX_RETRY_DELAY_MS") {
        let delay_ms: u64 = val
            .parse()
            .map_err(|_| Error::invalid_config("REINDEX_RETRY_DELAY_MS must be a valid number"))?;
        config.retry = config.retry.with_delay(Duration::from_millis(delay_ms));
    }

    Ok(config)
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn write_config(dir: &TempDir, content: &str) -> Utf8PathBuf {
        let path = Utf8PathBuf::from_path_buf(dir.path().join("reindex.yaml"))
            .expect("Invalid UTF-8 path");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_defaults_without_file_or_env() {
        let config = ConfigLoader::new().load_with(env_from(&[])).unwrap();
        assert_eq!(config, JobConfig::default());
    }

    #[test]
    fn test_required_endpoints_from_env() {
        let config = ConfigLoader::new()
            .load_with(env_from(&[
                ("AZURE_KEY_VAULT_URI", "https://kv.vault.azure.net"),
                ("RAFS_URI", "https://osdu.example.com"),
            ]))
            .unwrap();

        assert_eq!(
            config.key_vault_uri.as_deref(),
            Some("https://kv.vault.azure.net")
        );
        assert_eq!(
            config.target.base_url.as_deref(),
            Some("https://osdu.example.com")
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_short_env_endpoint_is_ignored() {
        let config = ConfigLoader::new()
            .load_with(env_from(&[("RAFS_URI", "x")]))
            .unwrap();
        assert!(config.target.base_url.is_none());
    }

    #[test]
    fn test_file_then_env_precedence() {
        let temp = TempDir::new().unwrap();
        let path = write_config(
            &temp,
            r#"
key-vault-uri: https://from-file.vault.azure.net
target:
  base-url: https://file.example.com
  partition-id: tenant1
retry:
  max-attempts: 2
  delay-ms: 100
"#,
        );

        let config = ConfigLoader::with_file(path)
            .load_with(env_from(&[
                ("RAFS_URI", "https://env.example.com"),
                ("REINDEX_RETRY_DELAY_MS", "250"),
            ]))
            .unwrap();

        assert_eq!(
            config.key_vault_uri.as_deref(),
            Some("https://from-file.vault.azure.net")
        );
        assert_eq!(
            config.target.base_url.as_deref(),
            Some("https://env.example.com")
        );
        assert_eq!(config.target.partition_id, "tenant1");
        assert_eq!(config.target.path, "api/rafs-ddms/dev/sa_records_index");
        assert_eq!(config.retry.max_attempts(), 2);
        assert_eq!(config.retry.delay(), Duration::from_millis(250));
    }

    #[test]
    fn test_config_path_from_env() {
        let temp = TempDir::new().unwrap();
        let path = write_config(&temp, "target:\n  expected-status: 202\n");

        let config = ConfigLoader::new()
            .load_with(env_from(&[("REINDEX_CONFIG", path.as_str())]))
            .unwrap();
        assert_eq!(config.target.expected_status, 202);
    }

    #[test]
    fn test_missing_explicit_file() {
        let result = ConfigLoader::with_file("/nonexistent/reindex.yaml").load_with(env_from(&[]));
        assert!(matches!(result, Err(Error::ConfigNotFound { .. })));
    }

    #[test]
    fn test_invalid_yaml() {
        let temp = TempDir::new().unwrap();
        let path = write_config(&temp, "retry: [not, a, map]");
        let result = ConfigLoader::with_file(path).load_with(env_from(&[]));
        assert!(matches!(result, Err(Error::InvalidConfig { .. })));
    }

    #[test]
    fn test_invalid_numeric_override() {
        let result =
            ConfigLoader::new().load_with(env_from(&[("REINDEX_MAX_ATTEMPTS", "many")]));
        let err = result.unwrap_err().to_string();
        assert!(err.contains("REINDEX_MAX_ATTEMPTS"));
    }

    #[test]
    fn test_zero_attempts_override_rejected() {
        let result = ConfigLoader::new().load_with(env_from(&[("REINDEX_MAX_ATTEMPTS", "0")]));
        assert!(matches!(result, Err(Error::InvalidRetryPolicy { .. })));
    }

    #[test]
    fn test_insecure_flag_parsing() {
        let config = ConfigLoader::new()
            .load_with(env_from(&[("REINDEX_INSECURE_SKIP_VERIFY", "TRUE")]))
            .unwrap();
        assert!(config.target.insecure_skip_verify);

        let result =
            ConfigLoader::new().load_with(env_from(&[("REINDEX_INSECURE_SKIP_VERIFY", "maybe")]));
        assert!(result.is_err());
    }

    #[test]
    #[serial]
    fn test_load_from_process_env() {
        env::set_var("AZURE_KEY_VAULT_URI", "https://proc.vault.azure.net");
        env::set_var("REINDEX_PARTITION_ID", "proc-partition");

        let config = ConfigLoader::new().load().unwrap();
        assert_eq!(
            config.key_vault_uri.as_deref(),
            Some("https://proc.vault.azure.net")
        );
        assert_eq!(config.target.partition_id, "proc-partition");

        env::remove_var("AZURE_KEY_VAULT_URI");
        env::remove_var("REINDEX_PARTITION_ID");
    }
}
