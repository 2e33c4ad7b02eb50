//! Description of the one outbound request a run makes

use std::time::Duration;

use rafs_reindex_core::JobConfig;
use reqwest::header::{HeaderName, HeaderValue};
use reqwest::StatusCode;
use url::Url;

use crate::error::SpecError;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Target, fixed headers and success criterion of the outbound GET
#[derive(Debug, Clone)]
pub struct RequestSpec {
    url: Url,
    headers: Vec<(HeaderName, HeaderValue)>,
    expected_status: StatusCode,
    timeout: Duration,
    insecure_skip_verify: bool,
}

impl RequestSpec {
    pub fn new(url: Url, expected_status: u16) -> Result<Self, SpecError> {
        let expected_status =
            StatusCode::from_u16(expected_status).map_err(|_| SpecError::InvalidStatus(expected_status))?;

        Ok(Self {
            url,
            headers: Vec::new(),
            expected_status,
            timeout: DEFAULT_TIMEOUT,
            insecure_skip_verify: false,
        })
    }

    /// Build from the `target` section of the job configuration
    pub fn from_config(config: &JobConfig) -> Result<Self, SpecError> {
        let target = &config.target;
        let url = join_path(&config.target_base_url()?, &target.path);

        Ok(Self::new(url, target.expected_status)?
            .with_header(&target.partition_header, &target.partition_id)?
            .with_timeout(target.timeout())
            .with_insecure_skip_verify(target.insecure_skip_verify))
    }

    /// Add a fixed header sent on every attempt
    pub fn with_header(mut self, name: &str, value: &str) -> Result<Self, SpecError> {
        let header_name = HeaderName::from_bytes(name.trim().as_bytes()).map_err(|e| {
            SpecError::InvalidHeader {
                name: name.to_string(),
                message: e.to_string(),
            }
        })?;
        let header_value = HeaderValue::from_str(value).map_err(|e| SpecError::InvalidHeader {
            name: name.to_string(),
            message: e.to_string(),
        })?;

        self.headers.push((header_name, header_value));
        Ok(self)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_insecure_skip_verify(mut self, insecure: bool) -> Self {
        self.insecure_skip_verify = insecure;
        self
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn headers(&self) -> &[(HeaderName, HeaderValue)] {
        &self.headers
    }

    pub fn expected_status(&self) -> StatusCode {
        self.expected_status
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn insecure_skip_verify(&self) -> bool {
        self.insecure_skip_verify
    }
}

/// Join `path` onto `base` with exactly one `/` between them
pub fn join_path(base: &Url, path: &str) -> Url {
    let mut url = base.clone();
    let joined = format!(
        "{}/{}",
        base.path().trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    url.set_path(&joined);
    url
}
