//! Retrying request executor
//!
//! Each attempt builds a fresh HTTP client, sends the GET and compares the
//! response status to the single expected code. Attempts are sequential and
//! separated by the policy's fixed delay.

use std::error::Error;

use rafs_reindex_core::retry::{
    ClosurePredicate, OnRetry, RetryExecutorBuilder, RetryObserver, TracingObserver,
};
use rafs_reindex_core::{AccessToken, RetryPolicy};
use reqwest::header::{HeaderValue, ACCEPT, AUTHORIZATION};
use tracing::{debug, info, warn};

use crate::error::RequestError;
use crate::outcome::RequestOutcome;
use crate::request::RequestSpec;

/// Executes one `RequestSpec` under a `RetryPolicy`
pub struct RetryingRequestExecutor<O = TracingObserver> {
    spec: RequestSpec,
    policy: RetryPolicy,
    observer: O,
}

impl RetryingRequestExecutor<TracingObserver> {
    pub fn new(spec: RequestSpec, policy: RetryPolicy) -> Self {
        Self {
            spec,
            policy,
            observer: TracingObserver::new("reindex request"),
        }
    }
}

impl<O: RetryObserver> RetryingRequestExecutor<O> {
    /// Replace the retry observer
    pub fn with_observer<O2: RetryObserver>(self, observer: O2) -> RetryingRequestExecutor<O2> {
        RetryingRequestExecutor {
            spec: self.spec,
            policy: self.policy,
            observer,
        }
    }

    /// Also call `callback(attempt, error)` after every failed attempt,
    /// including the last one
    pub fn on_retry<F>(self, callback: F) -> RetryingRequestExecutor<(O, OnRetry<F>)>
    where
        F: Fn(u32, &dyn Error) + Send + Sync,
    {
        let observer = (self.observer, OnRetry::new(callback));
        RetryingRequestExecutor {
            spec: self.spec,
            policy: self.policy,
            observer,
        }
    }

    pub fn spec(&self) -> &RequestSpec {
        &self.spec
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Run the request to a terminal outcome
    ///
    /// The token is consumed; it is not usable after the run.
    pub async fn execute(self, token: AccessToken) -> RequestOutcome {
        let Self {
            spec,
            policy,
            observer,
        } = self;

        if spec.insecure_skip_verify() {
            warn!(
                host = spec.url().host_str().unwrap_or_default(),
                "TLS certificate verification is disabled for the target request"
            );
        }

        info!("GET {}", spec.url());

        let executor = RetryExecutorBuilder::new()
            .with_policy(policy)
            .with_predicate(ClosurePredicate::new(RequestError::is_retryable))
            .with_observer(observer)
            .build();

        let spec = &spec;
        let token = &token;
        let result = executor
            .execute(move |attempt| send_once(spec, token, attempt))
            .await;

        match result {
            Ok(status) => {
                info!(status, "Reindex request succeeded");
                RequestOutcome::Success { status }
            }
            Err(err) => {
                let attempts = err.attempts();
                let last_error = err.into_source();
                debug!(attempts, status = ?last_error.status(), "Reindex request gave up");
                RequestOutcome::Failure {
                    attempts,
                    last_error,
                }
            }
        }
    }
}

fn build_client(spec: &RequestSpec) -> Result<reqwest::Client, RequestError> {
    reqwest::Client::builder()
        .timeout(spec.timeout())
        .danger_accept_invalid_certs(spec.insecure_skip_verify())
        .build()
        .map_err(|e| RequestError::client(format!("failed to create HTTP client: {}", e)))
}

async fn send_once(spec: &RequestSpec, token: &AccessToken, attempt: u32) -> Result<u16, RequestError> {
    let client = build_client(spec)?;

    let mut authorization = HeaderValue::from_str(&token.bearer_header())
        .map_err(|_| RequestError::client("access token is not a valid header value"))?;
    authorization.set_sensitive(true);

    let mut request = client
        .get(spec.url().clone())
        .header(AUTHORIZATION, authorization)
        .header(ACCEPT, "application/json");
    for (name, value) in spec.headers() {
        request = request.header(name.clone(), value.clone());
    }

    let response = request.send().await.map_err(RequestError::from_reqwest)?;
    let status = response.status();
    info!(attempt, status = status.as_u16(), "Response code: {}", status.as_u16());

    // Only the status matters; the body is discarded unread.
    drop(response);

    if status == spec.expected_status() {
        Ok(status.as_u16())
    } else {
        Err(RequestError::UnexpectedStatus {
            expected: spec.expected_status().as_u16(),
            actual: status.as_u16(),
        })
    }
}
