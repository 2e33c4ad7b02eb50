//! Token endpoint plumbing shared by the token provider and ambient credentials

use std::error::Error as StdError;
use std::time::Duration;

use rafs_reindex_core::AccessToken;
use serde::Deserialize;
use url::Url;

/// Upper bound for a single token request
pub const TOKEN_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub const GRANT_CLIENT_CREDENTIALS: &str = "client_credentials";
pub const JWT_BEARER_ASSERTION: &str = "urn:ietf:params:oauth:client-assertion-type:jwt-bearer";

/// Why a token request did not yield a token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenFailure {
    /// No usable answer from the endpoint
    Transport(String),
    /// The endpoint answered and refused
    Rejected(String),
}

impl TokenFailure {
    pub fn into_cause(self) -> String {
        match self {
            TokenFailure::Transport(cause) | TokenFailure::Rejected(cause) => cause,
        }
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<Seconds>,
}

/// Entra ID sends `expires_in` as a number, managed identity endpoints as a string
#[derive(Deserialize)]
#[serde(untagged)]
enum Seconds {
    Number(i64),
    Text(String),
}

impl Seconds {
    fn as_secs(&self) -> Option<i64> {
        match self {
            Seconds::Number(n) => Some(*n),
            Seconds::Text(s) => s.trim().parse().ok(),
        }
    }
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

/// `{authority}/{tenant}/oauth2/v2.0/token`, with the tenant path-encoded
pub fn token_endpoint(authority: &Url, tenant: &str) -> Result<Url, String> {
    let mut url = authority.clone();
    url.path_segments_mut()
        .map_err(|_| format!("authority '{}' cannot carry a path", authority))?
        .pop_if_empty()
        .extend([tenant, "oauth2", "v2.0", "token"]);
    Ok(url)
}

/// POST a form to a token endpoint and read the token out of the answer
pub async fn send_form(
    client: &reqwest::Client,
    endpoint: Url,
    form: &[(&str, &str)],
) -> Result<AccessToken, TokenFailure> {
    let response = client
        .post(endpoint)
        .form(form)
        .timeout(TOKEN_REQUEST_TIMEOUT)
        .send()
        .await
        .map_err(|e| TokenFailure::Transport(describe_transport(e)))?;

    read_token_response(response).await
}

/// Interpret a token endpoint response
///
/// 2xx must carry a non-empty `access_token`. Error bodies in the OAuth2
/// `{error, error_description}` shape become the failure cause. Only the
/// `error` code and the leading `AADSTSnnnn` code of the description are
/// kept: the description text echoes tenant and client ids.
pub async fn read_token_response(response: reqwest::Response) -> Result<AccessToken, TokenFailure> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| TokenFailure::Transport(describe_transport(e)))?;

    if status.is_success() {
        let parsed: TokenResponse = serde_json::from_str(&body)
            .map_err(|_| TokenFailure::Rejected("malformed token response".to_string()))?;

        if parsed.access_token.trim().is_empty() {
            return Err(TokenFailure::Rejected(
                "token endpoint returned an empty access token".to_string(),
            ));
        }

        let expires_in = parsed.expires_in.as_ref().and_then(Seconds::as_secs);
        return Ok(AccessToken::expiring_in(parsed.access_token, expires_in));
    }

    let cause = match serde_json::from_str::<ErrorResponse>(&body) {
        Ok(err) => match err.error_description.as_deref().and_then(service_code) {
            Some(code) => format!("{}: {}", err.error, code),
            None => err.error,
        },
        Err(_) => format!("token endpoint returned status {}", status.as_u16()),
    };

    if status.is_server_error() {
        Err(TokenFailure::Transport(cause))
    } else {
        Err(TokenFailure::Rejected(cause))
    }
}

/// The `AADSTSnnnn` code a description starts with, if any
fn service_code(description: &str) -> Option<&str> {
    let token = description.trim_start().split(':').next()?.trim_end();
    let digits = token.strip_prefix("AADSTS")?;
    (!digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())).then_some(token)
}

/// Render a reqwest error with its causes but without the request URL
pub fn describe_transport(err: reqwest::Error) -> String {
    let err = err.without_url();
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
