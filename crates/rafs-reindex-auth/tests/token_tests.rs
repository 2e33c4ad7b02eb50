//! Token acquisition against a mock identity platform

use rafs_reindex_auth::credential::{
    CredentialProvider, EnvironmentCredential, ManagedIdentityCredential,
    WorkloadIdentityCredential,
};
use rafs_reindex_auth::{
    AuthError, ClientIdentity, CredentialError, DefaultCredentialChain, EntraTokenProvider,
    TokenAcquirer,
};
use serial_test::serial;
use std::env;
use url::Url;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TENANT: &str = "tenant-1";
const TOKEN_PATH: &str = "/tenant-1/oauth2/v2.0/token";

fn identity() -> ClientIdentity {
    ClientIdentity::new(TENANT, "client-1", "sp-password", "api://rafs").unwrap()
}

fn authority(server: &MockServer) -> Url {
    Url::parse(&server.uri()).unwrap()
}

async fn mock_token(server: &MockServer, token: &str) {
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "token_type": "Bearer",
            "expires_in": 3599,
            "access_token": token,
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_client_credentials_grant() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(body_string_contains("grant_type=client_credentials"))
        .and(body_string_contains("client_id=client-1"))
        .and(body_string_contains("client_secret=sp-password"))
        .and(body_string_contains("scope=api%3A%2F%2Frafs%2F.default"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "token_type": "Bearer",
            "expires_in": 3599,
            "access_token": "service-token",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let acquirer = TokenAcquirer::new(EntraTokenProvider::new(authority(&server)));
    let token = acquirer.acquire(identity(), &[]).await.unwrap();

    assert_eq!(token.secret(), "service-token");
    assert!(token.expires_at().is_some());
    assert!(!token.is_expired());
}

#[tokio::test]
async fn test_rejected_credentials() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": "invalid_client",
            "error_description": "AADSTS7000215: Invalid client secret provided.\r\nTrace ID: abc",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let acquirer = TokenAcquirer::new(EntraTokenProvider::new(authority(&server)));
    let err = acquirer.acquire(identity(), &[]).await.unwrap_err();

    match err {
        AuthError::AuthenticationFailed { cause } => {
            assert_eq!(cause, "invalid_client: AADSTS7000215");
            assert!(!cause.contains("sp-password"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_huge_expires_in_is_accepted_without_expiry() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "expires_in": i64::MAX,
            "access_token": "long-lived-token",
        })))
        .mount(&server)
        .await;

    let acquirer = TokenAcquirer::new(EntraTokenProvider::new(authority(&server)));
    let token = acquirer.acquire(identity(), &[]).await.unwrap();

    assert_eq!(token.secret(), "long-lived-token");
    assert!(token.expires_at().is_none());
}

#[tokio::test]
async fn test_empty_access_token_is_a_failure() {
    let server = MockServer::start().await;
    mock_token(&server, "").await;

    let acquirer = TokenAcquirer::new(EntraTokenProvider::new(authority(&server)));
    let err = acquirer.acquire(identity(), &[]).await.unwrap_err();
    assert!(matches!(err, AuthError::AuthenticationFailed { .. }));
}

#[tokio::test]
async fn test_non_json_error_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_string("<html>bad request</html>"))
        .mount(&server)
        .await;

    let acquirer = TokenAcquirer::new(EntraTokenProvider::new(authority(&server)));
    let err = acquirer.acquire(identity(), &[]).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Authentication failed: token endpoint returned status 400"
    );
}

#[tokio::test]
async fn test_unreachable_authority() {
    let server = MockServer::start().await;
    let authority = authority(&server);
    drop(server);

    let acquirer = TokenAcquirer::new(EntraTokenProvider::new(authority));
    let err = acquirer.acquire(identity(), &[]).await.unwrap_err();
    assert!(matches!(err, AuthError::AuthenticationFailed { .. }));
    assert!(!err.to_string().contains(TENANT));
}

#[tokio::test]
async fn test_environment_credential() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(body_string_contains("client_id=job-client"))
        .and(body_string_contains(
            "scope=https%3A%2F%2Fvault.azure.net%2F.default",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "expires_in": 3599,
            "access_token": "vault-token",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let credential =
        EnvironmentCredential::new(TENANT, "job-client", "job-secret", authority(&server));
    let token = credential
        .get_token(&["https://vault.azure.net/.default"])
        .await
        .unwrap();
    assert_eq!(token.secret(), "vault-token");
}

#[tokio::test]
async fn test_environment_credential_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": "unauthorized_client",
        })))
        .mount(&server)
        .await;

    let credential = EnvironmentCredential::new(TENANT, "c", "s", authority(&server));
    let err = credential.get_token(&["scope"]).await.unwrap_err();
    assert!(matches!(err, CredentialError::Rejected { .. }));
    assert!(err.to_string().contains("unauthorized_client"));
}

#[tokio::test]
async fn test_workload_identity_sends_assertion() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let token_file = dir.path().join("azure-identity-token");
    std::fs::write(&token_file, "federated.jwt.value\n").unwrap();

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(body_string_contains("client_assertion=federated.jwt.value"))
        .and(body_string_contains(
            "client_assertion_type=urn%3Aietf%3Aparams%3Aoauth%3Aclient-assertion-type%3Ajwt-bearer",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "expires_in": 3599,
            "access_token": "federated-token",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let credential =
        WorkloadIdentityCredential::new(TENANT, "job-client", token_file, authority(&server));
    let token = credential.get_token(&["scope"]).await.unwrap();
    assert_eq!(token.secret(), "federated-token");
}

#[tokio::test]
async fn test_managed_identity_imds() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/metadata/identity/oauth2/token"))
        .and(header("Metadata", "true"))
        .and(query_param("api-version", "2018-02-01"))
        .and(query_param("resource", "https://vault.azure.net"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "imds-token",
            "expires_in": "86399",
            "token_type": "Bearer",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let endpoint = Url::parse(&format!("{}/metadata/identity/oauth2/token", server.uri())).unwrap();
    let credential = ManagedIdentityCredential::imds(endpoint, None);
    let token = credential
        .get_token(&["https://vault.azure.net/.default"])
        .await
        .unwrap();
    assert_eq!(token.secret(), "imds-token");
    assert!(token.expires_at().is_some());
}

#[tokio::test]
async fn test_managed_identity_app_service() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/msi/token"))
        .and(header("X-IDENTITY-HEADER", "identity-header"))
        .and(query_param("api-version", "2019-08-01"))
        .and(query_param("client_id", "user-assigned"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "app-service-token",
            "expires_in": "3600",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let endpoint = Url::parse(&format!("{}/msi/token", server.uri())).unwrap();
    let credential = ManagedIdentityCredential::app_service(
        endpoint,
        "identity-header",
        Some("user-assigned".to_string()),
    );
    let token = credential.get_token(&["api://rafs/.default"]).await.unwrap();
    assert_eq!(token.secret(), "app-service-token");
}

#[tokio::test]
async fn test_managed_identity_without_assigned_identity_is_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": "invalid_request",
            "error_description": "Identity not found",
        })))
        .mount(&server)
        .await;

    let endpoint = Url::parse(&format!("{}/metadata/identity/oauth2/token", server.uri())).unwrap();
    let credential = ManagedIdentityCredential::imds(endpoint, None);
    let err = credential.get_token(&["scope/.default"]).await.unwrap_err();
    assert!(err.is_fallthrough());
    assert!(err.to_string().contains("invalid_request"));
}

#[tokio::test]
#[serial]
async fn test_default_chain_reads_process_environment() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/env-tenant/oauth2/v2.0/token"))
        .and(body_string_contains("client_id=env-client"))
        .and(body_string_contains("client_secret=env-secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "expires_in": 3599,
            "access_token": "env-vault-token",
        })))
        .expect(1)
        .mount(&server)
        .await;

    env::set_var("AZURE_TENANT_ID", "env-tenant");
    env::set_var("AZURE_CLIENT_ID", "env-client");
    env::set_var("AZURE_CLIENT_SECRET", "env-secret");
    env::remove_var("AZURE_FEDERATED_TOKEN_FILE");

    let chain = DefaultCredentialChain::from_env(&authority(&server));
    let result = chain.get_token(&["https://vault.azure.net/.default"]).await;

    env::remove_var("AZURE_TENANT_ID");
    env::remove_var("AZURE_CLIENT_ID");
    env::remove_var("AZURE_CLIENT_SECRET");

    assert_eq!(chain.member_names()[0], "environment");
    assert_eq!(result.unwrap().secret(), "env-vault-token");
}
