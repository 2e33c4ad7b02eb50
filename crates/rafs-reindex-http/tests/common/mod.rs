//! Mock target API helpers

#![allow(dead_code)]

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const REINDEX_PATH: &str = "/api/rafs-ddms/dev/sa_records_index";

/// Target that fails `fail_count` times with `fail_status`, then returns 200
pub async fn mock_flaky_target(server: &MockServer, fail_count: u64, fail_status: u16) {
    // First N requests fail
    Mock::given(method("GET"))
        .and(path(REINDEX_PATH))
        .respond_with(ResponseTemplate::new(fail_status))
        .up_to_n_times(fail_count)
        .mount(server)
        .await;

    // Subsequent requests succeed
    Mock::given(method("GET"))
        .and(path(REINDEX_PATH))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;
}

/// Target that always answers `status`
pub async fn mock_target_status(server: &MockServer, status: u16) {
    Mock::given(method("GET"))
        .and(path(REINDEX_PATH))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Number of requests the target has seen
pub async fn request_count(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .map(|requests| requests.len())
        .unwrap_or(0)
}
