//! Common test utilities for integration tests.
//!
//! Shared helpers and re-exports for tests that run the client against a
//! wiremock server.
//!
//! # Invariants
//! - Fixtures are loaded from the `fixtures/` directory relative to the crate root
//! - Clients built here point at the mock server over plain HTTP
//!
//! # What this does NOT handle
//! - Test-specific assertions or test logic

use secrecy::SecretString;

#[allow(unused_imports)]
pub use splunk_search::testing::{load_fixture, load_fixture_text};

// Re-export commonly used types for test convenience
#[allow(unused_imports)]
pub use splunk_search::{
    AuthStrategy, ClientError, ExportState, FieldValue, Namespace, Params, SearchOptions,
    SplunkClient,
};
#[allow(unused_imports)]
pub use wiremock::{Mock, MockServer, ResponseTemplate};

/// Session key served by `fixtures/auth/login_success.json`.
#[allow(dead_code)]
pub const FIXTURE_SESSION_KEY: &str = "test-session-key-12345678";

/// A client for `server` with no credentials configured.
#[allow(dead_code)]
pub fn client_for(server: &MockServer) -> SplunkClient {
    SplunkClient::builder()
        .base_url(server.uri())
        .build()
        .expect("Failed to build client")
}

/// A client for `server` configured for username/password login.
#[allow(dead_code)]
pub fn session_client_for(server: &MockServer) -> SplunkClient {
    SplunkClient::builder()
        .base_url(server.uri())
        .auth_strategy(AuthStrategy::SessionToken {
            username: "admin".to_string(),
            password: SecretString::new("changeme".to_string().into()),
        })
        .build()
        .expect("Failed to build client")
}

/// A client for `server` configured with an API token.
#[allow(dead_code)]
pub fn token_client_for(server: &MockServer, token: &str) -> SplunkClient {
    SplunkClient::builder()
        .base_url(server.uri())
        .auth_strategy(AuthStrategy::ApiToken {
            token: SecretString::new(token.to_string().into()),
        })
        .build()
        .expect("Failed to build client")
}

/// Mount the successful login fixture on `server`.
#[allow(dead_code)]
pub async fn mount_login(server: &MockServer) {
    use wiremock::matchers::{method, path};

    Mock::given(method("POST"))
        .and(path("/services/auth/login"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(load_fixture("auth/login_success.json")),
        )
        .mount(server)
        .await;
}

/// A session client that has already logged in against `server`.
#[allow(dead_code)]
pub async fn authenticated_client_for(server: &MockServer) -> SplunkClient {
    mount_login(server).await;
    let mut client = session_client_for(server);
    client.authenticate().await.expect("login should succeed");
    client
}
