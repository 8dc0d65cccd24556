//! Login, logout and credential handling tests.
//!
//! This module tests the session lifecycle against a mock server:
//! - Username/password login and session key storage
//! - API token login with a bearer header
//! - Error mapping for rejected or malformed login responses
//! - Best-effort logout
//!
//! # Invariants
//! - The session key is sent as `Authorization: Splunk <key>` once held
//! - A failed login never replaces a held session key
//!
//! # What this does NOT handle
//! - Search requests (see search_tests.rs and export_tests.rs)

mod common;

use common::*;
use secrecy::SecretString;
use wiremock::matchers::{body_string_contains, header, method, path, path_regex, query_param};

#[tokio::test]
async fn test_login_with_credentials_stores_session_key() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/services/auth/login"))
        .and(body_string_contains("username=admin"))
        .and(body_string_contains("password=changeme"))
        .and(body_string_contains("output_mode=json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(load_fixture("auth/login_success.json")),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut client = session_client_for(&mock_server);
    assert!(!client.is_authenticated());

    client.authenticate().await.unwrap();
    assert!(client.is_authenticated());

    let requests = mock_server.received_requests().await.unwrap();
    assert!(
        requests[0].headers.get("authorization").is_none(),
        "password login must not carry an Authorization header"
    );
}

#[tokio::test]
async fn test_session_key_sent_on_later_requests() {
    let mock_server = MockServer::start().await;
    let client = authenticated_client_for(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/services/server/info"))
        .and(header(
            "Authorization",
            format!("Splunk {FIXTURE_SESSION_KEY}").as_str(),
        ))
        .and(query_param("output_mode", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "entry": [{"name": "server-info"}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let value = client
        .get(&Namespace::global(), "server/info", Params::new())
        .await
        .unwrap();
    assert_eq!(value["entry"][0]["name"], "server-info");
}

#[tokio::test]
async fn test_login_with_token_sends_bearer_header() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/services/auth/login"))
        .and(header("Authorization", "Bearer my-api-token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(load_fixture("auth/login_success.json")),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut client = token_client_for(&mock_server, "my-api-token");
    assert!(client.is_api_token_auth());
    client.authenticate().await.unwrap();
    assert!(client.is_authenticated());
}

#[tokio::test]
async fn test_token_used_as_bearer_before_login() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services/server/info"))
        .and(header("Authorization", "Bearer my-api-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = token_client_for(&mock_server, "my-api-token");
    client
        .get(&Namespace::global(), "server/info", Params::new())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_login_invalid_credentials() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/services/auth/login"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(load_fixture("auth/login_invalid_creds.json")),
        )
        .mount(&mock_server)
        .await;

    let mut client = session_client_for(&mock_server);
    let err = client.authenticate().await.unwrap_err();

    assert!(err.is_auth_error());
    assert_eq!(err.status(), Some(401));
    assert!(err.to_string().contains("Login failed; StatusCode 401"));
    assert!(!client.is_authenticated());
}

#[tokio::test]
async fn test_login_response_not_a_string_map() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/services/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "sessionKey": "abc",
            "nested": {"not": "a string"}
        })))
        .mount(&mock_server)
        .await;

    let mut client = session_client_for(&mock_server);
    let err = client.authenticate().await.unwrap_err();
    assert!(matches!(err, ClientError::InvalidResponse(_)));
    assert!(!client.is_authenticated());
}

#[tokio::test]
async fn test_login_response_without_session_key() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/services/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "message": "",
            "code": ""
        })))
        .mount(&mock_server)
        .await;

    let mut client = session_client_for(&mock_server);
    let err = client.authenticate().await.unwrap_err();
    assert!(matches!(err, ClientError::MissingSessionKey));
}

#[tokio::test]
async fn test_failed_login_keeps_previous_session_key() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/services/auth/login"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(load_fixture("auth/login_success.json")),
        )
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/services/auth/login"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let mut client = session_client_for(&mock_server);
    client.authenticate().await.unwrap();

    let err = client.authenticate().await.unwrap_err();
    assert_eq!(err.status(), Some(503));
    assert!(client.is_authenticated());
}

#[tokio::test]
async fn test_authenticate_without_credentials() {
    let mock_server = MockServer::start().await;

    let mut client = client_for(&mock_server);
    let err = client.authenticate().await.unwrap_err();
    assert!(matches!(err, ClientError::AuthNotConfigured));

    let requests = mock_server.received_requests().await.unwrap();
    assert!(requests.is_empty());
}

#[tokio::test]
async fn test_set_credentials_clears_session_key() {
    let mock_server = MockServer::start().await;
    let mut client = authenticated_client_for(&mock_server).await;
    assert!(client.is_authenticated());

    client.set_token(SecretString::new("other-token".to_string().into()));
    assert!(!client.is_authenticated());
    assert!(client.is_api_token_auth());

    client.set_credentials("admin", SecretString::new("changeme".to_string().into()));
    assert!(!client.is_api_token_auth());
}

#[tokio::test]
async fn test_deauthenticate_invalidates_session_on_server() {
    let mock_server = MockServer::start().await;
    let mut client = authenticated_client_for(&mock_server).await;

    Mock::given(method("DELETE"))
        .and(path(format!(
            "/services/authentication/httpauth-tokens/{FIXTURE_SESSION_KEY}"
        )))
        .and(header(
            "Authorization",
            format!("Splunk {FIXTURE_SESSION_KEY}").as_str(),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;

    client.deauthenticate().await;
    assert!(!client.is_authenticated());
}

#[tokio::test]
async fn test_deauthenticate_clears_key_when_server_refuses() {
    let mock_server = MockServer::start().await;
    let mut client = authenticated_client_for(&mock_server).await;

    Mock::given(method("DELETE"))
        .and(path_regex(r"^/services/authentication/httpauth-tokens/.+$"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&mock_server)
        .await;

    client.deauthenticate().await;
    assert!(!client.is_authenticated());

    // A second call has nothing to invalidate and sends nothing.
    let before = mock_server.received_requests().await.unwrap().len();
    client.deauthenticate().await;
    let after = mock_server.received_requests().await.unwrap().len();
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_requests_after_deauthenticate_are_unauthenticated() {
    let mock_server = MockServer::start().await;
    let mut client = authenticated_client_for(&mock_server).await;

    Mock::given(method("DELETE"))
        .and(path_regex(r"^/services/authentication/httpauth-tokens/.+$"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/services/server/info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&mock_server)
        .await;

    client.deauthenticate().await;
    client
        .get(&Namespace::global(), "server/info", Params::new())
        .await
        .unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    let last = requests.last().unwrap();
    assert_eq!(last.url.path(), "/services/server/info");
    assert!(last.headers.get("authorization").is_none());
}
