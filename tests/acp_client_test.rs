//! ACP client integration tests using wiremock
//!
//! Verifies the request framing of each authorization-server call in
//! `src/acp/client.rs` and how each failure maps onto the error taxonomy:
//!
//! - token exchange: Basic auth, form body, `access_token` extraction
//! - scope grant retrieval: bearer auth, `login_state` query, redirect URI
//! - decision submission: JSON bodies for accept and reject, `redirect_to`

mod common;

use serde_json::json;
use wiremock::matchers::{body_json, body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{test_config, TEST_BASIC_AUTH};
use consent_page::acp::{AcpClient, AuthorizationServer, BearerToken, Decision};
use consent_page::ConsentError;

const TOKEN_PATH: &str = "/test-tenant/system/oauth2/token";
const GRANT_PATH: &str = "/api/system/test-tenant/scope-grants/L1";

fn make_client(server: &MockServer) -> AcpClient {
    AcpClient::new(&test_config(&server.uri()).authorization_server)
        .expect("client must build from a valid config")
}

fn token() -> BearerToken {
    BearerToken::new("T1")
}

// ---------------------------------------------------------------------------
// Token exchange
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_token_exchange_sends_client_credentials() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(header("authorization", TEST_BASIC_AUTH))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string(
            "grant_type=client_credentials&scope=manage_scope_grants",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "T1",
            "token_type": "bearer",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(&server)
        .await;

    let token = make_client(&server)
        .fetch_service_token()
        .await
        .expect("token exchange must succeed");
    assert_eq!(token.as_str(), "T1");
}

#[tokio::test]
async fn test_token_exchange_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = make_client(&server).fetch_service_token().await.unwrap_err();
    match err {
        ConsentError::TokenExchangeFailed(cause) => {
            assert!(cause.contains("500"), "cause should carry status: {cause}");
            assert!(cause.contains("boom"), "cause should carry body: {cause}");
        }
        other => panic!("expected TokenExchangeFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn test_token_exchange_missing_access_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token_type": "bearer"})))
        .mount(&server)
        .await;

    let err = make_client(&server).fetch_service_token().await.unwrap_err();
    assert!(matches!(err, ConsentError::TokenExchangeFailed(_)));
}

#[tokio::test]
async fn test_token_exchange_network_failure() {
    let server = MockServer::start().await;
    let client = make_client(&server);
    drop(server);

    let err = client.fetch_service_token().await.unwrap_err();
    assert!(matches!(err, ConsentError::TokenExchangeFailed(_)));
}

// ---------------------------------------------------------------------------
// Scope grant retrieval
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_scope_grant_request_is_fetched_with_bearer_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(GRANT_PATH))
        .and(query_param("login_state", "S1"))
        .and(header("authorization", "Bearer T1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "requested_scopes": ["payments:read", "profile:read"],
            "request_query_params": {"redirect_uri": ["https://cb", "https://other"]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = make_client(&server)
        .fetch_scope_grant_request("L1", "S1", &token())
        .await
        .expect("scope grant fetch must succeed");

    let names: Vec<&str> = request
        .requested_scopes
        .iter()
        .map(|s| s.name.as_str())
        .collect();
    assert_eq!(names, vec!["payments:read", "profile:read"]);
    assert_eq!(request.redirect_uri, "https://cb");
}

#[tokio::test]
async fn test_scope_grant_empty_redirect_uri_list() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(GRANT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "requested_scopes": ["openid"],
            "request_query_params": {"redirect_uri": []}
        })))
        .mount(&server)
        .await;

    let err = make_client(&server)
        .fetch_scope_grant_request("L1", "S1", &token())
        .await
        .unwrap_err();
    assert!(matches!(err, ConsentError::RedirectUriMissing));
}

#[tokio::test]
async fn test_scope_grant_malformed_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(GRANT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"unexpected": true})))
        .mount(&server)
        .await;

    let err = make_client(&server)
        .fetch_scope_grant_request("L1", "S1", &token())
        .await
        .unwrap_err();
    assert!(matches!(err, ConsentError::ScopeGrantFetchFailed(_)));
}

#[tokio::test]
async fn test_scope_grant_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(GRANT_PATH))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = make_client(&server)
        .fetch_scope_grant_request("L1", "S1", &token())
        .await
        .unwrap_err();
    match err {
        ConsentError::ScopeGrantFetchFailed(cause) => assert!(cause.contains("404")),
        other => panic!("expected ScopeGrantFetchFailed, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Decision submission
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_accept_sends_granted_scopes_and_identifiers() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{GRANT_PATH}/accept")))
        .and(header("authorization", "Bearer T1"))
        .and(body_json(json!({
            "granted_scopes": ["payments:read"],
            "id": "L1",
            "login_state": "S1"
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"redirect_to": "https://acp/finish"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let decision = Decision::Accept {
        granted_scopes: vec!["payments:read".to_string()],
    };
    let redirect = make_client(&server)
        .submit_decision(&decision, "L1", "S1", &token())
        .await
        .expect("accept must succeed");
    assert_eq!(redirect, "https://acp/finish");
}

#[tokio::test]
async fn test_accept_with_no_scopes_sends_empty_list() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{GRANT_PATH}/accept")))
        .and(body_json(json!({
            "granted_scopes": [],
            "id": "L1",
            "login_state": "S1"
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"redirect_to": "https://acp/finish"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let decision = Decision::Accept {
        granted_scopes: Vec::new(),
    };
    let redirect = make_client(&server)
        .submit_decision(&decision, "L1", "S1", &token())
        .await
        .expect("accept with no scopes must succeed");
    assert_eq!(redirect, "https://acp/finish");
}

#[tokio::test]
async fn test_reject_sends_identifiers_only() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{GRANT_PATH}/reject")))
        .and(header("authorization", "Bearer T1"))
        .and(body_json(json!({"id": "L1", "login_state": "S1"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"redirect_to": "https://acp/denied"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let redirect = make_client(&server)
        .submit_decision(&Decision::Reject, "L1", "S1", &token())
        .await
        .expect("reject must succeed");
    assert_eq!(redirect, "https://acp/denied");
}

#[tokio::test]
async fn test_decision_missing_redirect_to() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{GRANT_PATH}/reject")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let err = make_client(&server)
        .submit_decision(&Decision::Reject, "L1", "S1", &token())
        .await
        .unwrap_err();
    assert!(matches!(err, ConsentError::DecisionSubmissionFailed(_)));
}

#[tokio::test]
async fn test_decision_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{GRANT_PATH}/accept")))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let decision = Decision::Accept {
        granted_scopes: vec!["openid".to_string()],
    };
    let err = make_client(&server)
        .submit_decision(&decision, "L1", "S1", &token())
        .await
        .unwrap_err();
    assert!(matches!(err, ConsentError::DecisionSubmissionFailed(_)));
}
