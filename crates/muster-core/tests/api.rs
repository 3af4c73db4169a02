//! Integration tests for the attendance backend client.
//!
//! Every test runs against a wiremock server; nothing here touches a real
//! backend.

use muster_core::api::{ApiClient, ApiError};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn login_response() -> serde_json::Value {
    serde_json::json!({
        "access_token": "T",
        "token_type": "bearer",
        "admin": { "name": "Admin", "email": "admin@example.com" }
    })
}

/// Test: login posts the e-mail under the `username` form field and stores
/// the returned token and identity.
#[tokio::test]
async fn test_login_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/admin/login"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("username=admin%40example.com"))
        .and(body_string_contains("password=correct"))
        .respond_with(ResponseTemplate::new(200).set_body_json(login_response()))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(server.uri());
    let session = client.login("admin@example.com", "correct").await.unwrap();

    assert_eq!(session.token, "T");
    assert_eq!(session.admin.display(), Some("Admin"));
}

/// Test: a rejected login surfaces the server's `detail` text.
#[tokio::test]
async fn test_login_rejected_uses_server_detail() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/admin/login"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(serde_json::json!({"detail": "Invalid email or password"})),
        )
        .mount(&server)
        .await;

    let client = ApiClient::new(server.uri());
    let err = client.login("admin@example.com", "wrong").await.unwrap_err();

    assert_eq!(
        err,
        ApiError::AuthenticationFailed {
            message: "Invalid email or password".to_string()
        }
    );
}

/// Test: a login response without an identity falls back to the login
/// e-mail so the UI always has a display string.
#[tokio::test]
async fn test_login_identity_fallback() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/admin/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"access_token": "T", "token_type": "bearer"})),
        )
        .mount(&server)
        .await;

    let client = ApiClient::new(server.uri());
    let session = client.login("admin@example.com", "correct").await.unwrap();

    assert_eq!(session.admin.display(), Some("admin@example.com"));
}

/// Test: the record fetch attaches the stored token as a bearer credential
/// and returns records untouched and in order.
#[tokio::test]
async fn test_fetch_records_sends_bearer_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/attendance/records"))
        .and(header("authorization", "Bearer T"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"name": "A", "status": "present"},
            {"user": "B"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(server.uri());
    let records = client.fetch_records("T").await.unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].subject().as_deref(), Some("A"));
    assert_eq!(records[1].subject().as_deref(), Some("B"));
    assert_eq!(records[1].status(), "Present");
}

/// Test: an empty array is a valid, empty record set.
#[tokio::test]
async fn test_fetch_records_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/attendance/records"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    let client = ApiClient::new(server.uri());
    let records = client.fetch_records("T").await.unwrap();
    assert!(records.is_empty());
}

/// Test: 401 classifies as Unauthorized, never as a generic failure.
#[tokio::test]
async fn test_fetch_records_unauthorized() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/attendance/records"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = ApiClient::new(server.uri());
    let err = client.fetch_records("stale").await.unwrap_err();
    assert_eq!(err, ApiError::Unauthorized);
}

/// Test: a non-401 failure status classifies as ServerUnavailable.
#[tokio::test]
async fn test_fetch_records_server_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/attendance/records"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = ApiClient::new(server.uri());
    let err = client.fetch_records("T").await.unwrap_err();
    assert_eq!(err, ApiError::ServerUnavailable { status: 500 });
}

/// Test: a transport failure classifies as NetworkUnreachable, with a
/// message distinct from the server-failure one.
#[tokio::test]
async fn test_fetch_records_network_unreachable() {
    // Nothing listens on the discard port.
    let client = ApiClient::new("http://127.0.0.1:9");
    let err = client.fetch_records("T").await.unwrap_err();

    assert!(matches!(err, ApiError::NetworkUnreachable { .. }));
    assert_ne!(
        err.to_string(),
        ApiError::ServerUnavailable { status: 500 }.to_string()
    );
}

/// Test: the export download returns the raw report bytes.
#[tokio::test]
async fn test_export_report_bytes() {
    let server = MockServer::start().await;
    let csv = "name,time,status\nAlice,09:00,Present\n";

    Mock::given(method("GET"))
        .and(path("/attendance/report"))
        .and(header("authorization", "Bearer T"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/csv")
                .set_body_string(csv),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(server.uri());
    let bytes = client.export_report("T").await.unwrap();
    assert_eq!(bytes.as_ref(), csv.as_bytes());
}

/// Test: export failures classify the same way as record fetches.
#[tokio::test]
async fn test_export_report_unauthorized() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/attendance/report"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = ApiClient::new(server.uri());
    let err = client.export_report("stale").await.unwrap_err();
    assert_eq!(err, ApiError::Unauthorized);
}
