//! Authentication and health tests.

use axum::http::StatusCode;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_health_is_public() {
    let app = TestApp::new();

    let response = app.request("GET", "/api/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["status"], "ok");
    assert_eq!(response.data()["database"], "memory");
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let app = TestApp::new();

    let response = app.request("GET", "/api/folders/root", None, None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "UNAUTHORIZED");
}

#[tokio::test]
async fn test_garbage_token_is_unauthorized() {
    let app = TestApp::new();

    let response = app
        .request("GET", "/api/users/me", None, Some("not-a-jwt"))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_returns_caller() {
    let app = TestApp::new();
    let alice = app.user("alice@example.com").await;

    let response = app
        .request("GET", "/api/users/me", None, Some(&alice.token))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["id"], alice.id);
    assert_eq!(response.data()["email"], "alice@example.com");
}

#[tokio::test]
async fn test_public_routes_need_no_token() {
    let app = TestApp::new();

    let response = app.request("GET", "/s/unknown-token", None, None).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.error_code(), "NOT_FOUND");
}
