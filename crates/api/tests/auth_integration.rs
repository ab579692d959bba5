//! Integration tests for admin authentication flows.
//!
//! Tests marked `#[ignore]` require a running PostgreSQL instance.
//! Set TEST_DATABASE_URL environment variable or use docker-compose.

mod common;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use common::{
    cleanup_test_data, create_test_app, create_test_pool, lazy_test_pool, run_migrations,
    seed_admin, test_config, TestAdmin,
};
use serde_json::{json, Value};
use tower::ServiceExt;

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

async fn parse_response_body(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap_or(Value::Null)
}

// ============================================================================
// Validation Tests (no database required)
// ============================================================================

#[tokio::test]
async fn test_login_rejects_malformed_email() {
    let app = create_test_app(test_config(), lazy_test_pool());

    let request = json_request(
        Method::POST,
        "/api/v1/auth/login",
        json!({"email": "not-an-email", "password": "whatever"}),
    );

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_refresh_rejects_garbage_token() {
    let app = create_test_app(test_config(), lazy_test_pool());

    let request = json_request(
        Method::POST,
        "/api/v1/auth/refresh",
        json!({"refresh_token": "not.a.jwt"}),
    );

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_without_token_is_unauthorized() {
    let app = create_test_app(test_config(), lazy_test_pool());

    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/v1/auth/me")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Login and Refresh Tests (require PostgreSQL)
// ============================================================================

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_login_success() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    cleanup_test_data(&pool).await;

    let admin = TestAdmin::new();
    seed_admin(&pool, &admin).await;

    let app = create_test_app(test_config(), pool.clone());
    let request = json_request(
        Method::POST,
        "/api/v1/auth/login",
        json!({"email": admin.email, "password": admin.password}),
    );

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    assert_eq!(body["email"], admin.email);
    assert_eq!(body["token_type"], "Bearer");
    assert!(!body["access_token"].as_str().unwrap().is_empty());
    assert!(!body["refresh_token"].as_str().unwrap().is_empty());
    assert_eq!(body["expires_in"], 3600);

    cleanup_test_data(&pool).await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_login_wrong_password() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    cleanup_test_data(&pool).await;

    let admin = TestAdmin::new();
    seed_admin(&pool, &admin).await;

    let app = create_test_app(test_config(), pool.clone());
    let request = json_request(
        Method::POST,
        "/api/v1/auth/login",
        json!({"email": admin.email, "password": "wrong-password"}),
    );

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    cleanup_test_data(&pool).await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_login_unknown_email_same_error_as_wrong_password() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    cleanup_test_data(&pool).await;

    let app = create_test_app(test_config(), pool.clone());
    let request = json_request(
        Method::POST,
        "/api/v1/auth/login",
        json!({"email": "nobody@example.com", "password": "whatever1"}),
    );

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = parse_response_body(response).await;
    assert_eq!(body["message"], "Invalid email or password");

    cleanup_test_data(&pool).await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_refresh_issues_new_pair() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    cleanup_test_data(&pool).await;

    let admin = TestAdmin::new();
    seed_admin(&pool, &admin).await;

    let app = create_test_app(test_config(), pool.clone());
    let request = json_request(
        Method::POST,
        "/api/v1/auth/login",
        json!({"email": admin.email, "password": admin.password}),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    let body = parse_response_body(response).await;
    let refresh_token = body["refresh_token"].as_str().unwrap().to_string();

    let request = json_request(
        Method::POST,
        "/api/v1/auth/refresh",
        json!({"refresh_token": refresh_token}),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    assert!(!body["access_token"].as_str().unwrap().is_empty());
    assert_eq!(body["email"], admin.email);

    cleanup_test_data(&pool).await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_refresh_rejects_access_token() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    cleanup_test_data(&pool).await;

    let admin = TestAdmin::new();
    seed_admin(&pool, &admin).await;

    let app = create_test_app(test_config(), pool.clone());
    let request = json_request(
        Method::POST,
        "/api/v1/auth/login",
        json!({"email": admin.email, "password": admin.password}),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    let body = parse_response_body(response).await;
    let access_token = body["access_token"].as_str().unwrap().to_string();

    // An access token is not accepted where a refresh token is expected.
    let request = json_request(
        Method::POST,
        "/api/v1/auth/refresh",
        json!({"refresh_token": access_token}),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    cleanup_test_data(&pool).await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_me_returns_account_and_profile() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    cleanup_test_data(&pool).await;

    let admin = TestAdmin::new();
    seed_admin(&pool, &admin).await;

    let app = create_test_app(test_config(), pool.clone());
    let request = json_request(
        Method::POST,
        "/api/v1/auth/login",
        json!({"email": admin.email, "password": admin.password}),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    let body = parse_response_body(response).await;
    let access_token = body["access_token"].as_str().unwrap().to_string();

    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/v1/auth/me")
        .header(header::AUTHORIZATION, format!("Bearer {}", access_token))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    assert_eq!(body["email"], admin.email);
    assert_eq!(body["is_admin"], true);

    cleanup_test_data(&pool).await;
}
