//! Integration tests for RSVP submission.
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
    test_config,
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
async fn test_attending_without_guest_count_rejected() {
    let app = create_test_app(test_config(), lazy_test_pool());

    let request = json_request(
        Method::POST,
        "/api/v1/rsvps",
        json!({"name": "Maria Silva", "will_attend": true}),
    );

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = parse_response_body(response).await;
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("Number of guests"));
}

#[tokio::test]
async fn test_attending_with_zero_guests_rejected() {
    let app = create_test_app(test_config(), lazy_test_pool());

    let request = json_request(
        Method::POST,
        "/api/v1/rsvps",
        json!({"name": "Maria Silva", "will_attend": true, "number_of_guests": 0}),
    );

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_short_name_rejected() {
    let app = create_test_app(test_config(), lazy_test_pool());

    let request = json_request(
        Method::POST,
        "/api/v1/rsvps",
        json!({"name": "M", "will_attend": false}),
    );

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ============================================================================
// Submission Tests (require PostgreSQL)
// ============================================================================

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_submit_attending_rsvp() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    cleanup_test_data(&pool).await;

    let app = create_test_app(test_config(), pool.clone());

    let request = json_request(
        Method::POST,
        "/api/v1/rsvps",
        json!({
            "name": "Maria Silva",
            "will_attend": true,
            "number_of_guests": 3,
            "dietary_restrictions": "vegetariana",
            "message": "Mal posso esperar!"
        }),
    );

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = parse_response_body(response).await;
    assert_eq!(body["name"], "Maria Silva");
    assert_eq!(body["will_attend"], true);
    assert_eq!(body["number_of_guests"], 3);
    assert_eq!(body["is_confirmed"], false);

    cleanup_test_data(&pool).await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_submit_declining_rsvp_drops_guest_count() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    cleanup_test_data(&pool).await;

    let app = create_test_app(test_config(), pool.clone());

    let request = json_request(
        Method::POST,
        "/api/v1/rsvps",
        json!({"name": "João Costa", "will_attend": false, "number_of_guests": 5}),
    );

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = parse_response_body(response).await;
    assert_eq!(body["will_attend"], false);
    assert_eq!(body["number_of_guests"], Value::Null);

    cleanup_test_data(&pool).await;
}
