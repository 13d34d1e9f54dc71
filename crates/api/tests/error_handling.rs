//! Tests for the AppError -> HTTP response mapping.

mod common;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use common::body_json;
use loft_api::error::AppError;
use loft_core::error::CoreError;
use loft_routing::RoutingError;
use loft_store::StoreError;

// ---------------------------------------------------------------------------
// Test: domain not-found maps to 404 with the entity in the message
// ---------------------------------------------------------------------------

#[tokio::test]
async fn core_not_found_maps_to_404() {
    let response = AppError::Core(CoreError::NotFound {
        entity: "Page",
        id: 7,
    })
    .into_response();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["code"], "NOT_FOUND");
    assert_eq!(body["error"], "Page with id 7 not found");
}

// ---------------------------------------------------------------------------
// Test: an oversized payload maps to 400 with the limit in the message
// ---------------------------------------------------------------------------

#[tokio::test]
async fn payload_too_large_maps_to_400() {
    let response = AppError::Store(StoreError::PayloadTooLarge {
        size_bytes: 3_000_000,
        limit_bytes: 2_097_152,
    })
    .into_response();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["error"].as_str().unwrap().contains("2097152"));
}

// ---------------------------------------------------------------------------
// Test: upstream store failures are sanitized to a generic 500
// ---------------------------------------------------------------------------

#[tokio::test]
async fn store_failure_is_sanitized_500() {
    let response =
        AppError::Store(StoreError::Upload("s3 bucket credentials expired".to_string()))
            .into_response();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["code"], "UPSTREAM_FAILURE");
    assert_eq!(body["error"], "An internal error occurred");
}

// ---------------------------------------------------------------------------
// Test: invalid route keys are a client error, backend outages are not
// ---------------------------------------------------------------------------

#[tokio::test]
async fn routing_errors_split_by_fault() {
    let response =
        AppError::Routing(RoutingError::InvalidKey("missing route: prefix".to_string()))
            .into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    let response = AppError::Routing(RoutingError::Backend(503)).into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["code"], "INTERNAL_ERROR");
    assert_eq!(body["error"], "An internal error occurred");
}

// ---------------------------------------------------------------------------
// Test: sqlx row-not-found maps to 404, other db errors to sanitized 500
// ---------------------------------------------------------------------------

#[tokio::test]
async fn database_errors_are_classified() {
    let response = AppError::Database(sqlx::Error::RowNotFound).into_response();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");

    let response = AppError::Database(sqlx::Error::PoolTimedOut).into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["code"], "INTERNAL_ERROR");
    assert_eq!(body["error"], "An internal error occurred");
}

// ---------------------------------------------------------------------------
// Test: the explicit HTTP variants echo their messages
// ---------------------------------------------------------------------------

#[tokio::test]
async fn http_variants_echo_messages() {
    let response = AppError::BadRequest("Invalid route key".to_string()).into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Invalid route key");

    let response = AppError::NotFound("No page for slug 'x'".to_string()).into_response();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}
