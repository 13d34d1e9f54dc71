//! Shared harness for integration tests.
//!
//! Builds the full application router with the same middleware stack as
//! `main.rs` (panic recovery, timeout, request id, tracing, edge rewrite,
//! CORS) over injected in-memory artifact/route backends, so tests
//! exercise exactly what production runs.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, Method, Request, Response, StatusCode};
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tower::util::BoxCloneService;
use tower::{Layer, ServiceExt};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use loft_api::config::ServerConfig;
use loft_api::state::AppState;
use loft_api::{middleware, routes};
use loft_routing::MemoryRouteStore;
use loft_store::MemoryArtifactStore;

/// Base domain used throughout the tests.
pub const BASE_DOMAIN: &str = "loftpages.site";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        base_domain: BASE_DOMAIN.to_string(),
        route_ttl_secs: 3600,
        keep_count: 10,
        sweep_interval_secs: 21600,
        proxy_cache_secs: 3600,
        proxy_swr_secs: 86400,
        storage_backend: "memory".to_string(),
        s3_bucket: String::new(),
        s3_region: "us-east-1".to_string(),
        s3_public_base_url: String::new(),
        route_backend: "memory".to_string(),
        kv_rest_url: String::new(),
        kv_rest_token: String::new(),
    }
}

/// In-memory backends shared between a test and its app.
pub struct TestBackends {
    pub artifact_store: Arc<MemoryArtifactStore>,
    pub route_table: Arc<MemoryRouteStore>,
}

impl TestBackends {
    pub fn new() -> Self {
        Self {
            artifact_store: Arc::new(MemoryArtifactStore::new()),
            route_table: Arc::new(MemoryRouteStore::new()),
        }
    }
}

/// A pool that never connects. For tests whose routes never touch the
/// database (proxy validation, edge classification).
pub fn lazy_pool() -> PgPool {
    PgPoolOptions::new()
        .acquire_timeout(Duration::from_secs(2))
        .connect_lazy("postgres://localhost/loft_test_unreachable")
        .expect("Failed to build lazy pool")
}

/// The application under test: the router wrapped in the edge-rewrite
/// middleware, boxed so tests can clone and `oneshot` it.
pub type TestApp = BoxCloneService<Request<Body>, Response<Body>, std::convert::Infallible>;

/// Build the full application router over the given pool and backends.
pub fn build_test_app(pool: PgPool, backends: &TestBackends) -> TestApp {
    let config = test_config();

    let state = AppState {
        pool,
        config: Arc::new(config),
        artifact_store: backends.artifact_store.clone(),
        route_table: backends.route_table.clone(),
    };

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:5173".parse().unwrap()])
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    let router = Router::new()
        .merge(routes::health::router())
        .merge(routes::edge_target_routes())
        .nest("/api/v1", routes::api_routes())
        .layer(axum::extract::DefaultBodyLimit::max(16 * 1024 * 1024))
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state.clone());

    // The URI rewrite must wrap the router: middleware added via
    // `Router::layer` runs after route matching, same as `main.rs`.
    BoxCloneService::new(
        axum::middleware::from_fn_with_state(state, middleware::edge::rewrite_custom_host)
            .layer(router),
    )
}

/// GET `uri` with the default (apex) host.
pub async fn get(app: TestApp, uri: &str) -> Response<Body> {
    get_with_host(app, BASE_DOMAIN, uri).await
}

/// GET `uri` with an explicit `Host` header.
pub async fn get_with_host(app: TestApp, host: &str, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header("host", host)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// POST a JSON body to `uri` with the default (apex) host.
pub async fn post_json(app: TestApp, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("host", BASE_DOMAIN)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body into parsed JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).unwrap()
}

/// Collect a response body into raw bytes.
pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    use http_body_util::BodyExt;
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}
