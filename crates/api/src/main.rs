use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, Method, StatusCode};
use axum::{Router, ServiceExt};
use tower::Layer;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use loft_api::config::ServerConfig;
use loft_api::{background, middleware, routes, state};
use loft_routing::{KvConfig, KvRouteStore, MemoryRouteStore, RouteStore};
use loft_store::{ArtifactStore, MemoryArtifactStore, S3ArtifactStore};

use state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "loft_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, base_domain = %config.base_domain, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = loft_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    loft_db::health_check(&pool)
        .await
        .expect("Database health check failed");

    loft_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Artifact store ---
    let artifact_store: Arc<dyn ArtifactStore> = match config.storage_backend.as_str() {
        "s3" => {
            let store = S3ArtifactStore::new(loft_store::s3::S3Config {
                bucket: config.s3_bucket.clone(),
                region: config.s3_region.clone(),
                public_base_url: config.s3_public_base_url.clone(),
            })
            .await;
            tracing::info!(bucket = %config.s3_bucket, "Using S3 artifact store");
            Arc::new(store)
        }
        _ => {
            tracing::warn!("Using in-memory artifact store (development only)");
            Arc::new(MemoryArtifactStore::new())
        }
    };

    // --- Route table ---
    let route_table: Arc<dyn RouteStore> = match config.route_backend.as_str() {
        "kv" => {
            tracing::info!(url = %config.kv_rest_url, "Using REST key-value route table");
            Arc::new(KvRouteStore::new(KvConfig {
                base_url: config.kv_rest_url.clone(),
                token: config.kv_rest_token.clone(),
            }))
        }
        _ => {
            tracing::warn!("Using in-memory route table (development only)");
            Arc::new(MemoryRouteStore::new())
        }
    };

    // --- CORS ---
    let cors = build_cors_layer(&config);

    // --- App state ---
    let state = AppState {
        pool: pool.clone(),
        config: Arc::new(config.clone()),
        artifact_store: Arc::clone(&artifact_store),
        route_table,
    };

    // --- Retention sweep ---
    let sweep_cancel = tokio_util::sync::CancellationToken::new();
    let sweep_handle = tokio::spawn(background::sweep::run(
        pool,
        Arc::clone(&artifact_store),
        config.keep_count,
        Duration::from_secs(config.sweep_interval_secs),
        sweep_cancel.clone(),
    ));
    tracing::info!("Retention sweep started");

    // --- Request ID header name ---
    let request_id_header = HeaderName::from_static("x-request-id");

    // --- Router ---
    let router = Router::new()
        // Health check at root level (not under /api/v1).
        .merge(routes::health::router())
        // Rewrite targets for the edge router.
        .merge(routes::edge_target_routes())
        // API v1 routes.
        .nest("/api/v1", routes::api_routes())
        // Publish bodies carry up to 2 MiB of HTML inside a JSON envelope;
        // the default transport limit (2 MB) would reject them before the
        // application-level size guard ever ran. JSON string escaping can
        // inflate the HTML up to six-fold (`\uXXXX` per byte), so the
        // transport limit must sit well above 6 x 2 MiB.
        .layer(axum::extract::DefaultBodyLimit::max(16 * 1024 * 1024))
        // -- Middleware stack (applied bottom-up) --
        // Panic recovery: catch panics and return 500 JSON.
        .layer(CatchPanicLayer::new())
        // Request timeout.
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout_secs),
        ))
        // Propagate request ID to response.
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        // Structured request/response tracing.
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Set request ID on incoming requests.
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        // CORS.
        .layer(cors)
        // Shared state.
        .with_state(state.clone());

    // Edge router: classify hostname and rewrite before route matching.
    // Middleware added via `Router::layer` runs after routing, so a URI
    // rewrite there cannot change which route matches; the rewrite must
    // wrap the router itself.
    let app = axum::middleware::from_fn_with_state(
        state,
        middleware::edge::rewrite_custom_host,
    )
    .layer(router);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(
        listener,
        ServiceExt::<axum::extract::Request>::into_make_service(app),
    )
    .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    sweep_cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(5), sweep_handle).await;
    tracing::info!("Retention sweep stopped");

    tracing::info!("Graceful shutdown complete");
}

/// Build the CORS layer from configured origins.
fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<_> = config
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(3600))
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
