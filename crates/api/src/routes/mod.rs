pub mod health;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /pages/{id}/publish          freeze + index a new version (POST)
/// /admin/pages/{id}/cleanup    reclaim superseded versions (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/pages/{id}/publish", post(handlers::publish::publish))
        .route(
            "/admin/pages/{id}/cleanup",
            post(handlers::cleanup::run_cleanup),
        )
}

/// Routes the edge router rewrites into; mounted at the root.
///
/// ```text
/// /internal/artifact?rk=...    artifact proxy (GET)
/// /sites/{slug}                slug-keyed fallback render (GET)
/// ```
pub fn edge_target_routes() -> Router<AppState> {
    Router::new()
        .route("/internal/artifact", get(handlers::proxy::serve_artifact))
        .route("/sites/{slug}", get(handlers::sites::render_by_slug))
}
