//! The artifact proxy: the narrow trust boundary between edge-rewritten
//! requests and the object store.
//!
//! Accepts only an opaque route key, re-resolves it against the route
//! table (never trusting a caller-supplied URL), streams the artifact from
//! the resolved location, and applies per-version cache headers. Upstream
//! failures surface as a generic 500 so storage-provider semantics never
//! leak to clients.

use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::{header, Response, StatusCode};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Query parameters for `GET /internal/artifact`.
#[derive(Debug, Deserialize)]
pub struct ProxyParams {
    /// The opaque `route:{hostname}:{path}` token.
    pub rk: Option<String>,
}

/// GET /internal/artifact?rk=<routeKey>
pub async fn serve_artifact(
    State(state): State<AppState>,
    Query(params): Query<ProxyParams>,
) -> AppResult<Response<Body>> {
    let token = params
        .rk
        .ok_or_else(|| AppError::BadRequest("Missing required query parameter 'rk'".into()))?;

    // Re-resolution is the anti-spoofing step: the token is parsed and
    // validated here, and a raw storage key is rejected before any lookup.
    let record = state
        .route_table
        .get_route_by_key(&token)
        .await
        .map_err(|e| match e {
            loft_routing::RoutingError::InvalidKey(_) => {
                tracing::warn!(route_key = %token, "Rejected malformed route key");
                AppError::BadRequest("Invalid route key".into())
            }
            other => AppError::Routing(other),
        })?;

    let Some(record) = record else {
        tracing::warn!(route_key = %token, "No route record for key");
        return Err(AppError::NotFound("No published page for this route".into()));
    };

    let Some(artifact_url) = record.artifact_url.filter(|url| !url.is_empty()) else {
        tracing::warn!(route_key = %token, version = %record.version, "Route record has no artifact URL");
        return Err(AppError::NotFound("No published page for this route".into()));
    };

    let body = state
        .artifact_store
        .fetch(&artifact_url)
        .await
        .map_err(|e| {
            tracing::error!(route_key = %token, error = %e, "Artifact fetch failed");
            AppError::Store(e)
        })?;

    tracing::debug!(
        route_key = %token,
        version = %record.version,
        size_bytes = body.len(),
        "Serving proxied artifact"
    );

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/html; charset=utf-8")
        .header(header::CACHE_CONTROL, state.config.proxy_cache_control())
        // Conditional requests stay correct per-version.
        .header(header::ETAG, format!("\"{}\"", record.version))
        .header(header::X_CONTENT_TYPE_OPTIONS, "nosniff")
        .header(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")
        .body(Body::from(body))
        .map_err(|e| {
            AppError::Core(loft_core::error::CoreError::Internal(format!(
                "response build failed: {e}"
            )))
        })?;

    Ok(response)
}
