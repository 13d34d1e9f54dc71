//! Slug-keyed fallback rendering path.
//!
//! The edge router rewrites here whenever the fast route lookup misses or
//! errors. Resolution goes through the authoritative ledger instead of the
//! route table, so a wiped or stale route index degrades to correct (if
//! slower) serving rather than an error.

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, Response, StatusCode};
use loft_db::repositories::{PageRepo, VersionRepo};
use loft_routing::RouteRecord;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /sites/{slug}
pub async fn render_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Response<Body>> {
    let page = PageRepo::find_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No page for slug '{slug}'")))?;

    let current = page
        .current_version
        .clone()
        .ok_or_else(|| AppError::NotFound(format!("Page '{slug}' has no published version")))?;

    let version = VersionRepo::find_by_page_and_version(&state.pool, page.id, &current)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Page '{slug}' has no published version")))?;

    let body = state
        .artifact_store
        .fetch(&version.artifact_url)
        .await
        .map_err(|e| {
            tracing::error!(slug = %slug, version = %version.version, error = %e, "Fallback artifact fetch failed");
            AppError::Store(e)
        })?;

    // Self-heal the fast path: re-populate the route entry the lookup
    // missed, so the next request proxies instead of falling back.
    if let Some(hostname) = &page.hostname {
        let record = RouteRecord {
            page_id: page.id,
            version: version.version.clone(),
            artifact_url: Some(version.artifact_url.clone()),
            published_at: version.created_at,
        };
        if let Err(e) = state
            .route_table
            .set_route(hostname, "/", &record, state.config.route_ttl_secs)
            .await
        {
            tracing::warn!(slug = %slug, hostname = %hostname, error = %e, "Route self-heal failed");
        }
    }

    tracing::debug!(slug = %slug, version = %version.version, "Serving fallback render");

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/html; charset=utf-8")
        // Short-lived: this path exists to be correct, not fast.
        .header(header::CACHE_CONTROL, "public, max-age=60")
        .header(header::X_CONTENT_TYPE_OPTIONS, "nosniff")
        .body(Body::from(body))
        .map_err(|e| {
            AppError::Core(loft_core::error::CoreError::Internal(format!(
                "response build failed: {e}"
            )))
        })?;

    Ok(response)
}
