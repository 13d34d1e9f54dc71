//! The edge router: per-request rewriting of custom-hostname traffic.
//!
//! State machine per inbound request:
//!
//! 1. Host classification -- apex, `www`, or any host outside the platform
//!    pattern passes through unchanged.
//! 2. API bypass -- paths under `/api` are never served from the artifact
//!    path, regardless of hostname.
//! 3. Route lookup -- a hit rewrites to the artifact proxy with an opaque
//!    route key; a miss or lookup error rewrites to the slug-keyed
//!    fallback. The router never fails a request because the fast path is
//!    down: it fails open to the slower, authoritative path.

use axum::extract::{Request, State};
use axum::http::header::HOST;
use axum::http::uri::{PathAndQuery, Uri};
use axum::middleware::Next;
use axum::response::Response;
use loft_core::host::{classify_host, slug_from_hostname, HostClass};
use loft_core::route_key::RouteKey;

use crate::state::AppState;

/// Axum middleware that rewrites custom-hostname requests before routing.
pub async fn rewrite_custom_host(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(raw_host) = request
        .headers()
        .get(HOST)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
    else {
        return next.run(request).await;
    };

    let hostname = match classify_host(&raw_host, &state.config.base_domain) {
        HostClass::Passthrough => return next.run(request).await,
        HostClass::CustomPage { hostname } => hostname,
    };

    let path = request.uri().path().to_string();

    // APIs are never served from the artifact path.
    if path == "/api" || path.starts_with("/api/") {
        return next.run(request).await;
    }

    let target = match state.route_table.get_route(&hostname, &path).await {
        Ok(Some(_)) => {
            let key = RouteKey::new(&hostname, &path).to_string();
            // Paths may contain query-reserved characters ('&', '=', '+');
            // the key must survive as a single query value.
            let encoded: String = form_urlencoded::byte_serialize(key.as_bytes()).collect();
            tracing::debug!(hostname = %hostname, path = %path, "Edge route hit, proxying");
            format!("/internal/artifact?rk={encoded}")
        }
        Ok(None) => {
            let slug = slug_from_hostname(&hostname);
            tracing::debug!(hostname = %hostname, path = %path, slug, "Edge route miss, falling back");
            format!("/sites/{slug}")
        }
        Err(e) => {
            // Fail open: the fallback path re-resolves from the ledger.
            let slug = slug_from_hostname(&hostname);
            tracing::warn!(hostname = %hostname, path = %path, error = %e, "Edge route lookup failed, falling back");
            format!("/sites/{slug}")
        }
    };

    rewrite_uri(&mut request, &target);
    next.run(request).await
}

/// Swap the request's path-and-query in place, keeping scheme/authority.
fn rewrite_uri(request: &mut Request, target: &str) {
    let Ok(path_and_query) = target.parse::<PathAndQuery>() else {
        tracing::warn!(target, "Edge rewrite produced an unparsable target");
        return;
    };
    let mut parts = request.uri().clone().into_parts();
    parts.path_and_query = Some(path_and_query);
    match Uri::from_parts(parts) {
        Ok(uri) => *request.uri_mut() = uri,
        Err(e) => tracing::warn!(target, error = %e, "Edge rewrite failed"),
    }
}
