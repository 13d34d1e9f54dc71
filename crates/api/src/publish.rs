//! The publish pipeline: freeze HTML into an immutable versioned artifact
//! and make it resolvable by hostname.
//!
//! Ordering within one publish: artifact write (retried) happens before the
//! ledger insert, the ledger insert before the current-pointer update, and
//! the current-pointer update before the route-table write. A ledger
//! failure after a successful upload leaves an orphaned blob — acceptable
//! garbage for the retention sweep, never a hot-path rollback.

use loft_core::hashing::sha256_hex;
use loft_core::types::DbId;
use loft_db::models::page_version::{CreatePageVersion, PageVersion};
use loft_db::repositories::{PageRepo, VersionRepo};
use loft_routing::RouteRecord;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Request body for a publish.
#[derive(Debug, Deserialize)]
pub struct PublishRequest {
    /// The finished HTML document to freeze.
    pub html: String,
    /// Hostname to route to this page; falls back to the page's own
    /// configured hostname when omitted.
    pub hostname: Option<String>,
    /// Request path the route covers (default `/`).
    pub path: Option<String>,
    /// Version of the asset bundle the page was rendered against.
    pub asset_bundle_version: Option<String>,
}

/// A completed publish: the ledger row plus whether the route-table write
/// made it through.
#[derive(Debug)]
pub struct PublishOutcome {
    pub version: PageVersion,
    pub route_set: bool,
}

/// Run the full publish pipeline for one page.
pub async fn publish_page(
    state: &AppState,
    page_id: DbId,
    request: &PublishRequest,
) -> AppResult<PublishOutcome> {
    let page = PageRepo::find_by_id(&state.pool, page_id)
        .await?
        .ok_or(AppError::Core(loft_core::error::CoreError::NotFound {
            entity: "Page",
            id: page_id,
        }))?;

    let html = request.html.as_bytes();

    // Durable write first; size guard and retry live inside the store.
    let uploaded = loft_store::upload_artifact(
        state.artifact_store.as_ref(),
        page_id,
        html,
        request.asset_bundle_version.as_deref(),
    )
    .await?;

    // Ledger insert. From here on the publish exists even if routing lags.
    let version = VersionRepo::create(
        &state.pool,
        &CreatePageVersion {
            page_id,
            version: uploaded.version.clone(),
            storage_key: uploaded.storage_key.clone(),
            artifact_url: uploaded.artifact_url.clone(),
            size_bytes: uploaded.size_bytes as i64,
            checksum: sha256_hex(html),
        },
    )
    .await?;

    // Last writer wins under concurrent publishes of the same page.
    PageRepo::set_current_version(&state.pool, page_id, &version.version).await?;

    let hostname = request.hostname.clone().or_else(|| page.hostname.clone());
    let path = request.path.as_deref().unwrap_or("/");

    let route_set = match &hostname {
        Some(host) => {
            let record = RouteRecord {
                page_id,
                version: version.version.clone(),
                artifact_url: Some(version.artifact_url.clone()),
                published_at: version.created_at,
            };
            match state
                .route_table
                .set_route(host, path, &record, state.config.route_ttl_secs)
                .await
            {
                Ok(()) => true,
                Err(e) => {
                    // The publish stands: the route TTL and the slug
                    // fallback path self-heal missed routing updates.
                    tracing::error!(
                        page_id,
                        version = %version.version,
                        hostname = %host,
                        error = %e,
                        "Route table write failed after publish"
                    );
                    false
                }
            }
        }
        None => false,
    };

    tracing::info!(
        page_id,
        version = %version.version,
        size_bytes = version.size_bytes,
        route_set,
        "Page published"
    );

    Ok(PublishOutcome { version, route_set })
}
