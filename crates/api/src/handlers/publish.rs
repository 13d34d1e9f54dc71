//! Handler for the publish endpoint.

use axum::extract::{Path, State};
use axum::Json;
use loft_core::types::{DbId, Timestamp};
use serde::Serialize;

use crate::error::AppResult;
use crate::publish::{publish_page, PublishRequest};
use crate::response::DataResponse;
use crate::state::AppState;

/// Response payload for a completed publish.
#[derive(Debug, Serialize)]
pub struct PublishResponse {
    pub page_id: DbId,
    pub version: String,
    pub artifact_url: String,
    pub size_bytes: i64,
    pub checksum: String,
    pub published_at: Timestamp,
}

/// POST /api/v1/pages/{id}/publish
///
/// Freeze the submitted HTML into an immutable versioned artifact, record
/// it in the ledger, flip the current pointer, and index the route.
pub async fn publish(
    State(state): State<AppState>,
    Path(page_id): Path<DbId>,
    Json(body): Json<PublishRequest>,
) -> AppResult<Json<DataResponse<PublishResponse>>> {
    let outcome = publish_page(&state, page_id, &body).await?;
    let version = outcome.version;

    Ok(Json(DataResponse {
        data: PublishResponse {
            page_id: version.page_id,
            version: version.version,
            artifact_url: version.artifact_url,
            size_bytes: version.size_bytes,
            checksum: version.checksum,
            published_at: version.created_at,
        },
    }))
}
