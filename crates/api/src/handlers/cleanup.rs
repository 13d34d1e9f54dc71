//! Handlers for the administrative version-cleanup endpoint.

use axum::extract::{Path, State};
use axum::Json;
use loft_core::types::DbId;
use serde::Deserialize;

use crate::cleanup::{cleanup_page, CleanupOutcome, DEFAULT_KEEP_COUNT};
use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for a cleanup run.
#[derive(Debug, Default, Deserialize)]
pub struct CleanupRequest {
    /// Versions to retain; defaults to 10.
    pub keep_count: Option<usize>,
}

/// POST /api/v1/admin/pages/{id}/cleanup
///
/// Delete every version of the page beyond the `keep_count` most recent.
/// Best-effort: per-version failures are skipped and only successful
/// deletions are counted; an unknown page reports zero deletions.
pub async fn run_cleanup(
    State(state): State<AppState>,
    Path(page_id): Path<DbId>,
    body: Option<Json<CleanupRequest>>,
) -> AppResult<Json<DataResponse<CleanupOutcome>>> {
    let keep_count = body
        .and_then(|Json(req)| req.keep_count)
        .unwrap_or(DEFAULT_KEEP_COUNT);

    let outcome = cleanup_page(
        &state.pool,
        state.artifact_store.as_ref(),
        page_id,
        keep_count,
    )
    .await;

    Ok(Json(DataResponse { data: outcome }))
}
