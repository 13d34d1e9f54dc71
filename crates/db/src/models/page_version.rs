//! Page version (publish ledger) entity model and DTOs.

use loft_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One immutable publish event from the `page_versions` table.
///
/// Invariant: `storage_key` and the bytes it points at are never mutated
/// after insert. Rows are only ever removed wholesale by version cleanup.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PageVersion {
    pub id: DbId,
    pub page_id: DbId,
    /// Timestamp-plus-random-suffix id, unique per page.
    pub version: String,
    /// Deterministic object-store key: `pages/{page_id}/{version}/index.html`.
    pub storage_key: String,
    /// Resolved public URL of the artifact.
    pub artifact_url: String,
    pub size_bytes: i64,
    /// SHA-256 hex digest of the artifact body.
    pub checksum: String,
    pub status: String,
    pub created_at: Timestamp,
}

/// DTO for recording a publish event.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePageVersion {
    pub page_id: DbId,
    pub version: String,
    pub storage_key: String,
    pub artifact_url: String,
    pub size_bytes: i64,
    pub checksum: String,
}
