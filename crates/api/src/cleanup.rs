//! Version cleanup: reclaim storage for superseded publishes.
//!
//! Best-effort by design. Per-version failures are logged and skipped —
//! the job is idempotent and safe to re-run, so partial progress beats an
//! aborted run. The artifact is always deleted before its ledger row so
//! the ledger never references bytes that no longer exist; an orphaned
//! blob from the reverse failure is harmless, reclaimable garbage.

use loft_core::types::DbId;
use loft_db::repositories::{PageRepo, VersionRepo};
use loft_store::ArtifactStore;
use serde::Serialize;
use sqlx::PgPool;

/// Versions retained per page when the caller does not say otherwise.
pub const DEFAULT_KEEP_COUNT: usize = 10;

/// Result of one cleanup run.
#[derive(Debug, Serialize)]
pub struct CleanupOutcome {
    /// Number of versions whose artifact and ledger row were both removed.
    pub deleted: u32,
}

/// Delete all versions of `page_id` beyond the `keep_count` most recent.
///
/// Never fails: an unknown page, an unlistable ledger, or any per-version
/// error yields a (possibly zero) count rather than an error.
pub async fn cleanup_page(
    pool: &PgPool,
    store: &dyn ArtifactStore,
    page_id: DbId,
    keep_count: usize,
) -> CleanupOutcome {
    let page = match PageRepo::find_by_id(pool, page_id).await {
        Ok(Some(page)) => page,
        Ok(None) => {
            tracing::warn!(page_id, "Cleanup requested for unknown page");
            return CleanupOutcome { deleted: 0 };
        }
        Err(e) => {
            tracing::error!(page_id, error = %e, "Cleanup could not load page");
            return CleanupOutcome { deleted: 0 };
        }
    };

    let versions = match VersionRepo::list_by_page(pool, page_id).await {
        Ok(versions) => versions,
        Err(e) => {
            tracing::error!(page_id, error = %e, "Cleanup could not list versions");
            return CleanupOutcome { deleted: 0 };
        }
    };

    let mut deleted: u32 = 0;

    // Newest first; everything past the retention window is eligible.
    for version in versions.iter().skip(keep_count) {
        // The current pointer normally sits inside the retained window;
        // this guard keeps a stale pointer from ever being deleted.
        if page.current_version.as_deref() == Some(version.version.as_str()) {
            tracing::warn!(
                page_id,
                version = %version.version,
                "Skipping current version outside retention window"
            );
            continue;
        }

        // Artifact first, ledger row second.
        if let Err(e) = store.delete(&version.storage_key).await {
            tracing::warn!(
                page_id,
                version = %version.version,
                storage_key = %version.storage_key,
                error = %e,
                "Cleanup failed to delete artifact, skipping version"
            );
            continue;
        }

        match VersionRepo::delete(pool, version.id).await {
            Ok(true) => deleted += 1,
            Ok(false) => {
                // Row vanished between list and delete; a concurrent run
                // already reclaimed it.
                tracing::debug!(page_id, version = %version.version, "Ledger row already gone");
            }
            Err(e) => {
                tracing::warn!(
                    page_id,
                    version = %version.version,
                    error = %e,
                    "Cleanup failed to delete ledger row"
                );
            }
        }
    }

    if deleted > 0 {
        tracing::info!(page_id, deleted, keep_count, "Cleanup reclaimed versions");
    }

    CleanupOutcome { deleted }
}
