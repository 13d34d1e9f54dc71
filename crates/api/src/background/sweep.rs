//! Periodic retention sweep.
//!
//! Walks every page and runs the cleanup routine with the default keep
//! count. This is the out-of-band pass that also catches versions whose
//! publish succeeded but whose administrative cleanup never ran. Runs on a
//! fixed interval using `tokio::time::interval` until cancelled.

use std::sync::Arc;
use std::time::Duration;

use loft_db::repositories::PageRepo;
use loft_store::ArtifactStore;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

use crate::cleanup::cleanup_page;

/// Run the retention sweep loop.
///
/// Sweeps every `interval` with `keep_count` retained versions per page.
/// Per-page failures are logged and never abort the sweep.
pub async fn run(
    pool: PgPool,
    store: Arc<dyn ArtifactStore>,
    keep_count: usize,
    interval: Duration,
    cancel: CancellationToken,
) {
    tracing::info!(
        keep_count,
        interval_secs = interval.as_secs(),
        "Retention sweep started"
    );

    let mut ticker = tokio::time::interval(interval);
    // The immediate first tick would sweep at startup; skip it.
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Retention sweep stopping");
                break;
            }
            _ = ticker.tick() => {
                let page_ids = match PageRepo::list_ids(&pool).await {
                    Ok(ids) => ids,
                    Err(e) => {
                        tracing::error!(error = %e, "Retention sweep: could not list pages");
                        continue;
                    }
                };

                let mut total_deleted: u64 = 0;
                for page_id in page_ids {
                    let outcome = cleanup_page(&pool, store.as_ref(), page_id, keep_count).await;
                    total_deleted += u64::from(outcome.deleted);
                }

                if total_deleted > 0 {
                    tracing::info!(total_deleted, "Retention sweep: reclaimed versions");
                } else {
                    tracing::debug!("Retention sweep: nothing to reclaim");
                }
            }
        }
    }
}
