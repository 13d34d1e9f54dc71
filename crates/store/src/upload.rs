//! Publish-side upload: size guard, version-id generation, bounded retry.

use std::time::Duration;

use loft_core::types::DbId;
use loft_core::version;

use crate::artifact::{ArtifactStore, PutMetadata, StoreError};

/// Backoff between write attempts, doubling from 500 ms.
///
/// The write is attempted once per entry plus a final attempt after the
/// last delay, i.e. at most `RETRY_DELAYS.len() + 1` attempts. The final
/// error surfaces untouched.
const RETRY_DELAYS: [Duration; 2] = [Duration::from_millis(500), Duration::from_millis(1000)];

/// A completed artifact upload.
#[derive(Debug, Clone)]
pub struct UploadedArtifact {
    pub version: String,
    pub storage_key: String,
    pub artifact_url: String,
    pub size_bytes: usize,
}

/// Freeze `html` into an immutable versioned artifact.
///
/// Rejects oversized payloads before any network call, generates the
/// version id and deterministic storage key, and writes with bounded
/// retry (3 attempts total).
pub async fn upload_artifact(
    store: &dyn ArtifactStore,
    page_id: DbId,
    html: &[u8],
    asset_bundle_version: Option<&str>,
) -> Result<UploadedArtifact, StoreError> {
    if html.len() > version::MAX_ARTIFACT_BYTES {
        return Err(StoreError::PayloadTooLarge {
            size_bytes: html.len(),
            limit_bytes: version::MAX_ARTIFACT_BYTES,
        });
    }

    let version_id = version::generate_version_id();
    let storage_key = version::storage_key(page_id, &version_id);
    let meta = PutMetadata {
        asset_bundle_version: asset_bundle_version.map(str::to_string),
        ..PutMetadata::default()
    };

    let artifact_url = put_with_retry(store, &storage_key, html, &meta).await?;

    Ok(UploadedArtifact {
        version: version_id,
        storage_key,
        artifact_url,
        size_bytes: html.len(),
    })
}

/// Write with exponential backoff, surfacing the final error untouched.
async fn put_with_retry(
    store: &dyn ArtifactStore,
    key: &str,
    body: &[u8],
    meta: &PutMetadata,
) -> Result<String, StoreError> {
    for (attempt, delay) in RETRY_DELAYS.iter().enumerate() {
        match store.put(key, body, meta).await {
            Ok(url) => return Ok(url),
            // Size and URL-resolution failures are not transient.
            Err(e @ StoreError::PayloadTooLarge { .. })
            | Err(e @ StoreError::InvalidUploadResponse(_)) => return Err(e),
            Err(e) => {
                tracing::warn!(
                    attempt = attempt + 1,
                    storage_key = key,
                    error = %e,
                    "Artifact upload attempt failed, retrying"
                );
                tokio::time::sleep(*delay).await;
            }
        }
    }

    // Final attempt after the last backoff.
    match store.put(key, body, meta).await {
        Ok(url) => Ok(url),
        Err(e) => {
            tracing::error!(storage_key = key, error = %e, "Artifact upload failed after all retries");
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use loft_core::version::MAX_ARTIFACT_BYTES;

    use super::*;
    use crate::memory::MemoryArtifactStore;

    /// Store double that fails a configurable number of times before
    /// succeeding, recording every attempt.
    struct FlakyStore {
        fail_first: usize,
        attempts: AtomicUsize,
    }

    #[async_trait]
    impl ArtifactStore for FlakyStore {
        async fn put(
            &self,
            key: &str,
            _body: &[u8],
            _meta: &PutMetadata,
        ) -> Result<String, StoreError> {
            let n = self.attempts.fetch_add(1, Ordering::SeqCst);
            if n < self.fail_first {
                Err(StoreError::Upload("transient backend failure".into()))
            } else {
                Ok(format!("memory://flaky/{key}"))
            }
        }

        async fn fetch(&self, _url: &str) -> Result<Vec<u8>, StoreError> {
            unimplemented!("not exercised")
        }

        async fn delete(&self, _key: &str) -> Result<(), StoreError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn upload_returns_version_key_and_url() {
        let store = MemoryArtifactStore::new();
        let uploaded = upload_artifact(&store, 7, b"<html>v</html>", None)
            .await
            .unwrap();

        assert_eq!(
            uploaded.storage_key,
            format!("pages/7/{}/index.html", uploaded.version)
        );
        assert!(uploaded.artifact_url.ends_with(&uploaded.storage_key));
        assert_eq!(uploaded.size_bytes, 14);
        assert!(store.contains_key(&uploaded.storage_key));
    }

    #[tokio::test]
    async fn oversized_payload_is_rejected_before_any_write() {
        let store = MemoryArtifactStore::new();
        let body = vec![b'x'; MAX_ARTIFACT_BYTES + 1];

        let err = upload_artifact(&store, 7, &body, None).await.unwrap_err();

        assert!(matches!(err, StoreError::PayloadTooLarge { .. }));
        assert!(store.is_empty(), "no network call may precede the guard");
    }

    #[tokio::test]
    async fn payload_at_exact_ceiling_succeeds() {
        let store = MemoryArtifactStore::new();
        let body = vec![b'x'; MAX_ARTIFACT_BYTES];
        assert!(upload_artifact(&store, 7, &body, None).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn transient_failures_are_retried() {
        let store = FlakyStore {
            fail_first: 2,
            attempts: AtomicUsize::new(0),
        };

        let uploaded = upload_artifact(&store, 7, b"<html></html>", None)
            .await
            .unwrap();

        assert_eq!(store.attempts.load(Ordering::SeqCst), 3);
        assert!(uploaded.artifact_url.starts_with("memory://flaky/"));
    }

    #[tokio::test(start_paused = true)]
    async fn final_error_surfaces_untouched_after_all_attempts() {
        let store = FlakyStore {
            fail_first: usize::MAX,
            attempts: AtomicUsize::new(0),
        };

        let err = upload_artifact(&store, 7, b"<html></html>", None)
            .await
            .unwrap_err();

        assert_eq!(store.attempts.load(Ordering::SeqCst), 3);
        assert!(matches!(err, StoreError::Upload(_)));
    }
}
