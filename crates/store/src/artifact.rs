//! The artifact-store provider trait and its error type.

use async_trait::async_trait;
use loft_core::error::CoreError;

/// Error type for artifact store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Payload exceeded the application-level size ceiling. Never retried.
    #[error("Payload of {size_bytes} bytes exceeds the {limit_bytes}-byte ceiling")]
    PayloadTooLarge { size_bytes: usize, limit_bytes: usize },

    /// The backend accepted the write but did not yield a resolvable
    /// public URL. A partial result is never returned in its place.
    #[error("Upload response did not resolve to a public URL: {0}")]
    InvalidUploadResponse(String),

    /// The write failed (after retries the final error surfaces untouched).
    #[error("Artifact upload failed: {0}")]
    Upload(String),

    /// Reading artifact bytes back failed.
    #[error("Artifact fetch failed: {0}")]
    Fetch(String),

    /// The upstream returned a non-success status on fetch.
    #[error("Artifact upstream returned HTTP {0}")]
    UpstreamStatus(u16),

    /// Deleting an artifact failed.
    #[error("Artifact delete failed: {0}")]
    Delete(String),
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::PayloadTooLarge {
                size_bytes,
                limit_bytes,
            } => CoreError::PayloadTooLarge {
                size_bytes,
                limit_bytes,
            },
            other => CoreError::Internal(other.to_string()),
        }
    }
}

/// Write-time metadata attached to every stored artifact.
#[derive(Debug, Clone)]
pub struct PutMetadata {
    pub content_type: String,
    /// Artifacts are immutable (versioned keys), so the default is an
    /// effectively infinite client cache lifetime.
    pub cache_control: String,
    /// Version of the asset bundle the page was rendered against.
    pub asset_bundle_version: Option<String>,
}

impl Default for PutMetadata {
    fn default() -> Self {
        Self {
            content_type: "text/html; charset=utf-8".to_string(),
            cache_control: "public, max-age=31536000, immutable".to_string(),
            asset_bundle_version: None,
        }
    }
}

/// Provider seam for durable artifact storage.
///
/// Implementations must treat keys as write-once: a `put` to an existing
/// key only happens when a publish retries the same version after a
/// transient failure, and both writes carry identical bytes.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Write `body` at `key`, returning the resolved public URL.
    async fn put(&self, key: &str, body: &[u8], meta: &PutMetadata) -> Result<String, StoreError>;

    /// Read artifact bytes back from a previously resolved public URL.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, StoreError>;

    /// Delete the artifact at `key`. Deleting an absent key succeeds.
    async fn delete(&self, key: &str) -> Result<(), StoreError>;
}
