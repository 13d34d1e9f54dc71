//! In-memory artifact store for tests and local development.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::artifact::{ArtifactStore, PutMetadata, StoreError};

/// Base URL the memory backend mints artifact URLs under.
const MEMORY_BASE_URL: &str = "memory://artifacts";

/// Artifact store holding everything in a process-local map.
///
/// Keys map to stored bytes; `fetch` resolves the same `memory://` URLs
/// that `put` returns, so publish → resolve round-trips work without any
/// external service.
#[derive(Default)]
pub struct MemoryArtifactStore {
    objects: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored artifacts. Test helper.
    pub fn len(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    /// Whether the store holds no artifacts. Test helper.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether an artifact exists at `key`. Test helper.
    pub fn contains_key(&self, key: &str) -> bool {
        self.objects.lock().unwrap().contains_key(key)
    }

    fn key_from_url(url: &str) -> Option<String> {
        url.strip_prefix(MEMORY_BASE_URL)
            .and_then(|rest| rest.strip_prefix('/'))
            .map(str::to_string)
    }
}

#[async_trait]
impl ArtifactStore for MemoryArtifactStore {
    async fn put(&self, key: &str, body: &[u8], _meta: &PutMetadata) -> Result<String, StoreError> {
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), body.to_vec());
        Ok(format!("{MEMORY_BASE_URL}/{key}"))
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>, StoreError> {
        let key = Self::key_from_url(url)
            .ok_or_else(|| StoreError::Fetch(format!("not a memory artifact URL: {url}")))?;
        self.objects
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
            .ok_or(StoreError::UpstreamStatus(404))
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.objects.lock().unwrap().remove(key);
        Ok(())
    }
}
