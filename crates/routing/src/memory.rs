//! In-memory route table for tests and local development.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use loft_core::route_key::RouteKey;

use crate::record::{RouteReader, RouteRecord, RouteStore, RoutingError};

struct Entry {
    record: RouteRecord,
    expires_at: Instant,
}

/// TTL-evicting route table behind a single mutex.
///
/// Correctness never depends on this map surviving a restart — it is an
/// ephemeral stand-in for the external key-value service.
#[derive(Default)]
pub struct MemoryRouteStore {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryRouteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live (unexpired) entries. Test helper.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .lock()
            .unwrap()
            .values()
            .filter(|e| e.expires_at > now)
            .count()
    }

    /// Whether the table holds no live entries. Test helper.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl RouteReader for MemoryRouteStore {
    async fn get_route(
        &self,
        hostname: &str,
        path: &str,
    ) -> Result<Option<RouteRecord>, RoutingError> {
        let key = RouteKey::new(hostname, path).to_string();
        let mut entries = self.entries.lock().unwrap();
        match entries.get(&key) {
            Some(entry) if entry.expires_at > Instant::now() => Ok(Some(entry.record.clone())),
            Some(_) => {
                // Expired: evict on read.
                entries.remove(&key);
                Ok(None)
            }
            None => Ok(None),
        }
    }
}

#[async_trait]
impl RouteStore for MemoryRouteStore {
    async fn set_route(
        &self,
        hostname: &str,
        path: &str,
        record: &RouteRecord,
        ttl_seconds: u64,
    ) -> Result<(), RoutingError> {
        let key = RouteKey::new(hostname, path).to_string();
        let mut entries = self.entries.lock().unwrap();
        // Opportunistically prune expired entries so the map stays bounded.
        let now = Instant::now();
        entries.retain(|_, e| e.expires_at > now);
        entries.insert(
            key,
            Entry {
                record: record.clone(),
                expires_at: now + Duration::from_secs(ttl_seconds),
            },
        );
        Ok(())
    }

    async fn delete_route(&self, hostname: &str, path: &str) -> Result<(), RoutingError> {
        let key = RouteKey::new(hostname, path).to_string();
        self.entries.lock().unwrap().remove(&key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(version: &str) -> RouteRecord {
        RouteRecord {
            page_id: 1,
            version: version.to_string(),
            artifact_url: Some(format!("memory://artifacts/pages/1/{version}/index.html")),
            published_at: chrono::Utc::now(),
        }
    }

    #[tokio::test]
    async fn set_then_get_returns_record() {
        let table = MemoryRouteStore::new();
        table
            .set_route("foo.example.com", "/", &record("v1"), 60)
            .await
            .unwrap();

        let found = table.get_route("foo.example.com", "/").await.unwrap();
        assert_eq!(found.unwrap().version, "v1");
    }

    #[tokio::test]
    async fn get_by_key_delegates_and_rejects_raw_storage_keys() {
        let table = MemoryRouteStore::new();
        table
            .set_route("foo.example.com", "/", &record("v1"), 60)
            .await
            .unwrap();

        let found = table
            .get_route_by_key("route:foo.example.com:/")
            .await
            .unwrap();
        assert_eq!(found.unwrap().version, "v1");

        let err = table
            .get_route_by_key("pages/1/v1/index.html")
            .await
            .unwrap_err();
        assert!(matches!(err, RoutingError::InvalidKey(_)));
    }

    #[tokio::test]
    async fn expired_entries_are_evicted() {
        let table = MemoryRouteStore::new();
        table
            .set_route("foo.example.com", "/", &record("v1"), 0)
            .await
            .unwrap();

        assert!(table
            .get_route("foo.example.com", "/")
            .await
            .unwrap()
            .is_none());
        assert!(table.is_empty());
    }

    #[tokio::test]
    async fn republish_overwrites_the_entry() {
        let table = MemoryRouteStore::new();
        table
            .set_route("foo.example.com", "/", &record("v1"), 60)
            .await
            .unwrap();
        table
            .set_route("foo.example.com", "/", &record("v2"), 60)
            .await
            .unwrap();

        let found = table.get_route("foo.example.com", "/").await.unwrap();
        assert_eq!(found.unwrap().version, "v2");
        assert_eq!(table.len(), 1);
    }
}
