//! REST key-value backend for the route table.
//!
//! Speaks the Upstash-style REST protocol (`GET /get/{key}`,
//! `POST /set/{key}?EX={ttl}`, `POST /del/{key}`) over plain HTTP with a
//! bearer token. Being HTTP-only is what makes the same client usable from
//! edge compute, where database drivers are unavailable.

use std::time::Duration;

use async_trait::async_trait;
use loft_core::route_key::RouteKey;

use crate::record::{RouteReader, RouteRecord, RouteStore, RoutingError};

/// HTTP timeout per key-value request. The edge lookup must stay fast;
/// a slow route table is treated as a miss by the caller.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(2);

/// Connection settings for the REST key-value service.
#[derive(Debug, Clone)]
pub struct KvConfig {
    pub base_url: String,
    pub token: String,
}

/// Shape of the backend's `{"result": ...}` response envelope.
#[derive(Debug, serde::Deserialize)]
struct KvResponse {
    result: Option<String>,
}

/// Route table backed by a REST key-value service.
pub struct KvRouteStore {
    client: reqwest::Client,
    config: KvConfig,
}

impl KvRouteStore {
    pub fn new(config: KvConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self { client, config }
    }

    /// Build `{base_url}/{op}/{key}` with the key percent-encoded as a
    /// single path segment (route keys contain `:` and `/`).
    fn endpoint(&self, op: &str, key: &str) -> Result<reqwest::Url, RoutingError> {
        let mut url = reqwest::Url::parse(&self.config.base_url)
            .map_err(|e| RoutingError::InvalidKey(format!("bad KV base URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| RoutingError::InvalidKey("KV base URL cannot be a base".into()))?
            .push(op)
            .push(key);
        Ok(url)
    }
}

#[async_trait]
impl RouteReader for KvRouteStore {
    async fn get_route(
        &self,
        hostname: &str,
        path: &str,
    ) -> Result<Option<RouteRecord>, RoutingError> {
        let key = RouteKey::new(hostname, path).to_string();
        let url = self.endpoint("get", &key)?;

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.config.token)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            tracing::warn!(key = %key, status, "Route table read failed");
            return Err(RoutingError::Backend(status));
        }

        let envelope: KvResponse = response.json().await?;
        match envelope.result {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl RouteStore for KvRouteStore {
    async fn set_route(
        &self,
        hostname: &str,
        path: &str,
        record: &RouteRecord,
        ttl_seconds: u64,
    ) -> Result<(), RoutingError> {
        let key = RouteKey::new(hostname, path).to_string();
        let mut url = self.endpoint("set", &key)?;
        url.query_pairs_mut()
            .append_pair("EX", &ttl_seconds.to_string());

        let body = serde_json::to_string(record)?;
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.config.token)
            .body(body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            tracing::warn!(key = %key, status, ttl_seconds, "Route table write failed");
            return Err(RoutingError::Backend(status));
        }
        Ok(())
    }

    async fn delete_route(&self, hostname: &str, path: &str) -> Result<(), RoutingError> {
        let key = RouteKey::new(hostname, path).to_string();
        let url = self.endpoint("del", &key)?;

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.config.token)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            tracing::warn!(key = %key, status, "Route table delete failed");
            return Err(RoutingError::Backend(status));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_encodes_route_key_as_one_segment() {
        let store = KvRouteStore::new(KvConfig {
            base_url: "https://kv.example.com".into(),
            token: "secret".into(),
        });

        let url = store
            .endpoint("get", "route:foo.example.com:/pricing")
            .unwrap();

        // ':' and '/' inside the key must not introduce path segments.
        assert_eq!(
            url.as_str(),
            "https://kv.example.com/get/route:foo.example.com:%2Fpricing"
        );
    }
}
