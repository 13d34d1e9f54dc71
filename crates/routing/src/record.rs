//! Route record type and the reader/store capability traits.

use async_trait::async_trait;
use loft_core::error::CoreError;
use loft_core::route_key::RouteKey;
use loft_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};

/// Default route TTL: one year.
///
/// Long enough that entries never expire under normal republish cadence,
/// finite so an entry that is never refreshed eventually disappears and
/// the fallback path takes over instead of serving stale routing forever.
pub const DEFAULT_ROUTE_TTL_SECS: u64 = 365 * 24 * 60 * 60;

/// Error type for route-table operations.
#[derive(Debug, thiserror::Error)]
pub enum RoutingError {
    /// The supplied route key failed validation.
    #[error("Invalid route key: {0}")]
    InvalidKey(String),

    /// The key-value backend was unreachable or timed out.
    #[error("Route table request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The key-value backend answered with a non-success status.
    #[error("Route table backend returned HTTP {0}")]
    Backend(u16),

    /// A stored value could not be decoded as a route record.
    #[error("Route record decode failed: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<CoreError> for RoutingError {
    fn from(err: CoreError) -> Self {
        RoutingError::InvalidKey(err.to_string())
    }
}

/// The value stored per `(hostname, path)` key.
///
/// `artifact_url` is optional at the type level: records written by older
/// publishes may lack it, and the proxy must degrade to a 404 rather than
/// trusting a partial record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteRecord {
    pub page_id: DbId,
    pub version: String,
    #[serde(default)]
    pub artifact_url: Option<String>,
    pub published_at: Timestamp,
}

/// Read capability: available in both the standard and edge execution
/// environments. Implementations must not require anything unavailable at
/// the edge (in practice: HTTP only, no database drivers).
#[async_trait]
pub trait RouteReader: Send + Sync {
    /// Look up the record for `(hostname, path)`, if any.
    async fn get_route(
        &self,
        hostname: &str,
        path: &str,
    ) -> Result<Option<RouteRecord>, RoutingError>;

    /// Parse an opaque `route:{hostname}:{path}` token and delegate to
    /// [`get_route`](Self::get_route). Raw storage keys are rejected by
    /// the parse step.
    async fn get_route_by_key(&self, token: &str) -> Result<Option<RouteRecord>, RoutingError> {
        let key = RouteKey::parse(token)?;
        self.get_route(key.hostname(), key.path()).await
    }
}

/// Write capability, used by the publish path and route self-healing.
#[async_trait]
pub trait RouteStore: RouteReader {
    /// Insert or replace the record for `(hostname, path)` with a TTL.
    async fn set_route(
        &self,
        hostname: &str,
        path: &str,
        record: &RouteRecord,
        ttl_seconds: u64,
    ) -> Result<(), RoutingError>;

    /// Remove the record for `(hostname, path)`, if present.
    async fn delete_route(&self, hostname: &str, path: &str) -> Result<(), RoutingError>;
}
