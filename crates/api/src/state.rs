use std::sync::Arc;

use loft_routing::RouteStore;
use loft_store::ArtifactStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`). The store and
/// route table are trait objects so integration tests can inject in-memory
/// backends behind the same seams production uses.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool (the version ledger).
    pub pool: loft_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Durable artifact storage.
    pub artifact_store: Arc<dyn ArtifactStore>,
    /// Low-latency route index.
    pub route_table: Arc<dyn RouteStore>,
}
