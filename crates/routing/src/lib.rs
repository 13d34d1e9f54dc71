//! The route table: a low-latency key-value index mapping
//! `(hostname, path)` to the current artifact location.
//!
//! The index is never a source of truth — every entry is reconstructible
//! from the page ledger, and a long-but-finite TTL bounds how stale a
//! missed update can get. [`RouteReader`] is the read capability shared by
//! the edge and standard execution environments; [`RouteStore`] adds
//! writes for the publish path.

pub mod kv;
pub mod memory;
pub mod record;

pub use kv::{KvConfig, KvRouteStore};
pub use memory::MemoryRouteStore;
pub use record::{RouteReader, RouteRecord, RouteStore, RoutingError, DEFAULT_ROUTE_TTL_SECS};
