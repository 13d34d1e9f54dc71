//! Domain types and pure logic for the Loft publish pipeline.
//!
//! No I/O lives here: version-id generation, storage-key construction,
//! payload limits, route-key parsing, and hostname classification are all
//! deterministic (or at most clock/RNG-dependent) building blocks consumed
//! by the store, routing, and API crates.

pub mod error;
pub mod hashing;
pub mod host;
pub mod route_key;
pub mod types;
pub mod version;
