//! Loft publish & edge-routing API server library.
//!
//! Exposes the building blocks (config, state, error handling, routes, the
//! edge-rewrite middleware, publish/cleanup services) so integration tests
//! and the binary entrypoint can both access them.

pub mod background;
pub mod cleanup;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod publish;
pub mod response;
pub mod routes;
pub mod state;
