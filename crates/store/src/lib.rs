//! Artifact storage: durable, immutable HTML artifacts in an object store.
//!
//! [`ArtifactStore`] is the provider seam; [`S3ArtifactStore`] is the
//! production backend and [`MemoryArtifactStore`] backs tests and local
//! development. [`upload::upload_artifact`] is the publish-side entry point
//! that enforces the size ceiling and retries transient write failures.

pub mod artifact;
pub mod memory;
pub mod s3;
pub mod upload;

pub use artifact::{ArtifactStore, PutMetadata, StoreError};
pub use memory::MemoryArtifactStore;
pub use s3::S3ArtifactStore;
pub use upload::{upload_artifact, UploadedArtifact};
