//! S3-backed artifact store.
//!
//! Writes go through the AWS SDK; reads come back over plain HTTP from the
//! bucket's public base URL, the same URL the artifact proxy resolves at
//! request time.

use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;

use crate::artifact::{ArtifactStore, PutMetadata, StoreError};

/// HTTP timeout for artifact fetches.
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for the S3 artifact backend.
#[derive(Debug, Clone)]
pub struct S3Config {
    pub bucket: String,
    pub region: String,
    /// Public base URL the bucket is served from (CDN or website endpoint).
    /// Artifact URLs are `{public_base_url}/{key}`.
    pub public_base_url: String,
}

/// Artifact store backed by an S3 bucket.
pub struct S3ArtifactStore {
    client: aws_sdk_s3::Client,
    http: reqwest::Client,
    config: S3Config,
}

impl S3ArtifactStore {
    /// Build a store from the ambient AWS environment and the given config.
    pub async fn new(config: S3Config) -> Self {
        let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(config.region.clone()))
            .load()
            .await;
        let client = aws_sdk_s3::Client::new(&aws_config);
        let http = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self {
            client,
            http,
            config,
        }
    }

    fn public_url(&self, key: &str) -> Result<String, StoreError> {
        let base = self.config.public_base_url.trim_end_matches('/');
        if base.is_empty() {
            return Err(StoreError::InvalidUploadResponse(
                "no public base URL configured for bucket".to_string(),
            ));
        }
        Ok(format!("{base}/{key}"))
    }
}

#[async_trait]
impl ArtifactStore for S3ArtifactStore {
    async fn put(&self, key: &str, body: &[u8], meta: &PutMetadata) -> Result<String, StoreError> {
        let mut request = self
            .client
            .put_object()
            .bucket(&self.config.bucket)
            .key(key)
            .body(ByteStream::from(body.to_vec()))
            .content_type(&meta.content_type)
            .cache_control(&meta.cache_control);

        if let Some(bundle) = &meta.asset_bundle_version {
            request = request.metadata("asset-bundle-version", bundle);
        }

        request
            .send()
            .await
            .map_err(|e| StoreError::Upload(e.to_string()))?;

        // A write that cannot be resolved to a URL is a hard failure, not
        // a partial success.
        self.public_url(key)
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>, StoreError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| StoreError::Fetch(e.to_string()))?;

        if !response.status().is_success() {
            return Err(StoreError::UpstreamStatus(response.status().as_u16()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| StoreError::Fetch(e.to_string()))?;
        Ok(bytes.to_vec())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.client
            .delete_object()
            .bucket(&self.config.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StoreError::Delete(e.to_string()))?;
        Ok(())
    }
}
