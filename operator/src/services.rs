//! Trait wrappers around the leaf clients to allow fake injection during
//! tests.

use async_trait::async_trait;
use octostore::{FetchError, FetchResult, Github};
use octostore_gcs::{GcsStore, WriteError};

/// The fetch capability consumed by a transfer: a single GET for a given
/// API path.
#[async_trait]
pub trait ObjectFetcher: Sync + Send {
    async fn fetch(&self, identifier: &str) -> Result<FetchResult, FetchError>;
}

/// Trivial implementation of the ObjectFetcher trait for the Github client
/// struct
#[async_trait]
impl ObjectFetcher for Github {
    async fn fetch(&self, identifier: &str) -> Result<FetchResult, FetchError> {
        (self as &Github).fetch(identifier).await
    }
}

/// The write capability consumed by a transfer: write bytes to a bucket key,
/// optionally gzip-compressed.
#[async_trait]
pub trait ObjectStore: Sync + Send {
    async fn write(
        &self,
        bucket: &str,
        key: &str,
        payload: &[u8],
        content_type: Option<&str>,
        compress: bool,
    ) -> Result<(), WriteError>;
}

/// Trivial implementation of the ObjectStore trait for the GcsStore client
/// struct
#[async_trait]
impl ObjectStore for GcsStore {
    async fn write(
        &self,
        bucket: &str,
        key: &str,
        payload: &[u8],
        content_type: Option<&str>,
        compress: bool,
    ) -> Result<(), WriteError> {
        (self as &GcsStore)
            .write(bucket, key, payload, content_type, compress)
            .await
    }
}
