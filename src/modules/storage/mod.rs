//! Object storage for report photos.
//!
//! [`ObjectStorage`] is the seam the submission flow writes through;
//! [`MinIOClient`] implements it for MinIO or any S3-compatible service.

#[cfg(test)]
pub mod memory;
mod minio_client;
mod sigv4;

pub use minio_client::MinIOClient;

use async_trait::async_trait;

use crate::core::error::AppError;

/// Location of a stored object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub key: String,
    /// Publicly readable URL
    pub url: String,
}

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store a publicly readable object under `path` (relative to the public prefix)
    async fn put_public(
        &self,
        path: &str,
        data: &[u8],
        content_type: &str,
    ) -> Result<StoredObject, AppError>;

    async fn delete(&self, key: &str) -> Result<(), AppError>;
}
