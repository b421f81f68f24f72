//! Binary attachment storage

use async_trait::async_trait;

use crate::error::AppResult;

/// Flat namespace of named blobs.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn write(&self, name: &str, bytes: &[u8]) -> AppResult<()>;

    /// Fails with `AppError::ItemNotFound` when no blob has that name
    async fn read(&self, name: &str) -> AppResult<Vec<u8>>;

    /// Removing a missing blob is not an error
    async fn remove(&self, name: &str) -> AppResult<()>;
}
