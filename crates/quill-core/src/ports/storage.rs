//! Object storage port.

use async_trait::async_trait;

/// Durable blob storage addressable by public URL.
///
/// Writes are terminal for the request: there is no retry and the
/// upload-then-persist flow compensates with a best-effort [`delete`]
/// when the subsequent record write fails.
///
/// [`delete`]: ObjectStore::delete
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write `data` under `key`, mark it publicly readable, and return
    /// the deterministic public URL.
    async fn put_public(
        &self,
        key: &str,
        data: &[u8],
        content_type: &str,
    ) -> Result<String, StorageError>;

    /// Delete the object stored under `key`.
    async fn delete(&self, key: &str) -> Result<(), StorageError>;
}

/// Object storage errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage configuration error: {0}")]
    Configuration(String),

    #[error("Storage backend error: {0}")]
    Backend(String),
}
