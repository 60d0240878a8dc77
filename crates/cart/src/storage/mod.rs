//! Persistent key-value storage port.
//!
//! The cart manager and the identity provider persist small string
//! blobs under well-known keys. The backend is chosen once at startup
//! (file-backed on a real installation, in-memory in tests, no-op when
//! no durable storage exists) and injected as `Arc<dyn CartStorage>` -
//! callers never branch on the platform per call.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use async_trait::async_trait;

use crate::error::StorageError;

/// Well-known storage keys. One serialized blob per key.
pub mod keys {
    /// The serialized [`red_lantern_core::CartState`] blob.
    pub const CART: &str = "cart";
    /// The resolved per-installation user id.
    pub const USER_ID: &str = "user_id";
    /// The stable device id the user id is derived from.
    pub const DEVICE_ID: &str = "device_id";
}

/// Asynchronous string-blob storage keyed by a short name.
///
/// Implementations must be safe to share across tasks. Writes replace
/// the whole value for a key; there is no partial update.
#[async_trait]
pub trait CartStorage: Send + Sync {
    /// Read the blob stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend cannot be read.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous blob.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend cannot be written.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the blob under `key`. Deleting an absent key succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend cannot be written.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Storage that never holds anything.
///
/// Used where no durable storage exists; reads see nothing and writes
/// succeed silently, so the cart works for the process lifetime only.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopStorage;

#[async_trait]
impl CartStorage for NoopStorage {
    async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Ok(())
    }

    async fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_noop_storage_reads_nothing() {
        let storage = NoopStorage;
        storage.set("cart", "{}").await.expect("set");
        assert_eq!(storage.get("cart").await.expect("get"), None);
        storage.remove("cart").await.expect("remove");
    }
}
