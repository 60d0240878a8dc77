//! In-memory storage backend.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::CartStorage;
use crate::error::StorageError;

/// HashMap-backed storage. The default for tests and the fallback when
/// no data directory is usable.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl CartStorage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.lock().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_remove() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get("cart").await.expect("get"), None);

        storage.set("cart", "{\"items\":[]}").await.expect("set");
        assert_eq!(
            storage.get("cart").await.expect("get").as_deref(),
            Some("{\"items\":[]}")
        );

        storage.remove("cart").await.expect("remove");
        assert_eq!(storage.get("cart").await.expect("get"), None);

        // removing again is fine
        storage.remove("cart").await.expect("remove");
    }

    #[tokio::test]
    async fn test_set_replaces() {
        let storage = MemoryStorage::new();
        storage.set("k", "a").await.expect("set");
        storage.set("k", "b").await.expect("set");
        assert_eq!(storage.get("k").await.expect("get").as_deref(), Some("b"));
    }
}
