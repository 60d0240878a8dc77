//! File-backed storage backend.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use super::CartStorage;
use crate::error::StorageError;

/// Stores each key as one JSON file inside a data directory.
///
/// The device-local durable store: `<dir>/<key>.json`. Writes go
/// through a temp file and a rename so a crash mid-write leaves either
/// the old blob or the new one, never a torn file.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Create a store rooted at `dir`. The directory is created on the
    /// first write, not here.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The directory this store writes into.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        // Keys are short identifiers; strip anything path-like.
        let safe: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        self.dir.join(format!("{safe}.json"))
    }

    fn io_error(key: &str, source: std::io::Error) -> StorageError {
        StorageError::Io {
            key: key.to_string(),
            source,
        }
    }
}

#[async_trait]
impl CartStorage for FileStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Self::io_error(key, e)),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| Self::io_error(key, e))?;

        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, value)
            .await
            .map_err(|e| Self::io_error(key, e))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| Self::io_error(key, e))?;

        debug!(key, bytes = value.len(), "wrote storage blob");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Self::io_error(key, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = FileStorage::new(dir.path());

        assert_eq!(storage.get("cart").await.expect("get"), None);
        storage.set("cart", "{\"items\":[]}").await.expect("set");
        assert_eq!(
            storage.get("cart").await.expect("get").as_deref(),
            Some("{\"items\":[]}")
        );

        storage.remove("cart").await.expect("remove");
        assert_eq!(storage.get("cart").await.expect("get"), None);
    }

    #[tokio::test]
    async fn test_keys_map_to_distinct_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = FileStorage::new(dir.path());

        storage.set("cart", "a").await.expect("set");
        storage.set("user_id", "b").await.expect("set");
        assert_eq!(storage.get("cart").await.expect("get").as_deref(), Some("a"));
        assert_eq!(
            storage.get("user_id").await.expect("get").as_deref(),
            Some("b")
        );
    }

    #[tokio::test]
    async fn test_pathlike_key_is_sanitized() {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = FileStorage::new(dir.path());

        storage.set("../escape", "x").await.expect("set");
        let escaped = dir.path().parent().expect("parent").join("escape.json");
        assert!(!escaped.exists());
    }
}
