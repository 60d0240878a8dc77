//! Per-installation user identity.
//!
//! Orders and persisted carts are keyed by a user id that must stay
//! stable across app restarts on the same installation. The default
//! provider derives it from a stored device id; when storage is
//! unusable a generated guest id keeps the app functional for the
//! session.

use std::sync::Arc;

use async_trait::async_trait;
use rand::distr::Alphanumeric;
use rand::Rng;
use tokio::sync::OnceCell;
use tracing::warn;
use uuid::Uuid;

use crate::error::IdentityError;
use crate::storage::{keys, CartStorage};

/// Prefix for generated guest ids, which are never treated as a stable
/// installation identity.
const GUEST_PREFIX: &str = "guest_";

/// Supplies the stable per-installation user identifier.
///
/// Implementations must be idempotent: repeated calls after the first
/// successful resolution return the same id without side effects.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolve the user id for this installation.
    ///
    /// # Errors
    ///
    /// Returns an error when resolution fails; callers are expected to
    /// degrade to [`fallback_user_id`] rather than propagate it.
    async fn user_id(&self) -> Result<String, IdentityError>;
}

/// Generate a session-scoped guest id: timestamp plus random suffix.
///
/// Used whenever real identity resolution is impossible; uniqueness is
/// good enough for one installation's lifetime, not globally.
#[must_use]
pub fn fallback_user_id() -> String {
    let suffix: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(9)
        .map(char::from)
        .collect();
    format!(
        "{GUEST_PREFIX}{}_{}",
        chrono::Utc::now().timestamp_millis(),
        suffix.to_ascii_lowercase()
    )
}

/// Identity derived from a stored device id.
///
/// Resolution order:
/// 1. A previously stored user id wins, unless it is a guest id.
/// 2. Otherwise the stored device id (generated and saved on first
///    run) is wrapped as `user_<device_id>` and saved.
/// 3. Any storage failure degrades to [`fallback_user_id`] - this
///    provider never returns an error.
pub struct DeviceIdentity {
    storage: Arc<dyn CartStorage>,
    resolved: OnceCell<String>,
}

impl DeviceIdentity {
    /// Create a provider over the installation's storage backend.
    #[must_use]
    pub fn new(storage: Arc<dyn CartStorage>) -> Self {
        Self {
            storage,
            resolved: OnceCell::new(),
        }
    }

    async fn resolve(&self) -> String {
        match self.storage.get(keys::USER_ID).await {
            Ok(Some(stored)) if !stored.starts_with(GUEST_PREFIX) => return stored,
            Ok(_) => {}
            Err(e) => {
                warn!(error = %e, "reading stored user id failed, using guest id");
                return fallback_user_id();
            }
        }

        let device_id = match self.device_id().await {
            Ok(id) => id,
            Err(e) => {
                warn!(error = %e, "device id unavailable, using guest id");
                return fallback_user_id();
            }
        };

        let user_id = format!("user_{device_id}");
        if let Err(e) = self.storage.set(keys::USER_ID, &user_id).await {
            // Still usable this session; the same id re-derives next start.
            warn!(error = %e, "persisting user id failed");
        }
        user_id
    }

    async fn device_id(&self) -> Result<String, IdentityError> {
        if let Some(stored) = self.storage.get(keys::DEVICE_ID).await? {
            return Ok(stored);
        }
        let generated = format!("dev_{}", Uuid::new_v4().simple());
        self.storage.set(keys::DEVICE_ID, &generated).await?;
        Ok(generated)
    }
}

#[async_trait]
impl IdentityProvider for DeviceIdentity {
    async fn user_id(&self) -> Result<String, IdentityError> {
        let id = self
            .resolved
            .get_or_init(|| async { self.resolve().await })
            .await;
        Ok(id.clone())
    }
}

/// Identity provider that always returns the same id. For tests and
/// single-user tooling.
#[derive(Debug, Clone)]
pub struct FixedIdentity(pub String);

#[async_trait]
impl IdentityProvider for FixedIdentity {
    async fn user_id(&self) -> Result<String, IdentityError> {
        Ok(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use crate::storage::MemoryStorage;

    struct BrokenStorage;

    #[async_trait]
    impl CartStorage for BrokenStorage {
        async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("broken".to_string()))
        }

        async fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("broken".to_string()))
        }

        async fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("broken".to_string()))
        }
    }

    #[test]
    fn test_fallback_user_id_shape() {
        let id = fallback_user_id();
        assert!(id.starts_with(GUEST_PREFIX));
        assert!(id.len() > GUEST_PREFIX.len() + 10);
    }

    #[tokio::test]
    async fn test_stable_across_calls_and_instances() {
        let storage: Arc<dyn CartStorage> = Arc::new(MemoryStorage::new());

        let first = DeviceIdentity::new(Arc::clone(&storage));
        let id_a = first.user_id().await.expect("resolve");
        let id_b = first.user_id().await.expect("resolve");
        assert_eq!(id_a, id_b);

        // A second provider over the same storage sees the same id.
        let second = DeviceIdentity::new(Arc::clone(&storage));
        assert_eq!(second.user_id().await.expect("resolve"), id_a);

        assert!(id_a.starts_with("user_dev_"));
    }

    #[tokio::test]
    async fn test_stored_user_id_wins() {
        let storage: Arc<dyn CartStorage> = Arc::new(MemoryStorage::new());
        storage
            .set(keys::USER_ID, "user_android_1234")
            .await
            .expect("seed");

        let identity = DeviceIdentity::new(storage);
        assert_eq!(identity.user_id().await.expect("resolve"), "user_android_1234");
    }

    #[tokio::test]
    async fn test_stored_guest_id_is_replaced() {
        let storage: Arc<dyn CartStorage> = Arc::new(MemoryStorage::new());
        storage
            .set(keys::USER_ID, "guest_1700000000000_abcdefghi")
            .await
            .expect("seed");

        let identity = DeviceIdentity::new(Arc::clone(&storage));
        let id = identity.user_id().await.expect("resolve");
        assert!(id.starts_with("user_dev_"));
        assert_eq!(
            storage.get(keys::USER_ID).await.expect("get").as_deref(),
            Some(id.as_str())
        );
    }

    #[tokio::test]
    async fn test_broken_storage_yields_guest_id() {
        let identity = DeviceIdentity::new(Arc::new(BrokenStorage));
        let id = identity.user_id().await.expect("never errors");
        assert!(id.starts_with(GUEST_PREFIX));

        // Idempotent within the instance even on the fallback path.
        assert_eq!(identity.user_id().await.expect("never errors"), id);
    }
}
