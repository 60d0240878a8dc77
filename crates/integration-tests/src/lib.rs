//! Integration test support for Red Lantern.
//!
//! Builders for isolated cart managers and storage test doubles shared
//! by the test files under `tests/`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use red_lantern_cart::{
    CartManager, CartStorage, FixedIdentity, MemoryStorage, StorageError,
};
use red_lantern_core::{CartLine, DishId, Price};

/// A cart manager over fresh in-memory storage and a fixed identity.
#[must_use]
pub fn memory_manager(owner: &str) -> CartManager {
    CartManager::new(
        Arc::new(MemoryStorage::new()),
        Arc::new(FixedIdentity(owner.to_string())),
    )
}

/// A cart manager over the given storage and a fixed identity.
#[must_use]
pub fn manager_over(storage: Arc<dyn CartStorage>, owner: &str) -> CartManager {
    CartManager::new(storage, Arc::new(FixedIdentity(owner.to_string())))
}

/// A cart line for tests.
///
/// # Panics
///
/// Panics when `price` is not a valid non-negative decimal.
#[must_use]
pub fn line(id: i64, name: &str, price: &str, quantity: u32) -> CartLine {
    CartLine {
        id: DishId::new(id),
        name: name.to_string(),
        category: "Staple".to_string(),
        unit_price: price
            .parse()
            .ok()
            .and_then(|amount| Price::new(amount).ok())
            .expect("valid test price"),
        quantity,
        image_url: None,
        notes: None,
    }
}

/// Storage wrapper whose writes can be made to fail on demand.
///
/// Reads always pass through, so initialization works; flipping
/// `fail_writes` simulates a full disk or a revoked storage grant
/// mid-session.
pub struct FlakyStorage {
    inner: MemoryStorage,
    fail_writes: AtomicBool,
    write_attempts: AtomicUsize,
}

impl FlakyStorage {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: MemoryStorage::new(),
            fail_writes: AtomicBool::new(false),
            write_attempts: AtomicUsize::new(0),
        }
    }

    /// Make subsequent writes fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// How many writes were attempted, including failed ones.
    #[must_use]
    pub fn write_attempts(&self) -> usize {
        self.write_attempts.load(Ordering::SeqCst)
    }
}

impl Default for FlakyStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CartStorage for FlakyStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.write_attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("injected write failure".to_string()));
        }
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.inner.remove(key).await
    }
}
