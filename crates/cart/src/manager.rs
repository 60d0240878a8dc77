//! The cart state manager.
//!
//! Single authoritative owner of the cart. Every mutation runs the
//! same pipeline under one lock: apply to memory, recompute derived
//! totals, persist the whole state (best effort), publish a snapshot,
//! notify subscribers. Subscribers therefore never observe totals that
//! disagree with the lines, and notification never happens before a
//! persistence attempt.
//!
//! Initialization (identity resolution plus storage load) is
//! asynchronous and runs exactly once; every operation awaits the same
//! one-shot completion, so a mutation issued early cannot act on a
//! pre-load state.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex as StdMutex, PoisonError, RwLock, Weak};

use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, instrument, warn};

use red_lantern_core::{CartLine, CartState, Dish, DishId, OrderItemDraft};

use crate::identity::{fallback_user_id, IdentityProvider};
use crate::storage::{keys, CartStorage};

type SubscriberFn = dyn Fn(CartState) + Send + Sync;
type SubscriberMap = HashMap<u64, Arc<SubscriberFn>>;

/// Handle to the process-wide cart state.
///
/// Cheap to clone; all clones share the same state, storage, and
/// subscriber registry. Construct one per installation at startup and
/// hand clones to every surface that renders or mutates the cart
/// (tests construct isolated instances over in-memory storage).
#[derive(Clone)]
pub struct CartManager {
    inner: Arc<ManagerInner>,
}

struct ManagerInner {
    storage: Arc<dyn CartStorage>,
    identity: Arc<dyn IdentityProvider>,
    /// Authoritative state; the lock spans the whole
    /// mutate-recompute-persist-notify pipeline (single-writer).
    state: Mutex<CartState>,
    /// One-shot initialization gate; all early callers await it.
    init: OnceCell<()>,
    /// Last published snapshot, readable synchronously by view
    /// bindings. Before initialization this is the empty placeholder.
    published: RwLock<CartState>,
    subscribers: Arc<StdMutex<SubscriberMap>>,
    next_token: AtomicU64,
}

impl std::fmt::Debug for CartManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartManager")
            .field("initialized", &self.is_initialized())
            .finish_non_exhaustive()
    }
}

impl CartManager {
    /// Create a manager over the given storage and identity backends.
    ///
    /// Initialization is lazy: it runs on the first operation (or an
    /// explicit [`CartManager::ready`] call), not here.
    #[must_use]
    pub fn new(storage: Arc<dyn CartStorage>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self {
            inner: Arc::new(ManagerInner {
                storage,
                identity,
                state: Mutex::new(CartState::empty()),
                init: OnceCell::new(),
                published: RwLock::new(CartState::empty()),
                subscribers: Arc::new(StdMutex::new(HashMap::new())),
                next_token: AtomicU64::new(1),
            }),
        }
    }

    /// Whether one-shot initialization has completed.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.inner.init.initialized()
    }

    /// Await initialization without mutating anything.
    pub async fn ready(&self) {
        self.ensure_initialized().await;
    }

    // =========================================================================
    // Initialization
    // =========================================================================

    async fn ensure_initialized(&self) {
        self.inner
            .init
            .get_or_init(|| async { self.initialize().await })
            .await;
    }

    /// Resolve identity, load the persisted cart, adopt its lines.
    ///
    /// The freshly resolved identity is authoritative over whatever
    /// owner was serialized in the blob. Every failure path degrades:
    /// identity failure to a guest id, load/parse failure to an empty
    /// cart. Never errors.
    async fn initialize(&self) {
        let owner = match self.inner.identity.user_id().await {
            Ok(id) => id,
            Err(e) => {
                warn!(error = %e, "identity resolution failed, using guest id");
                fallback_user_id()
            }
        };

        let loaded_items = match self.inner.storage.get(keys::CART).await {
            Ok(Some(blob)) => match serde_json::from_str::<CartState>(&blob) {
                Ok(persisted) => persisted.items,
                Err(e) => {
                    warn!(error = %e, "persisted cart is corrupt, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "loading persisted cart failed, starting empty");
                Vec::new()
            }
        };

        let mut state = self.inner.state.lock().await;
        state.items = loaded_items;
        state.owner_id = owner;
        state.recompute_totals();
        debug!(
            owner = %state.owner_id,
            lines = state.items.len(),
            "cart initialized"
        );

        let snapshot = state.clone();
        self.publish(&snapshot);
        self.notify(&snapshot);
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add a line to the cart, merging with an existing line for the
    /// same dish.
    ///
    /// Merging is additive on quantity only; the metadata recorded at
    /// first add (name, category, unit price, image) wins over what
    /// the new line carries. A zero-quantity line is ignored.
    #[instrument(skip(self, line), fields(id = %line.id, quantity = line.quantity))]
    pub async fn add_item(&self, line: CartLine) {
        self.mutate(|state| {
            if line.quantity == 0 {
                return false;
            }
            if let Some(existing) = state.items.iter_mut().find(|l| l.id == line.id) {
                existing.quantity = existing.quantity.saturating_add(line.quantity);
            } else {
                state.items.push(line);
            }
            true
        })
        .await;
    }

    /// Add a menu dish to the cart.
    pub async fn add_dish(&self, dish: &Dish, quantity: u32) {
        self.add_item(CartLine::from_dish(dish, quantity)).await;
    }

    /// Set the quantity of an existing line to an absolute value.
    ///
    /// Zero removes the line. An id not in the cart is left alone:
    /// only [`CartManager::add_item`] creates lines.
    #[instrument(skip(self), fields(id = %id, quantity))]
    pub async fn set_quantity(&self, id: DishId, quantity: u32) {
        self.mutate(|state| Self::apply_set_quantity(state, id, quantity))
            .await;
    }

    /// Increment an existing line's quantity by one. No-op when the
    /// dish is not in the cart.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn increase_quantity(&self, id: DishId) {
        self.mutate(|state| {
            let Some(current) = state.line(id).map(|line| line.quantity) else {
                return false;
            };
            Self::apply_set_quantity(state, id, current.saturating_add(1))
        })
        .await;
    }

    /// Decrement an existing line's quantity by one, removing the line
    /// at quantity one. No-op when the dish is not in the cart.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn decrease_quantity(&self, id: DishId) {
        self.mutate(|state| {
            let Some(current) = state.line(id).map(|line| line.quantity) else {
                return false;
            };
            Self::apply_set_quantity(state, id, current - 1)
        })
        .await;
    }

    /// Remove a line unconditionally. Removing an absent id is a
    /// silent no-op.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn remove_item(&self, id: DishId) {
        self.mutate(|state| Self::apply_remove(state, id)).await;
    }

    /// Empty the cart. The manager itself stays alive and initialized.
    #[instrument(skip(self))]
    pub async fn clear_cart(&self) {
        self.mutate(|state| {
            if state.items.is_empty() {
                return false;
            }
            state.items.clear();
            true
        })
        .await;
    }

    /// Set the free-text notes on an existing line. An empty string
    /// clears the notes. No-op when the dish is not in the cart.
    #[instrument(skip(self, text), fields(id = %id))]
    pub async fn update_item_notes(&self, id: DishId, text: &str) {
        let notes = if text.is_empty() {
            None
        } else {
            Some(text.to_string())
        };
        self.mutate(|state| {
            let Some(line) = state.items.iter_mut().find(|l| l.id == id) else {
                return false;
            };
            if line.notes == notes {
                return false;
            }
            line.notes = notes;
            true
        })
        .await;
    }

    /// Run one mutation through the full pipeline.
    ///
    /// `apply` returns whether it actually changed the state; no-ops
    /// skip recompute, persistence, and notification entirely (but the
    /// initialization they awaited still counts).
    async fn mutate(&self, apply: impl FnOnce(&mut CartState) -> bool) {
        self.ensure_initialized().await;

        let mut state = self.inner.state.lock().await;
        if !apply(&mut state) {
            return;
        }
        state.recompute_totals();
        self.persist(&state).await;

        let snapshot = state.clone();
        self.publish(&snapshot);
        self.notify(&snapshot);
    }

    /// Best-effort full-state write. Failures are logged and dropped;
    /// the next successful mutation re-writes the whole state anyway.
    async fn persist(&self, state: &CartState) {
        let blob = match serde_json::to_string(state) {
            Ok(blob) => blob,
            Err(e) => {
                warn!(error = %e, "serializing cart failed, skipping persist");
                return;
            }
        };
        if let Err(e) = self.inner.storage.set(keys::CART, &blob).await {
            warn!(error = %e, "persisting cart failed, keeping in-memory state");
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// The last published snapshot, readable without awaiting.
    ///
    /// Before initialization completes this is the empty placeholder;
    /// a subscriber registered at that point receives the loaded state
    /// with the first notification.
    #[must_use]
    pub fn current(&self) -> CartState {
        self.inner
            .published
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// A value copy of the authoritative state, after initialization.
    pub async fn snapshot(&self) -> CartState {
        self.ensure_initialized().await;
        self.inner.state.lock().await.clone()
    }

    /// Quantity of `id` in the cart; zero when absent.
    #[must_use]
    pub fn quantity_of(&self, id: DishId) -> u32 {
        self.inner
            .published
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .quantity_of(id)
    }

    /// Whether the cart holds a line for `id`.
    #[must_use]
    pub fn has_item(&self, id: DishId) -> bool {
        self.inner
            .published
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .has_item(id)
    }

    /// Whether the cart holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner
            .published
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }

    /// The resolved owner id for this installation.
    pub async fn owner_id(&self) -> String {
        self.ensure_initialized().await;
        self.inner.state.lock().await.owner_id.clone()
    }

    /// Map the current lines into the order-submission payload shape.
    ///
    /// Read-only: submitting the resulting order (and clearing the
    /// cart afterwards) is the caller's business.
    pub async fn order_draft(&self) -> Vec<OrderItemDraft> {
        self.ensure_initialized().await;
        let state = self.inner.state.lock().await;
        state.items.iter().map(OrderItemDraft::from).collect()
    }

    // =========================================================================
    // Subscriptions
    // =========================================================================

    /// Register a callback invoked with a fresh snapshot after every
    /// successful mutation (and once when initialization completes).
    ///
    /// Dropping the returned [`Subscription`] unsubscribes; the
    /// callback is never invoked after that.
    #[must_use]
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(CartState) + Send + Sync + 'static,
    {
        let token = self.inner.next_token.fetch_add(1, Ordering::Relaxed);
        self.inner
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(token, Arc::new(callback));
        Subscription {
            token,
            subscribers: Arc::downgrade(&self.inner.subscribers),
        }
    }

    fn publish(&self, snapshot: &CartState) {
        *self
            .inner
            .published
            .write()
            .unwrap_or_else(PoisonError::into_inner) = snapshot.clone();
    }

    fn notify(&self, snapshot: &CartState) {
        // Clone the callback list out so a callback may subscribe or
        // unsubscribe without deadlocking the registry.
        let callbacks: Vec<Arc<SubscriberFn>> = self
            .inner
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        for callback in callbacks {
            callback(snapshot.clone());
        }
    }

    // =========================================================================
    // State transitions
    // =========================================================================

    fn apply_set_quantity(state: &mut CartState, id: DishId, quantity: u32) -> bool {
        if quantity == 0 {
            return Self::apply_remove(state, id);
        }
        // Setting a quantity never creates a line; only add_item does.
        let Some(line) = state.items.iter_mut().find(|l| l.id == id) else {
            return false;
        };
        if line.quantity == quantity {
            return false;
        }
        line.quantity = quantity;
        true
    }

    fn apply_remove(state: &mut CartState, id: DishId) -> bool {
        let before = state.items.len();
        state.items.retain(|line| line.id != id);
        state.items.len() != before
    }
}

/// Registration handle for one subscriber.
///
/// Unsubscribes on drop (O(1) removal by token). Holding the handle is
/// what keeps the callback alive; it does not keep the manager alive.
pub struct Subscription {
    token: u64,
    subscribers: Weak<StdMutex<SubscriberMap>>,
}

impl Subscription {
    /// Explicitly unsubscribe. Equivalent to dropping the handle.
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(subscribers) = self.subscribers.upgrade() {
            subscribers
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(&self.token);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::identity::FixedIdentity;
    use crate::storage::MemoryStorage;
    use rust_decimal::Decimal;

    fn dec(s: &str) -> Decimal {
        s.parse().expect("decimal literal")
    }

    fn manager_with(storage: Arc<dyn CartStorage>) -> CartManager {
        CartManager::new(storage, Arc::new(FixedIdentity("user_test".to_string())))
    }

    fn line(id: i64, price: &str, quantity: u32) -> CartLine {
        CartLine {
            id: DishId::new(id),
            name: format!("dish-{id}"),
            category: "Staple".to_string(),
            unit_price: red_lantern_core::Price::new(price.parse().unwrap()).unwrap(),
            quantity,
            image_url: None,
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_add_merges_and_keeps_first_seen_metadata() {
        let manager = manager_with(Arc::new(MemoryStorage::new()));

        manager.add_item(line(1, "10", 2)).await;
        let mut renamed = line(1, "99", 1);
        renamed.name = "imposter".to_string();
        manager.add_item(renamed).await;

        let state = manager.snapshot().await;
        assert_eq!(state.items.len(), 1);
        let only = state.line(DishId::new(1)).unwrap();
        assert_eq!(only.quantity, 3);
        assert_eq!(only.name, "dish-1");
        assert_eq!(state.total_price.amount(), dec("30"));
    }

    #[tokio::test]
    async fn test_set_quantity_zero_removes() {
        let manager = manager_with(Arc::new(MemoryStorage::new()));
        manager.add_item(line(7, "8", 3)).await;

        manager.set_quantity(DishId::new(7), 0).await;
        let state = manager.snapshot().await;
        assert!(state.is_empty());
        assert_eq!(state.total_quantity, 0);
    }

    #[tokio::test]
    async fn test_set_quantity_never_creates_lines() {
        let manager = manager_with(Arc::new(MemoryStorage::new()));
        manager.set_quantity(DishId::new(99), 5).await;
        assert!(manager.snapshot().await.is_empty());
        assert!(manager.is_initialized());
    }

    #[tokio::test]
    async fn test_decrease_at_one_removes() {
        let manager = manager_with(Arc::new(MemoryStorage::new()));
        manager.add_item(line(5, "4", 1)).await;

        manager.decrease_quantity(DishId::new(5)).await;
        assert!(!manager.has_item(DishId::new(5)));
        assert_eq!(manager.snapshot().await.total_quantity, 0);
    }

    #[tokio::test]
    async fn test_initialize_adopts_blob_with_fresh_owner() {
        let storage: Arc<dyn CartStorage> = Arc::new(MemoryStorage::new());
        let mut persisted = CartState {
            items: vec![line(2, "6.50", 2)],
            owner_id: "user_stale".to_string(),
            ..CartState::empty()
        };
        persisted.recompute_totals();
        storage
            .set(keys::CART, &serde_json::to_string(&persisted).unwrap())
            .await
            .unwrap();

        let manager = manager_with(storage);
        let state = manager.snapshot().await;
        assert_eq!(state.owner_id, "user_test");
        assert_eq!(state.quantity_of(DishId::new(2)), 2);
        assert_eq!(state.total_price.amount(), dec("13.00"));
    }

    #[tokio::test]
    async fn test_corrupt_blob_degrades_to_empty() {
        let storage: Arc<dyn CartStorage> = Arc::new(MemoryStorage::new());
        storage.set(keys::CART, "{not json").await.unwrap();

        let manager = manager_with(storage);
        assert!(manager.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn test_mutation_persists_complete_state() {
        let storage = Arc::new(MemoryStorage::new());
        let manager = manager_with(Arc::clone(&storage) as Arc<dyn CartStorage>);
        manager.add_item(line(1, "2.50", 4)).await;

        let blob = storage.get(keys::CART).await.unwrap().unwrap();
        let persisted: CartState = serde_json::from_str(&blob).unwrap();
        assert_eq!(persisted, manager.snapshot().await);
    }

    #[tokio::test]
    async fn test_snapshot_is_detached() {
        let manager = manager_with(Arc::new(MemoryStorage::new()));
        manager.add_item(line(1, "3", 1)).await;

        let mut copy = manager.snapshot().await;
        copy.items.clear();
        copy.total_quantity = 99;

        assert_eq!(manager.snapshot().await.total_quantity, 1);
    }

    #[tokio::test]
    async fn test_notes_do_not_touch_totals() {
        let manager = manager_with(Arc::new(MemoryStorage::new()));
        manager.add_item(line(4, "11", 2)).await;

        manager.update_item_notes(DishId::new(4), "extra spicy").await;
        let state = manager.snapshot().await;
        assert_eq!(
            state.line(DishId::new(4)).unwrap().notes.as_deref(),
            Some("extra spicy")
        );
        assert_eq!(state.total_price.amount(), dec("22"));

        manager.update_item_notes(DishId::new(4), "").await;
        let state = manager.snapshot().await;
        assert_eq!(state.line(DishId::new(4)).unwrap().notes, None);
    }
}
