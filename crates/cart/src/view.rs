//! View binding for UI surfaces that render the cart.
//!
//! A screen body, a floating cart bar, and a draggable cart sheet can
//! all be mounted at once; none of them owns the state. Each binding
//! reads the manager's current snapshot on mount, tracks every
//! notification afterwards, and unsubscribes on unmount (drop), so a
//! discarded surface never leaks a callback.

use std::sync::{Arc, Mutex, PoisonError};

use red_lantern_core::CartState;

use crate::manager::{CartManager, Subscription};

/// A mounted view's live handle onto the cart.
///
/// Mounting never waits for initialization: a binding mounted early
/// holds the empty placeholder until the manager's post-init
/// notification re-syncs it.
pub struct CartViewBinding {
    latest: Arc<Mutex<CartState>>,
    _subscription: Subscription,
}

impl CartViewBinding {
    /// Mount onto the manager: read the current snapshot and start
    /// tracking notifications.
    #[must_use]
    pub fn mount(manager: &CartManager) -> Self {
        let latest = Arc::new(Mutex::new(manager.current()));
        let cell = Arc::clone(&latest);
        let subscription = manager.subscribe(move |state| {
            *cell.lock().unwrap_or_else(PoisonError::into_inner) = state;
        });
        // Re-read after subscribing: a mutation landing between the
        // first read and the subscribe call must not be lost.
        *latest.lock().unwrap_or_else(PoisonError::into_inner) = manager.current();

        Self {
            latest,
            _subscription: subscription,
        }
    }

    /// The binding's view of the cart right now.
    #[must_use]
    pub fn state(&self) -> CartState {
        self.latest
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Unmount, dropping the subscription. Equivalent to dropping the
    /// binding.
    pub fn unmount(self) {}
}
