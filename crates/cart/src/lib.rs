//! Red Lantern Cart - the cart state manager.
//!
//! This crate owns the authoritative in-memory cart for one app
//! installation and keeps every UI surface that renders it consistent:
//!
//! - [`CartManager`] - single writer; every mutation is applied in
//!   memory, totals are recomputed, the state is persisted (best
//!   effort), and subscribers are notified - in that order.
//! - [`storage`] - the persistence port ([`CartStorage`]) with
//!   file-backed, in-memory, and no-op backends, selected once at
//!   startup.
//! - [`identity`] - the per-installation user identity port
//!   ([`IdentityProvider`]) and its device-id-backed implementation.
//! - [`CartViewBinding`] - mount/unmount handle for UI components that
//!   render the cart without owning it.
//!
//! # Failure policy
//!
//! Cart usability is never blocked by a storage failure: persistence
//! errors are logged and swallowed, identity failures fall back to a
//! generated guest id, and a corrupt or missing persisted blob degrades
//! to an empty cart. Public mutation methods never return errors.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod error;
pub mod identity;
pub mod manager;
pub mod storage;
pub mod view;

pub use error::{IdentityError, StorageError};
pub use identity::{fallback_user_id, DeviceIdentity, FixedIdentity, IdentityProvider};
pub use manager::{CartManager, Subscription};
pub use storage::{keys, CartStorage, FileStorage, MemoryStorage, NoopStorage};
pub use view::CartViewBinding;
