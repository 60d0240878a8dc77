//! Red Lantern Client - typed REST client for the ordering backend.
//!
//! The backend owns the menu, order creation, the kitchen queue, and
//! sales statistics; this crate wraps its JSON API in typed methods.
//! The cart itself is device-local (see `red-lantern-cart`) and is
//! never synchronized to the backend - order submission is the only
//! point where cart-derived data crosses the network.
//!
//! Menu reads are cached for a short TTL so rapid navigation between
//! menu views does not re-fetch an essentially static list.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod client;
pub mod error;
pub mod types;

pub use client::ApiClient;
pub use error::ApiError;
pub use types::{DailyStat, PopularDish, TodayStats, WeeklyStats};
