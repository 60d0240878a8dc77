//! Red Lantern Core - Shared types library.
//!
//! This crate provides common types used across all Red Lantern components:
//! - `cart` - Cart state manager and its persistence/identity ports
//! - `client` - Typed REST client for the ordering backend
//! - `cli` - Terminal ordering client
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! storage access, no HTTP clients. This keeps it lightweight and allows
//! it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and prices, plus the
//!   dish, cart, and order data model

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
