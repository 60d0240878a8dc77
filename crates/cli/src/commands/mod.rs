//! Command implementations.

pub mod cart;
pub mod menu;
pub mod order;
pub mod staff;
