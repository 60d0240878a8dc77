//! Shared domain types.

pub mod cart;
pub mod dish;
pub mod id;
pub mod order;
pub mod price;
pub mod status;

pub use cart::{CartLine, CartState};
pub use dish::Dish;
pub use id::{DishId, OrderId};
pub use order::{CreateOrderRequest, Order, OrderItem, OrderItemDraft, DEFAULT_ESTIMATED_MINUTES};
pub use price::{Price, PriceError};
pub use status::OrderStatus;
