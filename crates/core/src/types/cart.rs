//! Cart line and cart state types.
//!
//! `CartState` is a plain value: all mutation discipline (one line per
//! dish, totals recomputed before anyone observes the state) lives in
//! the cart manager. The helpers here are pure and never do I/O.

use serde::{Deserialize, Serialize};

use super::dish::Dish;
use super::id::DishId;
use super::price::Price;

/// One distinct dish entry in the cart, with its own quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: DishId,
    /// Copied from the dish at add-time, never re-fetched.
    pub name: String,
    pub category: String,
    pub unit_price: Price,
    /// Strictly positive; a line at quantity zero is removed instead.
    pub quantity: u32,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Free-text annotation ("no cilantro"), independent of quantity.
    #[serde(default)]
    pub notes: Option<String>,
}

impl CartLine {
    /// Build a line for a dish entering the cart.
    #[must_use]
    pub fn from_dish(dish: &Dish, quantity: u32) -> Self {
        Self {
            id: dish.id,
            name: dish.name.clone(),
            category: dish.category.clone(),
            unit_price: dish.price,
            quantity,
            image_url: dish.image_url.clone(),
            notes: None,
        }
    }

    /// This line's contribution to the cart total.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price.times(self.quantity)
    }
}

/// The complete cart: lines plus derived totals and the owning user.
///
/// `total_price` and `total_quantity` are pure functions of `items`;
/// [`CartState::recompute_totals`] restores them after any change to
/// the lines.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CartState {
    pub items: Vec<CartLine>,
    pub total_price: Price,
    pub total_quantity: u32,
    #[serde(default)]
    pub owner_id: String,
}

impl CartState {
    /// An empty cart with no owner yet.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Recompute both derived totals from the current lines.
    pub fn recompute_totals(&mut self) {
        self.total_price = self.items.iter().map(CartLine::line_total).sum();
        self.total_quantity = self.items.iter().map(|line| line.quantity).sum();
    }

    /// Position of the line for `id`, if present.
    #[must_use]
    pub fn position(&self, id: DishId) -> Option<usize> {
        self.items.iter().position(|line| line.id == id)
    }

    /// Borrow the line for `id`, if present.
    #[must_use]
    pub fn line(&self, id: DishId) -> Option<&CartLine> {
        self.items.iter().find(|line| line.id == id)
    }

    /// Quantity of `id` in the cart; zero when absent.
    #[must_use]
    pub fn quantity_of(&self, id: DishId) -> u32 {
        self.line(id).map_or(0, |line| line.quantity)
    }

    /// Whether the cart holds a line for `id`.
    #[must_use]
    pub fn has_item(&self, id: DishId) -> bool {
        self.line(id).is_some()
    }

    /// Whether the cart holds no lines at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn dec(s: &str) -> Decimal {
        s.parse().expect("decimal literal")
    }

    fn line(id: i64, price: &str, quantity: u32) -> CartLine {
        CartLine {
            id: DishId::new(id),
            name: format!("dish-{id}"),
            category: "Staple".to_string(),
            unit_price: Price::new(price.parse().unwrap()).unwrap(),
            quantity,
            image_url: None,
            notes: None,
        }
    }

    #[test]
    fn test_recompute_totals() {
        let mut state = CartState {
            items: vec![line(1, "10", 2), line(2, "3.25", 3)],
            ..CartState::empty()
        };
        state.recompute_totals();
        assert_eq!(state.total_price.amount(), dec("29.75"));
        assert_eq!(state.total_quantity, 5);
    }

    #[test]
    fn test_empty_totals_are_zero() {
        let mut state = CartState::empty();
        state.recompute_totals();
        assert_eq!(state.total_price, Price::ZERO);
        assert_eq!(state.total_quantity, 0);
        assert!(state.is_empty());
    }

    #[test]
    fn test_lookups() {
        let mut state = CartState::empty();
        state.items.push(line(7, "8", 3));
        assert_eq!(state.quantity_of(DishId::new(7)), 3);
        assert_eq!(state.quantity_of(DishId::new(8)), 0);
        assert!(state.has_item(DishId::new(7)));
        assert_eq!(state.position(DishId::new(7)), Some(0));
    }

    #[test]
    fn test_serde_roundtrip_preserves_lines_and_totals() {
        let mut state = CartState {
            items: vec![line(1, "0.10", 1), line(2, "0.20", 1)],
            owner_id: "user_abc".to_string(),
            ..CartState::empty()
        };
        state.recompute_totals();

        let blob = serde_json::to_string(&state).unwrap();
        let mut restored: CartState = serde_json::from_str(&blob).unwrap();
        let serialized_total = restored.total_price;
        restored.recompute_totals();

        assert_eq!(restored, state);
        assert_eq!(restored.total_price, serialized_total);
    }
}
