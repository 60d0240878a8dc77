//! Type-safe price representation using decimal arithmetic.
//!
//! Menu prices and cart totals are exact decimals, never floats: a cart
//! total must reproduce byte-for-byte when recomputed from its lines,
//! which binary floating point cannot guarantee.

use std::iter::Sum;
use std::ops::Add;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when constructing an invalid [`Price`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PriceError {
    /// Prices are never negative.
    #[error("negative price: {0}")]
    Negative(Decimal),
}

/// A non-negative monetary amount in the restaurant's single currency.
///
/// Serialized transparently as its decimal amount. Deserialization
/// rejects negative values.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// The zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if the amount is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self(amount))
    }

    /// Create a price from an amount in cents.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if `cents` is below zero.
    pub fn from_cents(cents: i64) -> Result<Self, PriceError> {
        Self::new(Decimal::new(cents, 2))
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Multiply by a line quantity, producing the line total.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().expect("decimal literal")
    }

    #[test]
    fn test_rejects_negative() {
        let err = Price::new(dec("-0.01")).unwrap_err();
        assert_eq!(err, PriceError::Negative(dec("-0.01")));
        assert!(Price::from_cents(-1).is_err());
    }

    #[test]
    fn test_negative_zero_is_zero() {
        assert_eq!(Price::new(dec("-0.00")).unwrap(), Price::ZERO);
    }

    #[test]
    fn test_times_and_sum() {
        let unit = Price::new(dec("8.50")).unwrap();
        assert_eq!(unit.times(3).amount(), dec("25.50"));

        let total: Price = [unit.times(3), Price::from_cents(125).unwrap()]
            .into_iter()
            .sum();
        assert_eq!(total.amount(), dec("26.75"));
    }

    #[test]
    fn test_exact_decimal_totals() {
        // 0.1 + 0.2 is exactly 0.3 in decimal arithmetic
        let total = Price::new(dec("0.1")).unwrap() + Price::new(dec("0.2")).unwrap();
        assert_eq!(total.amount(), dec("0.3"));
    }

    #[test]
    fn test_display() {
        assert_eq!(Price::new(dec("9.5")).unwrap().to_string(), "$9.50");
        assert_eq!(Price::ZERO.to_string(), "$0.00");
    }

    #[test]
    fn test_deserialize_rejects_negative() {
        let ok: Price = serde_json::from_str("\"12.30\"").unwrap();
        assert_eq!(ok.amount(), dec("12.30"));
        assert!(serde_json::from_str::<Price>("\"-1\"").is_err());
    }
}
