//! Order lifecycle status.

use serde::{Deserialize, Serialize};

/// Status of a submitted order as it moves through the kitchen queue.
///
/// Serialized in SCREAMING_SNAKE_CASE to match the backend wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Submitted, awaiting staff confirmation.
    #[default]
    Pending,
    /// Accepted by staff.
    Confirmed,
    /// Being cooked.
    Preparing,
    /// Ready for pickup.
    Ready,
    /// Picked up.
    Completed,
    /// Cancelled by the customer or staff.
    Cancelled,
}

impl OrderStatus {
    /// Whether the order has reached a terminal state.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Whether the order still occupies a slot in the live queue.
    #[must_use]
    pub const fn is_active(self) -> bool {
        !self.is_terminal()
    }

    /// The wire representation of this status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Preparing => "PREPARING",
            Self::Ready => "READY",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PENDING" => Ok(Self::Pending),
            "CONFIRMED" => Ok(Self::Confirmed),
            "PREPARING" => Ok(Self::Preparing),
            "READY" => Ok(Self::Ready),
            "COMPLETED" => Ok(Self::Completed),
            "CANCELLED" => Ok(Self::Cancelled),
            other => Err(format!("unknown order status: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_casing() {
        let json = serde_json::to_string(&OrderStatus::Preparing).expect("serialize");
        assert_eq!(json, "\"PREPARING\"");
        let back: OrderStatus = serde_json::from_str("\"READY\"").expect("deserialize");
        assert_eq!(back, OrderStatus::Ready);
    }

    #[test]
    fn test_terminal_classification() {
        assert!(OrderStatus::Completed.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(OrderStatus::Pending.is_active());
        assert!(OrderStatus::Ready.is_active());
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("ready".parse::<OrderStatus>(), Ok(OrderStatus::Ready));
        assert!("SHIPPED".parse::<OrderStatus>().is_err());
    }
}
