//! Order types and the cart-to-order submission payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::cart::CartLine;
use super::id::OrderId;
use super::price::Price;
use super::status::OrderStatus;

/// Fallback per-dish preparation estimate when the cart line carries none.
pub const DEFAULT_ESTIMATED_MINUTES: u32 = 15;

/// A line of a submitted order, as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: i64,
    pub dish_name: String,
    #[serde(rename = "dishType")]
    pub category: String,
    pub unit_price: Price,
    pub quantity: u32,
    pub subtotal: Price,
    #[serde(rename = "estimatedTime", default)]
    pub estimated_minutes: u32,
    #[serde(default)]
    pub item_notes: String,
}

/// A submitted order with its pickup code and queue position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user_id: String,
    pub pickup_code: String,
    #[serde(rename = "orderStatus")]
    pub status: OrderStatus,
    pub queue_number: u32,
    #[serde(default)]
    pub notes: String,
    pub total_price: Price,
    #[serde(rename = "totalEstimatedTime", default)]
    pub total_estimated_minutes: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub items: Vec<OrderItem>,
}

/// One element of the order-creation payload, derived from a cart line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemDraft {
    pub dish_name: String,
    #[serde(rename = "dishType")]
    pub category: String,
    pub unit_price: Price,
    pub quantity: u32,
    #[serde(rename = "estimatedTime")]
    pub estimated_minutes: u32,
    pub item_notes: String,
}

impl From<&CartLine> for OrderItemDraft {
    fn from(line: &CartLine) -> Self {
        Self {
            dish_name: line.name.clone(),
            category: line.category.clone(),
            unit_price: line.unit_price,
            quantity: line.quantity,
            estimated_minutes: DEFAULT_ESTIMATED_MINUTES,
            item_notes: line.notes.clone().unwrap_or_default(),
        }
    }
}

/// The order-creation request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub user_id: String,
    pub notes: String,
    pub items: Vec<OrderItemDraft>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::id::DishId;
    use rust_decimal::Decimal;

    fn dec(s: &str) -> Decimal {
        s.parse().expect("decimal literal")
    }

    #[test]
    fn test_draft_from_cart_line() {
        let line = CartLine {
            id: DishId::new(4),
            name: "Dan Dan Noodles".to_string(),
            category: "Noodles".to_string(),
            unit_price: Price::new(dec("11.00")).unwrap(),
            quantity: 2,
            image_url: None,
            notes: Some("extra spicy".to_string()),
        };
        let draft = OrderItemDraft::from(&line);
        assert_eq!(draft.dish_name, "Dan Dan Noodles");
        assert_eq!(draft.quantity, 2);
        assert_eq!(draft.estimated_minutes, DEFAULT_ESTIMATED_MINUTES);
        assert_eq!(draft.item_notes, "extra spicy");
    }

    #[test]
    fn test_draft_without_notes_sends_empty_string() {
        let line = CartLine {
            id: DishId::new(1),
            name: "Rice".to_string(),
            category: "Staple".to_string(),
            unit_price: Price::new(dec("2.00")).unwrap(),
            quantity: 1,
            image_url: None,
            notes: None,
        };
        assert_eq!(OrderItemDraft::from(&line).item_notes, "");
    }

    #[test]
    fn test_create_order_request_wire_shape() {
        let request = CreateOrderRequest {
            user_id: "user_android_abc".to_string(),
            notes: String::new(),
            items: vec![],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("userId").is_some());
        assert!(json.get("notes").is_some());
        assert!(json.get("items").is_some());
    }

    #[test]
    fn test_order_deserialize() {
        let json = r#"{
            "id": 12,
            "userId": "user_android_abc",
            "pickupCode": "RL4921",
            "orderStatus": "PREPARING",
            "queueNumber": 3,
            "notes": "",
            "totalPrice": "24.00",
            "totalEstimatedTime": 25,
            "createdAt": "2026-02-01T12:00:00Z",
            "updatedAt": "2026-02-01T12:05:00Z",
            "items": [{
                "id": 1,
                "dishName": "Mapo Tofu",
                "dishType": "Staple",
                "unitPrice": "12.00",
                "quantity": 2,
                "subtotal": "24.00",
                "estimatedTime": 12,
                "itemNotes": ""
            }]
        }"#;
        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.status, OrderStatus::Preparing);
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.total_price.amount(), dec("24.00"));
    }
}
