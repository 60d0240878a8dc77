//! Menu dish types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::DishId;
use super::price::Price;

/// A dish on the restaurant menu, as served by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dish {
    pub id: DishId,
    #[serde(rename = "dishName")]
    pub name: String,
    /// Menu section, e.g. "Staple" or "Noodles".
    #[serde(rename = "dishType")]
    pub category: String,
    pub price: Price,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(rename = "isAvailable", default = "default_available")]
    pub available: bool,
    /// Kitchen's estimate for one serving, in minutes.
    #[serde(rename = "estimatedTime", default)]
    pub estimated_minutes: u32,
    #[serde(default)]
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

const fn default_available() -> bool {
    true
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn dec(s: &str) -> Decimal {
        s.parse().expect("decimal literal")
    }

    #[test]
    fn test_deserialize_backend_shape() {
        let json = r#"{
            "id": 3,
            "dishName": "Mapo Tofu",
            "dishType": "Staple",
            "price": "12.50",
            "description": "Silken tofu, chili bean paste",
            "imageUrl": "https://cdn.example.com/mapo.jpg",
            "isAvailable": true,
            "estimatedTime": 12,
            "sortOrder": 2,
            "createdAt": "2026-01-05T09:30:00Z",
            "updatedAt": "2026-01-05T09:30:00Z"
        }"#;
        let dish: Dish = serde_json::from_str(json).unwrap();
        assert_eq!(dish.id, DishId::new(3));
        assert_eq!(dish.name, "Mapo Tofu");
        assert_eq!(dish.category, "Staple");
        assert_eq!(dish.price.amount(), dec("12.50"));
        assert!(dish.available);
        assert_eq!(dish.estimated_minutes, 12);
    }

    #[test]
    fn test_optional_fields_default() {
        let json = r#"{
            "id": 1,
            "dishName": "Rice",
            "dishType": "Staple",
            "price": "2.00",
            "createdAt": "2026-01-05T09:30:00Z",
            "updatedAt": "2026-01-05T09:30:00Z"
        }"#;
        let dish: Dish = serde_json::from_str(json).unwrap();
        assert!(dish.available);
        assert!(dish.image_url.is_none());
        assert_eq!(dish.estimated_minutes, 0);
    }
}
