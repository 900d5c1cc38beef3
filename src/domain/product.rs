//! Product, image, comment and collection rows, plus the pure inventory and
//! rating arithmetic the handlers lean on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub product_no: String,
    pub name: String,
    pub description: String,
    pub collection_name: String,
    pub actual_price: Option<i64>,
    pub normal_price: i64,
    pub offer_price: Option<i64>,
    pub quantity: i32,
    pub material: Option<String>,
    pub size: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub collection_name: String,
    pub actual_price: Option<i64>,
    pub normal_price: i64,
    pub offer_price: Option<i64>,
    pub quantity: i32,
    pub material: Option<String>,
    pub size: Option<String>,
}

/// Image payload (base64 or URL) attached to a product. A product can carry
/// several; the first by insertion is the representative one for listings.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub source: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

/// Comments keep the storefront's historical wire keys (PascalCase, with the
/// text under `Comment` and the timestamp under `Date`) so existing clients
/// keep parsing responses.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: Uuid,
    #[serde(rename = "ProductId")]
    pub product_id: Uuid,
    #[serde(rename = "UserId")]
    pub user_id: String,
    #[serde(rename = "Rating")]
    pub rating: i32,
    #[serde(rename = "Likes")]
    pub likes: i32,
    #[serde(rename = "Comment")]
    pub body: String,
    #[serde(rename = "Avatar")]
    pub avatar: String,
    #[serde(rename = "Date")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub product_id: Uuid,
    pub user_id: String,
    pub rating: i32,
    pub body: String,
    pub avatar: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Collection {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Direction of a stock movement triggered by an order event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockAdjustment {
    Deduct,
    Add,
}

/// New on-hand quantity after a stock movement. Never goes below zero.
pub fn next_quantity(current: i32, adjustment: StockAdjustment, qty: i32) -> i32 {
    match adjustment {
        StockAdjustment::Deduct => (current - qty).max(0),
        StockAdjustment::Add => current.saturating_add(qty),
    }
}

/// Coerces whatever JSON arrived in the rating field into 1..=5.
/// Numbers and numeric strings are used as-is; junk counts as zero and
/// therefore clamps up to 1.
pub fn clamp_rating(raw: &Value) -> i32 {
    let n = match raw {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    let n = if n.is_finite() { n } else { 0.0 };
    n.clamp(1.0, 5.0).round() as i32
}

/// Generated avatar for commenters who did not supply one.
pub fn default_avatar(user_id: &str) -> String {
    format!("https://ui-avatars.com/api/?name={user_id}&background=random")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deduct_clamps_at_zero() {
        assert_eq!(next_quantity(10, StockAdjustment::Deduct, 3), 7);
        assert_eq!(next_quantity(2, StockAdjustment::Deduct, 5), 0);
        assert_eq!(next_quantity(0, StockAdjustment::Deduct, 1), 0);
        assert_eq!(next_quantity(5, StockAdjustment::Add, 5), 10);
    }

    #[test]
    fn test_quantity_never_negative_over_any_sequence() {
        let ops = [
            (StockAdjustment::Deduct, 4),
            (StockAdjustment::Deduct, 9),
            (StockAdjustment::Add, 3),
            (StockAdjustment::Deduct, 100),
            (StockAdjustment::Add, 7),
            (StockAdjustment::Deduct, 1),
        ];
        let mut qty = 5;
        for (adj, n) in ops {
            qty = next_quantity(qty, adj, n);
            assert!(qty >= 0);
        }
    }

    #[test]
    fn test_rating_clamped_into_range() {
        assert_eq!(clamp_rating(&json!(0)), 1);
        assert_eq!(clamp_rating(&json!(7)), 5);
        assert_eq!(clamp_rating(&json!(3)), 3);
        assert_eq!(clamp_rating(&json!("4")), 4);
        assert_eq!(clamp_rating(&json!("not a number")), 1);
        assert_eq!(clamp_rating(&json!(null)), 1);
        assert_eq!(clamp_rating(&json!(-2)), 1);
    }

    #[test]
    fn test_comment_serializes_historical_wire_keys() {
        let comment = Comment {
            id: Uuid::nil(),
            product_id: Uuid::nil(),
            user_id: "u-1".into(),
            rating: 4,
            likes: 0,
            body: "lovely fabric".into(),
            avatar: "https://example.com/a.png".into(),
            created_at: Utc::now(),
        };
        let value = serde_json::to_value(&comment).unwrap();
        for key in ["ProductId", "UserId", "Rating", "Likes", "Comment", "Avatar", "Date"] {
            assert!(value.get(key).is_some(), "missing wire key {key}");
        }
        assert!(value.get("body").is_none());
        assert!(value.get("rating").is_none());
    }

    #[test]
    fn test_default_avatar_carries_user_id() {
        let url = default_avatar("user-42");
        assert!(url.contains("user-42"));
        assert!(url.starts_with("https://ui-avatars.com/"));
    }
}
