//! Order rows and status/payment enums.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub order_no: String,
    pub customer_id: Uuid,
    pub product_id: Uuid,
    pub payment_type: Option<String>,
    pub address_id: Option<Uuid>,
    pub payment_status: String,
    pub order_status: String,
    pub order_date: DateTime<Utc>,
    pub delivered_date: String,
    pub track_id: String,
    pub size: String,
    pub qty: i32,
    pub is_complete: bool,
    pub cancellation_reason: String,
}

/// Fields a new order is created with; the display id is minted separately.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub order_no: String,
    pub customer_id: Uuid,
    pub product_id: Uuid,
    pub payment_type: Option<String>,
    pub address_id: Option<Uuid>,
    pub size: String,
    pub qty: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Processing,
    Confirmed,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Processing => "Processing",
            OrderStatus::Confirmed => "Confirmed",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Processing" => Some(OrderStatus::Processing),
            "Confirmed" => Some(OrderStatus::Confirmed),
            "Shipped" => Some(OrderStatus::Shipped),
            "Delivered" => Some(OrderStatus::Delivered),
            "Cancelled" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }
}

/// Payment methods accepted at confirmation time. Anything else is rejected
/// with a validation error instead of being ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentType {
    Upi,
    Cod,
}

impl PaymentType {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentType::Upi => "UPI",
            PaymentType::Cod => "cod",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "UPI" => Some(PaymentType::Upi),
            "cod" => Some(PaymentType::Cod),
            _ => None,
        }
    }
}

/// Allow-listed admin edit. Only these fields can be patched; everything else
/// in the request body is dropped.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderPatch {
    pub order_status: Option<String>,
    pub payment_status: Option<String>,
    pub track_id: Option<String>,
    pub delivered_date: Option<String>,
}

impl OrderPatch {
    pub fn is_empty(&self) -> bool {
        self.order_status.is_none()
            && self.payment_status.is_none()
            && self.track_id.is_none()
            && self.delivered_date.is_none()
    }
}

/// UPI payment confirmation record (screenshot upload).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UpiPayment {
    pub id: Uuid,
    pub order_id: Uuid,
    pub screenshot_base64: String,
    pub screenshot_name: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            OrderStatus::Processing,
            OrderStatus::Confirmed,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(OrderStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(OrderStatus::parse("Refunded"), None);
        assert_eq!(OrderStatus::parse("processing"), None);
    }

    #[test]
    fn test_payment_type_parse() {
        assert_eq!(PaymentType::parse("UPI"), Some(PaymentType::Upi));
        assert_eq!(PaymentType::parse("cod"), Some(PaymentType::Cod));
        assert_eq!(PaymentType::parse("gpay"), None);
        assert_eq!(PaymentType::parse(""), None);
    }

    #[test]
    fn test_patch_ignores_unknown_fields() {
        let patch: OrderPatch = serde_json::from_value(serde_json::json!({
            "orderStatus": "Confirmed",
            "qty": 999,
            "isComplete": true
        }))
        .unwrap();
        assert_eq!(patch.order_status.as_deref(), Some("Confirmed"));
        assert!(patch.payment_status.is_none());
        assert!(!patch.is_empty());
        assert!(OrderPatch::default().is_empty());
    }
}
