//! Customer and shipping address rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub kind: String,
    pub name: String,
    pub address: String,
    pub city: String,
    pub landmark: Option<String>,
    pub district: Option<String>,
    pub state: String,
    pub zip_code: String,
    pub phone: String,
    pub is_saved: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewAddress {
    pub customer_id: Uuid,
    pub name: String,
    pub address: String,
    pub city: String,
    pub landmark: Option<String>,
    pub district: Option<String>,
    pub state: String,
    pub zip_code: String,
    pub phone: String,
    pub is_saved: bool,
}
