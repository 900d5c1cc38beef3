//! Order, address, customer and UPI payment queries.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::customer::{Address, Customer, NewAddress};
use crate::domain::order::{NewOrder, Order, OrderPatch, OrderStatus, UpiPayment};

/// One line of the admin order listing: completed orders joined with the
/// customer name and the product's display id.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CompletedOrderRow {
    pub id: Uuid,
    #[serde(rename = "orderId")]
    pub order_no: String,
    #[serde(rename = "productId")]
    pub product_no: String,
    #[serde(rename = "customerName")]
    pub customer_name: String,
    #[serde(rename = "quantity")]
    pub qty: i32,
    #[serde(rename = "orderDate")]
    pub order_date: DateTime<Utc>,
    #[serde(rename = "orderStatus")]
    pub order_status: String,
}

#[derive(Clone)]
pub struct OrderRepo {
    pool: PgPool,
}

impl OrderRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert_order(&self, new: &NewOrder) -> Result<Order, sqlx::Error> {
        sqlx::query_as::<_, Order>(
            "INSERT INTO orders (id, order_no, customer_id, product_id, payment_type,
                                 address_id, payment_status, order_status, order_date,
                                 delivered_date, track_id, size, qty, is_complete,
                                 cancellation_reason)
             VALUES ($1, $2, $3, $4, $5, $6, 'pending', 'Processing', NOW(),
                     '', '', $7, $8, FALSE, '')
             RETURNING *",
        )
        .bind(Uuid::now_v7())
        .bind(&new.order_no)
        .bind(new.customer_id)
        .bind(new.product_id)
        .bind(&new.payment_type)
        .bind(new.address_id)
        .bind(&new.size)
        .bind(new.qty)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn order_by_id(&self, id: Uuid) -> Result<Option<Order>, sqlx::Error> {
        sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn order_by_no(&self, order_no: &str) -> Result<Option<Order>, sqlx::Error> {
        sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE order_no = $1")
            .bind(order_no)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn completed_orders(&self) -> Result<Vec<CompletedOrderRow>, sqlx::Error> {
        sqlx::query_as::<_, CompletedOrderRow>(
            "SELECT o.id, o.order_no,
                    COALESCE(p.product_no, 'Unknown') AS product_no,
                    COALESCE(c.name, 'Unknown') AS customer_name,
                    o.qty, o.order_date, o.order_status
             FROM orders o
             LEFT JOIN products p ON p.id = o.product_id
             LEFT JOIN customers c ON c.id = o.customer_id
             WHERE o.is_complete
             ORDER BY o.order_date DESC",
        )
        .fetch_all(&self.pool)
        .await
    }

    pub async fn completed_orders_for(
        &self,
        customer_id: Uuid,
    ) -> Result<Vec<Order>, sqlx::Error> {
        sqlx::query_as::<_, Order>(
            "SELECT * FROM orders WHERE customer_id = $1 AND is_complete
             ORDER BY order_date DESC",
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await
    }

    /// Applies an allow-listed admin patch; absent fields keep their value.
    pub async fn apply_patch(&self, id: Uuid, patch: &OrderPatch) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE orders SET
                 order_status = COALESCE($2, order_status),
                 payment_status = COALESCE($3, payment_status),
                 track_id = COALESCE($4, track_id),
                 delivered_date = COALESCE($5, delivered_date)
             WHERE id = $1",
        )
        .bind(id)
        .bind(&patch.order_status)
        .bind(&patch.payment_status)
        .bind(&patch.track_id)
        .bind(&patch.delivered_date)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Marks the order paid: records the payment type and flips the
    /// completion flag. This is the only write that sets `is_complete`.
    pub async fn confirm_payment(
        &self,
        id: Uuid,
        payment_type: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE orders SET payment_type = $2, is_complete = TRUE WHERE id = $1",
        )
        .bind(id)
        .bind(payment_type)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn cancel(&self, id: Uuid, reason: &str) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE orders SET order_status = $2, cancellation_reason = $3 WHERE id = $1",
        )
        .bind(id)
        .bind(OrderStatus::Cancelled.as_str())
        .bind(reason)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn insert_upi_payment(
        &self,
        order_id: Uuid,
        screenshot_base64: &str,
        screenshot_name: &str,
    ) -> Result<UpiPayment, sqlx::Error> {
        sqlx::query_as::<_, UpiPayment>(
            "INSERT INTO upi_payments (id, order_id, screenshot_base64, screenshot_name, created_at)
             VALUES ($1, $2, $3, $4, NOW())
             RETURNING *",
        )
        .bind(Uuid::now_v7())
        .bind(order_id)
        .bind(screenshot_base64)
        .bind(screenshot_name)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn insert_address(&self, new: &NewAddress) -> Result<Address, sqlx::Error> {
        sqlx::query_as::<_, Address>(
            "INSERT INTO addresses (id, customer_id, kind, name, address, city, landmark,
                                    district, state, zip_code, phone, is_saved, created_at)
             VALUES ($1, $2, 'Order Address', $3, $4, $5, $6, $7, $8, $9, $10, $11, NOW())
             RETURNING *",
        )
        .bind(Uuid::now_v7())
        .bind(new.customer_id)
        .bind(&new.name)
        .bind(&new.address)
        .bind(&new.city)
        .bind(&new.landmark)
        .bind(&new.district)
        .bind(&new.state)
        .bind(&new.zip_code)
        .bind(&new.phone)
        .bind(new.is_saved)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn customer_by_id(&self, id: Uuid) -> Result<Option<Customer>, sqlx::Error> {
        sqlx::query_as::<_, Customer>("SELECT * FROM customers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }
}
