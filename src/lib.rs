//! Raya Storefront - Order and Product Management Backend
//!
//! ## Features
//! - Product catalog with image galleries and collections
//! - Customer comments and ratings
//! - Order placement, payment confirmation (UPI screenshot / cash-on-delivery)
//! - Admin order status edits with inventory adjustment
//! - Fire-and-forget event notifications

pub mod db;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod notify;

use db::{CatalogRepo, IdSequence, OrderRepo};
use notify::Notifier;

#[derive(Clone)]
pub struct AppState {
    pub catalog: CatalogRepo,
    pub orders: OrderRepo,
    pub ids: IdSequence,
    pub notifier: Notifier,
}

impl AppState {
    pub fn new(db: sqlx::PgPool, notifier: Notifier) -> Self {
        Self {
            catalog: CatalogRepo::new(db.clone()),
            orders: OrderRepo::new(db.clone()),
            ids: IdSequence::new(db),
            notifier,
        }
    }
}
