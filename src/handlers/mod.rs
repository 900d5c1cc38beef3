//! HTTP surface: nested routers for `/order` and `/product`.

pub mod orders;
pub mod products;
