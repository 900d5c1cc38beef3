//! Row types and pure domain logic.

pub mod customer;
pub mod order;
pub mod product;
