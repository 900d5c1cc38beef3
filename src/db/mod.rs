//! Typed repositories over the shared `PgPool`, one per area of the schema.

pub mod catalog;
pub mod orders;
pub mod sequence;

pub use catalog::CatalogRepo;
pub use orders::OrderRepo;
pub use sequence::{IdKind, IdSequence};
