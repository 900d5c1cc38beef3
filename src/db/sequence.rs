//! Human-readable display ids: `RAYA/<year>/<KIND>/<NNNN>`.
//!
//! The sequence lives in the `id_counters` table and is bumped with a single
//! atomic upsert, so concurrent creates can never mint the same id. Numbering
//! restarts at 0001 each year per kind.

use chrono::{Datelike, Utc};
use sqlx::PgPool;

const PREFIX: &str = "RAYA";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    Order,
    Product,
}

impl IdKind {
    pub fn tag(self) -> &'static str {
        match self {
            IdKind::Order => "ORD",
            IdKind::Product => "PRD",
        }
    }
}

pub fn format_display_id(year: i32, kind: IdKind, seq: i32) -> String {
    format!("{PREFIX}/{year}/{}/{seq:04}", kind.tag())
}

#[derive(Clone)]
pub struct IdSequence {
    pool: PgPool,
}

impl IdSequence {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Mints the next display id for `kind`, scoped to the current year.
    pub async fn next(&self, kind: IdKind) -> Result<String, sqlx::Error> {
        let year = Utc::now().year();
        let (seq,): (i32,) = sqlx::query_as(
            "INSERT INTO id_counters (year, kind, value) VALUES ($1, $2, 1)
             ON CONFLICT (year, kind) DO UPDATE SET value = id_counters.value + 1
             RETURNING value",
        )
        .bind(year)
        .bind(kind.tag())
        .fetch_one(&self.pool)
        .await?;
        Ok(format_display_id(year, kind, seq))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_padded_to_four() {
        assert_eq!(format_display_id(2025, IdKind::Order, 1), "RAYA/2025/ORD/0001");
        assert_eq!(format_display_id(2025, IdKind::Product, 42), "RAYA/2025/PRD/0042");
        assert_eq!(format_display_id(2025, IdKind::Order, 9999), "RAYA/2025/ORD/9999");
        // Width grows past four digits rather than wrapping.
        assert_eq!(format_display_id(2025, IdKind::Order, 10000), "RAYA/2025/ORD/10000");
    }

    #[test]
    fn test_strictly_increasing_within_a_year() {
        let ids: Vec<String> = (1..=50)
            .map(|n| format_display_id(2025, IdKind::Product, n))
            .collect();
        for pair in ids.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        let unique: std::collections::HashSet<&String> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len());
    }
}
