//! Limit/offset pagination
//!
//! A pure post-processing step over an already-enriched, order-stable table.

use crate::record::Table;

/// Take at most `limit` records starting at `offset`. An offset at or past
/// the end yields an empty table.
pub fn paginate(table: Table, offset: usize, limit: usize) -> Table {
    table.into_iter().skip(offset).take(limit).collect()
}
