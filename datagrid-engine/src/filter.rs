//! FILENAME: datagrid-engine/src/filter.rs
//! Filter Engine - reduces a row view to rows matching every active filter.
//!
//! Matching is a case-insensitive substring test against the resolved
//! value's string representation. Filters on different columns are ANDed.

use grid_model::{Row, RowIndex};
use log::trace;

use crate::definition::{ColumnRegistry, FilterState};

/// A filter prepared for matching (needle lowercased once).
struct PreparedFilter<'a> {
    column_id: &'a str,
    needle: String,
}

/// Returns the positions from `order` whose rows satisfy every filter in
/// `filters`, preserving their relative order.
///
/// Pure and total: absent values match as the empty string, and a filter on
/// a column the registry does not know is ignored.
pub fn apply(
    rows: &[Row],
    order: &[RowIndex],
    filters: &FilterState,
    registry: &ColumnRegistry,
) -> Vec<RowIndex> {
    if filters.is_empty() {
        return order.to_vec();
    }

    let prepared: Vec<PreparedFilter<'_>> = filters
        .iter()
        .filter(|f| registry.get(&f.column_id).is_some())
        .map(|f| PreparedFilter {
            column_id: f.column_id.as_str(),
            needle: f.text.to_lowercase(),
        })
        .collect();

    let retained: Vec<RowIndex> = order
        .iter()
        .copied()
        .filter(|&index| {
            rows.get(index)
                .map(|row| row_matches(row, &prepared, registry))
                .unwrap_or(false)
        })
        .collect();

    trace!(
        "filter: {} of {} rows retained by {} filter(s)",
        retained.len(),
        order.len(),
        prepared.len()
    );
    retained
}

fn row_matches(row: &Row, filters: &[PreparedFilter<'_>], registry: &ColumnRegistry) -> bool {
    filters.iter().all(|filter| {
        let value = registry.resolve(row, filter.column_id);
        value.display_text().to_lowercase().contains(&filter.needle)
    })
}
