//! FILENAME: datagrid-engine/src/sort.rs
//! Sort Engine - orders a row view by the single active sort key.
//!
//! The sort is stable: rows with equal keys keep their input order in both
//! directions, because descending reverses the comparison rather than the
//! sorted output.

use grid_model::{OrderKey, Row, RowIndex};
use log::trace;

use crate::definition::{ColumnRegistry, SortDirection, SortState};

/// Returns `order` sorted by `sort`. With `SortState::None` the input order
/// is returned unchanged.
pub fn apply(
    rows: &[Row],
    order: &[RowIndex],
    sort: &SortState,
    registry: &ColumnRegistry,
) -> Vec<RowIndex> {
    let (column_id, direction) = match sort {
        SortState::None => return order.to_vec(),
        SortState::By {
            column_id,
            direction,
        } => (column_id.as_str(), *direction),
    };

    // Resolve every key once; the comparator only touches precomputed keys.
    let mut keyed: Vec<(OrderKey, RowIndex)> = order
        .iter()
        .map(|&index| {
            let key = rows
                .get(index)
                .map(|row| registry.resolve(row, column_id).order_key())
                .unwrap_or(OrderKey::Absent);
            (key, index)
        })
        .collect();

    // slice::sort_by is stable
    keyed.sort_by(|(a, _), (b, _)| match direction {
        SortDirection::Asc => a.cmp(b),
        SortDirection::Desc => b.cmp(a),
    });

    trace!("sort: {} rows by {} {:?}", keyed.len(), column_id, direction);
    keyed.into_iter().map(|(_, index)| index).collect()
}
