//! FILENAME: datagrid-engine/src/selection.rs
//! Selection Manager - tracks which rows are marked selected.
//!
//! Two policies are supported:
//! - `Positional`: a set of positions within the visible page. Any change to
//!   the pipeline inputs invalidates it, so every recompute clears it.
//! - `ByRowKey`: a set of row keys over the whole filtered set. Sorting and
//!   paging keep it; a key is dropped only when its row is filtered out.
//!
//! In both cases `toggle_all` selects the rest of the page first and only
//! clears once the whole page is selected.

use std::collections::BTreeSet;

use grid_model::{Row, RowIndex, RowKey};
use log::{debug, warn};
use rustc_hash::FxHashSet;

use crate::definition::{row_key, FieldAccessor, SelectionPolicy};

/// Keys for every source row. A row whose id repeats an earlier row's id
/// gets its source position instead, so each key names exactly one row.
fn unique_keys(row_id: Option<&FieldAccessor>, rows: &[Row]) -> Vec<RowKey> {
    let mut seen: FxHashSet<RowKey> = FxHashSet::default();
    let mut duplicates = 0usize;
    let keys = (0..rows.len())
        .map(|index| {
            let key = row_key(row_id, rows, index);
            if seen.insert(key.clone()) {
                key
            } else {
                duplicates += 1;
                RowKey::Source(index)
            }
        })
        .collect();
    if duplicates > 0 {
        warn!(
            "selection: {} row(s) repeat an earlier row id, keyed by position",
            duplicates
        );
    }
    keys
}

#[derive(Debug, Clone, Default)]
pub struct SelectionManager {
    policy: SelectionPolicy,
    row_id: Option<FieldAccessor>,

    /// Source positions of the visible page, in display order.
    page: Vec<RowIndex>,

    /// Selected page positions (Positional).
    positions: BTreeSet<usize>,

    /// Filtered+sorted set with the key of each row (ByRowKey).
    ordered: Vec<(RowIndex, RowKey)>,
    /// Keys of the visible page, parallel to `page` (ByRowKey).
    page_keys: Vec<RowKey>,
    /// Selected keys (ByRowKey).
    keys: FxHashSet<RowKey>,
}

impl SelectionManager {
    pub fn new(policy: SelectionPolicy) -> Self {
        SelectionManager {
            policy,
            ..Default::default()
        }
    }

    pub fn with_row_id(mut self, row_id: Option<FieldAccessor>) -> Self {
        self.row_id = row_id;
        self
    }

    pub fn policy(&self) -> SelectionPolicy {
        self.policy
    }

    // ------------------------------------------------------------------------
    // Pipeline notifications
    // ------------------------------------------------------------------------

    /// Rescopes the selection to a freshly computed page.
    ///
    /// `ordered` is the full filtered+sorted view; `page` is the slice of it
    /// being displayed. Returns true if any selection was dropped.
    pub fn on_recompute(&mut self, rows: &[Row], ordered: &[RowIndex], page: &[RowIndex]) -> bool {
        self.page = page.to_vec();
        match self.policy {
            SelectionPolicy::Positional => {
                let dropped = !self.positions.is_empty();
                self.positions.clear();
                if dropped {
                    debug!("selection: positional selection reset by recompute");
                }
                dropped
            }
            SelectionPolicy::ByRowKey => {
                let keys = unique_keys(self.row_id.as_ref(), rows);
                let key_of = |index: RowIndex| {
                    keys.get(index)
                        .cloned()
                        .unwrap_or(RowKey::Source(index))
                };
                self.ordered = ordered.iter().map(|&index| (index, key_of(index))).collect();
                self.page_keys = page.iter().map(|&index| key_of(index)).collect();

                let live: FxHashSet<&RowKey> = self.ordered.iter().map(|(_, key)| key).collect();
                let before = self.keys.len();
                self.keys.retain(|key| live.contains(key));
                let dropped = self.keys.len() != before;
                if dropped {
                    debug!(
                        "selection: {} key(s) left the filtered set",
                        before - self.keys.len()
                    );
                }
                dropped
            }
        }
    }

    /// Called when the source rows are replaced. Synthesized keys refer to
    /// old positions, so they cannot survive a data swap.
    pub fn on_rows_replaced(&mut self) -> bool {
        match self.policy {
            SelectionPolicy::ByRowKey if self.row_id.is_some() => false,
            _ => self.clear(),
        }
    }

    // ------------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------------

    /// Flips the row at `position` in the visible page.
    /// Returns the new state, or None if the position is not on the page.
    pub fn toggle(&mut self, position: usize) -> Option<bool> {
        if position >= self.page.len() {
            warn!(
                "selection: toggle at {} ignored, page has {} rows",
                position,
                self.page.len()
            );
            return None;
        }
        let selected = match self.policy {
            SelectionPolicy::Positional => {
                if self.positions.remove(&position) {
                    false
                } else {
                    self.positions.insert(position);
                    true
                }
            }
            SelectionPolicy::ByRowKey => {
                let key = &self.page_keys[position];
                if self.keys.remove(key) {
                    false
                } else {
                    self.keys.insert(key.clone());
                    true
                }
            }
        };
        debug!("selection: position {} -> {}", position, selected);
        Some(selected)
    }

    /// Selects every row on the page unless all are already selected, in
    /// which case the page is cleared. Returns true if rows are now selected.
    pub fn toggle_all(&mut self) -> bool {
        let select = self.page_selected_count() < self.page.len();
        match self.policy {
            SelectionPolicy::Positional => {
                self.positions.clear();
                if select {
                    self.positions.extend(0..self.page.len());
                }
            }
            SelectionPolicy::ByRowKey => {
                for key in &self.page_keys {
                    if select {
                        self.keys.insert(key.clone());
                    } else {
                        self.keys.remove(key);
                    }
                }
            }
        }
        debug!(
            "selection: toggle all -> {}",
            if select { "select page" } else { "clear page" }
        );
        select
    }

    /// Clears every selection. Returns true if anything was selected.
    pub fn clear(&mut self) -> bool {
        let had_any = !self.positions.is_empty() || !self.keys.is_empty();
        self.positions.clear();
        self.keys.clear();
        had_any
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    /// Checkbox state for a page position.
    pub fn is_selected(&self, position: usize) -> bool {
        match self.policy {
            SelectionPolicy::Positional => self.positions.contains(&position),
            SelectionPolicy::ByRowKey => self
                .page_keys
                .get(position)
                .is_some_and(|key| self.keys.contains(key)),
        }
    }

    /// Number of selected rows on the visible page.
    pub fn page_selected_count(&self) -> usize {
        (0..self.page.len()).filter(|&p| self.is_selected(p)).count()
    }

    /// Header checkbox state: the page has rows and all of them are selected.
    pub fn is_all_selected(&self) -> bool {
        !self.page.is_empty() && self.page_selected_count() == self.page.len()
    }

    /// Selected positions on the visible page, ascending.
    pub fn selected_positions(&self) -> Vec<usize> {
        (0..self.page.len()).filter(|&p| self.is_selected(p)).collect()
    }

    /// Source positions of every selected row, in display order.
    /// Positional selection covers the page; key selection covers the
    /// whole filtered set.
    pub fn selected_indices(&self) -> Vec<RowIndex> {
        match self.policy {
            SelectionPolicy::Positional => self
                .positions
                .iter()
                .filter_map(|&p| self.page.get(p).copied())
                .collect(),
            SelectionPolicy::ByRowKey => self
                .ordered
                .iter()
                .filter(|(_, key)| self.keys.contains(key))
                .map(|(index, _)| *index)
                .collect(),
        }
    }

    pub fn selected_rows<'r>(&self, rows: &'r [Row]) -> Vec<&'r Row> {
        self.selected_indices()
            .into_iter()
            .filter_map(|index| rows.get(index))
            .collect()
    }

    pub fn count(&self) -> usize {
        match self.policy {
            SelectionPolicy::Positional => self.positions.len(),
            SelectionPolicy::ByRowKey => self.selected_indices().len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(n: usize) -> Vec<Row> {
        (0..n)
            .map(|i| Row::new().with("id", format!("r{}", i)).with("n", i as i64))
            .collect()
    }

    fn positional(rows: &[Row], page: &[RowIndex]) -> SelectionManager {
        let mut manager = SelectionManager::new(SelectionPolicy::Positional);
        let ordered: Vec<RowIndex> = (0..rows.len()).collect();
        manager.on_recompute(rows, &ordered, page);
        manager
    }

    #[test]
    fn test_toggle_and_count() {
        let rows = rows(5);
        let mut manager = positional(&rows, &[0, 1, 2, 3, 4]);
        assert_eq!(manager.toggle(2), Some(true));
        assert_eq!(manager.toggle(4), Some(true));
        assert_eq!(manager.count(), 2);
        assert_eq!(manager.toggle(2), Some(false));
        assert_eq!(manager.count(), 1);
        assert_eq!(manager.toggle(9), None);
    }

    #[test]
    fn test_toggle_all_selects_remaining_first() {
        let rows = rows(5);
        let mut manager = positional(&rows, &[0, 1, 2, 3, 4]);
        manager.toggle(0);
        manager.toggle(3);
        assert!(manager.toggle_all());
        assert_eq!(manager.count(), 5);
        assert!(manager.is_all_selected());
        assert!(!manager.toggle_all());
        assert_eq!(manager.count(), 0);
    }

    #[test]
    fn test_toggle_all_on_empty_page_selects_nothing() {
        let rows = rows(0);
        let mut manager = positional(&rows, &[]);
        assert!(!manager.toggle_all());
        assert_eq!(manager.count(), 0);
        assert!(!manager.is_all_selected());
    }

    #[test]
    fn test_positional_selected_rows_follow_page() {
        let rows = rows(10);
        let mut manager = positional(&rows, &[5, 6, 7, 8, 9]);
        manager.toggle(1);
        let selected = manager.selected_rows(&rows);
        assert_eq!(selected, vec![&rows[6]]);
    }

    #[test]
    fn test_positional_reset_on_recompute() {
        let rows = rows(10);
        let mut manager = positional(&rows, &[0, 1, 2, 3, 4]);
        manager.toggle(2);
        let ordered: Vec<RowIndex> = vec![0, 1, 3, 4, 5];
        assert!(manager.on_recompute(&rows, &ordered, &ordered));
        assert_eq!(manager.count(), 0);
    }

    #[test]
    fn test_key_selection_survives_reorder() {
        let rows = rows(6);
        let mut manager = SelectionManager::new(SelectionPolicy::ByRowKey)
            .with_row_id(Some(FieldAccessor::key("id")));
        let ordered: Vec<RowIndex> = (0..6).collect();
        manager.on_recompute(&rows, &ordered, &ordered[0..3]);
        manager.toggle(1); // r1

        // Reverse order, second page now shows r2, r1, r0
        let reversed: Vec<RowIndex> = (0..6).rev().collect();
        assert!(!manager.on_recompute(&rows, &reversed, &reversed[3..6]));
        assert_eq!(manager.count(), 1);
        assert!(manager.is_selected(1));
        assert!(!manager.is_selected(0));
    }

    #[test]
    fn test_key_selection_drops_filtered_out_rows() {
        let rows = rows(6);
        let mut manager = SelectionManager::new(SelectionPolicy::ByRowKey);
        let ordered: Vec<RowIndex> = (0..6).collect();
        manager.on_recompute(&rows, &ordered, &ordered[0..3]);
        manager.toggle(0);
        manager.toggle(2);

        let filtered: Vec<RowIndex> = vec![1, 2, 4];
        assert!(manager.on_recompute(&rows, &filtered, &filtered));
        assert_eq!(manager.selected_indices(), vec![2]);
    }

    #[test]
    fn test_key_toggle_all_is_page_scoped() {
        let rows = rows(6);
        let mut manager = SelectionManager::new(SelectionPolicy::ByRowKey);
        let ordered: Vec<RowIndex> = (0..6).collect();
        manager.on_recompute(&rows, &ordered, &ordered[3..6]);
        manager.toggle_all();
        manager.on_recompute(&rows, &ordered, &ordered[0..3]);
        assert_eq!(manager.page_selected_count(), 0);
        assert_eq!(manager.count(), 3);
        manager.toggle_all();
        assert_eq!(manager.count(), 6);
        manager.toggle_all();
        assert_eq!(manager.selected_indices(), vec![3, 4, 5]);
    }

    #[test]
    fn test_duplicate_row_ids_get_distinct_keys() {
        let rows = vec![
            Row::new().with("id", "a"),
            Row::new().with("id", "a"),
            Row::new().with("id", "b"),
        ];
        let mut manager = SelectionManager::new(SelectionPolicy::ByRowKey)
            .with_row_id(Some(FieldAccessor::key("id")));
        let ordered: Vec<RowIndex> = (0..3).collect();
        manager.on_recompute(&rows, &ordered, &ordered);

        assert_eq!(manager.toggle(0), Some(true));
        assert_eq!(manager.count(), 1);
        assert_eq!(manager.selected_indices(), vec![0]);
        assert!(!manager.is_selected(1));

        assert_eq!(manager.toggle(1), Some(true));
        assert_eq!(manager.selected_indices(), vec![0, 1]);
    }

    #[test]
    fn test_rows_replaced_clears_synthesized_keys() {
        let rows = rows(3);
        let mut manager = SelectionManager::new(SelectionPolicy::ByRowKey);
        let ordered: Vec<RowIndex> = (0..3).collect();
        manager.on_recompute(&rows, &ordered, &ordered);
        manager.toggle(0);
        assert!(manager.on_rows_replaced());
        assert_eq!(manager.count(), 0);

        let mut keyed = SelectionManager::new(SelectionPolicy::ByRowKey)
            .with_row_id(Some(FieldAccessor::key("id")));
        keyed.on_recompute(&rows, &ordered, &ordered);
        keyed.toggle(0);
        assert!(!keyed.on_rows_replaced());
        assert_eq!(keyed.count(), 1);
    }
}
