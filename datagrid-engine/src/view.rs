//! FILENAME: datagrid-engine/src/view.rs
//! Grid View - Renderable output for the rendering layer.
//!
//! A `VisibleSlice` borrows the rows it shows; it is rebuilt by the
//! orchestrator after every recomputation.

use grid_model::{Row, RowIndex};
use serde::Serialize;

/// "Showing `first` to `last` of `total`" (1-based, inclusive).
/// Both bounds are 0 when nothing is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRange {
    pub first: usize,
    pub last: usize,
    pub total: usize,
}

impl PageRange {
    pub fn new(start: usize, end: usize, total: usize) -> Self {
        if start >= end {
            return PageRange {
                first: 0,
                last: 0,
                total,
            };
        }
        PageRange {
            first: start + 1,
            last: end,
            total,
        }
    }
}

impl std::fmt::Display for PageRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Showing {} to {} of {} results", self.first, self.last, self.total)
    }
}

/// The rows, page metadata and selection that should currently be rendered.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibleSlice<'r> {
    /// Rows of the current page, in display order.
    pub page_rows: Vec<&'r Row>,

    /// Source positions of `page_rows`.
    pub page_indices: Vec<RowIndex>,

    /// Current page after clamping (0-based).
    pub current_page: usize,

    pub page_size: usize,

    /// Never zero: an empty result is one empty page.
    pub total_pages: usize,

    /// Rows in the filtered+sorted set.
    pub total_count: usize,

    pub range: PageRange,

    pub has_previous: bool,
    pub has_next: bool,

    /// Selected rows (page-scoped for positional selection, whole filtered
    /// set for key selection).
    pub selected_rows: Vec<&'r Row>,

    /// Checkbox state: selected positions within `page_rows`.
    pub selected_positions: Vec<usize>,

    /// Header checkbox state.
    pub all_selected: bool,
}

impl<'r> VisibleSlice<'r> {
    pub fn is_empty(&self) -> bool {
        self.page_rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.page_rows.len()
    }

    pub fn is_selected(&self, position: usize) -> bool {
        self.selected_positions.binary_search(&position).is_ok()
    }
}
