//! FILENAME: datagrid-engine/src/pagination.rs
//! Pagination Engine - slices a row view into the requested page.
//!
//! Out-of-range pages are clamped, never rejected. An empty view still
//! reports one (empty) page.

use std::ops::Range;

use grid_model::RowIndex;
use log::trace;

use crate::definition::PaginationState;

/// One page cut out of an ordered row view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Source positions of the rows on this page, in display order.
    pub rows: Vec<RowIndex>,
    /// Page index after clamping.
    pub current_page: usize,
    pub total_pages: usize,
    /// Number of rows across all pages.
    pub total_count: usize,
    /// Offsets of this page within the ordered view.
    pub span: Range<usize>,
}

/// Computes the page for `state` over `order`. The requested page is
/// clamped into range; `state` itself is not modified.
pub fn apply(order: &[RowIndex], state: &PaginationState) -> Page {
    let total_count = order.len();
    let mut clamped = *state;
    let current_page = clamped.clamp(total_count);
    let page_size = state.page_size();

    let start = (current_page * page_size).min(total_count);
    let end = (start + page_size).min(total_count);

    trace!(
        "paginate: page {} of {} ({}..{} of {})",
        current_page,
        clamped.total_pages(total_count),
        start,
        end,
        total_count
    );

    Page {
        rows: order[start..end].to_vec(),
        current_page,
        total_pages: clamped.total_pages(total_count),
        total_count,
        span: start..end,
    }
}

/// A single page holding the whole view (pagination disabled).
pub fn unpaged(order: &[RowIndex]) -> Page {
    Page {
        rows: order.to_vec(),
        current_page: 0,
        total_pages: 1,
        total_count: order.len(),
        span: 0..order.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(page_size: usize, page: usize) -> PaginationState {
        PaginationState::new(page_size).unwrap().with_page(page)
    }

    #[test]
    fn test_middle_and_last_page() {
        let order: Vec<RowIndex> = (0..25).collect();
        let page = apply(&order, &state(10, 1));
        assert_eq!(page.rows, (10..20).collect::<Vec<_>>());
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total_count, 25);

        let last = apply(&order, &state(10, 2));
        assert_eq!(last.rows, (20..25).collect::<Vec<_>>());
        assert_eq!(last.span, 20..25);
    }

    #[test]
    fn test_out_of_range_page_is_clamped() {
        let order = vec![0, 1, 2];
        let far = apply(&order, &state(10, 999));
        let first = apply(&order, &state(10, 0));
        assert_eq!(far, first);
        assert_eq!(far.current_page, 0);
    }

    #[test]
    fn test_empty_view_has_one_empty_page() {
        let page = apply(&[], &state(5, 3));
        assert!(page.rows.is_empty());
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.current_page, 0);
        assert_eq!(page.total_count, 0);
    }

    #[test]
    fn test_pages_cover_view_exactly_once() {
        let order: Vec<RowIndex> = vec![7, 3, 9, 1, 0, 4, 8];
        let first = apply(&order, &state(3, 0));
        let mut collected = Vec::new();
        for p in 0..first.total_pages {
            collected.extend(apply(&order, &state(3, p)).rows);
        }
        assert_eq!(collected, order);
    }

    #[test]
    fn test_unpaged() {
        let page = unpaged(&[4, 2]);
        assert_eq!(page.rows, vec![4, 2]);
        assert_eq!(page.total_pages, 1);
    }
}
