//! FILENAME: datagrid-engine/src/engine.rs
//! Pipeline Orchestrator - composes the stages into a visible slice.
//!
//! Stages always run in the same order:
//! 1. filter   (drop rows before paying for comparisons)
//! 2. sort
//! 3. paginate
//!
//! and the selection manager is then rescoped to the resulting page.

use grid_model::{Row, RowIndex};
use log::trace;

use crate::definition::{ColumnRegistry, FilterState, PaginationState, SortState};
use crate::error::GridError;
use crate::pagination::{self, Page};
use crate::selection::SelectionManager;
use crate::view::{PageRange, VisibleSlice};
use crate::{filter, sort};

/// Output of one pipeline run, before selection is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutput {
    /// The full filtered+sorted view (source positions).
    pub ordered: Vec<RowIndex>,
    /// The page cut out of `ordered`.
    pub page: Page,
}

/// Runs filter -> sort -> paginate. With no pagination state the whole view
/// is a single page.
pub fn calculate(
    rows: &[Row],
    registry: &ColumnRegistry,
    filters: &FilterState,
    sort_state: &SortState,
    pagination_state: Option<&PaginationState>,
) -> PipelineOutput {
    let all: Vec<RowIndex> = (0..rows.len()).collect();

    // Step 1: Filter
    let filtered = filter::apply(rows, &all, filters, registry);

    // Step 2: Sort
    let ordered = sort::apply(rows, &filtered, sort_state, registry);

    // Step 3: Paginate
    let page = match pagination_state {
        Some(state) => pagination::apply(&ordered, state),
        None => pagination::unpaged(&ordered),
    };

    trace!(
        "pipeline: {} rows -> {} filtered -> page {}/{} ({} rows)",
        rows.len(),
        ordered.len(),
        page.current_page + 1,
        page.total_pages,
        page.rows.len()
    );

    PipelineOutput { ordered, page }
}

/// Assembles the renderable slice from a pipeline run and the selection
/// state already scoped to it.
pub fn build_slice<'r>(
    rows: &'r [Row],
    output: &PipelineOutput,
    page_size: usize,
    selection: &SelectionManager,
) -> VisibleSlice<'r> {
    let page = &output.page;
    let page_rows: Vec<&'r Row> = page.rows.iter().filter_map(|&i| rows.get(i)).collect();

    VisibleSlice {
        page_rows,
        page_indices: page.rows.clone(),
        current_page: page.current_page,
        page_size,
        total_pages: page.total_pages,
        total_count: page.total_count,
        range: PageRange::new(page.span.start, page.span.end, page.total_count),
        has_previous: page.current_page > 0,
        has_next: page.current_page + 1 < page.total_pages,
        selected_rows: selection.selected_rows(rows),
        selected_positions: selection.selected_positions(),
        all_selected: selection.is_all_selected(),
    }
}

/// Checks filters and sort against the registry's capability flags, the
/// same way `DataGrid` does when the state is set.
pub fn validate_state(
    registry: &ColumnRegistry,
    filters: &FilterState,
    sort_state: &SortState,
) -> Result<(), GridError> {
    for filter in filters.iter() {
        registry.ensure_filterable(&filter.column_id)?;
    }
    if let SortState::By { column_id, .. } = sort_state {
        registry.ensure_sortable(column_id)?;
    }
    Ok(())
}

/// Recomputes the visible slice from scratch and notifies `selection` of the
/// new page composition. State naming a missing, non-filterable or
/// non-sortable column is rejected before anything runs.
pub fn recompute<'r>(
    rows: &'r [Row],
    registry: &ColumnRegistry,
    filters: &FilterState,
    sort_state: &SortState,
    pagination_state: &PaginationState,
    selection: &mut SelectionManager,
) -> Result<VisibleSlice<'r>, GridError> {
    validate_state(registry, filters, sort_state)?;
    let output = calculate(rows, registry, filters, sort_state, Some(pagination_state));
    selection.on_recompute(rows, &output.ordered, &output.page.rows);
    Ok(build_slice(rows, &output, pagination_state.page_size(), selection))
}
