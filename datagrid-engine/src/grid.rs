//! FILENAME: datagrid-engine/src/grid.rs
//! PURPOSE: The per-instance state bundle of one data grid.
//! CONTEXT: `DataGrid` owns the rows, the column registry and every piece of
//! interaction state (filters, sort, page, selection, column visibility).
//! All mutations go through its methods; the host calls `recompute()` after
//! mutating and renders the returned `VisibleSlice`.
//!
//! Pipeline inputs carry a version number. `recompute()` only reruns the
//! stages when the version moved, so calling it after a pure selection event
//! does not wipe a positional selection.
//!
//! Not safe for concurrent mutation: serialize access (one UI thread, or a
//! single mutex around the grid).

use grid_model::{Row, RowIndex};
use log::{debug, warn};
use rustc_hash::FxHashSet;

use crate::definition::{
    ColumnDef, ColumnId, ColumnRegistry, FilterState, GridOptions, PaginationState,
    SortDirection, SortState,
};
use crate::engine::{self, PipelineOutput};
use crate::error::GridError;
use crate::pagination::Page;
use crate::selection::SelectionManager;
use crate::view::VisibleSlice;

// ============================================================================
// CALLBACKS
// ============================================================================

/// Outward notifications fired after state mutations. Every method has a
/// no-op default so listeners implement only what they need.
pub trait GridListener: Send {
    fn on_selection_change(&mut self, _selected: &[&Row]) {}

    /// `direction` is None when the sort on `column_id` was cleared.
    fn on_sort(&mut self, _column_id: &str, _direction: Option<SortDirection>) {}

    fn on_page_change(&mut self, _page: usize) {}

    fn on_filter_change(&mut self, _filters: &FilterState) {}

    fn on_column_visibility_change(&mut self, _column_id: &str, _visible: bool) {}

    fn on_row_click(&mut self, _row: &Row) {}
}

type Listeners = Vec<Box<dyn GridListener>>;

fn notify_selection(listeners: &mut Listeners, rows: &[Row], selection: &SelectionManager) {
    if listeners.is_empty() {
        return;
    }
    let selected = selection.selected_rows(rows);
    for listener in listeners.iter_mut() {
        listener.on_selection_change(&selected);
    }
}

// ============================================================================
// DATA GRID
// ============================================================================

pub struct DataGrid {
    registry: ColumnRegistry,
    options: GridOptions,
    rows: Vec<Row>,

    filters: FilterState,
    sort: SortState,
    pagination: PaginationState,
    selection: SelectionManager,
    hidden_columns: FxHashSet<ColumnId>,

    listeners: Listeners,

    /// Bumped by every change to a pipeline input.
    version: u64,
    /// Version the current `output` was computed from.
    computed_version: u64,
    output: PipelineOutput,
    /// Last page announced through `on_page_change`.
    reported_page: usize,
}

impl std::fmt::Debug for DataGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataGrid")
            .field("columns", &self.registry.len())
            .field("rows", &self.rows.len())
            .field("filters", &self.filters)
            .field("sort", &self.sort)
            .field("pagination", &self.pagination)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

impl DataGrid {
    /// Creates a grid and computes its first page.
    pub fn new(
        columns: Vec<ColumnDef>,
        rows: Vec<Row>,
        options: GridOptions,
    ) -> Result<Self, GridError> {
        let registry = ColumnRegistry::register(columns)?;
        let pagination = PaginationState::new(options.page_size)?;
        let selection =
            SelectionManager::new(options.selection_policy).with_row_id(options.row_id.clone());

        let mut grid = DataGrid {
            registry,
            options,
            rows,
            filters: FilterState::new(),
            sort: SortState::None,
            pagination,
            selection,
            hidden_columns: FxHashSet::default(),
            listeners: Vec::new(),
            version: 1,
            computed_version: 0,
            output: PipelineOutput {
                ordered: Vec::new(),
                page: Page {
                    rows: Vec::new(),
                    current_page: 0,
                    total_pages: 1,
                    total_count: 0,
                    span: 0..0,
                },
            },
            reported_page: 0,
        };
        grid.recompute();
        debug!("grid: created with {:?}", grid);
        Ok(grid)
    }

    /// Registers a listener for state-change notifications.
    pub fn subscribe<L: GridListener + 'static>(&mut self, listener: L) {
        self.listeners.push(Box::new(listener));
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn registry(&self) -> &ColumnRegistry {
        &self.registry
    }

    pub fn columns(&self) -> &[ColumnDef] {
        self.registry.columns()
    }

    pub fn options(&self) -> &GridOptions {
        &self.options
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn sort_state(&self) -> &SortState {
        &self.sort
    }

    pub fn pagination(&self) -> &PaginationState {
        &self.pagination
    }

    pub fn selection(&self) -> &SelectionManager {
        &self.selection
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// True when an input changed since the last `recompute()`.
    pub fn is_stale(&self) -> bool {
        self.computed_version != self.version
    }

    fn invalidate(&mut self) {
        self.version += 1;
    }

    // ------------------------------------------------------------------------
    // Rows
    // ------------------------------------------------------------------------

    /// Replaces the source rows.
    pub fn set_rows(&mut self, rows: Vec<Row>) {
        self.rows = rows;
        self.invalidate();
        debug!("grid: rows replaced ({} rows)", self.rows.len());
        if self.selection.on_rows_replaced() {
            notify_selection(&mut self.listeners, &self.rows, &self.selection);
        }
    }

    // ------------------------------------------------------------------------
    // Filtering
    // ------------------------------------------------------------------------

    /// Sets the text filter for a column; empty text removes it.
    /// Any change returns to the first page.
    pub fn set_filter(&mut self, column_id: &str, text: &str) -> Result<(), GridError> {
        self.registry.ensure_filterable(column_id)?;
        if !self.options.enable_filtering {
            warn!("grid: filtering disabled, ignoring filter on {}", column_id);
            return Ok(());
        }
        if self.filters.set(column_id, text) {
            debug!("grid: filter {} = {:?}", column_id, text);
            self.filters_changed();
        }
        Ok(())
    }

    pub fn clear_filter(&mut self, column_id: &str) -> Result<(), GridError> {
        self.set_filter(column_id, "")
    }

    pub fn clear_filters(&mut self) {
        if self.filters.clear() {
            debug!("grid: filters cleared");
            self.filters_changed();
        }
    }

    fn filters_changed(&mut self) {
        self.pagination.set_page(0);
        self.invalidate();
        for listener in self.listeners.iter_mut() {
            listener.on_filter_change(&self.filters);
        }
    }

    // ------------------------------------------------------------------------
    // Sorting
    // ------------------------------------------------------------------------

    /// Replaces the sort state. A sort on a non-sortable column is rejected.
    pub fn set_sort(&mut self, sort: SortState) -> Result<(), GridError> {
        if let Some(column_id) = sort.column_id() {
            self.registry.ensure_sortable(column_id)?;
        }
        if !self.options.enable_sorting {
            warn!("grid: sorting disabled, ignoring {:?}", sort);
            return Ok(());
        }
        if sort == self.sort {
            return Ok(());
        }

        let previous = std::mem::replace(&mut self.sort, sort);
        self.invalidate();
        debug!("grid: sort {:?}", self.sort);

        let (column_id, direction) = match (&self.sort, &previous) {
            (SortState::By { column_id, direction }, _) => (column_id.clone(), Some(*direction)),
            (SortState::None, SortState::By { column_id, .. }) => (column_id.clone(), None),
            (SortState::None, SortState::None) => return Ok(()),
        };
        for listener in self.listeners.iter_mut() {
            listener.on_sort(&column_id, direction);
        }
        Ok(())
    }

    /// Header-click policy: asc -> desc -> none; a different column starts
    /// at asc. Returns the new state.
    pub fn toggle_sort(&mut self, column_id: &str) -> Result<SortState, GridError> {
        self.registry.ensure_sortable(column_id)?;
        let next = self.sort.toggled(column_id);
        self.set_sort(next)?;
        Ok(self.sort.clone())
    }

    pub fn clear_sort(&mut self) -> Result<(), GridError> {
        self.set_sort(SortState::None)
    }

    // ------------------------------------------------------------------------
    // Pagination
    // ------------------------------------------------------------------------

    /// Requests a page. Out-of-range pages are clamped on recompute.
    pub fn set_page(&mut self, page: usize) {
        if page != self.pagination.current_page() {
            self.pagination.set_page(page);
            self.invalidate();
            debug!("grid: page {} requested", page);
        }
    }

    pub fn next_page(&mut self) {
        let next = self.pagination.current_page().saturating_add(1);
        self.set_page(next);
    }

    pub fn previous_page(&mut self) {
        let previous = self.pagination.current_page().saturating_sub(1);
        self.set_page(previous);
    }

    pub fn first_page(&mut self) {
        self.set_page(0);
    }

    pub fn last_page(&mut self) {
        self.set_page(usize::MAX);
    }

    /// Changes the page size and returns to the first page.
    pub fn set_page_size(&mut self, page_size: usize) -> Result<(), GridError> {
        if page_size == self.pagination.page_size() {
            return Ok(());
        }
        self.pagination.set_page_size(page_size)?;
        self.options.page_size = page_size;
        self.invalidate();
        debug!("grid: page size {}", page_size);
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------------

    /// Toggles the row at `position` of the visible page.
    /// Returns the new state, or None if ignored.
    ///
    /// Pending changes are computed first, so `position` always refers to
    /// the page the current state describes.
    pub fn toggle_selection(&mut self, position: usize) -> Option<bool> {
        if !self.options.enable_row_selection {
            warn!("grid: row selection disabled, ignoring toggle at {}", position);
            return None;
        }
        self.refresh();
        let selected = self.selection.toggle(position)?;
        notify_selection(&mut self.listeners, &self.rows, &self.selection);
        Some(selected)
    }

    /// Selects the rest of the page, or clears it if it is fully selected.
    pub fn toggle_all(&mut self) -> bool {
        if !self.options.enable_row_selection {
            warn!("grid: row selection disabled, ignoring toggle all");
            return false;
        }
        self.refresh();
        let selected = self.selection.toggle_all();
        notify_selection(&mut self.listeners, &self.rows, &self.selection);
        selected
    }

    pub fn clear_selection(&mut self) {
        if self.selection.clear() {
            notify_selection(&mut self.listeners, &self.rows, &self.selection);
        }
    }

    pub fn selected_rows(&self) -> Vec<&Row> {
        self.selection.selected_rows(&self.rows)
    }

    pub fn selection_count(&self) -> usize {
        self.selection.count()
    }

    pub fn is_all_selected(&self) -> bool {
        self.selection.is_all_selected()
    }

    // ------------------------------------------------------------------------
    // Column visibility
    // ------------------------------------------------------------------------

    pub fn is_column_visible(&self, column_id: &str) -> bool {
        self.registry.get(column_id).is_some() && !self.hidden_columns.contains(column_id)
    }

    pub fn set_column_visible(&mut self, column_id: &str, visible: bool) -> Result<(), GridError> {
        self.registry.require(column_id)?;
        let changed = if visible {
            self.hidden_columns.remove(column_id)
        } else {
            self.hidden_columns.insert(column_id.to_string())
        };
        if changed {
            debug!("grid: column {} visible = {}", column_id, visible);
            for listener in self.listeners.iter_mut() {
                listener.on_column_visibility_change(column_id, visible);
            }
        }
        Ok(())
    }

    pub fn hide_column(&mut self, column_id: &str) -> Result<(), GridError> {
        self.set_column_visible(column_id, false)
    }

    pub fn show_column(&mut self, column_id: &str) -> Result<(), GridError> {
        self.set_column_visible(column_id, true)
    }

    /// Flips visibility and returns the new state.
    pub fn toggle_column_visibility(&mut self, column_id: &str) -> Result<bool, GridError> {
        let visible = !self.is_column_visible(column_id);
        self.set_column_visible(column_id, visible)?;
        Ok(visible)
    }

    /// Columns to render, in registry order.
    pub fn visible_columns(&self) -> Vec<&ColumnDef> {
        self.registry
            .columns()
            .iter()
            .filter(|c| !self.hidden_columns.contains(&c.id))
            .collect()
    }

    // ------------------------------------------------------------------------
    // Rows on the page
    // ------------------------------------------------------------------------

    /// Source position of the row at `position` on the visible page.
    pub fn page_row_index(&self, position: usize) -> Option<RowIndex> {
        self.output.page.rows.get(position).copied()
    }

    /// Resolves a click on the visible page and notifies listeners.
    pub fn row_click(&mut self, position: usize) -> Option<&Row> {
        self.refresh();
        let index = self.page_row_index(position)?;
        let row = self.rows.get(index)?;
        for listener in self.listeners.iter_mut() {
            listener.on_row_click(row);
        }
        Some(row)
    }

    // ------------------------------------------------------------------------
    // Pipeline
    // ------------------------------------------------------------------------

    /// Reruns filter -> sort -> paginate if any input changed, rescopes the
    /// selection, and returns what should be rendered.
    pub fn recompute(&mut self) -> VisibleSlice<'_> {
        self.refresh();
        self.visible_slice()
    }

    fn refresh(&mut self) {
        if self.is_stale() {
            self.run_pipeline();
        }
    }

    fn run_pipeline(&mut self) {
        let no_filters = FilterState::new();
        let no_sort = SortState::None;
        let filters = if self.options.enable_filtering {
            &self.filters
        } else {
            &no_filters
        };
        let sort = if self.options.enable_sorting {
            &self.sort
        } else {
            &no_sort
        };
        let pagination = self.options.enable_pagination.then_some(&self.pagination);

        self.output = engine::calculate(&self.rows, &self.registry, filters, sort, pagination);

        // Keep the stored page clamped to what was actually shown
        self.pagination.set_page(self.output.page.current_page);
        self.computed_version = self.version;

        let dropped =
            self.selection
                .on_recompute(&self.rows, &self.output.ordered, &self.output.page.rows);
        if dropped {
            notify_selection(&mut self.listeners, &self.rows, &self.selection);
        }

        let page = self.output.page.current_page;
        if page != self.reported_page {
            self.reported_page = page;
            for listener in self.listeners.iter_mut() {
                listener.on_page_change(page);
            }
        }
    }

    /// The slice from the last computation, without recomputing.
    pub fn visible_slice(&self) -> VisibleSlice<'_> {
        engine::build_slice(
            &self.rows,
            &self.output,
            self.pagination.page_size(),
            &self.selection,
        )
    }
}
