//! FILENAME: datagrid-engine/src/definition.rs
//! Grid Definition - Column configuration and caller-owned state.
//!
//! This module contains all the types needed to DESCRIBE a grid:
//! - Column definitions and the registry that resolves values from rows
//! - Filter, sort and pagination state mutated by user interaction
//! - Feature options fixed at construction

use std::borrow::Cow;
use std::sync::Arc;

use grid_model::{Row, RowIndex, RowKey, Value};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::GridError;

/// Identifier of a column within a registry.
pub type ColumnId = String;

/// Page size used when the caller does not pick one.
pub const DEFAULT_PAGE_SIZE: usize = 10;

// ============================================================================
// FIELD ACCESSOR
// ============================================================================

/// Signature of a computed accessor.
pub type AccessorFn = dyn Fn(&Row) -> Value + Send + Sync;

/// How a column reads its value out of a row.
#[derive(Clone)]
pub enum FieldAccessor {
    /// Look up a field by name.
    ByKey(String),
    /// Compute the value from the whole row. Must be deterministic and
    /// free of side effects.
    ByFunction(Arc<AccessorFn>),
}

impl FieldAccessor {
    pub fn key(field: impl Into<String>) -> Self {
        FieldAccessor::ByKey(field.into())
    }

    pub fn function<F>(f: F) -> Self
    where
        F: Fn(&Row) -> Value + Send + Sync + 'static,
    {
        FieldAccessor::ByFunction(Arc::new(f))
    }

    /// Evaluates the accessor. A missing field resolves to `Value::Absent`.
    pub fn resolve<'r>(&self, row: &'r Row) -> Cow<'r, Value> {
        match self {
            FieldAccessor::ByKey(field) => match row.get(field) {
                Some(value) => Cow::Borrowed(value),
                None => Cow::Owned(Value::Absent),
            },
            FieldAccessor::ByFunction(f) => Cow::Owned(f(row)),
        }
    }
}

impl std::fmt::Debug for FieldAccessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldAccessor::ByKey(field) => f.debug_tuple("ByKey").field(field).finish(),
            FieldAccessor::ByFunction(_) => f.write_str("ByFunction(..)"),
        }
    }
}

// ============================================================================
// COLUMN DEFINITION
// ============================================================================

/// Static description of how to extract and treat one field of a row.
#[derive(Debug, Clone)]
pub struct ColumnDef {
    /// Unique identifier within the registry.
    pub id: ColumnId,

    /// Header label (defaults to the id).
    pub header: String,

    /// How the value is read. Defaults to the row field named by `id`.
    pub accessor: FieldAccessor,

    /// Whether header interaction may sort by this column.
    pub sortable: bool,

    /// Whether a text filter may be set on this column.
    pub filterable: bool,

    /// Preferred width in pixels.
    pub display_width: Option<u32>,

    pub min_width: Option<u32>,
    pub max_width: Option<u32>,
}

impl ColumnDef {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        ColumnDef {
            header: id.clone(),
            accessor: FieldAccessor::ByKey(id.clone()),
            id,
            sortable: true,
            filterable: true,
            display_width: None,
            min_width: None,
            max_width: None,
        }
    }

    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = header.into();
        self
    }

    pub fn with_accessor(mut self, accessor: FieldAccessor) -> Self {
        self.accessor = accessor;
        self
    }

    /// Shorthand for a `ByFunction` accessor.
    pub fn computed<F>(self, f: F) -> Self
    where
        F: Fn(&Row) -> Value + Send + Sync + 'static,
    {
        self.with_accessor(FieldAccessor::function(f))
    }

    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    pub fn filterable(mut self, filterable: bool) -> Self {
        self.filterable = filterable;
        self
    }

    pub fn with_width(mut self, width: u32) -> Self {
        self.display_width = Some(width);
        self
    }

    pub fn with_width_bounds(mut self, min: Option<u32>, max: Option<u32>) -> Self {
        self.min_width = min;
        self.max_width = max;
        self
    }

    /// Returns `display_width` clamped into `[min_width, max_width]`.
    /// With no preferred width, the minimum (if any) is used.
    pub fn effective_width(&self) -> Option<u32> {
        let width = self.display_width.or(self.min_width)?;
        let width = match self.max_width {
            Some(max) => width.min(max),
            None => width,
        };
        Some(match self.min_width {
            Some(min) => width.max(min),
            None => width,
        })
    }
}

// ============================================================================
// COLUMN REGISTRY
// ============================================================================

/// The set of columns of one grid instance. Built once, read-only after.
#[derive(Debug, Clone, Default)]
pub struct ColumnRegistry {
    columns: Vec<ColumnDef>,
    index: FxHashMap<ColumnId, usize>,
}

impl ColumnRegistry {
    /// Registers column definitions in display order.
    /// Fails if two definitions share an id.
    pub fn register(columns: Vec<ColumnDef>) -> Result<Self, GridError> {
        let mut index = FxHashMap::default();
        for (position, column) in columns.iter().enumerate() {
            if index.insert(column.id.clone(), position).is_some() {
                return Err(GridError::DuplicateColumnId(column.id.clone()));
            }
        }
        Ok(ColumnRegistry { columns, index })
    }

    pub fn get(&self, column_id: &str) -> Option<&ColumnDef> {
        self.index.get(column_id).map(|&i| &self.columns[i])
    }

    /// Like `get`, but an unknown id is an error.
    pub fn require(&self, column_id: &str) -> Result<&ColumnDef, GridError> {
        self.get(column_id)
            .ok_or_else(|| GridError::UnknownColumn(column_id.to_string()))
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Resolves a column's value for a row. Never fails: a missing field
    /// or an unregistered column resolves to `Value::Absent`.
    pub fn resolve<'r>(&self, row: &'r Row, column_id: &str) -> Cow<'r, Value> {
        match self.get(column_id) {
            Some(column) => column.accessor.resolve(row),
            None => Cow::Owned(Value::Absent),
        }
    }

    pub fn ensure_filterable(&self, column_id: &str) -> Result<(), GridError> {
        if self.require(column_id)?.filterable {
            Ok(())
        } else {
            Err(GridError::ColumnNotFilterable(column_id.to_string()))
        }
    }

    pub fn ensure_sortable(&self, column_id: &str) -> Result<(), GridError> {
        if self.require(column_id)?.sortable {
            Ok(())
        } else {
            Err(GridError::ColumnNotSortable(column_id.to_string()))
        }
    }
}

// ============================================================================
// FILTER STATE
// ============================================================================

/// One active per-column text filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnFilter {
    pub column_id: ColumnId,
    pub text: String,
}

/// Active text filters, at most one per column, in the order they were set.
/// Empty text is never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterState {
    filters: SmallVec<[ColumnFilter; 4]>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets (or replaces) the filter for a column. Empty text removes it.
    /// Returns whether the state changed.
    pub fn set(&mut self, column_id: &str, text: &str) -> bool {
        if text.is_empty() {
            return self.remove(column_id);
        }
        match self.filters.iter_mut().find(|f| f.column_id == column_id) {
            Some(existing) if existing.text == text => false,
            Some(existing) => {
                existing.text = text.to_string();
                true
            }
            None => {
                self.filters.push(ColumnFilter {
                    column_id: column_id.to_string(),
                    text: text.to_string(),
                });
                true
            }
        }
    }

    /// Builder-style `set`.
    pub fn with(mut self, column_id: &str, text: &str) -> Self {
        self.set(column_id, text);
        self
    }

    pub fn remove(&mut self, column_id: &str) -> bool {
        let before = self.filters.len();
        self.filters.retain(|f| f.column_id != column_id);
        self.filters.len() != before
    }

    pub fn get(&self, column_id: &str) -> Option<&str> {
        self.filters
            .iter()
            .find(|f| f.column_id == column_id)
            .map(|f| f.text.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColumnFilter> {
        self.filters.iter()
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn clear(&mut self) -> bool {
        let had_any = !self.filters.is_empty();
        self.filters.clear();
        had_any
    }
}

// ============================================================================
// SORT STATE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// The single active sort key, if any.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortState {
    #[default]
    None,
    #[serde(rename_all = "camelCase")]
    By {
        column_id: ColumnId,
        direction: SortDirection,
    },
}

impl SortState {
    pub fn by(column_id: impl Into<String>, direction: SortDirection) -> Self {
        SortState::By {
            column_id: column_id.into(),
            direction,
        }
    }

    pub fn column_id(&self) -> Option<&str> {
        match self {
            SortState::None => None,
            SortState::By { column_id, .. } => Some(column_id),
        }
    }

    pub fn direction(&self) -> Option<SortDirection> {
        match self {
            SortState::None => None,
            SortState::By { direction, .. } => Some(*direction),
        }
    }

    /// Header-click policy: unsorted or different column -> asc,
    /// asc -> desc, desc -> none.
    pub fn toggled(&self, column_id: &str) -> SortState {
        match self {
            SortState::By {
                column_id: current,
                direction,
            } if current == column_id => match direction {
                SortDirection::Asc => SortState::by(column_id, SortDirection::Desc),
                SortDirection::Desc => SortState::None,
            },
            _ => SortState::by(column_id, SortDirection::Asc),
        }
    }
}

// ============================================================================
// PAGINATION STATE
// ============================================================================

/// Requested page window. `page_size` is always greater than zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawPagination")]
pub struct PaginationState {
    page_size: usize,
    current_page: usize,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPagination {
    page_size: i64,
    #[serde(default)]
    current_page: usize,
}

impl TryFrom<RawPagination> for PaginationState {
    type Error = GridError;

    fn try_from(raw: RawPagination) -> Result<Self, Self::Error> {
        if raw.page_size <= 0 {
            return Err(GridError::InvalidPageSize(raw.page_size));
        }
        Ok(PaginationState {
            page_size: raw.page_size as usize,
            current_page: raw.current_page,
        })
    }
}

impl PaginationState {
    pub fn new(page_size: usize) -> Result<Self, GridError> {
        if page_size == 0 {
            return Err(GridError::InvalidPageSize(0));
        }
        Ok(PaginationState {
            page_size,
            current_page: 0,
        })
    }

    /// Builder-style page request. Out-of-range pages are clamped later.
    pub fn with_page(mut self, page: usize) -> Self {
        self.current_page = page;
        self
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Changes the page size and returns to the first page.
    pub fn set_page_size(&mut self, page_size: usize) -> Result<(), GridError> {
        if page_size == 0 {
            return Err(GridError::InvalidPageSize(0));
        }
        self.page_size = page_size;
        self.current_page = 0;
        Ok(())
    }

    pub fn set_page(&mut self, page: usize) {
        self.current_page = page;
    }

    /// Number of pages for `total_count` rows. Never zero.
    pub fn total_pages(&self, total_count: usize) -> usize {
        total_count.div_ceil(self.page_size).max(1)
    }

    /// Clamps `current_page` into `[0, total_pages - 1]` and returns it.
    pub fn clamp(&mut self, total_count: usize) -> usize {
        let last = self.total_pages(total_count) - 1;
        self.current_page = self.current_page.min(last);
        self.current_page
    }
}

impl Default for PaginationState {
    fn default() -> Self {
        PaginationState {
            page_size: DEFAULT_PAGE_SIZE,
            current_page: 0,
        }
    }
}

// ============================================================================
// OPTIONS
// ============================================================================

/// How the selection manager identifies selected rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SelectionPolicy {
    /// Selection is a set of positions in the visible page, reset whenever
    /// the pipeline inputs change.
    #[default]
    Positional,
    /// Selection is a set of row keys over the filtered set. Survives sort
    /// and page changes; a key is dropped when its row is filtered out.
    ByRowKey,
}

/// Feature switches fixed when the grid is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridOptions {
    pub enable_sorting: bool,
    pub enable_filtering: bool,
    pub enable_pagination: bool,
    pub enable_row_selection: bool,
    pub selection_policy: SelectionPolicy,
    pub page_size: usize,

    /// Produces the stable key of a row. Without it, keys are synthesized
    /// from source positions.
    #[serde(skip)]
    pub row_id: Option<FieldAccessor>,
}

impl Default for GridOptions {
    fn default() -> Self {
        GridOptions {
            enable_sorting: true,
            enable_filtering: true,
            enable_pagination: true,
            enable_row_selection: false,
            selection_policy: SelectionPolicy::Positional,
            page_size: DEFAULT_PAGE_SIZE,
            row_id: None,
        }
    }
}

/// Computes the key of the row at `index` in the source set.
pub fn row_key(row_id: Option<&FieldAccessor>, rows: &[Row], index: RowIndex) -> RowKey {
    let value = row_id.zip(rows.get(index)).map(|(accessor, row)| accessor.resolve(row));
    match value {
        Some(value) if !value.is_absent() => RowKey::Field(value.display_text().into_owned()),
        _ => RowKey::Source(index),
    }
}
