//! FILENAME: datagrid-engine/src/lib.rs
//! Data grid transformation engine.
//!
//! Turns a caller-supplied set of rows plus interaction state (filters,
//! sort, page, selection) into the slice of rows a grid widget renders.
//! Rendering itself is left to the host.
//!
//! Layers:
//! - `definition`: Columns and interaction state (what the grid IS)
//! - `filter`, `sort`, `pagination`: Pure pipeline stages over row positions
//! - `selection`: Selection bookkeeping scoped to the computed page
//! - `engine`: Pipeline orchestration (HOW we calculate)
//! - `view`: Renderable output for the host (WHAT we display)
//! - `grid`: The per-instance state bundle with change notifications

pub mod definition;
pub mod engine;
pub mod error;
pub mod filter;
pub mod grid;
pub mod pagination;
pub mod selection;
pub mod sort;
pub mod view;

pub use definition::*;
pub use engine::{build_slice, calculate, recompute, validate_state, PipelineOutput};
pub use error::GridError;
pub use grid::{DataGrid, GridListener};
pub use pagination::Page;
pub use selection::SelectionManager;
pub use view::{PageRange, VisibleSlice};

pub use grid_model::{Row, RowIndex, RowKey, Value};
