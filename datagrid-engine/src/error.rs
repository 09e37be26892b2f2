//! FILENAME: datagrid-engine/src/error.rs

use thiserror::Error;

/// Caller-side programming errors raised by grid state mutations.
///
/// Data conditions (missing fields, empty results, out-of-range pages)
/// are never errors; they degrade to defaults inside the stages.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("Duplicate column id: {0}")]
    DuplicateColumnId(String),

    #[error("Column is not filterable: {0}")]
    ColumnNotFilterable(String),

    #[error("Column is not sortable: {0}")]
    ColumnNotSortable(String),

    #[error("Invalid page size: {0} (must be greater than zero)")]
    InvalidPageSize(i64),

    #[error("Unknown column: {0}")]
    UnknownColumn(String),
}
