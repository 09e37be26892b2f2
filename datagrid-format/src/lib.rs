//! FILENAME: datagrid-format/src/lib.rs
//! Data grid file formats.
//!
//! Parses grid configuration (columns and feature switches) from a JSON
//! document held in memory, and loads row sets from JSON.

mod config;
mod error;
mod rows;

pub use config::{parse_config, ColumnSpec, GridConfig, OptionsSpec};
pub use error::FormatError;
pub use rows::{load_rows, rows_from_json};
