//! FILENAME: datagrid-format/src/error.rs

use datagrid_engine::GridError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FormatError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Grid error: {0}")]
    Grid(#[from] GridError),

    #[error("Invalid file format: {0}")]
    InvalidFormat(String),
}
