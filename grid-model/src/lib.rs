//! FILENAME: grid-model/src/lib.rs
//! PURPOSE: Shared row and value types for the data-grid crates.
//! CONTEXT: Re-exports public types for use by the engine and format crates.

pub mod row;
pub mod value;

// Re-export commonly used types at the crate root
pub use row::{Row, RowIndex, RowKey};
pub use value::{OrderKey, Value};
