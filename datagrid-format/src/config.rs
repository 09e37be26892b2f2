//! FILENAME: datagrid-format/src/config.rs
//! PURPOSE: Grid configuration (columns + feature switches) parsed from JSON.
//! CONTEXT: The JSON form of what a host passes to `DataGrid::new`, parsed
//! from a string the host already holds. Only key accessors can be written
//! down; computed columns stay in code. Interaction state (filters, sort,
//! page, selection) is never part of it.

use datagrid_engine::{
    ColumnDef, ColumnRegistry, DataGrid, FieldAccessor, GridError, GridOptions, SelectionPolicy,
    DEFAULT_PAGE_SIZE,
};
use grid_model::Row;
use log::debug;
use serde::Deserialize;

use crate::error::FormatError;

fn default_true() -> bool {
    true
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE as i64
}

// ============================================================================
// COLUMN SPEC
// ============================================================================

/// One column as written in a configuration document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSpec {
    pub id: String,

    #[serde(default)]
    pub header: Option<String>,

    /// Row field to read. Defaults to `id`.
    #[serde(default)]
    pub field: Option<String>,

    #[serde(default = "default_true")]
    pub sortable: bool,

    #[serde(default = "default_true")]
    pub filterable: bool,

    #[serde(default)]
    pub width: Option<u32>,

    #[serde(default)]
    pub min_width: Option<u32>,

    #[serde(default)]
    pub max_width: Option<u32>,
}

impl ColumnSpec {
    pub fn new(id: impl Into<String>) -> Self {
        ColumnSpec {
            id: id.into(),
            header: None,
            field: None,
            sortable: true,
            filterable: true,
            width: None,
            min_width: None,
            max_width: None,
        }
    }

    pub fn to_column_def(&self) -> ColumnDef {
        let mut column = ColumnDef::new(self.id.clone())
            .sortable(self.sortable)
            .filterable(self.filterable)
            .with_width_bounds(self.min_width, self.max_width);
        if let Some(header) = &self.header {
            column = column.with_header(header.clone());
        }
        if let Some(field) = &self.field {
            column = column.with_accessor(FieldAccessor::key(field.clone()));
        }
        if let Some(width) = self.width {
            column = column.with_width(width);
        }
        column
    }
}

// ============================================================================
// GRID CONFIG
// ============================================================================

/// Feature switches as written in a configuration document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OptionsSpec {
    pub enable_sorting: bool,
    pub enable_filtering: bool,
    pub enable_pagination: bool,
    pub enable_row_selection: bool,
    pub selection_policy: SelectionPolicy,
}

impl Default for OptionsSpec {
    fn default() -> Self {
        let defaults = GridOptions::default();
        OptionsSpec {
            enable_sorting: defaults.enable_sorting,
            enable_filtering: defaults.enable_filtering,
            enable_pagination: defaults.enable_pagination,
            enable_row_selection: defaults.enable_row_selection,
            selection_policy: defaults.selection_policy,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridConfig {
    pub columns: Vec<ColumnSpec>,

    /// Kept signed so a non-positive value in the document reports
    /// `InvalidPageSize` instead of a parse error.
    #[serde(default = "default_page_size")]
    pub page_size: i64,

    #[serde(default)]
    pub options: OptionsSpec,

    /// Row field holding a stable row key.
    #[serde(default)]
    pub row_id: Option<String>,
}

impl GridConfig {
    pub fn new(columns: Vec<ColumnSpec>) -> Self {
        GridConfig {
            columns,
            page_size: default_page_size(),
            options: OptionsSpec::default(),
            row_id: None,
        }
    }

    pub fn column_defs(&self) -> Vec<ColumnDef> {
        self.columns.iter().map(ColumnSpec::to_column_def).collect()
    }

    pub fn grid_options(&self) -> Result<GridOptions, FormatError> {
        if self.page_size <= 0 {
            return Err(GridError::InvalidPageSize(self.page_size).into());
        }
        Ok(GridOptions {
            enable_sorting: self.options.enable_sorting,
            enable_filtering: self.options.enable_filtering,
            enable_pagination: self.options.enable_pagination,
            enable_row_selection: self.options.enable_row_selection,
            selection_policy: self.options.selection_policy,
            page_size: self.page_size as usize,
            row_id: self.row_id.clone().map(FieldAccessor::key),
        })
    }

    /// Checks what `DataGrid::new` would reject, without any rows.
    pub fn validate(&self) -> Result<(), FormatError> {
        self.grid_options()?;
        ColumnRegistry::register(self.column_defs())?;
        if let Some(row_id) = &self.row_id {
            if row_id.is_empty() {
                return Err(FormatError::InvalidFormat("empty rowId".to_string()));
            }
        }
        Ok(())
    }

    /// Creates a grid over `rows` with this configuration.
    pub fn build(&self, rows: Vec<Row>) -> Result<DataGrid, FormatError> {
        let grid = DataGrid::new(self.column_defs(), rows, self.grid_options()?)?;
        Ok(grid)
    }
}

// ============================================================================
// PARSING
// ============================================================================

/// Parses and validates a configuration document.
pub fn parse_config(json: &str) -> Result<GridConfig, FormatError> {
    let config: GridConfig = serde_json::from_str(json)?;
    config.validate()?;
    debug!(
        "format: parsed grid config with {} columns",
        config.columns.len()
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PEOPLE: &str = r#"{
        "columns": [
            { "id": "name", "header": "Name", "width": 300, "maxWidth": 200 },
            { "id": "email", "field": "contact_email", "sortable": false },
            { "id": "age" }
        ],
        "pageSize": 25,
        "options": { "enableRowSelection": true, "selectionPolicy": "byRowKey" },
        "rowId": "id"
    }"#;

    #[test]
    fn test_parse_with_defaults() {
        let config = parse_config(PEOPLE).unwrap();
        assert_eq!(config.columns.len(), 3);
        assert_eq!(config.page_size, 25);
        assert!(config.options.enable_sorting);
        assert_eq!(config.options.selection_policy, SelectionPolicy::ByRowKey);
        assert!(config.columns[2].filterable);

        let defs = config.column_defs();
        assert_eq!(defs[0].header, "Name");
        assert_eq!(defs[0].effective_width(), Some(200));
        assert_eq!(defs[2].header, "age");
        assert!(!defs[1].sortable);
        assert!(matches!(&defs[1].accessor, FieldAccessor::ByKey(k) if k == "contact_email"));
    }

    #[test]
    fn test_missing_page_size_uses_default() {
        let config = parse_config(r#"{ "columns": [{ "id": "a" }] }"#).unwrap();
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE as i64);
        assert_eq!(config.options, OptionsSpec::default());
    }

    #[test]
    fn test_non_positive_page_size() {
        for json in [
            r#"{ "columns": [], "pageSize": 0 }"#,
            r#"{ "columns": [], "pageSize": -4 }"#,
        ] {
            match parse_config(json) {
                Err(FormatError::Grid(GridError::InvalidPageSize(n))) => assert!(n <= 0),
                other => panic!("expected InvalidPageSize, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let json = r#"{ "columns": [{ "id": "a" }, { "id": "a" }] }"#;
        assert!(matches!(
            parse_config(json),
            Err(FormatError::Grid(GridError::DuplicateColumnId(id))) if id == "a"
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(parse_config("{ columns"), Err(FormatError::Json(_))));
    }

    #[test]
    fn test_build_applies_options() {
        let config = parse_config(PEOPLE).unwrap();
        let rows = vec![
            Row::new().with("id", "p1").with("name", "Ann"),
            Row::new().with("id", "p2").with("name", "Ben"),
        ];
        let mut grid = config.build(rows).unwrap();
        assert_eq!(grid.pagination().page_size(), 25);
        assert_eq!(grid.toggle_selection(1), Some(true));
        assert_eq!(
            grid.toggle_sort("email"),
            Err(GridError::ColumnNotSortable("email".to_string()))
        );
    }
}
