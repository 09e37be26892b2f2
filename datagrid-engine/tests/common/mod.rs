//! FILENAME: tests/common/mod.rs
//! Test harness and fixtures for data grid integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use datagrid_engine::{
    ColumnDef, DataGrid, FieldAccessor, FilterState, GridListener, GridOptions, Row,
    SelectionPolicy, SortDirection,
};

// ============================================================================
// EVENT RECORDING
// ============================================================================

/// One notification observed by the recording listener.
#[derive(Debug, Clone, PartialEq)]
pub enum GridEvent {
    Selection(usize),
    Sort(String, Option<SortDirection>),
    Page(usize),
    Filter(Vec<(String, String)>),
    Visibility(String, bool),
    RowClick(Row),
}

pub struct RecordingListener {
    events: Arc<Mutex<Vec<GridEvent>>>,
}

impl GridListener for RecordingListener {
    fn on_selection_change(&mut self, selected: &[&Row]) {
        self.push(GridEvent::Selection(selected.len()));
    }

    fn on_sort(&mut self, column_id: &str, direction: Option<SortDirection>) {
        self.push(GridEvent::Sort(column_id.to_string(), direction));
    }

    fn on_page_change(&mut self, page: usize) {
        self.push(GridEvent::Page(page));
    }

    fn on_filter_change(&mut self, filters: &FilterState) {
        let filters = filters
            .iter()
            .map(|f| (f.column_id.clone(), f.text.clone()))
            .collect();
        self.push(GridEvent::Filter(filters));
    }

    fn on_column_visibility_change(&mut self, column_id: &str, visible: bool) {
        self.push(GridEvent::Visibility(column_id.to_string(), visible));
    }

    fn on_row_click(&mut self, row: &Row) {
        self.push(GridEvent::RowClick(row.clone()));
    }
}

impl RecordingListener {
    fn push(&self, event: GridEvent) {
        self.events.lock().unwrap().push(event);
    }
}

// ============================================================================
// HARNESS
// ============================================================================

/// A grid with a recording listener attached.
pub struct GridHarness {
    pub grid: DataGrid,
    events: Arc<Mutex<Vec<GridEvent>>>,
}

impl GridHarness {
    pub fn new(columns: Vec<ColumnDef>, rows: Vec<Row>, options: GridOptions) -> Self {
        let mut grid = DataGrid::new(columns, rows, options).unwrap();
        let events = Arc::new(Mutex::new(Vec::new()));
        grid.subscribe(RecordingListener {
            events: events.clone(),
        });
        GridHarness { grid, events }
    }

    /// The 25-person fixture with the given page size.
    pub fn with_names(page_size: usize) -> Self {
        let options = GridOptions {
            page_size,
            enable_row_selection: true,
            ..Default::default()
        };
        Self::new(NamesFixture::columns(), NamesFixture::rows(), options)
    }

    /// The sales fixture with positional selection.
    pub fn with_sales(page_size: usize) -> Self {
        let options = GridOptions {
            page_size,
            enable_row_selection: true,
            ..Default::default()
        };
        Self::new(SalesFixture::columns(), SalesFixture::rows(), options)
    }

    /// The sales fixture with key-based selection on the `id` field.
    pub fn with_sales_by_key(page_size: usize) -> Self {
        let options = GridOptions {
            page_size,
            enable_row_selection: true,
            selection_policy: SelectionPolicy::ByRowKey,
            row_id: Some(FieldAccessor::key("id")),
            ..Default::default()
        };
        Self::new(SalesFixture::columns(), SalesFixture::rows(), options)
    }

    pub fn events(&self) -> Vec<GridEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn clear_events(&self) {
        self.events.lock().unwrap().clear();
    }

    /// Recomputes, then returns the display text of `column` for each row
    /// of the visible page.
    pub fn page_values(&mut self, column: &str) -> Vec<String> {
        self.grid.recompute();
        let slice = self.grid.visible_slice();
        slice
            .page_rows
            .iter()
            .map(|row| {
                self.grid
                    .registry()
                    .resolve(row, column)
                    .display_text()
                    .into_owned()
            })
            .collect()
    }

    /// Display text of `column` for each selected row.
    pub fn selected_values(&self, column: &str) -> Vec<String> {
        self.grid
            .selected_rows()
            .iter()
            .map(|row| {
                self.grid
                    .registry()
                    .resolve(row, column)
                    .display_text()
                    .into_owned()
            })
            .collect()
    }
}

// ============================================================================
// FIXTURES
// ============================================================================

/// 25 people. Exactly three names contain "jo" (case-insensitive).
pub struct NamesFixture;

impl NamesFixture {
    pub fn names() -> Vec<&'static str> {
        vec![
            "Alice Brown",
            "Bob Chen",
            "Marjorie Lee",
            "Carol Davis",
            "David Evans",
            "Emma Fischer",
            "Frank Garcia",
            "Jolene Park",
            "Grace Hall",
            "Henry Irwin",
            "Isla Khan",
            "Jack Lewis",
            "Kate Miller",
            "Liam Nolan",
            "Mia Ortiz",
            "Noah Patel",
            "John Smith",
            "Olivia Quinn",
            "Peter Reed",
            "Quinn Scott",
            "Ruby Turner",
            "Sam Underwood",
            "Tina Vance",
            "Uma Walsh",
            "Victor Young",
        ]
    }

    pub fn columns() -> Vec<ColumnDef> {
        vec![
            ColumnDef::new("name").with_header("Name"),
            ColumnDef::new("age").with_header("Age"),
        ]
    }

    pub fn rows() -> Vec<Row> {
        Self::names()
            .into_iter()
            .enumerate()
            .map(|(i, name)| Row::new().with("name", name).with("age", 20 + (i as i64 % 7)))
            .collect()
    }
}

pub struct SalesFixture;

impl SalesFixture {
    pub fn data() -> Vec<(&'static str, &'static str, &'static str, f64, f64)> {
        vec![
            ("North", "Widget", "Q1", 10000.0, 100.0),
            ("North", "Widget", "Q2", 12000.0, 120.0),
            ("North", "Gadget", "Q1", 8000.0, 80.0),
            ("North", "Gadget", "Q2", 9000.0, 90.0),
            ("South", "Widget", "Q1", 15000.0, 150.0),
            ("South", "Widget", "Q2", 14000.0, 140.0),
            ("South", "Gadget", "Q1", 11000.0, 110.0),
            ("South", "Gadget", "Q2", 13000.0, 130.0),
            ("East", "Widget", "Q1", 9000.0, 90.0),
            ("East", "Widget", "Q2", 11000.0, 110.0),
            ("East", "Gadget", "Q1", 7000.0, 70.0),
            ("East", "Gadget", "Q2", 8500.0, 85.0),
        ]
    }

    /// `id`, `region`, `product`, `quarter`, `sales`, `quantity`, plus a
    /// computed `unit_price`. `id` is neither sortable nor filterable.
    pub fn columns() -> Vec<ColumnDef> {
        vec![
            ColumnDef::new("id").sortable(false).filterable(false),
            ColumnDef::new("region").with_header("Region"),
            ColumnDef::new("product").with_header("Product"),
            ColumnDef::new("quarter").with_header("Quarter"),
            ColumnDef::new("sales").with_header("Sales"),
            ColumnDef::new("quantity").with_header("Quantity"),
            ColumnDef::new("unit_price").computed(|row| {
                match (
                    row.get("sales").and_then(|v| v.as_number()),
                    row.get("quantity").and_then(|v| v.as_number()),
                ) {
                    (Some(sales), Some(quantity)) if quantity != 0.0 => (sales / quantity).into(),
                    _ => datagrid_engine::Value::Absent,
                }
            }),
        ]
    }

    pub fn rows() -> Vec<Row> {
        Self::data()
            .into_iter()
            .enumerate()
            .map(|(i, (region, product, quarter, sales, quantity))| {
                Row::new()
                    .with("id", format!("S{:02}", i + 1))
                    .with("region", region)
                    .with("product", product)
                    .with("quarter", quarter)
                    .with("sales", sales)
                    .with("quantity", quantity)
            })
            .collect()
    }
}
