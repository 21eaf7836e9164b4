//! Test fixtures for generating data-source payloads in memory.
//!
//! This module provides builders for creating grid payloads programmatically,
//! shaped like the JSON the spreadsheet API returns.
//!
//! # Example
//!
//! ```rust
//! use fixtures::{PayloadBuilder, StyleBuilder};
//!
//! let payload = PayloadBuilder::new()
//!     .cell("A1", "Hello")
//!     .styled_cell("B1", "42", StyleBuilder::new().bold().bg_color("#D9EAD3"))
//!     .merge("A2:B3")
//!     .hide_col(2)
//!     .build();
//!
//! let window = sheetshot::parser::parse_window(&payload).unwrap();
//! ```
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic,
    clippy::cast_possible_truncation,
    clippy::cast_lossless
)]

use serde_json::{json, Map, Value};

// ============================================================================
// Style Builder
// ============================================================================

/// A border side definition.
#[derive(Debug, Clone, PartialEq)]
pub struct BorderSide {
    pub style: String,
    pub width: Option<f64>,
    pub color: Option<String>,
}

impl BorderSide {
    /// Create a new border side with the given style.
    #[must_use]
    pub fn new(style: &str) -> Self {
        Self {
            style: style.to_string(),
            width: None,
            color: None,
        }
    }

    #[must_use]
    pub fn width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    /// Set the border color.
    #[must_use]
    pub fn color(mut self, color: &str) -> Self {
        self.color = Some(color.to_string());
        self
    }

    fn to_json(&self) -> Value {
        let mut side = Map::new();
        side.insert("style".into(), json!(self.style));
        if let Some(width) = self.width {
            side.insert("width".into(), json!(width));
        }
        if let Some(color) = &self.color {
            side.insert("color".into(), unit_color(color));
        }
        Value::Object(side)
    }
}

/// Builder for a cell's `userEnteredFormat`.
#[derive(Debug, Clone, Default)]
pub struct StyleBuilder {
    pub bg_color: Option<String>,
    pub font_color: Option<String>,
    pub font_size: Option<f64>,
    pub bold: bool,
    pub wrap_text: bool,
    pub border_top: Option<BorderSide>,
    pub border_bottom: Option<BorderSide>,
    pub border_left: Option<BorderSide>,
    pub border_right: Option<BorderSide>,
}

impl StyleBuilder {
    /// Create a new empty style builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Background color as `#RRGGBB`.
    #[must_use]
    pub fn bg_color(mut self, color: &str) -> Self {
        self.bg_color = Some(color.to_string());
        self
    }

    /// Font color as `#RRGGBB`.
    #[must_use]
    pub fn font_color(mut self, color: &str) -> Self {
        self.font_color = Some(color.to_string());
        self
    }

    #[must_use]
    pub fn font_size(mut self, size: f64) -> Self {
        self.font_size = Some(size);
        self
    }

    #[must_use]
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    #[must_use]
    pub fn wrap_text(mut self) -> Self {
        self.wrap_text = true;
        self
    }

    /// Same border on all four sides.
    #[must_use]
    pub fn border_all(mut self, side: BorderSide) -> Self {
        self.border_top = Some(side.clone());
        self.border_bottom = Some(side.clone());
        self.border_left = Some(side.clone());
        self.border_right = Some(side);
        self
    }

    #[must_use]
    pub fn border_top(mut self, side: BorderSide) -> Self {
        self.border_top = Some(side);
        self
    }

    #[must_use]
    pub fn border_bottom(mut self, side: BorderSide) -> Self {
        self.border_bottom = Some(side);
        self
    }

    /// Build the `userEnteredFormat` object.
    pub fn to_json(&self) -> Value {
        let mut format = Map::new();
        if let Some(bg) = &self.bg_color {
            format.insert("backgroundColor".into(), unit_color(bg));
        }

        let mut text = Map::new();
        if self.bold {
            text.insert("bold".into(), json!(true));
        }
        if let Some(size) = self.font_size {
            text.insert("fontSize".into(), json!(size));
        }
        if let Some(color) = &self.font_color {
            text.insert("foregroundColor".into(), unit_color(color));
        }
        if !text.is_empty() {
            format.insert("textFormat".into(), Value::Object(text));
        }

        if self.wrap_text {
            format.insert("wrapStrategy".into(), json!("WRAP"));
        }

        let mut borders = Map::new();
        for (name, side) in [
            ("top", &self.border_top),
            ("bottom", &self.border_bottom),
            ("left", &self.border_left),
            ("right", &self.border_right),
        ] {
            if let Some(side) = side {
                borders.insert(name.into(), side.to_json());
            }
        }
        if !borders.is_empty() {
            format.insert("borders".into(), Value::Object(borders));
        }

        Value::Object(format)
    }
}

/// `#RRGGBB` to the API's unit color object; zero channels are omitted.
pub fn unit_color(hex: &str) -> Value {
    let hex = hex.trim_start_matches('#');
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).unwrap();
    let mut color = Map::new();
    for (name, value) in [("red", channel(0)), ("green", channel(2)), ("blue", channel(4))] {
        if value != 0 {
            color.insert(name.into(), json!(f64::from(value) / 255.0));
        }
    }
    Value::Object(color)
}

// ============================================================================
// Payload Builder
// ============================================================================

#[derive(Debug, Clone)]
struct CellEntry {
    row: usize,
    col: usize,
    value: String,
    style: Option<StyleBuilder>,
}

/// Builder for a one-sheet "get spreadsheet with grid data" response.
#[derive(Debug, Clone, Default)]
pub struct PayloadBuilder {
    cells: Vec<CellEntry>,
    merges: Vec<(i64, i64, i64, i64)>,
    hidden_rows: Vec<usize>,
    hidden_cols: Vec<usize>,
    start_row: Option<u32>,
    start_col: Option<u32>,
}

impl PayloadBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an unstyled cell at a window-relative A1 reference.
    #[must_use]
    pub fn cell(self, cell_ref: &str, value: &str) -> Self {
        self.push(cell_ref, value, None)
    }

    #[must_use]
    pub fn styled_cell(self, cell_ref: &str, value: &str, style: StyleBuilder) -> Self {
        self.push(cell_ref, value, Some(style))
    }

    /// Fill a rectangular block row by row, starting at A1.
    #[must_use]
    pub fn rows(mut self, rows: &[&[&str]]) -> Self {
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                self.cells.push(CellEntry {
                    row: r,
                    col: c,
                    value: (*value).to_string(),
                    style: None,
                });
            }
        }
        self
    }

    /// Add a merge in sheet coordinates, written as an A1 range.
    #[must_use]
    pub fn merge(mut self, range: &str) -> Self {
        let (sr, sc, er, ec) = sheetshot::cell_ref::parse_cell_range(range).unwrap();
        self.merges
            .push((i64::from(sr), i64::from(er) + 1, i64::from(sc), i64::from(ec) + 1));
        self
    }

    /// Add a merge with raw end-exclusive indices.
    #[must_use]
    pub fn merge_indices(mut self, start_row: i64, end_row: i64, start_col: i64, end_col: i64) -> Self {
        self.merges.push((start_row, end_row, start_col, end_col));
        self
    }

    #[must_use]
    pub fn hide_row(mut self, row: usize) -> Self {
        self.hidden_rows.push(row);
        self
    }

    #[must_use]
    pub fn hide_col(mut self, col: usize) -> Self {
        self.hidden_cols.push(col);
        self
    }

    /// Record where the window starts in the sheet (0-based).
    #[must_use]
    pub fn start(mut self, row: u32, col: u32) -> Self {
        self.start_row = Some(row);
        self.start_col = Some(col);
        self
    }

    fn push(mut self, cell_ref: &str, value: &str, style: Option<StyleBuilder>) -> Self {
        let (col, row) = sheetshot::cell_ref::parse_cell_ref(cell_ref).unwrap();
        self.cells.push(CellEntry {
            row: row as usize,
            col: col as usize,
            value: value.to_string(),
            style,
        });
        self
    }

    /// Build the payload as a JSON value.
    pub fn build_value(&self) -> Value {
        let row_count = self
            .cells
            .iter()
            .map(|c| c.row + 1)
            .chain(self.hidden_rows.iter().map(|r| r + 1))
            .max()
            .unwrap_or(0);
        let col_count = self
            .cells
            .iter()
            .map(|c| c.col + 1)
            .chain(self.hidden_cols.iter().map(|c| c + 1))
            .max()
            .unwrap_or(0);

        let mut grid: Vec<Vec<Value>> = vec![Vec::new(); row_count];
        for entry in &self.cells {
            let row = &mut grid[entry.row];
            if row.len() <= entry.col {
                row.resize(entry.col + 1, json!({}));
            }
            let mut cell = Map::new();
            cell.insert("formattedValue".into(), json!(entry.value));
            if let Some(style) = &entry.style {
                cell.insert("userEnteredFormat".into(), style.to_json());
            }
            row[entry.col] = Value::Object(cell);
        }

        let row_data: Vec<Value> = grid.into_iter().map(|values| json!({ "values": values })).collect();
        let row_metadata: Vec<Value> = (0..row_count)
            .map(|r| json!({ "hiddenByUser": self.hidden_rows.contains(&r) }))
            .collect();
        let column_metadata: Vec<Value> = (0..col_count)
            .map(|c| json!({ "hiddenByUser": self.hidden_cols.contains(&c), "pixelSize": 100 }))
            .collect();
        let merges: Vec<Value> = self
            .merges
            .iter()
            .map(|&(sr, er, sc, ec)| {
                json!({
                    "sheetId": 0,
                    "startRowIndex": sr,
                    "endRowIndex": er,
                    "startColumnIndex": sc,
                    "endColumnIndex": ec
                })
            })
            .collect();

        let mut data = Map::new();
        if let Some(row) = self.start_row {
            data.insert("startRow".into(), json!(row));
        }
        if let Some(col) = self.start_col {
            data.insert("startColumn".into(), json!(col));
        }
        data.insert("rowData".into(), json!(row_data));
        data.insert("rowMetadata".into(), json!(row_metadata));
        data.insert("columnMetadata".into(), json!(column_metadata));

        json!({
            "spreadsheetId": "fixture",
            "sheets": [{
                "properties": { "sheetId": 0, "title": "Sheet1" },
                "data": [Value::Object(data)],
                "merges": merges
            }]
        })
    }

    /// Build the payload as JSON bytes.
    pub fn build(&self) -> Vec<u8> {
        serde_json::to_vec(&self.build_value()).unwrap()
    }
}
