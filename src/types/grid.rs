use serde::{Deserialize, Serialize};

use super::Style;
use crate::cell_ref;
use crate::error::{Result, SheetshotError};
use crate::layout::VisibleIndexMap;

/// Dense, hidden-filtered grid produced by the extractor.
///
/// `values` and `styles` always have the same shape: `rows() x cols()`.
#[derive(Debug, Clone, Default)]
pub struct Grid {
    pub values: Vec<Vec<String>>,
    pub styles: Vec<Vec<Style>>,
    /// Original (window-relative) row index to visible row index.
    pub row_map: VisibleIndexMap,
    /// Original (window-relative) column index to visible column index.
    pub col_map: VisibleIndexMap,
}

/// Borrowed view of one visible cell.
#[derive(Debug, Clone, Copy)]
pub struct Cell<'a> {
    pub value: &'a str,
    pub style: &'a Style,
}

impl Grid {
    pub fn rows(&self) -> usize {
        self.values.len()
    }

    pub fn cols(&self) -> usize {
        self.col_map.visible_len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows() == 0 || self.cols() == 0
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<Cell<'_>> {
        let value = self.values.get(row)?.get(col)?;
        let style = self.styles.get(row)?.get(col)?;
        Some(Cell { value, style })
    }

    pub fn value(&self, row: usize, col: usize) -> &str {
        self.values
            .get(row)
            .and_then(|r| r.get(col))
            .map_or("", String::as_str)
    }
}

/// Where the rendered window sits in the sheet.
///
/// `row_start` is 1-based as in A1 notation; `column_start` is letters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct SnapshotRequest {
    pub spreadsheet_id: String,
    pub sheet_name: String,
    pub column_start: Option<String>,
    pub row_start: Option<u32>,
    pub column_end: Option<String>,
    pub row_end: Option<u32>,
}

impl SnapshotRequest {
    /// Request for a window starting at the given A1 cell (e.g. "B3").
    pub fn starting_at(cell: &str) -> Result<Self> {
        let (col, row) = cell_ref::parse_cell_ref(cell)
            .ok_or_else(|| SheetshotError::CellRef(cell.to_string()))?;
        Ok(Self {
            column_start: Some(cell_ref::column_letters(col)),
            row_start: Some(row + 1),
            ..Self::default()
        })
    }

    /// Request from a full range like `Sheet1!B3:F20`.
    pub fn from_range(spreadsheet_id: &str, range: &str) -> Result<Self> {
        let (sheet_name, cells) = range.rsplit_once('!').unwrap_or(("", range));
        let (start_row, start_col, end_row, end_col) = cell_ref::parse_cell_range(cells)
            .ok_or_else(|| SheetshotError::CellRef(range.to_string()))?;
        Ok(Self {
            spreadsheet_id: spreadsheet_id.to_string(),
            sheet_name: sheet_name.to_string(),
            column_start: Some(cell_ref::column_letters(start_col)),
            row_start: Some(start_row + 1),
            column_end: Some(cell_ref::column_letters(end_col)),
            row_end: Some(end_row + 1),
        })
    }

    /// Set the window's first column from letters such as `"C"` or `"$AA"`.
    ///
    /// # Errors
    /// Returns [`SheetshotError::CellRef`] unless `letters` are column letters.
    pub fn with_column_start(mut self, letters: &str) -> Result<Self> {
        let index = cell_ref::column_index(letters)
            .ok_or_else(|| SheetshotError::CellRef(letters.to_string()))?;
        self.column_start = Some(cell_ref::column_letters(index));
        Ok(self)
    }

    /// A1 range string to request from the data source.
    pub fn a1_range(&self) -> String {
        cell_ref::a1_range(
            &self.sheet_name,
            self.column_start.as_deref(),
            self.row_start,
            self.column_end.as_deref(),
            self.row_end,
        )
    }

    /// 0-based index of the first rendered row.
    pub fn row_offset(&self) -> i64 {
        i64::from(self.row_start.unwrap_or(1)) - 1
    }

    /// 0-based index of the first rendered column.
    pub fn col_offset(&self) -> i64 {
        i64::from(cell_ref::column_offset(self.column_start.as_deref()))
    }
}
