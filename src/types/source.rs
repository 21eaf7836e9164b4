//! Payload returned by the spreadsheet data source.
//!
//! Mirrors the "get spreadsheet including grid data" response closely enough
//! to deserialize it directly; unknown fields are ignored. Every field is
//! optional on the wire, so everything defaults.

use serde::{Deserialize, Serialize};

/// Top-level response: one entry per requested sheet.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Spreadsheet {
    pub spreadsheet_id: Option<String>,
    pub sheets: Vec<Sheet>,
}

impl Spreadsheet {
    /// The first grid window of the first sheet, with that sheet's merges.
    ///
    /// A response without sheets or grid data yields an empty window.
    pub fn first_window(&self) -> SheetWindow {
        let Some(sheet) = self.sheets.first() else {
            return SheetWindow::default();
        };
        SheetWindow {
            grid: sheet.data.first().cloned().unwrap_or_default(),
            merges: sheet.merges.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Sheet {
    pub properties: Option<SheetProperties>,
    pub data: Vec<GridData>,
    pub merges: Vec<GridRange>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SheetProperties {
    pub sheet_id: Option<i64>,
    pub title: Option<String>,
}

/// One rectangular block of cells with its dimension metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridData {
    pub start_row: Option<u32>,
    pub start_column: Option<u32>,
    pub row_data: Vec<RowData>,
    pub row_metadata: Vec<DimensionProperties>,
    pub column_metadata: Vec<DimensionProperties>,
}

impl GridData {
    /// Indices (relative to the window) of rows hidden by the user.
    pub fn hidden_rows(&self) -> Vec<usize> {
        hidden_indices(&self.row_metadata)
    }

    /// Indices (relative to the window) of columns hidden by the user.
    pub fn hidden_columns(&self) -> Vec<usize> {
        hidden_indices(&self.column_metadata)
    }
}

fn hidden_indices(meta: &[DimensionProperties]) -> Vec<usize> {
    meta.iter()
        .enumerate()
        .filter(|(_, m)| m.hidden_by_user)
        .map(|(i, _)| i)
        .collect()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RowData {
    pub values: Vec<CellData>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DimensionProperties {
    pub hidden_by_user: bool,
    pub hidden_by_filter: bool,
    pub pixel_size: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CellData {
    pub formatted_value: Option<String>,
    pub user_entered_format: Option<CellFormat>,
}

/// Format descriptor attached to a cell.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CellFormat {
    pub background_color: Option<ColorValue>,
    pub text_format: Option<TextFormat>,
    pub wrap_strategy: Option<String>,
    pub borders: Option<Borders>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextFormat {
    pub bold: Option<bool>,
    pub font_size: Option<f64>,
    pub foreground_color: Option<ColorValue>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Borders {
    pub top: Option<BorderSpec>,
    pub bottom: Option<BorderSpec>,
    pub left: Option<BorderSpec>,
    pub right: Option<BorderSpec>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BorderSpec {
    pub style: Option<String>,
    pub width: Option<f64>,
    pub color: Option<ColorValue>,
}

/// Normalized color; zero channels are omitted on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorValue {
    pub red: Option<f64>,
    pub green: Option<f64>,
    pub blue: Option<f64>,
    pub alpha: Option<f64>,
}

impl ColorValue {
    /// True when no channel is present at all (`{}`), which counts as unset.
    pub fn is_empty(&self) -> bool {
        self.red.is_none() && self.green.is_none() && self.blue.is_none() && self.alpha.is_none()
    }
}

/// A merge region in sheet coordinates, end-exclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridRange {
    pub sheet_id: Option<i64>,
    pub start_row_index: i64,
    pub end_row_index: i64,
    pub start_column_index: i64,
    pub end_column_index: i64,
}

impl GridRange {
    pub fn new(start_row: i64, end_row: i64, start_col: i64, end_col: i64) -> Self {
        Self {
            sheet_id: None,
            start_row_index: start_row,
            end_row_index: end_row,
            start_column_index: start_col,
            end_column_index: end_col,
        }
    }
}

/// The grid window and merge list consumed by the renderer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SheetWindow {
    pub grid: GridData,
    pub merges: Vec<GridRange>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    const RESPONSE: &str = r#"{
        "spreadsheetId": "abc",
        "sheets": [{
            "properties": {"sheetId": 7, "title": "Supply"},
            "data": [{
                "rowData": [
                    {"values": [
                        {"formattedValue": "Item",
                         "userEnteredFormat": {
                            "backgroundColor": {"red": 1, "green": 0.9},
                            "textFormat": {"bold": true, "fontSize": 12},
                            "wrapStrategy": "WRAP",
                            "borders": {"top": {"style": "SOLID", "width": 1, "color": {}}}
                         }},
                        {}
                    ]},
                    {}
                ],
                "rowMetadata": [{"pixelSize": 21}, {"hiddenByUser": true}],
                "columnMetadata": [{"hiddenByUser": true}, {"pixelSize": 100}]
            }],
            "merges": [{"sheetId": 7, "startRowIndex": 0, "endRowIndex": 2,
                        "startColumnIndex": 0, "endColumnIndex": 2}]
        }]
    }"#;

    #[test]
    fn test_deserialize_response() {
        let sheet: Spreadsheet = serde_json::from_str(RESPONSE).unwrap();
        let window = sheet.first_window();

        assert_eq!(window.grid.row_data.len(), 2);
        assert_eq!(window.grid.hidden_rows(), vec![1]);
        assert_eq!(window.grid.hidden_columns(), vec![0]);
        assert_eq!(window.merges, vec![GridRange { sheet_id: Some(7), ..GridRange::new(0, 2, 0, 2) }]);

        let cell = &window.grid.row_data[0].values[0];
        assert_eq!(cell.formatted_value.as_deref(), Some("Item"));
        let fmt = cell.user_entered_format.as_ref().unwrap();
        assert_eq!(fmt.wrap_strategy.as_deref(), Some("WRAP"));
        let bg = fmt.background_color.unwrap();
        assert_eq!(bg.blue, None);
        let top = fmt.borders.as_ref().unwrap().top.as_ref().unwrap();
        assert!(top.color.unwrap().is_empty());
    }

    #[test]
    fn test_empty_response_yields_empty_window() {
        let sheet: Spreadsheet = serde_json::from_str("{}").unwrap();
        let window = sheet.first_window();
        assert!(window.grid.row_data.is_empty());
        assert!(window.merges.is_empty());
    }
}
