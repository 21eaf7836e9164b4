//! Grid extraction
//!
//! Decodes the data-source payload and flattens its per-row cell lists into a
//! dense value matrix and a parallel style matrix, dropping hidden rows and
//! columns on the way.

pub(crate) mod styles;

use crate::error::Result;
use crate::layout::VisibleIndexMap;
use crate::types::{GridData, Grid, SheetWindow, Spreadsheet, Style};

use styles::resolve_style;

/// Decode a spreadsheet response from JSON bytes.
///
/// # Errors
/// Returns an error if the bytes are not valid JSON of the expected shape.
pub fn parse(data: &[u8]) -> Result<Spreadsheet> {
    Ok(serde_json::from_slice(data)?)
}

/// Decode a response and pick its first grid window.
///
/// # Errors
/// Returns an error if the bytes are not valid JSON of the expected shape.
pub fn parse_window(data: &[u8]) -> Result<SheetWindow> {
    Ok(parse(data)?.first_window())
}

/// Flatten a grid window into dense, hidden-filtered matrices.
///
/// Hidden rows are omitted entirely; hidden columns are removed from every
/// row and the remaining columns are re-indexed contiguously in original
/// order. Short rows are padded with empty, default-styled cells so both
/// matrices are rectangular.
pub fn extract(data: &GridData) -> Grid {
    let widest_row = data
        .row_data
        .iter()
        .map(|r| r.values.len())
        .max()
        .unwrap_or(0);
    let col_count = widest_row.max(data.column_metadata.len());

    let row_map = VisibleIndexMap::new(data.row_data.len(), &data.hidden_rows());
    let col_map = VisibleIndexMap::new(col_count, &data.hidden_columns());

    let mut values = Vec::with_capacity(row_map.visible_len());
    let mut styles = Vec::with_capacity(row_map.visible_len());

    for row in row_map
        .visible_originals()
        .filter_map(|r| data.row_data.get(r))
    {
        let mut row_values = Vec::with_capacity(col_map.visible_len());
        let mut row_styles = Vec::with_capacity(col_map.visible_len());

        for c in col_map.visible_originals() {
            match row.values.get(c) {
                Some(cell) => {
                    row_values.push(cell.formatted_value.clone().unwrap_or_default());
                    row_styles.push(resolve_style(cell.user_entered_format.as_ref()));
                }
                None => {
                    row_values.push(String::new());
                    row_styles.push(Style::default());
                }
            }
        }

        values.push(row_values);
        styles.push(row_styles);
    }

    tracing::debug!(
        rows = values.len(),
        cols = col_map.visible_len(),
        hidden_rows = row_map.original_len() - row_map.visible_len(),
        hidden_cols = col_map.original_len() - col_map.visible_len(),
        "extracted grid"
    );

    Grid {
        values,
        styles,
        row_map,
        col_map,
    }
}
