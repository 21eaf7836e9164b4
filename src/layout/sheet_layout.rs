//! Pre-computed layout data for a snapshot.
//!
//! Widths are in abstract units (one unit renders as one inch); every row is
//! one unit tall in grid space. Merges arrive in sheet coordinates and are
//! translated into visible-grid coordinates here, once, so the renderer only
//! ever deals with visible indices.

use std::collections::{HashMap, HashSet};

use super::VisibleIndexMap;
use crate::config::Heuristics;
use crate::types::{Grid, GridRange};

/// End-exclusive extent of a merge, keyed by its anchor in [`MergePlan`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeSpan {
    pub end_row: usize,
    pub end_col: usize,
}

/// Merges translated into visible coordinates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergePlan {
    /// Anchor (top-left) to span.
    pub anchors: HashMap<(usize, usize), MergeSpan>,
    /// Cells inside a merge other than its anchor.
    pub covered: HashSet<(usize, usize)>,
    /// Number of merges that could not be rendered.
    pub dropped: usize,
}

/// Why a merge was left out. Routine, never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MergeDrop {
    AboveWindow,
    BelowWindow,
    NoVisibleRows,
    NoVisibleCols,
    Overlaps,
}

/// Pre-computed layout data for a snapshot
#[derive(Debug, Clone, Default)]
pub struct SheetLayout {
    /// Column widths in units, one per visible column
    pub col_widths: Vec<f64>,
    /// Cumulative column positions (`col_positions[i]` = x of column i's left edge)
    pub col_positions: Vec<f64>,
    /// Number of visible rows
    pub rows: usize,
    pub merges: MergePlan,
}

impl SheetLayout {
    /// Plan the layout of an extracted grid.
    ///
    /// `row_offset` / `col_offset` are the sheet indices of the window's first
    /// row and column; merge bounds are made window-relative with them.
    pub fn new(
        grid: &Grid,
        merges: &[GridRange],
        row_offset: i64,
        col_offset: i64,
        heuristics: &Heuristics,
    ) -> Self {
        let col_widths = column_widths(&grid.values, grid.cols(), heuristics);

        let mut col_positions = Vec::with_capacity(col_widths.len() + 1);
        let mut x = 0.0;
        for w in &col_widths {
            col_positions.push(x);
            x += w;
        }
        col_positions.push(x); // Final edge

        let merges = translate_merges(
            merges,
            &grid.row_map,
            &grid.col_map,
            row_offset,
            col_offset,
        );

        tracing::debug!(
            cols = col_widths.len(),
            rows = grid.rows(),
            total_width = x,
            merges = merges.anchors.len(),
            dropped_merges = merges.dropped,
            "planned layout"
        );

        SheetLayout {
            col_widths,
            col_positions,
            rows: grid.rows(),
            merges,
        }
    }

    pub fn cols(&self) -> usize {
        self.col_widths.len()
    }

    /// Total width of all columns
    pub fn total_width(&self) -> f64 {
        self.col_positions.last().copied().unwrap_or(0.0)
    }

    /// Get column width at index (0 outside the grid)
    pub fn col_width(&self, col: usize) -> f64 {
        self.col_widths.get(col).copied().unwrap_or(0.0)
    }

    /// Summed width of columns `[start, end)`.
    pub fn span_width(&self, start: usize, end: usize) -> f64 {
        let end = end.min(self.cols());
        if start >= end {
            return 0.0;
        }
        let left = self.col_positions.get(start).copied().unwrap_or(0.0);
        let right = self.col_positions.get(end).copied().unwrap_or(left);
        right - left
    }

    pub fn merge_at(&self, row: usize, col: usize) -> Option<MergeSpan> {
        self.merges.anchors.get(&(row, col)).copied()
    }

    pub fn is_covered(&self, row: usize, col: usize) -> bool {
        self.merges.covered.contains(&(row, col))
    }
}

/// Content-driven column widths.
///
/// Width of a column is its longest value in characters times
/// `width_per_char`, floored at `min_col_width`.
pub fn column_widths(values: &[Vec<String>], cols: usize, heuristics: &Heuristics) -> Vec<f64> {
    (0..cols)
        .map(|c| {
            let longest = values
                .iter()
                .filter_map(|row| row.get(c))
                .map(|v| v.chars().count())
                .max()
                .unwrap_or(0);
            (count_as_f64(longest) * heuristics.width_per_char).max(heuristics.min_col_width)
        })
        .collect()
}

/// Translate merges from sheet coordinates to visible-grid coordinates.
///
/// A merge is dropped when it starts above the window, ends below it, or
/// has no visible row or column left. A surviving merge snaps to the
/// contiguous visible range of its rows and columns.
pub fn translate_merges(
    merges: &[GridRange],
    row_map: &VisibleIndexMap,
    col_map: &VisibleIndexMap,
    row_offset: i64,
    col_offset: i64,
) -> MergePlan {
    let mut plan = MergePlan::default();
    let window_rows = i64::try_from(row_map.original_len()).unwrap_or(i64::MAX);

    for merge in merges {
        match translate_one(merge, row_map, col_map, row_offset, col_offset, window_rows, &plan) {
            Ok((anchor, span)) => {
                for r in anchor.0..span.end_row {
                    for c in anchor.1..span.end_col {
                        if (r, c) != anchor {
                            plan.covered.insert((r, c));
                        }
                    }
                }
                plan.anchors.insert(anchor, span);
            }
            Err(reason) => {
                tracing::trace!(?merge, ?reason, "merge dropped");
                plan.dropped += 1;
            }
        }
    }

    plan
}

fn translate_one(
    merge: &GridRange,
    row_map: &VisibleIndexMap,
    col_map: &VisibleIndexMap,
    row_offset: i64,
    col_offset: i64,
    window_rows: i64,
    plan: &MergePlan,
) -> Result<((usize, usize), MergeSpan), MergeDrop> {
    let start_row = merge.start_row_index.saturating_sub(row_offset);
    let end_row = merge.end_row_index.saturating_sub(row_offset);
    let start_col = merge.start_column_index.saturating_sub(col_offset);
    let end_col = merge.end_column_index.saturating_sub(col_offset);

    if start_row < 0 {
        return Err(MergeDrop::AboveWindow);
    }
    if end_row > window_rows {
        return Err(MergeDrop::BelowWindow);
    }

    let rows = row_map.visible_in(start_row, end_row);
    let cols = col_map.visible_in(start_col, end_col);
    // visible_in yields ascending indices, so first/last are min/max
    let (Some(&top), Some(&bottom)) = (rows.first(), rows.last()) else {
        return Err(MergeDrop::NoVisibleRows);
    };
    let (Some(&left), Some(&right)) = (cols.first(), cols.last()) else {
        return Err(MergeDrop::NoVisibleCols);
    };

    let span = MergeSpan {
        end_row: bottom + 1,
        end_col: right + 1,
    };
    let clashes = (top..span.end_row).any(|r| {
        (left..span.end_col)
            .any(|c| plan.covered.contains(&(r, c)) || plan.anchors.contains_key(&(r, c)))
    });
    if clashes {
        return Err(MergeDrop::Overlaps);
    }

    Ok(((top, left), span))
}

/// Character counts stay far below 2^52, so the conversion is exact.
#[allow(clippy::cast_precision_loss)]
fn count_as_f64(n: usize) -> f64 {
    n as f64
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::parser::extract;
    use crate::types::{CellData, DimensionProperties, GridData, RowData};

    fn grid_of(rows: usize, cols: usize, hidden_rows: &[usize], hidden_cols: &[usize]) -> Grid {
        let flags = |n: usize, hidden: &[usize]| -> Vec<DimensionProperties> {
            (0..n)
                .map(|i| DimensionProperties {
                    hidden_by_user: hidden.contains(&i),
                    ..DimensionProperties::default()
                })
                .collect()
        };
        let data = GridData {
            row_data: (0..rows)
                .map(|r| RowData {
                    values: (0..cols)
                        .map(|c| CellData {
                            formatted_value: Some(format!("r{r}c{c}")),
                            user_entered_format: None,
                        })
                        .collect(),
                })
                .collect(),
            row_metadata: flags(rows, hidden_rows),
            column_metadata: flags(cols, hidden_cols),
            ..GridData::default()
        };
        extract(&data)
    }

    fn layout(grid: &Grid, merges: &[GridRange], row_offset: i64, col_offset: i64) -> SheetLayout {
        SheetLayout::new(grid, merges, row_offset, col_offset, &Heuristics::default())
    }

    #[test]
    fn test_column_width_floor_and_growth() {
        let h = Heuristics::default();
        let values = vec![
            vec!["".to_string(), "x".repeat(20)],
            vec!["abc".to_string(), "y".to_string()],
        ];
        let widths = column_widths(&values, 2, &h);
        assert_eq!(widths[0], 1.6);
        assert!((widths[1] - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_column_width_counts_characters_not_bytes() {
        let h = Heuristics::default();
        let values = vec![vec!["é".repeat(12)]];
        let widths = column_widths(&values, 1, &h);
        assert!((widths[0] - 1.8).abs() < 1e-9);
    }

    #[test]
    fn test_basic_layout() {
        let grid = grid_of(3, 4, &[], &[]);
        let layout = layout(&grid, &[], 0, 0);
        assert_eq!(layout.rows, 3);
        assert_eq!(layout.cols(), 4);
        assert!((layout.total_width() - 6.4).abs() < 1e-9);
        assert!((layout.span_width(1, 3) - 3.2).abs() < 1e-9);
        assert_eq!(layout.span_width(3, 3), 0.0);
        assert_eq!(layout.span_width(2, 99), layout.span_width(2, 4));
    }

    #[test]
    fn test_simple_merge() {
        let grid = grid_of(4, 4, &[], &[]);
        let layout = layout(&grid, &[GridRange::new(0, 2, 0, 2)], 0, 0);

        assert_eq!(
            layout.merge_at(0, 0),
            Some(MergeSpan {
                end_row: 2,
                end_col: 2
            })
        );
        assert!(!layout.is_covered(0, 0));
        assert!(layout.is_covered(0, 1));
        assert!(layout.is_covered(1, 0));
        assert!(layout.is_covered(1, 1));
        assert!(!layout.is_covered(2, 2));
        assert_eq!(layout.merges.covered.len(), 3);
    }

    #[test]
    fn test_hidden_row_and_column_shrink_merge() {
        // 3x3 window, column B and the third row hidden, merge over everything
        let grid = grid_of(3, 3, &[2], &[1]);
        let layout = layout(&grid, &[GridRange::new(0, 3, 0, 3)], 0, 0);

        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.cols(), 2);
        assert_eq!(
            layout.merge_at(0, 0),
            Some(MergeSpan {
                end_row: 2,
                end_col: 2
            })
        );
        assert_eq!(layout.merges.covered.len(), 3);
        assert_eq!(layout.merges.dropped, 0);
    }

    #[test]
    fn test_merge_snaps_across_hidden_interior_column() {
        let grid = grid_of(2, 5, &[], &[2]);
        let layout = layout(&grid, &[GridRange::new(0, 1, 1, 4)], 0, 0);
        // original cols 1,3 -> visible 1,2
        assert_eq!(
            layout.merge_at(0, 1),
            Some(MergeSpan {
                end_row: 1,
                end_col: 3
            })
        );
    }

    #[test]
    fn test_offsets_applied() {
        // window starts at sheet row 10 (0-based 9), column C
        let grid = grid_of(3, 3, &[], &[]);
        let layout = layout(&grid, &[GridRange::new(10, 12, 3, 5)], 9, 2);
        assert_eq!(
            layout.merge_at(1, 1),
            Some(MergeSpan {
                end_row: 3,
                end_col: 3
            })
        );
    }

    #[test]
    fn test_out_of_window_merges_dropped() {
        let grid = grid_of(3, 3, &[], &[1]);
        let merges = [
            GridRange::new(0, 2, 1, 2),   // only hidden column
            GridRange::new(4, 6, 0, 2),   // starts above after offset
            GridRange::new(5, 9, 0, 2),   // ends below window
            GridRange::new(5, 6, 10, 12), // columns outside window
        ];
        let layout = layout(&grid, &merges[..1], 0, 0);
        assert!(layout.merges.anchors.is_empty());
        assert_eq!(layout.merges.dropped, 1);

        let layout = SheetLayout::new(&grid, &merges[1..], 5, 0, &Heuristics::default());
        assert!(layout.merges.anchors.is_empty());
        assert!(layout.merges.covered.is_empty());
        assert_eq!(layout.merges.dropped, 3);
    }

    #[test]
    fn test_merge_of_only_hidden_rows_dropped() {
        let grid = grid_of(3, 2, &[1], &[]);
        let layout = layout(&grid, &[GridRange::new(1, 2, 0, 2)], 0, 0);
        assert!(layout.merges.anchors.is_empty());
        assert_eq!(layout.merges.dropped, 1);
    }

    #[test]
    fn test_overlapping_merge_dropped() {
        let grid = grid_of(4, 4, &[], &[]);
        let layout = layout(
            &grid,
            &[GridRange::new(0, 2, 0, 2), GridRange::new(1, 3, 1, 3)],
            0,
            0,
        );
        assert_eq!(layout.merges.anchors.len(), 1);
        assert_eq!(layout.merges.dropped, 1);
        assert_eq!(layout.merges.covered.len(), 3);
    }

    #[test]
    fn test_single_cell_merge_covers_nothing() {
        let grid = grid_of(2, 2, &[], &[]);
        let layout = layout(&grid, &[GridRange::new(1, 2, 1, 2)], 0, 0);
        assert!(layout.merge_at(1, 1).is_some());
        assert!(layout.merges.covered.is_empty());
    }

    #[test]
    fn test_empty_grid_layout() {
        let grid = grid_of(0, 0, &[], &[]);
        let layout = layout(&grid, &[GridRange::new(0, 1, 0, 1)], 0, 0);
        assert_eq!(layout.total_width(), 0.0);
        assert_eq!(layout.rows, 0);
        assert_eq!(layout.merges.dropped, 1);
    }
}
