//! Tests for merged cells across hidden rows and columns.
//!
//! Merge ranges arrive in sheet coordinates, end-exclusive:
//! ```json
//! {"startRowIndex": 0, "endRowIndex": 3, "startColumnIndex": 0, "endColumnIndex": 3}
//! ```
//! and are translated to the visible grid before drawing.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;
mod fixtures;

use common::{assert_values, plan_payload, record, test_config, window};
use fixtures::PayloadBuilder;
use proptest::prelude::*;
use sheetshot::render::UnitRect;
use sheetshot::snapshot::plan;
use sheetshot::SnapshotRequest;

fn three_by_three() -> PayloadBuilder {
    PayloadBuilder::new().rows(&[
        &["a1", "b1", "c1"],
        &["a2", "b2", "c2"],
        &["a3", "b3", "c3"],
    ])
}

// ============================================================================
// HIDDEN ROWS AND COLUMNS
// ============================================================================

#[test]
fn test_merge_over_hidden_row_and_column_snaps() {
    let payload = three_by_three().hide_col(1).hide_row(2).merge("A1:C3");
    let (grid, layout) = plan_payload(&payload);

    assert_values(&grid, &[&["a1", "c1"], &["a2", "c2"]]);
    let span = layout.merge_at(0, 0).expect("merge survives");
    assert_eq!((span.end_row, span.end_col), (2, 2));
    assert_eq!(layout.merges.covered.len(), 3);
    assert!(layout.is_covered(0, 1));
    assert!(layout.is_covered(1, 0));
    assert!(layout.is_covered(1, 1));
    assert!(!layout.is_covered(0, 0));
}

#[test]
fn test_merge_over_hidden_middle_row() {
    let payload = three_by_three().hide_row(1).merge("A1:A3");
    let (grid, layout) = plan_payload(&payload);

    assert_eq!(grid.rows(), 2);
    let span = layout.merge_at(0, 0).unwrap();
    assert_eq!((span.end_row, span.end_col), (2, 1));
}

#[test]
fn test_merge_entirely_in_hidden_column_dropped() {
    let payload = three_by_three().hide_col(1).merge("B1:B2");
    let (_, layout) = plan_payload(&payload);
    assert!(layout.merges.anchors.is_empty());
    assert!(layout.merges.covered.is_empty());
    assert_eq!(layout.merges.dropped, 1);
}

#[test]
fn test_merge_anchored_on_hidden_row_keeps_visible_part() {
    let payload = three_by_three().hide_row(0).merge("A1:B2");
    let (_, layout) = plan_payload(&payload);
    let span = layout.merge_at(0, 0).unwrap();
    assert_eq!((span.end_row, span.end_col), (1, 2));
}

// ============================================================================
// WINDOW OFFSETS
// ============================================================================

#[test]
fn test_merge_above_window_dropped() {
    // window starts at sheet row 3 (B3); merge starts on sheet row 1
    let payload = three_by_three().merge_indices(0, 3, 1, 2);
    let request = SnapshotRequest::starting_at("B3").unwrap();
    let (_, layout) = plan(&window(&payload), &request, &test_config());
    assert!(layout.merges.anchors.is_empty());
}

#[test]
fn test_merge_below_window_dropped() {
    let payload = three_by_three().merge("A2:A5");
    let (_, layout) = plan_payload(&payload);
    assert!(layout.merges.anchors.is_empty());
    assert_eq!(layout.merges.dropped, 1);
}

#[test]
fn test_merge_translated_by_payload_start() {
    // window covers sheet rows 10.., columns D..
    let payload = three_by_three().start(10, 3).merge("E11:F12");
    let (_, layout) = plan_payload(&payload);
    let span = layout.merge_at(0, 1).unwrap();
    assert_eq!((span.end_row, span.end_col), (2, 3));
}

// ============================================================================
// DRAWING
// ============================================================================

#[test]
fn test_recorded_merge_box() {
    let payload = three_by_three().merge("A1:B2");
    let (surface, stats) = record(&payload);

    assert_eq!(stats.merges_drawn, 1);
    assert_eq!(stats.cells_covered, 3);
    assert_eq!(stats.cells_drawn, 6);
    // anchor box: two columns wide, two rows tall, bottom edge at y = 3 - 2
    assert_eq!(surface.fills()[0], UnitRect::new(0.0, 1.0, 3.2, 2.0));
    let texts: Vec<&str> = surface.texts().into_iter().map(|(t, _)| t).collect();
    assert_eq!(texts, vec!["a1", "c1", "c2", "a3", "b3", "c3"]);
}

#[test]
fn test_overlapping_merge_dropped() {
    let payload = three_by_three().merge("A1:B2").merge("B2:C3");
    let (_, layout) = plan_payload(&payload);
    assert_eq!(layout.merges.anchors.len(), 1);
    assert_eq!(layout.merges.dropped, 1);
}

// ============================================================================
// PROPERTIES
// ============================================================================

proptest! {
    #[test]
    fn prop_merge_containment(
        rows in 1usize..6,
        cols in 1usize..6,
        hidden_rows in proptest::collection::vec(0usize..6, 0..3),
        hidden_cols in proptest::collection::vec(0usize..6, 0..3),
        merges in proptest::collection::vec((0i64..7, 1i64..4, 0i64..7, 1i64..4), 0..4),
    ) {
        let values: Vec<Vec<String>> = (0..rows)
            .map(|r| (0..cols).map(|c| format!("r{r}c{c}")).collect())
            .collect();
        let refs: Vec<Vec<&str>> = values.iter().map(|r| r.iter().map(String::as_str).collect()).collect();
        let slices: Vec<&[&str]> = refs.iter().map(Vec::as_slice).collect();

        let mut payload = PayloadBuilder::new().rows(&slices);
        for r in hidden_rows.into_iter().filter(|r| *r < rows) {
            payload = payload.hide_row(r);
        }
        for c in hidden_cols.into_iter().filter(|c| *c < cols) {
            payload = payload.hide_col(c);
        }
        for (sr, h, sc, w) in merges {
            payload = payload.merge_indices(sr, sr + h, sc, sc + w);
        }

        let (grid, layout) = plan_payload(&payload);
        let mut seen = std::collections::HashSet::new();
        for (&(ar, ac), span) in &layout.merges.anchors {
            prop_assert!(!layout.is_covered(ar, ac));
            prop_assert!(span.end_row <= grid.rows());
            prop_assert!(span.end_col <= grid.cols());
            for r in ar..span.end_row {
                for c in ac..span.end_col {
                    if (r, c) != (ar, ac) {
                        prop_assert!(layout.is_covered(r, c));
                        // no cell is covered by two merges
                        prop_assert!(seen.insert((r, c)));
                    }
                }
            }
        }
        prop_assert_eq!(seen.len(), layout.merges.covered.len());
    }
}
