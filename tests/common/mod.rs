//! Common test utilities and assertion helpers.
//!
//! This module provides helper functions for driving the snapshot pipeline
//! from fixture payloads and inspecting what it drew.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_lossless
)]

use image::RgbaImage;
use sheetshot::layout::SheetLayout;
use sheetshot::render::{RecordingSurface, RenderStats};
use sheetshot::snapshot::{dry_run, plan, render_with_fonts};
use sheetshot::{parser, Grid, RenderConfig, SheetWindow, SnapshotRequest};

// Re-export fixtures for convenience
pub use super::fixtures::*;

// ============================================================================
// Pipeline Helpers
// ============================================================================

/// Decode a fixture payload into its grid window.
#[must_use]
pub fn window(payload: &PayloadBuilder) -> SheetWindow {
    parser::parse_window(&payload.build()).expect("fixture payload should decode")
}

/// Config with 72 dpi so one point is one pixel; footer disabled.
#[must_use]
pub fn test_config() -> RenderConfig {
    let mut config = RenderConfig {
        dpi: 72.0,
        ..RenderConfig::default()
    };
    config.attribution.enabled = false;
    config
}

/// Extract and plan a payload with the window starting at A1.
#[must_use]
pub fn plan_payload(payload: &PayloadBuilder) -> (Grid, SheetLayout) {
    plan(&window(payload), &SnapshotRequest::default(), &test_config())
}

/// Run the pipeline against a recording surface.
#[must_use]
pub fn record(payload: &PayloadBuilder) -> (RecordingSurface, RenderStats) {
    dry_run(&window(payload), &SnapshotRequest::default(), &test_config())
}

/// Render to pixels without fonts, decoding the PNG again.
#[must_use]
pub fn render_pixels(payload: &PayloadBuilder, config: &RenderConfig) -> RgbaImage {
    let rendered = render_with_fonts(&window(payload), &SnapshotRequest::default(), config, None)
        .expect("render should succeed");
    rendered.decode().expect("png should decode").to_rgba8()
}

/// Pixel at the centre of visible cell `(row, col)`.
#[must_use]
pub fn cell_center_px(layout: &SheetLayout, config: &RenderConfig, row: usize, col: usize) -> (u32, u32) {
    let x = (layout.col_positions[col] + layout.col_width(col) / 2.0) * config.dpi;
    let grid_units = config
        .min_height
        .max(layout.rows as f64 * config.row_height);
    let px_per_row = (grid_units * config.dpi).ceil() / layout.rows.max(1) as f64;
    let y = (row as f64 + 0.5) * px_per_row;
    (x as u32, y as u32)
}

// ============================================================================
// Assertions
// ============================================================================

/// Assert that a pixel has the given `#RRGGBB` color and is opaque.
pub fn assert_pixel(image: &RgbaImage, (x, y): (u32, u32), hex: &str) {
    let expected = sheetshot::Rgb::from_hex(hex).expect("valid hex");
    let actual = image.get_pixel(x, y).0;
    assert_eq!(
        actual,
        [expected.r, expected.g, expected.b, 255],
        "pixel ({x}, {y}) expected {hex}"
    );
}

/// Assert the grid's value matrix.
pub fn assert_values(grid: &Grid, expected: &[&[&str]]) {
    let expected: Vec<Vec<String>> = expected
        .iter()
        .map(|r| r.iter().map(|v| (*v).to_string()).collect())
        .collect();
    pretty_assertions::assert_eq!(grid.values, expected);
}
