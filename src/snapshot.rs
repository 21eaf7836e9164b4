//! Snapshot pipeline: extract, plan, draw, encode.
//!
//! Each call is self-contained; nothing is shared between renders, so
//! independent snapshots may run on separate threads.

use crate::config::RenderConfig;
use crate::error::Result;
use crate::layout::SheetLayout;
use crate::parser;
use crate::render::{render_cells, FontBook, RasterCanvas, RecordingSurface, RenderStats, RenderedImage};
use crate::types::{Grid, SheetWindow, SnapshotRequest};

/// Render a grid window to PNG, loading fonts from `config.fonts`.
///
/// # Errors
/// Fails on an invalid config, an unreadable configured font, an oversized
/// canvas, or a PNG encoding failure.
pub fn render_snapshot(
    window: &SheetWindow,
    request: &SnapshotRequest,
    config: &RenderConfig,
) -> Result<RenderedImage> {
    config.validate()?;
    let fonts = FontBook::load(&config.fonts)?;
    render_with_fonts(window, request, config, fonts)
}

/// Decode a data-source payload and render its first window.
///
/// # Errors
/// Fails if the payload is not valid JSON, or for any reason
/// [`render_snapshot`] fails.
pub fn render_payload(
    payload: &[u8],
    request: &SnapshotRequest,
    config: &RenderConfig,
) -> Result<RenderedImage> {
    let window = parser::parse_window(payload)?;
    render_snapshot(&window, request, config)
}

/// Render with an explicit font book; `None` draws no text.
///
/// # Errors
/// Fails on an oversized canvas or a PNG encoding failure.
pub fn render_with_fonts(
    window: &SheetWindow,
    request: &SnapshotRequest,
    config: &RenderConfig,
    fonts: Option<FontBook>,
) -> Result<RenderedImage> {
    let (grid, layout) = plan(window, request, config);

    let mut canvas = RasterCanvas::new(&layout, config, fonts)?;
    let stats = render_cells(&mut canvas, &grid, &layout, &config.heuristics);
    canvas.draw_attribution(&config.attribution);

    tracing::debug!(
        range = %request.a1_range(),
        cells = stats.cells_drawn,
        merges = stats.merges_drawn,
        "rendered snapshot"
    );
    canvas.finish()
}

/// Run the pipeline against a [`RecordingSurface`] instead of pixels.
pub fn dry_run(
    window: &SheetWindow,
    request: &SnapshotRequest,
    config: &RenderConfig,
) -> (RecordingSurface, RenderStats) {
    let (grid, layout) = plan(window, request, config);
    let mut surface = RecordingSurface::default();
    let stats = render_cells(&mut surface, &grid, &layout, &config.heuristics);
    (surface, stats)
}

/// Extract the visible grid and plan its layout.
pub fn plan(
    window: &SheetWindow,
    request: &SnapshotRequest,
    config: &RenderConfig,
) -> (Grid, SheetLayout) {
    let grid = parser::extract(&window.grid);
    let (row_offset, col_offset) = offsets(window, request);
    let layout = SheetLayout::new(
        &grid,
        &window.merges,
        row_offset,
        col_offset,
        &config.heuristics,
    );
    (grid, layout)
}

/// Sheet indices of the window's first row and column.
///
/// The request wins; otherwise the payload's own start indices are used.
fn offsets(window: &SheetWindow, request: &SnapshotRequest) -> (i64, i64) {
    let row = match request.row_start {
        Some(_) => request.row_offset(),
        None => i64::from(window.grid.start_row.unwrap_or(0)),
    };
    let col = match request.column_start {
        Some(_) => request.col_offset(),
        None => i64::from(window.grid.start_column.unwrap_or(0)),
    };
    (row, col)
}
