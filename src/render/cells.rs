//! Cell renderer: walks the visible grid and paints every cell.
//!
//! Rows are visited top to bottom and columns left to right. Row 0 is the
//! topmost row, which in the surface's bottom-left coordinate system sits at
//! `y = rows - 1`.

use crate::config::Heuristics;
use crate::layout::SheetLayout;
use crate::render::backend::{Surface, TextStyle, UnitRect};
use crate::render::text::{resolve_font_size, wrap_to_width};
use crate::types::{Cell, Grid, Style};

/// Counters describing what a render pass drew.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub cells_drawn: usize,
    pub cells_covered: usize,
    pub merges_drawn: usize,
    pub borders_drawn: usize,
    pub text_runs: usize,
}

/// Paint every visible cell of `grid` onto `surface`.
pub fn render_cells<S: Surface + ?Sized>(
    surface: &mut S,
    grid: &Grid,
    layout: &SheetLayout,
    heuristics: &Heuristics,
) -> RenderStats {
    let mut stats = RenderStats::default();
    let rows = layout.rows;
    let cols = layout.cols();

    for row in 0..rows {
        let mut x = 0.0;
        let mut col = 0;

        while col < cols {
            if layout.is_covered(row, col) {
                x += layout.col_width(col);
                col += 1;
                stats.cells_covered += 1;
                continue;
            }

            let merge = layout.merge_at(row, col);
            let (width, height, next_col) = match merge {
                Some(span) => (
                    layout.span_width(col, span.end_col),
                    span.end_row.saturating_sub(row),
                    span.end_col.max(col + 1),
                ),
                None => (layout.col_width(col), 1, col + 1),
            };
            let y = units(rows) - units(row) - units(height);
            let rect = UnitRect::new(x, y, width, units(height));

            if let Some(cell) = grid.cell(row, col) {
                draw_cell(surface, cell, rect, height > 1, heuristics, &mut stats);
                if merge.is_some() {
                    stats.merges_drawn += 1;
                }
            }

            x += width;
            col = next_col;
        }
    }

    tracing::debug!(?stats, "rendered cells");
    stats
}

/// Draw one cell's fill, borders and text.
fn draw_cell<S: Surface + ?Sized>(
    surface: &mut S,
    cell: Cell<'_>,
    rect: UnitRect,
    tall_merge: bool,
    heuristics: &Heuristics,
    stats: &mut RenderStats,
) {
    let style = cell.style;
    surface.fill_rect(rect, style.background);
    stats.borders_drawn += draw_borders(surface, rect, style);
    stats.cells_drawn += 1;

    let text = if style.wrap {
        wrap_to_width(cell.value, rect.width, heuristics.wrap_chars_per_unit)
    } else {
        cell.value.to_string()
    };
    if !text.is_empty() {
        let text_style = TextStyle {
            size: resolve_font_size(style.font_size, &text, rect.width, tall_merge, heuristics),
            color: style.font_color.darken(heuristics.text_darken),
            bold: style.bold,
            opacity: 1.0,
        };
        surface.draw_text(&text, rect.center(), &text_style);
        stats.text_runs += 1;
    }
}

fn draw_borders<S: Surface + ?Sized>(surface: &mut S, rect: UnitRect, style: &Style) -> usize {
    let (x1, y1, x2, y2) = (rect.x, rect.y, rect.right(), rect.top());
    let edges = [
        (style.border_top, (x1, y2), (x2, y2)),
        (style.border_bottom, (x1, y1), (x2, y1)),
        (style.border_left, (x1, y1), (x1, y2)),
        (style.border_right, (x2, y1), (x2, y2)),
    ];

    let mut drawn = 0;
    for (border, from, to) in edges {
        if let Some(border) = border {
            surface.stroke_line(from, to, border.width, border.color);
            drawn += 1;
        }
    }
    drawn
}

/// Grid indices stay far below 2^52, so the conversion is exact.
#[allow(clippy::cast_precision_loss)]
fn units(n: usize) -> f64 {
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
    use crate::render::colors::Rgb;
    use crate::render::RecordingSurface;
    use crate::render::recording::DrawOp;
    use crate::types::{Border, GridRange};
    use crate::layout::VisibleIndexMap;

    fn grid(values: &[&[&str]]) -> Grid {
        let cols = values.iter().map(|r| r.len()).max().unwrap_or(0);
        Grid {
            values: values
                .iter()
                .map(|r| r.iter().map(|v| v.to_string()).collect())
                .collect(),
            styles: values.iter().map(|r| vec![Style::default(); r.len()]).collect(),
            row_map: VisibleIndexMap::identity(values.len()),
            col_map: VisibleIndexMap::identity(cols),
        }
    }

    fn plan(grid: &Grid, merges: &[GridRange]) -> SheetLayout {
        SheetLayout::new(grid, merges, 0, 0, &Heuristics::default())
    }

    #[test]
    fn test_fills_in_row_major_order_with_flipped_y() {
        let grid = grid(&[&["a", "b"], &["c", "d"]]);
        let layout = plan(&grid, &[]);
        let mut surface = RecordingSurface::default();
        let stats = render_cells(&mut surface, &grid, &layout, &Heuristics::default());

        assert_eq!(stats.cells_drawn, 4);
        let fills = surface.fills();
        assert_eq!(
            fills,
            vec![
                UnitRect::new(0.0, 1.0, 1.6, 1.0),
                UnitRect::new(1.6, 1.0, 1.6, 1.0),
                UnitRect::new(0.0, 0.0, 1.6, 1.0),
                UnitRect::new(1.6, 0.0, 1.6, 1.0),
            ]
        );
        let texts: Vec<&str> = surface.texts().into_iter().map(|(t, _)| t).collect();
        assert_eq!(texts, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_merge_anchor_drawn_once_and_covered_skipped() {
        let grid = grid(&[&["Title", "", ""], &["", "", "x"], &["p", "q", "r"]]);
        let layout = plan(&grid, &[GridRange::new(0, 2, 0, 2)]);
        let mut surface = RecordingSurface::default();
        let stats = render_cells(&mut surface, &grid, &layout, &Heuristics::default());

        assert_eq!(stats.cells_covered, 3);
        assert_eq!(stats.merges_drawn, 1);
        assert_eq!(stats.cells_drawn, 6);

        let fills = surface.fills();
        // anchor spans two columns and two rows, bottom edge at y = 3 - 0 - 2
        assert_eq!(fills[0], UnitRect::new(0.0, 1.0, 3.2, 2.0));
        // next drawn cell in row 0 starts after the merge
        assert_eq!(fills[1], UnitRect::new(3.2, 2.0, 1.6, 1.0));
        // row 1: only column 2 is drawn, at the cursor advanced past covered cells
        assert_eq!(fills[2], UnitRect::new(3.2, 1.0, 1.6, 1.0));
        assert_eq!(fills.len(), 6);
    }

    #[test]
    fn test_tall_merge_uses_larger_font_base() {
        let grid = grid(&[&["ab", ""], &["", ""]]);
        let layout = plan(&grid, &[GridRange::new(0, 2, 0, 1)]);
        let mut surface = RecordingSurface::default();
        render_cells(&mut surface, &grid, &layout, &Heuristics::default());
        let (_, style) = surface.texts()[0];
        // 1.6 * 16 / 2
        assert!((style.size - 12.8).abs() < 1e-9);
    }

    #[test]
    fn test_wide_single_row_merge_uses_plain_base() {
        let grid = grid(&[&["abcdefgh", "", ""]]);
        let layout = plan(&grid, &[GridRange::new(0, 1, 0, 2)]);
        let mut surface = RecordingSurface::default();
        render_cells(&mut surface, &grid, &layout, &Heuristics::default());
        let (_, style) = surface.texts()[0];
        // width 1.6 + 1.6, 8 chars: 3.2 * 14 / 8 = 5.6 -> clamped to 10
        assert_eq!(style.size, 10.0);
    }

    #[test]
    fn test_borders_drawn_independently() {
        let mut grid = grid(&[&["x"]]);
        grid.styles[0][0].border_top = Some(Border::new(Rgb::new(255, 0, 0), 2.0));
        grid.styles[0][0].border_left = Some(Border::new(Rgb::new(0, 0, 255), 0.1));
        let layout = plan(&grid, &[]);
        let mut surface = RecordingSurface::default();
        let stats = render_cells(&mut surface, &grid, &layout, &Heuristics::default());

        assert_eq!(stats.borders_drawn, 2);
        let lines: Vec<_> = surface
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Line { from, to, width, color } => Some((*from, *to, *width, *color)),
                _ => None,
            })
            .collect();
        assert_eq!(
            lines,
            vec![
                ((0.0, 1.0), (1.6, 1.0), 2.0, Rgb::new(255, 0, 0)),
                ((0.0, 0.0), (0.0, 1.0), 0.6, Rgb::new(0, 0, 255)),
            ]
        );
    }

    #[test]
    fn test_fill_precedes_borders_and_text() {
        let mut grid = grid(&[&["x"]]);
        grid.styles[0][0].border_bottom = Some(Border::new(Rgb::new(0, 0, 0), 1.0));
        let layout = plan(&grid, &[]);
        let mut surface = RecordingSurface::default();
        render_cells(&mut surface, &grid, &layout, &Heuristics::default());
        assert!(matches!(surface.ops[0], DrawOp::Fill { .. }));
        assert!(matches!(surface.ops[1], DrawOp::Line { .. }));
        assert!(matches!(surface.ops[2], DrawOp::Text { .. }));
    }

    #[test]
    fn test_text_color_darkened_and_weight() {
        let mut grid = grid(&[&["x", "y"]]);
        grid.styles[0][0].font_color = Rgb::new(255, 255, 255);
        grid.styles[0][0].bold = true;
        let layout = plan(&grid, &[]);
        let mut surface = RecordingSurface::default();
        render_cells(&mut surface, &grid, &layout, &Heuristics::default());
        let texts = surface.texts();
        assert_eq!(texts[0].1.color.to_hex(), "#E2E2E2");
        assert!(texts[0].1.bold);
        assert_eq!(texts[1].1.color.to_hex(), "#000000");
        assert!(!texts[1].1.bold);
    }

    #[test]
    fn test_wrapped_text_and_explicit_size() {
        let mut grid = grid(&[&["one two three four five six"]]);
        grid.styles[0][0].wrap = true;
        grid.styles[0][0].font_size = Some(20.0);
        let layout = plan(&grid, &[]);
        let mut surface = RecordingSurface::default();
        render_cells(&mut surface, &grid, &layout, &Heuristics::default());
        let (text, style) = surface.texts()[0];
        // width = 27 chars * 0.15 = 4.05 units -> 24 chars per line
        assert_eq!(text, "one two three four five\nsix");
        assert!((style.size - 18.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_grid_draws_nothing() {
        let grid = grid(&[]);
        let layout = plan(&grid, &[]);
        let mut surface = RecordingSurface::default();
        let stats = render_cells(&mut surface, &grid, &layout, &Heuristics::default());
        assert_eq!(stats, RenderStats::default());
        assert!(surface.ops.is_empty());
    }
}
