//! Raster canvas: a [`Surface`] backed by an RGBA pixel buffer.
//!
//! Grid units map to pixels as follows: one width unit is `dpi` pixels, one
//! row is `grid_height / rows` pixels, and the vertical axis is flipped so
//! that unit `y = 0` is the bottom of the grid area. An attribution footer
//! sits below the grid.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use ab_glyph::{point, Font, FontVec, PxScale, ScaleFont};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;

use crate::config::{Attribution, RenderConfig};
use crate::error::{Result, SheetshotError};
use crate::layout::SheetLayout;
use crate::render::backend::{Surface, TextStyle, UnitRect};
use crate::render::colors::{palette, Rgb};
use crate::render::fonts::FontBook;

/// Largest width or height the canvas will allocate, in pixels.
///
/// PNG viewers and encoders commonly stop below 2^16 per side.
pub const MAX_DIMENSION: u32 = 65_535;

/// Line pitch as a multiple of the font size.
const LINE_SPACING: f32 = 1.2;

/// Glyph coverage below this is not painted.
const MIN_COVERAGE: f32 = 0.01;

/// An encoded snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedImage {
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl RenderedImage {
    /// Decode the PNG back into pixels.
    ///
    /// # Errors
    /// Returns an error if the PNG data is corrupt.
    pub fn decode(&self) -> Result<DynamicImage> {
        Ok(image::load_from_memory_with_format(
            &self.png,
            ImageFormat::Png,
        )?)
    }

    /// Write the PNG to a file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be written.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        fs::write(path, &self.png)?;
        Ok(())
    }
}

/// Pixel canvas for one snapshot.
pub struct RasterCanvas {
    image: RgbaImage,
    fonts: Option<FontBook>,
    px_per_unit: f64,
    px_per_row: f64,
    px_per_point: f64,
    grid_height: u32,
    footer_height: u32,
    text_skipped: usize,
}

impl std::fmt::Debug for RasterCanvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterCanvas")
            .field("width", &self.image.width())
            .field("height", &self.image.height())
            .field("grid_height", &self.grid_height)
            .field("fonts", &self.fonts)
            .finish_non_exhaustive()
    }
}

impl RasterCanvas {
    /// Allocate a white canvas sized for `layout`.
    ///
    /// # Errors
    /// Returns [`SheetshotError::Render`] if the canvas would exceed
    /// [`MAX_DIMENSION`] on either axis.
    pub fn new(layout: &SheetLayout, config: &RenderConfig, fonts: Option<FontBook>) -> Result<Self> {
        let dpi = config.dpi;
        let width = pixel_extent(layout.total_width() * dpi, "width")?;

        let grid_units = config.min_height.max(count_as_f64(layout.rows) * config.row_height);
        let grid_height = pixel_extent(grid_units * dpi, "height")?;

        let footer_height = if config.attribution.enabled {
            pixel_extent(config.attribution.font_size * config.px_per_point() * 2.0, "footer")?
        } else {
            0
        };
        let height = grid_height.saturating_add(footer_height);
        if height > MAX_DIMENSION {
            return Err(SheetshotError::Render(format!(
                "canvas height {height}px exceeds {MAX_DIMENSION}px"
            )));
        }

        let px_per_row = f64::from(grid_height) / count_as_f64(layout.rows.max(1));

        tracing::debug!(width, height, grid_height, footer_height, px_per_row, "allocated canvas");

        Ok(Self {
            image: RgbaImage::from_pixel(width, height, palette::WHITE.to_rgba(1.0)),
            fonts,
            px_per_unit: dpi,
            px_per_row,
            px_per_point: config.px_per_point(),
            grid_height,
            footer_height,
            text_skipped: 0,
        })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Height of the grid area, excluding the footer.
    pub fn grid_height(&self) -> u32 {
        self.grid_height
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Text runs dropped because no font was available.
    pub fn text_skipped(&self) -> usize {
        self.text_skipped
    }

    fn px_x(&self, x: f64) -> f64 {
        x * self.px_per_unit
    }

    fn px_y(&self, y: f64) -> f64 {
        f64::from(self.grid_height) - y * self.px_per_row
    }

    /// Draw the attribution label right-aligned in the footer.
    pub fn draw_attribution(&mut self, attribution: &Attribution) {
        if !attribution.enabled || self.footer_height == 0 {
            return;
        }
        let label = attribution.label();
        let Some(fonts) = self.fonts.as_ref() else {
            self.text_skipped += 1;
            return;
        };

        let px = to_f32(attribution.font_size * self.px_per_point);
        let width = fonts.line_width(&label, px, false);
        let margin = px * 0.5;
        let start_x = to_f32(f64::from(self.image.width())) - margin - width;
        let center_y = to_f32(f64::from(self.grid_height) + f64::from(self.footer_height) / 2.0);
        let (font, _) = fonts.face(false);

        draw_run(
            &mut self.image,
            font,
            &label,
            (start_x, center_y),
            px,
            palette::LABEL_GRAY,
            attribution.opacity,
        );
    }

    /// Encode the canvas as PNG.
    ///
    /// # Errors
    /// Returns an error if encoding fails.
    pub fn finish(self) -> Result<RenderedImage> {
        let (width, height) = self.image.dimensions();
        if self.text_skipped > 0 {
            tracing::warn!(runs = self.text_skipped, "no font available, text was not drawn");
        }
        let mut png = Vec::new();
        DynamicImage::ImageRgba8(self.image).write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
        tracing::debug!(width, height, bytes = png.len(), "encoded png");
        Ok(RenderedImage { png, width, height })
    }
}

impl Surface for RasterCanvas {
    fn fill_rect(&mut self, rect: UnitRect, color: Rgb) {
        let left = round_px(self.px_x(rect.x));
        let right = round_px(self.px_x(rect.right()));
        let top = round_px(self.px_y(rect.top()));
        let bottom = round_px(self.px_y(rect.y));
        fill_px(&mut self.image, left, top, right, bottom, color.to_rgba(1.0));
    }

    fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64), width: f64, color: Rgb) {
        let thickness = round_px(width * self.px_per_point).max(1);
        let (x1, y1) = (self.px_x(from.0), self.px_y(from.1));
        let (x2, y2) = (self.px_x(to.0), self.px_y(to.1));
        let rgba = color.to_rgba(1.0);

        if (y1 - y2).abs() < f64::EPSILON {
            let top = round_px(y1) - thickness / 2;
            fill_px(
                &mut self.image,
                round_px(x1.min(x2)),
                top,
                round_px(x1.max(x2)),
                top + thickness,
                rgba,
            );
        } else if (x1 - x2).abs() < f64::EPSILON {
            let left = round_px(x1) - thickness / 2;
            fill_px(
                &mut self.image,
                left,
                round_px(y1.min(y2)),
                left + thickness,
                round_px(y1.max(y2)),
                rgba,
            );
        } else {
            draw_line_segment_mut(
                &mut self.image,
                (to_f32(x1), to_f32(y1)),
                (to_f32(x2), to_f32(y2)),
                rgba,
            );
        }
    }

    fn draw_text(&mut self, text: &str, center: (f64, f64), style: &TextStyle) {
        let Some(fonts) = self.fonts.as_ref() else {
            self.text_skipped += 1;
            return;
        };

        let px = to_f32(style.size * self.px_per_point);
        if px.is_nan() || px <= 0.0 {
            return;
        }
        let (font, true_bold) = fonts.face(style.bold);
        let faux_bold = style.bold && !true_bold;

        let lines: Vec<&str> = text.split('\n').collect();
        let pitch = px * LINE_SPACING;
        let cx = to_f32(self.px_x(center.0));
        let cy = to_f32(self.px_y(center.1));
        let block_top = cy - pitch * to_f32(count_as_f64(lines.len())) / 2.0;

        for (i, line) in lines.iter().enumerate() {
            if line.is_empty() {
                continue;
            }
            let width = fonts.line_width(line, px, style.bold);
            let origin = (
                cx - width / 2.0,
                block_top + pitch * (to_f32(count_as_f64(i)) + 0.5),
            );
            draw_run(&mut self.image, font, line, origin, px, style.color, style.opacity);
            if faux_bold {
                draw_run(
                    &mut self.image,
                    font,
                    line,
                    (origin.0 + 1.0, origin.1),
                    px,
                    style.color,
                    style.opacity,
                );
            }
        }
    }
}

/// Fill the pixel box `[left, right) x [top, bottom)`, clipped to the image.
fn fill_px(image: &mut RgbaImage, left: i32, top: i32, right: i32, bottom: i32, color: Rgba<u8>) {
    let (Ok(w), Ok(h)) = (u32::try_from(right - left), u32::try_from(bottom - top)) else {
        return;
    };
    if w == 0 || h == 0 {
        return;
    }
    draw_filled_rect_mut(image, Rect::at(left, top).of_size(w, h), color);
}

/// Draw one line of text starting at `origin.0`, vertically centred on
/// `origin.1`, blending glyph coverage times `opacity` over the image.
fn draw_run(
    image: &mut RgbaImage,
    font: &FontVec,
    text: &str,
    origin: (f32, f32),
    px: f32,
    color: Rgb,
    opacity: f32,
) {
    let scale = PxScale::from(px);
    let scaled = font.as_scaled(scale);
    // descent is negative
    let baseline = origin.1 + (scaled.ascent() + scaled.descent()) / 2.0;

    let mut cursor_x = origin.0;
    let mut previous = None;
    for ch in text.chars() {
        let id = font.glyph_id(ch);
        if let Some(prev) = previous {
            cursor_x += scaled.kern(prev, id);
        }
        let advance = scaled.h_advance(id);
        previous = Some(id);

        if ch.is_whitespace() {
            cursor_x += advance;
            continue;
        }

        let glyph = id.with_scale_and_position(scale, point(cursor_x, baseline));
        if let Some(outlined) = font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            let min_x = floor_i64(bounds.min.x);
            let min_y = floor_i64(bounds.min.y);
            outlined.draw(|gx, gy, coverage| {
                if coverage <= MIN_COVERAGE {
                    return;
                }
                let (Ok(x), Ok(y)) = (
                    u32::try_from(min_x + i64::from(gx)),
                    u32::try_from(min_y + i64::from(gy)),
                ) else {
                    return;
                };
                if let Some(pixel) = image.get_pixel_mut_checked(x, y) {
                    let alpha = coverage.min(1.0) * opacity;
                    pixel.0[0] = blend_channel(pixel.0[0], color.r, alpha);
                    pixel.0[1] = blend_channel(pixel.0[1], color.g, alpha);
                    pixel.0[2] = blend_channel(pixel.0[2], color.b, alpha);
                    pixel.0[3] = 255;
                }
            });
        }
        cursor_x += advance;
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn blend_channel(dst: u8, src: u8, alpha: f32) -> u8 {
    let a = alpha.clamp(0.0, 1.0);
    (f32::from(dst) * (1.0 - a) + f32::from(src) * a)
        .round()
        .clamp(0.0, 255.0) as u8
}

/// Size of a canvas axis in whole pixels, at least one.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn pixel_extent(px: f64, axis: &str) -> Result<u32> {
    if !px.is_finite() || px > f64::from(MAX_DIMENSION) {
        return Err(SheetshotError::Render(format!(
            "canvas {axis} {px}px exceeds {MAX_DIMENSION}px"
        )));
    }
    Ok((px.ceil().max(1.0)) as u32)
}

#[allow(clippy::cast_possible_truncation)]
fn round_px(v: f64) -> i32 {
    if v.is_nan() {
        return 0;
    }
    v.round().clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32
}

#[allow(clippy::cast_possible_truncation)]
fn floor_i64(v: f32) -> i64 {
    if v.is_nan() {
        return 0;
    }
    v.floor() as i64
}

#[allow(clippy::cast_possible_truncation)]
fn to_f32(v: f64) -> f32 {
    v as f32
}

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
    use crate::config::Heuristics;
    use crate::layout::VisibleIndexMap;
    use crate::types::{Grid, Style};

    fn layout(rows: usize, cols: usize) -> SheetLayout {
        let grid = Grid {
            values: vec![vec![String::new(); cols]; rows],
            styles: vec![vec![Style::default(); cols]; rows],
            row_map: VisibleIndexMap::identity(rows),
            col_map: VisibleIndexMap::identity(cols),
        };
        SheetLayout::new(&grid, &[], 0, 0, &Heuristics::default())
    }

    fn config(dpi: f64) -> RenderConfig {
        RenderConfig {
            dpi,
            ..RenderConfig::default()
        }
    }

    #[test]
    fn test_canvas_size_small_grid_uses_min_height() {
        // 2 cols * 1.6 units at 100 dpi; 2 rows * 0.42 < 1.0 inch minimum
        let canvas = RasterCanvas::new(&layout(2, 2), &config(100.0), None).unwrap();
        assert_eq!(canvas.width(), 320);
        assert_eq!(canvas.grid_height(), 100);
        // footer: 9pt * 100/72 * 2 = 25px
        assert_eq!(canvas.height(), 125);
    }

    #[test]
    fn test_canvas_size_tall_grid() {
        let canvas = RasterCanvas::new(&layout(10, 1), &config(100.0), None).unwrap();
        assert_eq!(canvas.grid_height(), 420);
    }

    #[test]
    fn test_footer_omitted_when_attribution_disabled() {
        let mut cfg = config(100.0);
        cfg.attribution.enabled = false;
        let canvas = RasterCanvas::new(&layout(2, 2), &cfg, None).unwrap();
        assert_eq!(canvas.height(), canvas.grid_height());
    }

    #[test]
    fn test_empty_layout_still_allocates() {
        let canvas = RasterCanvas::new(&layout(0, 0), &config(100.0), None).unwrap();
        assert_eq!(canvas.width(), 1);
        assert_eq!(canvas.grid_height(), 100);
    }

    #[test]
    fn test_tall_window_at_default_dpi_fits() {
        // 300 rows * 0.42in * 300dpi = 37800px, plus a 75px footer
        let canvas = RasterCanvas::new(&layout(300, 1), &RenderConfig::default(), None).unwrap();
        assert_eq!(canvas.grid_height(), 37_800);
        assert_eq!(canvas.height(), 37_875);
    }

    #[test]
    fn test_height_cap_counts_footer() {
        // grid alone reaches the cap; the footer pushes it over
        let cfg = RenderConfig {
            dpi: 72.0,
            row_height: f64::from(MAX_DIMENSION) / 72.0,
            ..RenderConfig::default()
        };
        let err = RasterCanvas::new(&layout(1, 1), &cfg, None).unwrap_err();
        assert!(matches!(err, SheetshotError::Render(_)));
    }

    #[test]
    fn test_oversized_canvas_rejected() {
        let err = RasterCanvas::new(&layout(1, 4), &config(1_000_000.0), None).unwrap_err();
        assert!(matches!(err, SheetshotError::Render(_)));
    }

    #[test]
    fn test_fill_maps_flipped_rows() {
        let mut canvas = RasterCanvas::new(&layout(2, 2), &config(100.0), None).unwrap();
        // top-left cell: row 0 sits at y = 1 in unit space
        canvas.fill_rect(UnitRect::new(0.0, 1.0, 1.6, 1.0), Rgb::new(255, 0, 0));
        let image = canvas.image();
        assert_eq!(image.get_pixel(10, 10).0, [255, 0, 0, 255]);
        assert_eq!(image.get_pixel(159, 49).0, [255, 0, 0, 255]);
        assert_eq!(image.get_pixel(160, 10).0, [255, 255, 255, 255]);
        assert_eq!(image.get_pixel(10, 50).0, [255, 255, 255, 255]);
    }

    #[test]
    fn test_horizontal_border_thickness_in_points() {
        let mut canvas = RasterCanvas::new(&layout(2, 2), &config(72.0), None).unwrap();
        // 72 dpi: 1pt = 1px, grid height 72px, rows 36px
        canvas.stroke_line((0.0, 1.0), (1.6, 1.0), 4.0, Rgb::new(0, 0, 255));
        let image = canvas.image();
        assert_eq!(image.get_pixel(20, 34).0, [0, 0, 255, 255]);
        assert_eq!(image.get_pixel(20, 37).0, [0, 0, 255, 255]);
        assert_eq!(image.get_pixel(20, 39).0, [255, 255, 255, 255]);
        assert_eq!(image.get_pixel(20, 31).0, [255, 255, 255, 255]);
    }

    #[test]
    fn test_text_without_fonts_is_counted() {
        let mut canvas = RasterCanvas::new(&layout(1, 1), &config(72.0), None).unwrap();
        let style = TextStyle {
            size: 12.0,
            color: Rgb::new(0, 0, 0),
            bold: false,
            opacity: 1.0,
        };
        canvas.draw_text("hello", (0.8, 0.5), &style);
        canvas.draw_attribution(&Attribution::default());
        assert_eq!(canvas.text_skipped(), 2);
        assert!(canvas.image().pixels().all(|p| p.0 == [255, 255, 255, 255]));
    }

    #[test]
    fn test_finish_encodes_png() {
        let mut canvas = RasterCanvas::new(&layout(1, 1), &config(72.0), None).unwrap();
        canvas.fill_rect(UnitRect::new(0.0, 0.0, 1.6, 1.0), Rgb::new(0, 128, 0));
        let rendered = canvas.finish().unwrap();
        assert_eq!(&rendered.png[1..4], b"PNG");
        let decoded = rendered.decode().unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (rendered.width, rendered.height));
        assert_eq!(decoded.get_pixel(5, 5).0, [0, 128, 0, 255]);
    }

    #[test]
    fn test_blend_channel() {
        assert_eq!(blend_channel(255, 0, 1.0), 0);
        assert_eq!(blend_channel(255, 0, 0.0), 255);
        assert_eq!(blend_channel(200, 100, 0.5), 150);
    }
}
