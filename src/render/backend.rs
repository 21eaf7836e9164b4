//! Drawing surface trait for pluggable output implementations.
//!
//! The cell renderer draws in grid units with the origin at the bottom-left
//! corner and the vertical axis growing upward. One width unit is one column
//! width unit from the layout; one height unit is one row. Implementations
//! convert to their own pixel space.

use crate::render::colors::Rgb;

/// Axis-aligned rectangle in grid units; `y` is the bottom edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl UnitRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn top(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// How a run of text should look.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Size in points.
    pub size: f64,
    pub color: Rgb,
    pub bold: bool,
    /// 0.0 (invisible) to 1.0 (opaque).
    pub opacity: f32,
}

/// Trait for drawing surfaces
///
/// Implementations handle the actual pixel work; the renderer only decides
/// what goes where and in which order.
pub trait Surface {
    /// Fill a rectangle with a solid color.
    fn fill_rect(&mut self, rect: UnitRect, color: Rgb);

    /// Draw a straight line; `width` is in points.
    fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64), width: f64, color: Rgb);

    /// Draw text centered on `center`; lines are separated by `\n`.
    fn draw_text(&mut self, text: &str, center: (f64, f64), style: &TextStyle);
}
