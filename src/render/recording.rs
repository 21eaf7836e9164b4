//! A surface that records draw calls instead of rasterizing them.
//!
//! Useful for dry runs and for checking draw order and geometry without
//! fonts or pixels.

use super::backend::{Surface, TextStyle, UnitRect};
use super::colors::Rgb;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Fill {
        rect: UnitRect,
        color: Rgb,
    },
    Line {
        from: (f64, f64),
        to: (f64, f64),
        width: f64,
        color: Rgb,
    },
    Text {
        text: String,
        center: (f64, f64),
        style: TextStyle,
    },
}

/// Records every draw call in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    pub ops: Vec<DrawOp>,
}

impl RecordingSurface {
    /// Rectangles passed to `fill_rect`, in draw order.
    pub fn fills(&self) -> Vec<UnitRect> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Fill { rect, .. } => Some(*rect),
                _ => None,
            })
            .collect()
    }

    /// Text runs and their styles, in draw order.
    pub fn texts(&self) -> Vec<(&str, TextStyle)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, style, .. } => Some((text.as_str(), *style)),
                _ => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn fill_rect(&mut self, rect: UnitRect, color: Rgb) {
        self.ops.push(DrawOp::Fill { rect, color });
    }

    fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64), width: f64, color: Rgb) {
        self.ops.push(DrawOp::Line {
            from,
            to,
            width,
            color,
        });
    }

    fn draw_text(&mut self, text: &str, center: (f64, f64), style: &TextStyle) {
        self.ops.push(DrawOp::Text {
            text: text.to_string(),
            center,
            style: *style,
        });
    }
}
