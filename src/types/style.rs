use serde::{Deserialize, Serialize};

use crate::render::colors::{palette, Rgb};

/// Thinnest border line that will be drawn, in points.
pub const MIN_BORDER_WIDTH: f64 = 0.6;

/// Resolved cell style; every field has a concrete value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Style {
    pub background: Rgb,
    pub bold: bool,
    /// Font size set explicitly on the source cell, in points.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    pub font_color: Rgb,
    pub wrap: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_top: Option<Border>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_bottom: Option<Border>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_left: Option<Border>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_right: Option<Border>,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            background: palette::WHITE,
            bold: false,
            font_size: None,
            font_color: palette::BLACK,
            wrap: false,
            border_top: None,
            border_bottom: None,
            border_left: None,
            border_right: None,
        }
    }
}

impl Style {
    /// True if any of the four edges carries a border.
    pub fn has_borders(&self) -> bool {
        self.border_top.is_some()
            || self.border_bottom.is_some()
            || self.border_left.is_some()
            || self.border_right.is_some()
    }
}

/// A single border edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Border {
    pub color: Rgb,
    /// Line width in points, never below [`MIN_BORDER_WIDTH`].
    pub width: f64,
}

impl Border {
    pub fn new(color: Rgb, width: f64) -> Self {
        let width = if width.is_finite() { width } else { 1.0 };
        Self {
            color,
            width: width.max(MIN_BORDER_WIDTH),
        }
    }
}
