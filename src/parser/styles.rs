//! Style resolution - turns a cell's format descriptor into a concrete [`Style`].
//!
//! Missing or malformed fields never fail; they fall back to the defaults of
//! [`Style::default`].

use crate::render::colors::{palette, Rgb};
use crate::types::{Border, BorderSpec, CellFormat, ColorValue, Style};

/// Wrap strategy value that enables wrapping.
const WRAP_STRATEGY: &str = "WRAP";

/// Border width used when the source omits one, in points.
const DEFAULT_BORDER_WIDTH: f64 = 1.0;

/// Resolve a cell's format into a style.
pub(super) fn resolve_style(format: Option<&CellFormat>) -> Style {
    let Some(format) = format else {
        return Style::default();
    };
    let text = format.text_format.as_ref();
    let borders = format.borders.as_ref();

    Style {
        background: resolve_color(format.background_color.as_ref(), palette::WHITE),
        bold: text.and_then(|t| t.bold).unwrap_or(false),
        font_size: text
            .and_then(|t| t.font_size)
            .filter(|size| size.is_finite() && *size > 0.0),
        font_color: resolve_color(
            text.and_then(|t| t.foreground_color.as_ref()),
            palette::BLACK,
        ),
        wrap: format.wrap_strategy.as_deref() == Some(WRAP_STRATEGY),
        border_top: resolve_border(borders.and_then(|b| b.top.as_ref())),
        border_bottom: resolve_border(borders.and_then(|b| b.bottom.as_ref())),
        border_left: resolve_border(borders.and_then(|b| b.left.as_ref())),
        border_right: resolve_border(borders.and_then(|b| b.right.as_ref())),
    }
}

/// Resolve a wire color, using `default` when it is absent or empty.
///
/// Omitted channels count as zero.
pub(super) fn resolve_color(color: Option<&ColorValue>, default: Rgb) -> Rgb {
    match color {
        Some(c) if !c.is_empty() => Rgb::from_unit(
            c.red.unwrap_or(0.0),
            c.green.unwrap_or(0.0),
            c.blue.unwrap_or(0.0),
        ),
        _ => default,
    }
}

fn resolve_border(spec: Option<&BorderSpec>) -> Option<Border> {
    let spec = spec?;
    if spec.style.as_deref() == Some("NONE") {
        return None;
    }
    Some(Border::new(
        resolve_color(spec.color.as_ref(), palette::BLACK),
        spec.width.unwrap_or(DEFAULT_BORDER_WIDTH),
    ))
}
