//! Rendering engine.
//!
//! This module provides:
//! - The [`Surface`] trait the cell renderer draws against
//! - The raster backend producing PNG output
//! - A recording backend for dry runs
//! - Color and text sizing utilities

pub mod backend;
pub mod cells;
pub mod colors;
pub mod fonts;
pub mod raster;
pub mod recording;
pub mod text;

// Re-export commonly used types
pub use backend::{Surface, TextStyle, UnitRect};
pub use cells::{render_cells, RenderStats};
pub use colors::{palette, Rgb};
pub use fonts::FontBook;
pub use raster::{RasterCanvas, RenderedImage, MAX_DIMENSION};
pub use recording::{DrawOp, RecordingSurface};
