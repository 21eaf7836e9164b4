//! sheetshot - spreadsheet grid snapshots as PNG
//!
//! Renders a rectangular window of a spreadsheet (values, fills, borders,
//! bold, font colors, wrapping, merged cells) to an image suitable for
//! sharing in a chat message:
//! - Hidden rows and columns are left out, merges are remapped around them
//! - Column widths and font sizes follow the content
//! - Output is a PNG with an attribution footer
//!
//! # Usage
//!
//! ```no_run
//! use sheetshot::{parser, snapshot, RenderConfig, SnapshotRequest};
//!
//! # fn main() -> sheetshot::Result<()> {
//! let payload = std::fs::read("grid.json")?;
//! let window = parser::parse_window(&payload)?;
//! let request = SnapshotRequest::starting_at("B3")?;
//! let image = snapshot::render_snapshot(&window, &request, &RenderConfig::default())?;
//! image.write_to(std::path::Path::new("grid.png"))?;
//! # Ok(())
//! # }
//! ```

pub mod cell_ref;
pub mod config;
pub mod error;
pub mod parser;
pub mod reconcile;
pub mod snapshot;
pub mod types;

// Rendering modules
pub mod layout;
pub mod render;

pub use config::{Attribution, FontConfig, Heuristics, RenderConfig};
pub use error::{Result, SheetshotError};
pub use layout::SheetLayout;
pub use reconcile::{reconcile, RecordSet};
pub use render::{RenderedImage, Rgb};
pub use snapshot::{render_payload, render_snapshot};
pub use types::*;
