//! Layout planning for a snapshot.
//!
//! This module handles:
//! - Mapping original row/column indices to visible ones
//! - Content-driven column widths
//! - Translating merge regions into visible-grid coordinates
//! - Tracking which cells are covered by a merge

mod index_map;
mod sheet_layout;

pub use index_map::VisibleIndexMap;
pub use sheet_layout::{column_widths, translate_merges, MergePlan, MergeSpan, SheetLayout};
