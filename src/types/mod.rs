//! Data types for snapshot rendering.

mod grid;
mod source;
mod style;

pub use grid::*;
pub use source::*;
pub use style::*;
