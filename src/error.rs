//! Structured error types for sheetshot.
//!
//! Every stage of the snapshot pipeline reports failures through
//! [`SheetshotError`]; a failure anywhere aborts the whole render.

/// All errors that can occur while loading, rendering or reconciling.
#[derive(Debug, thiserror::Error)]
pub enum SheetshotError {
    /// JSON payload or config could not be decoded.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Image encoding or decoding failed.
    #[error("Image: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A font file could not be read or parsed.
    #[error("Font: {0}")]
    Font(String),

    /// Invalid column letters or cell reference.
    #[error("Invalid cell reference: {0}")]
    CellRef(String),

    /// Invalid render configuration.
    #[error("Config: {0}")]
    Config(String),

    /// The configured attribution owner does not match the expected one.
    #[error("Attribution mismatch: expected {expected:?}, found {found:?}")]
    Attribution { expected: String, found: String },

    /// Record sets could not be reconciled.
    #[error("Reconcile: {0}")]
    Reconcile(String),

    /// Rendering error.
    #[error("Render error: {0}")]
    Render(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SheetshotError>;
