//! Error types for rendering operations.

use thiserror::Error;

use crate::provider::LookupError;

/// Error types for rendering operations.
///
/// Every error aborts the current render call. Pixels drawn before the
/// failure stay on the canvas.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// A tile reference could not be resolved to a sprite.
    #[error("Tile lookup failed: {0}")]
    Lookup(#[from] LookupError),

    /// The requested group does not exist.
    #[error("Group index {index} out of range (map has {len} groups)")]
    GroupOutOfRange { index: usize, len: usize },

    /// The requested layer does not exist.
    #[error("Layer index {index} out of range ({len} layers)")]
    LayerOutOfRange { index: usize, len: usize },

    /// A tile layer's data does not cover its grid.
    #[error("Tile layer '{layer}' has {actual} cells, expected {expected}")]
    TileDataLength {
        layer: String,
        expected: usize,
        actual: usize,
    },

    /// A tileset sheet could not be sliced with the given layout.
    #[error("Invalid tileset sheet: {0}")]
    InvalidSheet(String),
}
