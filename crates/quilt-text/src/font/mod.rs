pub mod face;
pub mod glyph;
pub mod registry;

pub use face::{FaceMetrics, FaceStyle, FontFace};
pub use glyph::{AtlasRect, Glyph};
pub use registry::{FontId, FontRegistry};

use thiserror::Error;

/// Errors that can occur while working with fonts.
#[derive(Debug, Error)]
pub enum FontError {
    #[error("unknown font face {0:?}")]
    UnknownFace(FontId),
    #[error("font face `{0}` has no usable metrics (point size must be positive)")]
    InvalidMetrics(String),
}

/// Convenient result alias for font-related operations.
pub type Result<T> = std::result::Result<T, FontError>;
