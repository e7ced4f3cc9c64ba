//! Error types for palette and quantization operations.

use std::fmt;

/// Result type for quantization.
pub type QuantizeResult<T> = Result<T, QuantizeError>;

/// Errors that can occur during color quantization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantizeError {
    /// Requested palette size is outside `1..=256`.
    InvalidColorCount { requested: usize },

    /// No pixel survived the alpha filter.
    NoPixels,
}

/// Errors that can occur while loading a palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteError {
    /// Fewer than 1024 bytes were supplied.
    Truncated { needed: usize, available: usize },
}

impl fmt::Display for QuantizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidColorCount { requested } => {
                write!(f, "invalid color count {requested}, expected 1..=256")
            }
            Self::NoPixels => write!(f, "no pixels to quantize"),
        }
    }
}

impl fmt::Display for PaletteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Truncated { needed, available } => {
                write!(f, "palette truncated: need {needed} bytes, have {available}")
            }
        }
    }
}

impl std::error::Error for QuantizeError {}

impl std::error::Error for PaletteError {}
