//! Error types for decoding, rendering and encoding.

use std::fmt;

use format::{CountField, DecodeError};
use palette::{PaletteError, QuantizeError};

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors raised by decoders, the exporter and the assembler.
///
/// Index probing never produces an error; accessors return `Option` or
/// `bool` instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The resource is malformed; no decoder was produced.
    InvalidFormat { reason: FormatReason },

    /// A value does not fit the V1 layout. Raised before any byte is written.
    LimitExceeded {
        kind: LimitKind,
        entity: Entity,
        limit: i64,
        actual: i64,
    },

    /// The sprite being encoded has no palette.
    MissingPalette,

    /// A frame's pixel buffer does not match its dimensions.
    PixelDataMismatch {
        frame: usize,
        expected: usize,
        actual: usize,
    },

    /// The operation observed its cancel flag between frames.
    Cancelled,

    /// Whole-blob compression or decompression failed.
    Compression { message: String },

    /// A named resource or texture page could not be found.
    ResourceNotFound { name: String },

    /// A named resource exists but could not be read.
    Resource { name: String, message: String },

    /// The decoder has been closed.
    Closed,

    /// Palette bytes could not be parsed.
    Palette(PaletteError),

    /// Color reduction failed.
    Quantize(QuantizeError),
}

/// Why a resource was rejected as malformed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatReason {
    /// Header or table layout failure.
    Layout(DecodeError),
    /// The leading bytes name no known variant.
    UnknownSignature,
    /// A compressed container does not wrap a V1 resource.
    UnexpectedPayload,
    /// Decompressed length differs from the container header.
    LengthMismatch { expected: usize, actual: usize },
    /// A V2 frame references data blocks past the end of the block table.
    BlockRangeOutOfBounds { frame: usize },
    /// A table that must hold at least one entry is empty.
    Empty { field: CountField },
}

/// Encoder bound that was exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitKind {
    Frames,
    Cycles,
    CycleLength,
    Width,
    Height,
    CenterX,
    CenterY,
    FrameIndex,
    LookupStart,
    DataOffset,
    Colors,
}

/// Entity a limit violation refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Resource,
    Frame(usize),
    Cycle(usize),
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFormat { reason } => write!(f, "invalid format: {reason}"),
            Self::LimitExceeded {
                kind,
                entity,
                limit,
                actual,
            } => {
                write!(f, "{kind} limit exceeded for {entity}: {actual} (bound {limit})")
            }
            Self::MissingPalette => write!(f, "sprite has no palette"),
            Self::PixelDataMismatch {
                frame,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "frame {frame} pixel data mismatch: expected {expected} bytes, got {actual}"
                )
            }
            Self::Cancelled => write!(f, "operation cancelled"),
            Self::Compression { message } => write!(f, "compression error: {message}"),
            Self::ResourceNotFound { name } => write!(f, "resource {name} not found"),
            Self::Resource { name, message } => write!(f, "resource {name}: {message}"),
            Self::Closed => write!(f, "decoder is closed"),
            Self::Palette(e) => write!(f, "palette error: {e}"),
            Self::Quantize(e) => write!(f, "quantize error: {e}"),
        }
    }
}

impl fmt::Display for FormatReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Layout(e) => write!(f, "{e}"),
            Self::UnknownSignature => write!(f, "unknown signature"),
            Self::UnexpectedPayload => write!(f, "container payload is not a V1 resource"),
            Self::LengthMismatch { expected, actual } => {
                write!(
                    f,
                    "decompressed length {actual} does not match header length {expected}"
                )
            }
            Self::BlockRangeOutOfBounds { frame } => {
                write!(f, "frame {frame} references blocks past the block table")
            }
            Self::Empty { field } => write!(f, "no {field} to encode"),
        }
    }
}

impl fmt::Display for LimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Frames => "frame count",
            Self::Cycles => "cycle count",
            Self::CycleLength => "cycle length",
            Self::Width => "width",
            Self::Height => "height",
            Self::CenterX => "center x",
            Self::CenterY => "center y",
            Self::FrameIndex => "frame index",
            Self::LookupStart => "lookup start",
            Self::DataOffset => "data offset",
            Self::Colors => "color count",
        };
        write!(f, "{name}")
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resource => write!(f, "resource"),
            Self::Frame(index) => write!(f, "frame {index}"),
            Self::Cycle(index) => write!(f, "cycle {index}"),
        }
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidFormat {
                reason: FormatReason::Layout(e),
            } => Some(e),
            Self::Palette(e) => Some(e),
            Self::Quantize(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DecodeError> for CodecError {
    fn from(err: DecodeError) -> Self {
        Self::InvalidFormat {
            reason: FormatReason::Layout(err),
        }
    }
}

impl From<bytestream::ByteError> for CodecError {
    fn from(err: bytestream::ByteError) -> Self {
        Self::from(DecodeError::from(err))
    }
}

impl From<PaletteError> for CodecError {
    fn from(err: PaletteError) -> Self {
        Self::Palette(err)
    }
}

impl From<QuantizeError> for CodecError {
    fn from(err: QuantizeError) -> Self {
        Self::Quantize(err)
    }
}

impl From<FormatReason> for CodecError {
    fn from(reason: FormatReason) -> Self {
        Self::InvalidFormat { reason }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn limit_display_names_entity_and_bound() {
        let err = CodecError::LimitExceeded {
            kind: LimitKind::CenterX,
            entity: Entity::Frame(3),
            limit: i64::from(i16::MAX),
            actual: 40_000,
        };
        let msg = err.to_string();
        assert!(msg.contains("center x"), "should name the bound");
        assert!(msg.contains("frame 3"), "should name the entity");
        assert!(msg.contains("40000"), "should show the value");
    }

    #[test]
    fn layout_error_has_source() {
        let err: CodecError = DecodeError::TooSmall {
            actual: 4,
            required: 24,
        }
        .into();
        assert!(matches!(
            err,
            CodecError::InvalidFormat {
                reason: FormatReason::Layout(_)
            }
        ));
        assert!(err.source().is_some());
    }

    #[test]
    fn byte_error_becomes_invalid_format() {
        let err: CodecError = bytestream::ByteError::UnexpectedEof {
            requested: 2,
            available: 0,
        }
        .into();
        assert!(matches!(err, CodecError::InvalidFormat { .. }));
    }

    #[test]
    fn mismatch_display() {
        let err = CodecError::PixelDataMismatch {
            frame: 1,
            expected: 16,
            actual: 15,
        };
        let msg = err.to_string();
        assert!(msg.contains("16"));
        assert!(msg.contains("15"));
    }

    #[test]
    fn quantize_error_wrapped() {
        let err: CodecError = QuantizeError::NoPixels.into();
        assert!(matches!(err, CodecError::Quantize(QuantizeError::NoPixels)));
    }
}
