//! Error types for BAM layout decoding.

use std::fmt;

use bytestream::ByteError;

/// Result type for layout operations.
pub type FormatResult<T> = Result<T, DecodeError>;

/// High-level decode errors for BAM headers and tables.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DecodeError {
    /// Buffer is too small to contain the required header.
    TooSmall { actual: usize, required: usize },

    /// Signature does not name a supported variant.
    InvalidSignature { found: [u8; 8] },

    /// Compressed container carries an unknown version tag.
    UnsupportedVersion { found: [u8; 4] },

    /// A header offset points into the header itself.
    OffsetBelowMinimum {
        field: HeaderField,
        offset: u32,
        minimum: u32,
    },

    /// A count field is zero where at least one entry is required.
    InvalidCount { field: CountField, value: u32 },

    /// A table extends past the end of the buffer.
    TableOutOfBounds {
        table: HeaderField,
        offset: usize,
        len: usize,
        available: usize,
    },

    /// Limits exceeded.
    LimitsExceeded {
        kind: LimitKind,
        limit: usize,
        actual: usize,
    },

    /// Low-level read failure.
    Bytes(ByteError),
}

/// Header fields that locate a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderField {
    FrameTable,
    CycleTable,
    Palette,
    LookupTable,
    BlockTable,
}

/// Header fields that carry an entry count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountField {
    Frames,
    Cycles,
    Blocks,
}

/// Specific decode limits that can be exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitKind {
    InputBytes,
    Frames,
    Cycles,
    Blocks,
    FramePixels,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooSmall { actual, required } => {
                write!(
                    f,
                    "resource too small: {actual} bytes, need at least {required}"
                )
            }
            Self::InvalidSignature { found } => {
                write!(
                    f,
                    "invalid signature: \"{}\"",
                    String::from_utf8_lossy(found).escape_debug()
                )
            }
            Self::UnsupportedVersion { found } => {
                write!(
                    f,
                    "unsupported container version: \"{}\"",
                    String::from_utf8_lossy(found).escape_debug()
                )
            }
            Self::OffsetBelowMinimum {
                field,
                offset,
                minimum,
            } => {
                write!(
                    f,
                    "{field} offset 0x{offset:X} below minimum 0x{minimum:X}"
                )
            }
            Self::InvalidCount { field, value } => {
                write!(f, "invalid {field} count: {value}")
            }
            Self::TableOutOfBounds {
                table,
                offset,
                len,
                available,
            } => {
                write!(
                    f,
                    "{table} at 0x{offset:X} needs {len} bytes, {available} available"
                )
            }
            Self::LimitsExceeded {
                kind,
                limit,
                actual,
            } => {
                write!(f, "{kind} limit exceeded: {actual} > {limit}")
            }
            Self::Bytes(err) => write!(f, "read error: {err}"),
        }
    }
}

impl fmt::Display for HeaderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::FrameTable => "frame table",
            Self::CycleTable => "cycle table",
            Self::Palette => "palette",
            Self::LookupTable => "frame lookup table",
            Self::BlockTable => "data block table",
        };
        write!(f, "{name}")
    }
}

impl fmt::Display for CountField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Frames => "frame",
            Self::Cycles => "cycle",
            Self::Blocks => "data block",
        };
        write!(f, "{name}")
    }
}

impl fmt::Display for LimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::InputBytes => "input bytes",
            Self::Frames => "frame count",
            Self::Cycles => "cycle count",
            Self::Blocks => "data block count",
            Self::FramePixels => "frame pixels",
        };
        write!(f, "{name}")
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Bytes(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ByteError> for DecodeError {
    fn from(err: ByteError) -> Self {
        Self::Bytes(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_invalid_signature() {
        let err = DecodeError::InvalidSignature {
            found: *b"MOS V1  ",
        };
        assert!(err.to_string().contains("MOS V1"));
    }

    #[test]
    fn display_offset_below_minimum() {
        let err = DecodeError::OffsetBelowMinimum {
            field: HeaderField::Palette,
            offset: 0x10,
            minimum: 0x18,
        };
        let msg = err.to_string();
        assert!(msg.contains("palette"));
        assert!(msg.contains("0x10"));
        assert!(msg.contains("0x18"));
    }

    #[test]
    fn display_limits_exceeded() {
        let err = DecodeError::LimitsExceeded {
            kind: LimitKind::Frames,
            limit: 4,
            actual: 10,
        };
        let msg = err.to_string();
        assert!(msg.contains("frame count"));
        assert!(msg.contains("10"));
    }

    #[test]
    fn display_table_out_of_bounds() {
        let err = DecodeError::TableOutOfBounds {
            table: HeaderField::BlockTable,
            offset: 0x20,
            len: 28,
            available: 4,
        };
        assert!(err.to_string().contains("data block table"));
    }

    #[test]
    fn source_of_byte_error() {
        let err: DecodeError = ByteError::UnexpectedEof {
            requested: 2,
            available: 0,
        }
        .into();
        assert!(std::error::Error::source(&err).is_some());
        let other = DecodeError::InvalidCount {
            field: CountField::Cycles,
            value: 0,
        };
        assert!(std::error::Error::source(&other).is_none());
    }
}
