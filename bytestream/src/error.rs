//! Error types for byte-level operations.

use std::fmt;

/// Result type for byte-level operations.
pub type ByteResult<T> = Result<T, ByteError>;

/// Errors that can occur while reading little-endian data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ByteError {
    /// Attempted to read past the end of the buffer.
    UnexpectedEof {
        /// Number of bytes requested.
        requested: usize,
        /// Number of bytes available.
        available: usize,
    },

    /// An absolute offset lies outside the buffer.
    OffsetOutOfBounds {
        /// Requested offset.
        offset: usize,
        /// Length of the accessed span.
        len: usize,
        /// Total buffer length.
        buffer_len: usize,
    },
}

impl fmt::Display for ByteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedEof {
                requested,
                available,
            } => {
                write!(
                    f,
                    "unexpected end of buffer: requested {requested} bytes, {available} available"
                )
            }
            Self::OffsetOutOfBounds {
                offset,
                len,
                buffer_len,
            } => {
                write!(
                    f,
                    "span {offset}..{} out of bounds for buffer of {buffer_len} bytes",
                    offset.saturating_add(*len)
                )
            }
        }
    }
}

impl std::error::Error for ByteError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_unexpected_eof() {
        let err = ByteError::UnexpectedEof {
            requested: 4,
            available: 1,
        };
        let msg = err.to_string();
        assert!(msg.contains('4'), "should mention requested");
        assert!(msg.contains('1'), "should mention available");
    }

    #[test]
    fn display_offset_out_of_bounds() {
        let err = ByteError::OffsetOutOfBounds {
            offset: 10,
            len: 4,
            buffer_len: 12,
        };
        let msg = err.to_string();
        assert!(msg.contains("10..14"));
        assert!(msg.contains("12"));
    }

    #[test]
    fn error_is_std_error() {
        fn assert_error<E: std::error::Error>() {}
        assert_error::<ByteError>();
    }
}
