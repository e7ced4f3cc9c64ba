//! The `BAMC` whole-blob compressed container.

use std::io::{Read, Write};

use bytestream::ByteWriter;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use format::{
    decode_bamc_header, encode_bamc_header, BamcHeader, DecodeError, LimitKind, Limits,
    Signature, BAMC_HEADER_SIZE, BAMC_VERSION,
};

use crate::error::{CodecError, CodecResult, FormatReason};

/// Compresses and decompresses whole resource payloads.
pub trait BlobCompressor {
    fn compress(&self, data: &[u8]) -> CodecResult<Vec<u8>>;

    /// Decompresses `data`, producing at most `max_len` bytes.
    fn decompress(&self, data: &[u8], max_len: usize) -> CodecResult<Vec<u8>>;
}

/// zlib, as used by `BAMC` resources.
#[derive(Debug, Clone, Copy)]
pub struct ZlibCompressor {
    level: Compression,
}

impl ZlibCompressor {
    /// Creates a compressor at `level` (0-9).
    #[must_use]
    pub fn new(level: u32) -> Self {
        Self {
            level: Compression::new(level.min(9)),
        }
    }
}

impl Default for ZlibCompressor {
    fn default() -> Self {
        Self {
            level: Compression::default(),
        }
    }
}

impl BlobCompressor for ZlibCompressor {
    fn compress(&self, data: &[u8]) -> CodecResult<Vec<u8>> {
        let mut encoder = ZlibEncoder::new(Vec::with_capacity(data.len() / 2), self.level);
        encoder.write_all(data).map_err(compression_error)?;
        encoder.finish().map_err(compression_error)
    }

    fn decompress(&self, data: &[u8], max_len: usize) -> CodecResult<Vec<u8>> {
        let mut out = Vec::new();
        ZlibDecoder::new(data)
            .take(max_len as u64)
            .read_to_end(&mut out)
            .map_err(compression_error)?;
        Ok(out)
    }
}

fn compression_error(err: std::io::Error) -> CodecError {
    CodecError::Compression {
        message: err.to_string(),
    }
}

/// Wraps a V1 resource in a `BAMC` container.
pub fn wrap_bamc(resource: &[u8], compressor: &dyn BlobCompressor) -> CodecResult<Vec<u8>> {
    if Signature::sniff(resource) != Some(Signature::V1) {
        return Err(FormatReason::UnexpectedPayload.into());
    }
    let uncompressed_len = u32::try_from(resource.len()).map_err(|_| CodecError::Compression {
        message: format!("payload of {} bytes too large", resource.len()),
    })?;
    let payload = compressor.compress(resource)?;
    let mut writer = ByteWriter::with_capacity(BAMC_HEADER_SIZE + payload.len());
    encode_bamc_header(
        &BamcHeader {
            version: BAMC_VERSION,
            uncompressed_len,
        },
        &mut writer,
    );
    writer.write_bytes(&payload);
    Ok(writer.finish())
}

/// Unwraps a `BAMC` container, returning the V1 resource inside.
pub fn unwrap_bamc(data: &[u8], compressor: &dyn BlobCompressor, limits: &Limits) -> CodecResult<Vec<u8>> {
    let header = decode_bamc_header(data)?;
    let expected = header.uncompressed_len as usize;
    if expected > limits.max_input_bytes {
        return Err(DecodeError::LimitsExceeded {
            kind: LimitKind::InputBytes,
            limit: limits.max_input_bytes,
            actual: expected,
        }
        .into());
    }

    let resource = compressor.decompress(&data[BAMC_HEADER_SIZE..], expected.saturating_add(1))?;
    if resource.len() != expected {
        return Err(FormatReason::LengthMismatch {
            expected,
            actual: resource.len(),
        }
        .into());
    }
    if Signature::sniff(&resource) != Some(Signature::V1) {
        return Err(FormatReason::UnexpectedPayload.into());
    }
    Ok(resource)
}

#[cfg(test)]
mod tests {
    use super::*;
    use format::SIGNATURE_V1;

    fn resource() -> Vec<u8> {
        let mut bytes = SIGNATURE_V1.to_vec();
        bytes.extend(std::iter::repeat(7u8).take(500));
        bytes
    }

    #[test]
    fn wrap_then_unwrap() {
        let zlib = ZlibCompressor::default();
        let wrapped = wrap_bamc(&resource(), &zlib).unwrap();
        assert_eq!(&wrapped[..4], b"BAMC");
        assert_eq!(&wrapped[4..8], b"V1  ");
        assert!(wrapped.len() < resource().len());
        assert_eq!(unwrap_bamc(&wrapped, &zlib, &Limits::default()).unwrap(), resource());
    }

    #[test]
    fn wrap_requires_v1() {
        let err = wrap_bamc(b"BAM V2  rest", &ZlibCompressor::default()).unwrap_err();
        assert_eq!(
            err,
            CodecError::InvalidFormat {
                reason: FormatReason::UnexpectedPayload
            }
        );
    }

    #[test]
    fn length_mismatch_detected() {
        let zlib = ZlibCompressor::default();
        let mut wrapped = wrap_bamc(&resource(), &zlib).unwrap();
        wrapped[8..12].copy_from_slice(&100u32.to_le_bytes());
        assert_eq!(
            unwrap_bamc(&wrapped, &zlib, &Limits::default()).unwrap_err(),
            CodecError::InvalidFormat {
                reason: FormatReason::LengthMismatch {
                    expected: 100,
                    actual: 101
                }
            }
        );
    }

    #[test]
    fn declared_size_bounded_by_limits() {
        let zlib = ZlibCompressor::default();
        let wrapped = wrap_bamc(&resource(), &zlib).unwrap();
        let limits = Limits {
            max_input_bytes: 16,
            ..Limits::default()
        };
        assert!(matches!(
            unwrap_bamc(&wrapped, &zlib, &limits).unwrap_err(),
            CodecError::InvalidFormat {
                reason: FormatReason::Layout(DecodeError::LimitsExceeded { .. })
            }
        ));
    }

    #[test]
    fn corrupt_stream_is_compression_error() {
        let mut data = Vec::new();
        data.extend_from_slice(b"BAMCV1  ");
        data.extend_from_slice(&10u32.to_le_bytes());
        data.extend_from_slice(&[0xFF; 8]);
        assert!(matches!(
            unwrap_bamc(&data, &ZlibCompressor::default(), &Limits::default()).unwrap_err(),
            CodecError::Compression { .. }
        ));
    }

    #[test]
    fn bad_version_rejected() {
        let mut data = b"BAMCV9  ".to_vec();
        data.extend_from_slice(&0u32.to_le_bytes());
        assert!(matches!(
            unwrap_bamc(&data, &ZlibCompressor::default(), &Limits::default()).unwrap_err(),
            CodecError::InvalidFormat { .. }
        ));
    }
}
