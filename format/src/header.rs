//! Signatures, header layouts and format caps.

use bytestream::{ByteReader, ByteWriter};

use crate::error::{CountField, DecodeError, FormatResult, HeaderField, LimitKind};
use crate::limits::Limits;

/// Signature of the palette + RLE variant.
pub const SIGNATURE_V1: [u8; 8] = *b"BAM V1  ";

/// Signature of the block-composited variant.
pub const SIGNATURE_V2: [u8; 8] = *b"BAM V2  ";

/// Four-character tag of the whole-blob compressed container.
pub const BAMC_TAG: [u8; 4] = *b"BAMC";

/// Version tag of the compressed container.
pub const BAMC_VERSION: [u8; 4] = *b"V1  ";

/// V1 header size in bytes (24 total).
pub const V1_HEADER_SIZE: usize = 8 + 2 + 1 + 1 + 4 + 4 + 4;

/// V2 header size in bytes (32 total).
pub const V2_HEADER_SIZE: usize = 8 + 4 + 4 + 4 + 4 + 4 + 4;

/// Compressed container header size in bytes (12 total).
pub const BAMC_HEADER_SIZE: usize = 4 + 4 + 4;

/// Palette size in bytes: 256 entries stored as B, G, R, A.
pub const PALETTE_BYTES: usize = 256 * 4;

/// Maximum number of frames a V1 resource can address.
pub const MAX_FRAMES_V1: usize = u16::MAX as usize;

/// Maximum number of cycles a V1 resource can address.
pub const MAX_CYCLES_V1: usize = u8::MAX as usize;

/// Maximum number of lookup entries in a single V1 cycle.
pub const MAX_FRAMES_PER_CYCLE_V1: usize = u16::MAX as usize;

/// Resource variant identified by its leading bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signature {
    /// `"BAM V1  "`: palette + optional RLE.
    V1,
    /// `"BAM V2  "`: block-composited from texture pages.
    V2,
    /// `"BAMC"`: whole-blob compressed container around a V1 resource.
    Compressed,
}

impl Signature {
    /// Identifies the variant from the start of a resource.
    ///
    /// Returns `None` when the bytes match no known signature.
    #[must_use]
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(&SIGNATURE_V1) {
            Some(Self::V1)
        } else if bytes.starts_with(&SIGNATURE_V2) {
            Some(Self::V2)
        } else if bytes.starts_with(&BAMC_TAG) {
            Some(Self::Compressed)
        } else {
            None
        }
    }
}

/// V1 header.
///
/// The cycle table is not addressed by the header: it immediately follows the
/// frame table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct V1Header {
    /// Number of frame entries.
    pub frame_count: u16,
    /// Number of cycle entries.
    pub cycle_count: u8,
    /// Palette index eligible for run-length compression.
    pub rle_index: u8,
    /// Offset of the frame table; the cycle table follows it.
    pub frame_table_offset: u32,
    /// Offset of the 1024-byte palette.
    pub palette_offset: u32,
    /// Offset of the frame lookup table.
    pub lookup_table_offset: u32,
}

impl V1Header {
    /// Returns the offset of the cycle table.
    #[must_use]
    pub const fn cycle_table_offset(&self) -> usize {
        self.frame_table_offset as usize + self.frame_count as usize * crate::V1_FRAME_ENTRY_SIZE
    }
}

/// V2 header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct V2Header {
    pub frame_count: u32,
    pub cycle_count: u32,
    pub block_count: u32,
    pub frame_table_offset: u32,
    pub cycle_table_offset: u32,
    pub block_table_offset: u32,
}

/// Compressed container header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BamcHeader {
    /// Version tag following `"BAMC"`.
    pub version: [u8; 4],
    /// Length of the decompressed payload.
    pub uncompressed_len: u32,
}

/// Decodes and validates a V1 header.
pub fn decode_v1_header(buf: &[u8], limits: &Limits) -> FormatResult<V1Header> {
    check_input(buf, V1_HEADER_SIZE, limits)?;
    let mut reader = ByteReader::new(buf);
    let signature = reader.read_array::<8>()?;
    if signature != SIGNATURE_V1 {
        return Err(DecodeError::InvalidSignature { found: signature });
    }

    let header = V1Header {
        frame_count: reader.read_u16()?,
        cycle_count: reader.read_u8()?,
        rle_index: reader.read_u8()?,
        frame_table_offset: reader.read_u32()?,
        palette_offset: reader.read_u32()?,
        lookup_table_offset: reader.read_u32()?,
    };

    check_count(CountField::Frames, u32::from(header.frame_count))?;
    check_count(CountField::Cycles, u32::from(header.cycle_count))?;
    check_limit(LimitKind::Frames, limits.max_frames, header.frame_count as usize)?;
    check_limit(LimitKind::Cycles, limits.max_cycles, header.cycle_count as usize)?;

    let minimum = V1_HEADER_SIZE as u32;
    check_offset(HeaderField::FrameTable, header.frame_table_offset, minimum)?;
    check_offset(HeaderField::Palette, header.palette_offset, minimum)?;
    check_offset(HeaderField::LookupTable, header.lookup_table_offset, minimum)?;

    Ok(header)
}

/// Writes a V1 header (signature included).
pub fn encode_v1_header(header: &V1Header, writer: &mut ByteWriter) {
    writer.write_bytes(&SIGNATURE_V1);
    writer.write_u16(header.frame_count);
    writer.write_u8(header.cycle_count);
    writer.write_u8(header.rle_index);
    writer.write_u32(header.frame_table_offset);
    writer.write_u32(header.palette_offset);
    writer.write_u32(header.lookup_table_offset);
}

/// Decodes and validates a V2 header.
pub fn decode_v2_header(buf: &[u8], limits: &Limits) -> FormatResult<V2Header> {
    check_input(buf, V2_HEADER_SIZE, limits)?;
    let mut reader = ByteReader::new(buf);
    let signature = reader.read_array::<8>()?;
    if signature != SIGNATURE_V2 {
        return Err(DecodeError::InvalidSignature { found: signature });
    }

    let header = V2Header {
        frame_count: reader.read_u32()?,
        cycle_count: reader.read_u32()?,
        block_count: reader.read_u32()?,
        frame_table_offset: reader.read_u32()?,
        cycle_table_offset: reader.read_u32()?,
        block_table_offset: reader.read_u32()?,
    };

    check_count(CountField::Frames, header.frame_count)?;
    check_count(CountField::Cycles, header.cycle_count)?;
    check_count(CountField::Blocks, header.block_count)?;
    check_limit(LimitKind::Frames, limits.max_frames, header.frame_count as usize)?;
    check_limit(LimitKind::Cycles, limits.max_cycles, header.cycle_count as usize)?;
    check_limit(LimitKind::Blocks, limits.max_blocks, header.block_count as usize)?;

    let minimum = V2_HEADER_SIZE as u32;
    check_offset(HeaderField::FrameTable, header.frame_table_offset, minimum)?;
    check_offset(HeaderField::CycleTable, header.cycle_table_offset, minimum)?;
    check_offset(HeaderField::BlockTable, header.block_table_offset, minimum)?;

    Ok(header)
}

/// Writes a V2 header (signature included).
pub fn encode_v2_header(header: &V2Header, writer: &mut ByteWriter) {
    writer.write_bytes(&SIGNATURE_V2);
    writer.write_u32(header.frame_count);
    writer.write_u32(header.cycle_count);
    writer.write_u32(header.block_count);
    writer.write_u32(header.frame_table_offset);
    writer.write_u32(header.cycle_table_offset);
    writer.write_u32(header.block_table_offset);
}

/// Decodes the compressed container header.
///
/// The payload following the header is opaque at this layer.
pub fn decode_bamc_header(buf: &[u8]) -> FormatResult<BamcHeader> {
    if buf.len() < BAMC_HEADER_SIZE {
        return Err(DecodeError::TooSmall {
            actual: buf.len(),
            required: BAMC_HEADER_SIZE,
        });
    }
    let mut reader = ByteReader::new(buf);
    let tag = reader.read_array::<4>()?;
    let version = reader.read_array::<4>()?;
    if tag != BAMC_TAG {
        let mut found = [0u8; 8];
        found[..4].copy_from_slice(&tag);
        found[4..].copy_from_slice(&version);
        return Err(DecodeError::InvalidSignature { found });
    }
    if version != BAMC_VERSION {
        return Err(DecodeError::UnsupportedVersion { found: version });
    }
    Ok(BamcHeader {
        version,
        uncompressed_len: reader.read_u32()?,
    })
}

/// Writes the compressed container header.
pub fn encode_bamc_header(header: &BamcHeader, writer: &mut ByteWriter) {
    writer.write_bytes(&BAMC_TAG);
    writer.write_bytes(&header.version);
    writer.write_u32(header.uncompressed_len);
}

fn check_input(buf: &[u8], required: usize, limits: &Limits) -> FormatResult<()> {
    if buf.len() < required {
        return Err(DecodeError::TooSmall {
            actual: buf.len(),
            required,
        });
    }
    check_limit(LimitKind::InputBytes, limits.max_input_bytes, buf.len())
}

fn check_count(field: CountField, value: u32) -> FormatResult<()> {
    if value == 0 {
        return Err(DecodeError::InvalidCount { field, value });
    }
    Ok(())
}

fn check_offset(field: HeaderField, offset: u32, minimum: u32) -> FormatResult<()> {
    if offset < minimum {
        return Err(DecodeError::OffsetBelowMinimum {
            field,
            offset,
            minimum,
        });
    }
    Ok(())
}

pub(crate) fn check_limit(kind: LimitKind, limit: usize, actual: usize) -> FormatResult<()> {
    if actual > limit {
        return Err(DecodeError::LimitsExceeded {
            kind,
            limit,
            actual,
        });
    }
    Ok(())
}
