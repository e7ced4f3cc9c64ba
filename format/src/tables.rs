//! Frame, cycle, lookup and data-block table entries.

use bytestream::{ByteReader, ByteWriter};

use crate::error::{DecodeError, FormatResult, HeaderField, LimitKind};
use crate::header::{check_limit, V1Header, V2Header, PALETTE_BYTES};
use crate::limits::Limits;

/// V1 frame entry size in bytes.
pub const V1_FRAME_ENTRY_SIZE: usize = 2 + 2 + 2 + 2 + 4;

/// Cycle entry size in bytes (both variants).
pub const CYCLE_ENTRY_SIZE: usize = 2 + 2;

/// V2 frame entry size in bytes.
pub const V2_FRAME_ENTRY_SIZE: usize = 2 + 2 + 2 + 2 + 2 + 2;

/// V2 data-block entry size in bytes.
pub const DATA_BLOCK_ENTRY_SIZE: usize = 7 * 4;

/// Bit of a V1 frame data offset marking the frame as *not* run-length compressed.
pub const FRAME_UNCOMPRESSED_BIT: u32 = 0x8000_0000;

/// V1 frame table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct V1FrameEntry {
    pub width: u16,
    pub height: u16,
    pub center_x: i16,
    pub center_y: i16,
    /// Byte offset of the frame's index stream (top bit stripped).
    pub data_offset: u32,
    /// Whether the index stream is run-length compressed.
    pub compressed: bool,
}

impl V1FrameEntry {
    /// Returns the on-disk offset word, top bit set when uncompressed.
    #[must_use]
    pub const fn raw_offset(&self) -> u32 {
        if self.compressed {
            self.data_offset & !FRAME_UNCOMPRESSED_BIT
        } else {
            self.data_offset | FRAME_UNCOMPRESSED_BIT
        }
    }

    fn read(reader: &mut ByteReader<'_>) -> FormatResult<Self> {
        let width = reader.read_u16()?;
        let height = reader.read_u16()?;
        let center_x = reader.read_i16()?;
        let center_y = reader.read_i16()?;
        let raw = reader.read_u32()?;
        Ok(Self {
            width,
            height,
            center_x,
            center_y,
            data_offset: raw & !FRAME_UNCOMPRESSED_BIT,
            compressed: raw & FRAME_UNCOMPRESSED_BIT == 0,
        })
    }

    /// Writes this entry.
    pub fn write(&self, writer: &mut ByteWriter) {
        writer.write_u16(self.width);
        writer.write_u16(self.height);
        writer.write_i16(self.center_x);
        writer.write_i16(self.center_y);
        writer.write_u32(self.raw_offset());
    }
}

/// Cycle table entry.
///
/// In V1 `start_index` points into the frame lookup table; in V2 it is the
/// first of `frame_count` consecutive frame indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleEntry {
    pub frame_count: u16,
    pub start_index: u16,
}

impl CycleEntry {
    fn read(reader: &mut ByteReader<'_>) -> FormatResult<Self> {
        Ok(Self {
            frame_count: reader.read_u16()?,
            start_index: reader.read_u16()?,
        })
    }

    /// Writes this entry.
    pub fn write(&self, writer: &mut ByteWriter) {
        writer.write_u16(self.frame_count);
        writer.write_u16(self.start_index);
    }

    /// One past the last lookup (or frame) index covered by this cycle.
    #[must_use]
    pub const fn end_index(&self) -> usize {
        self.start_index as usize + self.frame_count as usize
    }
}

/// V2 frame table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct V2FrameEntry {
    pub width: u16,
    pub height: u16,
    pub center_x: i16,
    pub center_y: i16,
    pub block_start: u16,
    pub block_count: u16,
}

impl V2FrameEntry {
    fn read(reader: &mut ByteReader<'_>) -> FormatResult<Self> {
        Ok(Self {
            width: reader.read_u16()?,
            height: reader.read_u16()?,
            center_x: reader.read_i16()?,
            center_y: reader.read_i16()?,
            block_start: reader.read_u16()?,
            block_count: reader.read_u16()?,
        })
    }

    /// Writes this entry.
    pub fn write(&self, writer: &mut ByteWriter) {
        writer.write_u16(self.width);
        writer.write_u16(self.height);
        writer.write_i16(self.center_x);
        writer.write_i16(self.center_y);
        writer.write_u16(self.block_start);
        writer.write_u16(self.block_count);
    }
}

/// V2 data-block table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataBlockEntry {
    pub page: u32,
    pub src_x: u32,
    pub src_y: u32,
    pub width: u32,
    pub height: u32,
    pub dst_x: u32,
    pub dst_y: u32,
}

impl DataBlockEntry {
    fn read(reader: &mut ByteReader<'_>) -> FormatResult<Self> {
        Ok(Self {
            page: reader.read_u32()?,
            src_x: reader.read_u32()?,
            src_y: reader.read_u32()?,
            width: reader.read_u32()?,
            height: reader.read_u32()?,
            dst_x: reader.read_u32()?,
            dst_y: reader.read_u32()?,
        })
    }

    /// Writes this entry.
    pub fn write(&self, writer: &mut ByteWriter) {
        for value in [
            self.page,
            self.src_x,
            self.src_y,
            self.width,
            self.height,
            self.dst_x,
            self.dst_y,
        ] {
            writer.write_u32(value);
        }
    }
}

/// Decodes the V1 frame table.
pub fn decode_v1_frames(
    buf: &[u8],
    header: &V1Header,
    limits: &Limits,
) -> FormatResult<Vec<V1FrameEntry>> {
    let offset = header.frame_table_offset as usize;
    let count = header.frame_count as usize;
    let mut reader = table_reader(buf, HeaderField::FrameTable, offset, count, V1_FRAME_ENTRY_SIZE)?;
    let mut frames = Vec::with_capacity(count);
    for _ in 0..count {
        let entry = V1FrameEntry::read(&mut reader)?;
        check_frame_pixels(entry.width, entry.height, limits)?;
        frames.push(entry);
    }
    Ok(frames)
}

/// Decodes the V1 cycle table, which follows the frame table.
pub fn decode_v1_cycles(buf: &[u8], header: &V1Header) -> FormatResult<Vec<CycleEntry>> {
    decode_cycles(
        buf,
        header.cycle_table_offset(),
        header.cycle_count as usize,
    )
}

/// Decodes `count` cycle entries at `offset`.
pub fn decode_cycles(buf: &[u8], offset: usize, count: usize) -> FormatResult<Vec<CycleEntry>> {
    let mut reader = table_reader(buf, HeaderField::CycleTable, offset, count, CYCLE_ENTRY_SIZE)?;
    (0..count).map(|_| CycleEntry::read(&mut reader)).collect()
}

/// Decodes the V1 frame lookup table.
///
/// The table length is implied by the cycles: the largest `start + count`.
pub fn decode_lookup_table(
    buf: &[u8],
    header: &V1Header,
    cycles: &[CycleEntry],
) -> FormatResult<Vec<u16>> {
    let len = cycles.iter().map(CycleEntry::end_index).max().unwrap_or(0);
    let offset = header.lookup_table_offset as usize;
    let mut reader = table_reader(buf, HeaderField::LookupTable, offset, len, 2)?;
    (0..len)
        .map(|_| reader.read_u16().map_err(DecodeError::from))
        .collect()
}

/// Returns the raw 1024-byte palette block.
pub fn palette_bytes<'a>(buf: &'a [u8], header: &V1Header) -> FormatResult<&'a [u8]> {
    let offset = header.palette_offset as usize;
    let mut reader = table_reader(buf, HeaderField::Palette, offset, 1, PALETTE_BYTES)?;
    Ok(reader.read_slice(PALETTE_BYTES)?)
}

/// Decodes the V2 frame table.
pub fn decode_v2_frames(
    buf: &[u8],
    header: &V2Header,
    limits: &Limits,
) -> FormatResult<Vec<V2FrameEntry>> {
    let offset = header.frame_table_offset as usize;
    let count = header.frame_count as usize;
    let mut reader = table_reader(buf, HeaderField::FrameTable, offset, count, V2_FRAME_ENTRY_SIZE)?;
    let mut frames = Vec::with_capacity(count);
    for _ in 0..count {
        let entry = V2FrameEntry::read(&mut reader)?;
        check_frame_pixels(entry.width, entry.height, limits)?;
        frames.push(entry);
    }
    Ok(frames)
}

/// Decodes the V2 cycle table.
pub fn decode_v2_cycles(buf: &[u8], header: &V2Header) -> FormatResult<Vec<CycleEntry>> {
    decode_cycles(
        buf,
        header.cycle_table_offset as usize,
        header.cycle_count as usize,
    )
}

/// Decodes the V2 data-block table.
pub fn decode_data_blocks(buf: &[u8], header: &V2Header) -> FormatResult<Vec<DataBlockEntry>> {
    let offset = header.block_table_offset as usize;
    let count = header.block_count as usize;
    let mut reader = table_reader(buf, HeaderField::BlockTable, offset, count, DATA_BLOCK_ENTRY_SIZE)?;
    (0..count).map(|_| DataBlockEntry::read(&mut reader)).collect()
}

fn table_reader(
    buf: &[u8],
    table: HeaderField,
    offset: usize,
    count: usize,
    entry_size: usize,
) -> FormatResult<ByteReader<'_>> {
    let len = count.saturating_mul(entry_size);
    let fits = offset
        .checked_add(len)
        .is_some_and(|end| end <= buf.len());
    if !fits {
        return Err(DecodeError::TableOutOfBounds {
            table,
            offset,
            len,
            available: buf.len().saturating_sub(offset),
        });
    }
    Ok(ByteReader::at(buf, offset)?)
}

fn check_frame_pixels(width: u16, height: u16, limits: &Limits) -> FormatResult<()> {
    check_limit(
        LimitKind::FramePixels,
        limits.max_frame_pixels,
        width as usize * height as usize,
    )
}
