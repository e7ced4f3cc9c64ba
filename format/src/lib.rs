//! Binary layouts for BAM animated-sprite resources.
//!
//! This crate handles the on-disk structure: signatures, headers, table
//! entries, and limit enforcement for the three container shapes:
//!
//! - `BAM V1  ` palette + optional run-length compression
//! - `BAM V2  ` frames composited from external texture pages
//! - `BAMC` whole-blob compressed wrapper around a V1 resource
//!
//! It does not decode pixels. Frame data and palettes are handed to the codec
//! layer as raw slices.
//!
//! # Design Principles
//!
//! - **Bounded decoding** - Counts and offsets are validated against the buffer and [`Limits`] before iteration.
//! - **Fail fast** - A header that fails validation yields an error, never a partial result.
//! - **No pixel knowledge** - This crate handles layout, not rendering.

mod error;
mod header;
mod limits;
mod tables;

pub use error::{CountField, DecodeError, FormatResult, HeaderField, LimitKind};
pub use header::{
    decode_bamc_header, decode_v1_header, decode_v2_header, encode_bamc_header, encode_v1_header,
    encode_v2_header, BamcHeader, Signature, V1Header, V2Header, BAMC_HEADER_SIZE, BAMC_TAG,
    BAMC_VERSION, MAX_CYCLES_V1, MAX_FRAMES_PER_CYCLE_V1, MAX_FRAMES_V1, PALETTE_BYTES,
    SIGNATURE_V1, SIGNATURE_V2, V1_HEADER_SIZE, V2_HEADER_SIZE,
};
pub use limits::Limits;
pub use tables::{
    decode_cycles, decode_data_blocks, decode_lookup_table, decode_v1_cycles, decode_v1_frames,
    decode_v2_cycles, decode_v2_frames, palette_bytes, CycleEntry, DataBlockEntry, V1FrameEntry,
    V2FrameEntry, CYCLE_ENTRY_SIZE, DATA_BLOCK_ENTRY_SIZE, FRAME_UNCOMPRESSED_BIT,
    V1_FRAME_ENTRY_SIZE, V2_FRAME_ENTRY_SIZE,
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::size_of;

    #[test]
    fn public_api_exports() {
        let _ = SIGNATURE_V1;
        let _ = SIGNATURE_V2;
        let _ = BAMC_TAG;
        let _ = Limits::default();
        let _ = Signature::sniff(b"");
        let _: FormatResult<()> = Ok(());
    }

    #[test]
    fn v1_header_size_constant_correct() {
        assert_eq!(
            V1_HEADER_SIZE,
            8 // signature
                + size_of::<u16>() // frame count
                + size_of::<u8>() // cycle count
                + size_of::<u8>() // rle index
                + size_of::<u32>() // frame table offset
                + size_of::<u32>() // palette offset
                + size_of::<u32>() // lookup table offset
        );
    }

    #[test]
    fn v1_caps() {
        assert_eq!(MAX_FRAMES_V1, 65_535);
        assert_eq!(MAX_CYCLES_V1, 255);
        assert_eq!(MAX_FRAMES_PER_CYCLE_V1, 65_535);
    }
}
