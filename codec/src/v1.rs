//! Palette + run-length decoder (`BAM V1  `).

use format::{
    decode_lookup_table, decode_v1_cycles, decode_v1_frames, decode_v1_header, palette_bytes,
    Limits,
};
use palette::{Color, Palette, TransparencyPolicy, PALETTE_LEN};

use crate::bitmap::Bitmap;
use crate::decoder::{Decoder, RenderIssue, RenderedFrame};
use crate::error::CodecResult;
use crate::rle;
use crate::types::{Cycle, FrameInfo};

#[derive(Debug, Clone, Copy)]
struct V1Frame {
    info: FrameInfo,
    data_offset: usize,
    compressed: bool,
}

/// Decoder for V1 resources.
///
/// Owns the resource bytes; frames are expanded on demand.
#[derive(Debug)]
pub struct PaletteRleDecoder {
    data: Vec<u8>,
    frames: Vec<V1Frame>,
    cycles: Vec<Cycle>,
    palette: Palette,
    rle_index: u8,
    transparency: TransparencyPolicy,
    resolved: [Color; PALETTE_LEN],
    closed: bool,
}

impl PaletteRleDecoder {
    /// Parses a V1 resource.
    ///
    /// Fails with [`CodecError::InvalidFormat`](crate::CodecError::InvalidFormat)
    /// on any header or table problem; no decoder is produced in that case.
    pub fn decode(data: Vec<u8>, limits: &Limits) -> CodecResult<Self> {
        let header = decode_v1_header(&data, limits)?;
        let entries = decode_v1_frames(&data, &header, limits)?;
        let cycle_entries = decode_v1_cycles(&data, &header)?;
        let lookup = decode_lookup_table(&data, &header, &cycle_entries)?;
        let palette = Palette::from_bytes(palette_bytes(&data, &header)?)?;

        let frames = entries
            .iter()
            .map(|entry| V1Frame {
                info: FrameInfo::new(
                    u32::from(entry.width),
                    u32::from(entry.height),
                    i32::from(entry.center_x),
                    i32::from(entry.center_y),
                ),
                data_offset: entry.data_offset as usize,
                compressed: entry.compressed,
            })
            .collect();
        let cycles = cycle_entries
            .iter()
            .map(|entry| {
                let range = entry.start_index as usize..entry.end_index();
                Cycle::new(lookup[range].iter().map(|&i| usize::from(i)).collect())
            })
            .collect();

        let transparency = TransparencyPolicy::default();
        Ok(Self {
            resolved: palette.resolve(transparency),
            data,
            frames,
            cycles,
            palette,
            rle_index: header.rle_index,
            transparency,
            closed: false,
        })
    }

    /// Returns this decoder with a different transparency policy.
    #[must_use]
    pub fn with_transparency(mut self, policy: TransparencyPolicy) -> Self {
        self.set_transparency(policy);
        self
    }

    /// Changes how the transparent palette entry is treated when rendering.
    pub fn set_transparency(&mut self, policy: TransparencyPolicy) {
        self.transparency = policy;
        self.resolved = self.palette.resolve(policy);
    }

    #[must_use]
    pub const fn transparency(&self) -> TransparencyPolicy {
        self.transparency
    }

    /// The palette as stored (after legacy alpha normalization).
    #[must_use]
    pub const fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Palette index eligible for run-length compression.
    #[must_use]
    pub const fn rle_index(&self) -> u8 {
        self.rle_index
    }

    /// Entry rendered transparent under the current policy.
    #[must_use]
    pub fn transparent_index(&self) -> Option<u8> {
        self.transparency
            .enabled
            .then(|| self.palette.transparent_index(self.transparency.rule))
    }

    #[must_use]
    pub fn frame_is_compressed(&self, index: usize) -> Option<bool> {
        self.frames.get(index).map(|frame| frame.compressed)
    }

    /// Expands frame `index` to one palette index per pixel.
    ///
    /// The flag is `false` when the stored data ended early; missing pixels
    /// are left as index 0.
    #[must_use]
    pub fn frame_indices(&self, index: usize) -> Option<(Vec<u8>, bool)> {
        let frame = self.frames.get(index)?;
        let mut indices = vec![0u8; frame.info.pixel_count()];
        let complete = self.expand(frame, &mut indices) == indices.len();
        Some((indices, complete))
    }

    fn expand(&self, frame: &V1Frame, out: &mut [u8]) -> usize {
        let src = self.data.get(frame.data_offset..).unwrap_or_default();
        rle::decode_into(src, self.rle_index, frame.compressed, out)
    }
}

impl Decoder for PaletteRleDecoder {
    fn frame_count(&self) -> usize {
        self.frames.len()
    }

    fn frame_info(&self, index: usize) -> Option<FrameInfo> {
        self.frames.get(index).map(|frame| frame.info)
    }

    fn cycle_count(&self) -> usize {
        self.cycles.len()
    }

    fn cycle(&self, index: usize) -> Option<&Cycle> {
        self.cycles.get(index)
    }

    fn render_frame(&self, index: usize) -> Option<RenderedFrame> {
        let frame = self.frames.get(index)?;
        if frame.info.is_empty() {
            return Some(RenderedFrame::placeholder());
        }

        let mut indices = vec![0u8; frame.info.pixel_count()];
        let written = self.expand(frame, &mut indices);
        let mut pixels: Vec<Color> = indices[..written]
            .iter()
            .map(|&i| self.resolved[usize::from(i)])
            .collect();
        pixels.resize(indices.len(), Color::TRANSPARENT);

        let image = Bitmap::from_pixels(frame.info.width, frame.info.height, pixels)?;
        let mut rendered = RenderedFrame::new(image);
        if written < indices.len() {
            rendered.issues.push(RenderIssue::TruncatedData { frame: index });
        }
        Some(rendered)
    }

    fn close(&mut self) {
        self.data = Vec::new();
        self.frames = Vec::new();
        self.cycles = Vec::new();
        self.closed = true;
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytestream::ByteWriter;
    use format::{
        encode_v1_header, CycleEntry, V1FrameEntry, V1Header, PALETTE_BYTES, V1_FRAME_ENTRY_SIZE,
        V1_HEADER_SIZE,
    };
    use palette::TransparentIndexRule;

    /// One 2×2 compressed frame, one 3×1 uncompressed frame, one cycle `[1, 0]`.
    fn sample() -> Vec<u8> {
        let frame_table = V1_HEADER_SIZE;
        let cycle_table = frame_table + 2 * V1_FRAME_ENTRY_SIZE;
        let palette = cycle_table + 4;
        let lookup = palette + PALETTE_BYTES;
        let data = lookup + 4;

        let mut writer = ByteWriter::new();
        encode_v1_header(
            &V1Header {
                frame_count: 2,
                cycle_count: 1,
                rle_index: 0,
                frame_table_offset: frame_table as u32,
                palette_offset: palette as u32,
                lookup_table_offset: lookup as u32,
            },
            &mut writer,
        );
        V1FrameEntry {
            width: 2,
            height: 2,
            center_x: 1,
            center_y: 1,
            data_offset: data as u32,
            compressed: true,
        }
        .write(&mut writer);
        V1FrameEntry {
            width: 3,
            height: 1,
            center_x: 0,
            center_y: 0,
            data_offset: data as u32 + 3,
            compressed: false,
        }
        .write(&mut writer);
        CycleEntry {
            frame_count: 2,
            start_index: 0,
        }
        .write(&mut writer);

        let mut colors = vec![Color::GREEN_KEY, Color::rgb(255, 0, 0), Color::rgb(0, 0, 255)];
        colors.resize(256, Color::rgb(0, 0, 0));
        writer.write_bytes(&Palette::from_colors(&colors).to_legacy_bytes());
        writer.write_u16(1);
        writer.write_u16(0);
        // frame 0: [0, 0, 0, 1] compressed
        writer.write_bytes(&[0, 2, 1]);
        // frame 1: [2, 0, 1] raw
        writer.write_bytes(&[2, 0, 1]);
        writer.finish()
    }

    #[test]
    fn decodes_tables() {
        let decoder = PaletteRleDecoder::decode(sample(), &Limits::default()).unwrap();
        assert_eq!(decoder.frame_count(), 2);
        assert_eq!(decoder.cycle_count(), 1);
        assert_eq!(decoder.cycle(0).unwrap().frames(), &[1, 0]);
        assert_eq!(decoder.frame_info(0), Some(FrameInfo::new(2, 2, 1, 1)));
        assert_eq!(decoder.frame_is_compressed(0), Some(true));
        assert_eq!(decoder.frame_is_compressed(1), Some(false));
        assert_eq!(decoder.rle_index(), 0);
        assert_eq!(decoder.frame_info(2), None);
    }

    #[test]
    fn legacy_palette_is_opaque_and_green_is_transparent() {
        let decoder = PaletteRleDecoder::decode(sample(), &Limits::default()).unwrap();
        assert_eq!(decoder.palette().get(1).alpha(), 0xFF);
        assert_eq!(decoder.transparent_index(), Some(0));
    }

    #[test]
    fn renders_compressed_frame() {
        let decoder = PaletteRleDecoder::decode(sample(), &Limits::default()).unwrap();
        let frame = decoder.render_frame(0).unwrap();
        let pixels = frame.image.pixels();
        assert!(pixels[..3].iter().all(|c| c.is_transparent()));
        assert_eq!(pixels[3], Color::rgb(255, 0, 0));
        assert!(frame.issues.is_empty());
    }

    #[test]
    fn renders_uncompressed_frame_without_sentinel() {
        let decoder = PaletteRleDecoder::decode(sample(), &Limits::default()).unwrap();
        let (indices, complete) = decoder.frame_indices(1).unwrap();
        assert_eq!(indices, vec![2, 0, 1]);
        assert!(complete);
    }

    #[test]
    fn transparency_can_be_disabled() {
        let decoder = PaletteRleDecoder::decode(sample(), &Limits::default())
            .unwrap()
            .with_transparency(TransparencyPolicy::disabled());
        let frame = decoder.render_frame(0).unwrap();
        assert_eq!(frame.image.pixels()[0], Color::GREEN_KEY);
        assert_eq!(decoder.transparent_index(), None);
    }

    #[test]
    fn first_index_rule() {
        let mut bytes = sample();
        // Move green away from index 0.
        let palette = V1_HEADER_SIZE + 2 * V1_FRAME_ENTRY_SIZE + 4;
        bytes[palette..palette + 4].copy_from_slice(&[9, 9, 9, 0]);
        let decoder = PaletteRleDecoder::decode(bytes, &Limits::default())
            .unwrap()
            .with_transparency(TransparencyPolicy {
                enabled: true,
                rule: TransparentIndexRule::FirstIndex,
            });
        assert_eq!(decoder.transparent_index(), Some(0));
        assert!(decoder.render_frame(0).unwrap().image.pixels()[0].is_transparent());
    }

    #[test]
    fn truncated_data_reported() {
        let mut bytes = sample();
        bytes.truncate(bytes.len() - 2);
        let decoder = PaletteRleDecoder::decode(bytes, &Limits::default()).unwrap();
        let frame = decoder.render_frame(1).unwrap();
        assert_eq!(frame.issues, vec![RenderIssue::TruncatedData { frame: 1 }]);
        assert!(frame.image.pixels()[1].is_transparent());
    }

    #[test]
    fn truncated_indices_flagged_incomplete() {
        let mut bytes = sample();
        bytes.truncate(bytes.len() - 2);
        let decoder = PaletteRleDecoder::decode(bytes, &Limits::default()).unwrap();
        let (indices, complete) = decoder.frame_indices(1).unwrap();
        assert_eq!(indices, vec![2, 0, 0]);
        assert!(!complete);
        assert!(decoder.frame_indices(0).unwrap().1);
    }

    #[test]
    fn invalid_signature_rejected() {
        let mut bytes = sample();
        bytes[4] = b'X';
        assert!(PaletteRleDecoder::decode(bytes, &Limits::default()).is_err());
    }

    #[test]
    fn close_releases_everything() {
        let mut decoder = PaletteRleDecoder::decode(sample(), &Limits::default()).unwrap();
        decoder.close();
        assert!(decoder.is_closed());
        assert_eq!(decoder.frame_count(), 0);
        assert_eq!(decoder.cycle_count(), 0);
        assert!(decoder.render_frame(0).is_none());
    }
}
