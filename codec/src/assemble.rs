//! V1 binary assembly.
//!
//! Layout, in order: header, frame table, cycle table, palette, frame
//! lookup table, frame data. Every bound is checked before the first byte is
//! written; a failed assembly produces no output.

use std::sync::atomic::AtomicBool;

use bytestream::ByteWriter;
use format::{
    encode_v1_header, CountField, CycleEntry, V1FrameEntry, V1Header, CYCLE_ENTRY_SIZE,
    FRAME_UNCOMPRESSED_BIT, MAX_CYCLES_V1, MAX_FRAMES_PER_CYCLE_V1, MAX_FRAMES_V1, PALETTE_BYTES,
    V1_FRAME_ENTRY_SIZE, V1_HEADER_SIZE,
};
use palette::Palette;

use crate::decoder::Decoder;
use crate::error::{CodecError, CodecResult, Entity, FormatReason, LimitKind};
use crate::export::{check_cancel, export_with_cancel};
use crate::indexed::IndexedSprite;
use crate::options::ExportOptions;
use crate::rle;

/// Assembles `sprite` into a V1 resource.
pub fn assemble(sprite: &IndexedSprite) -> CodecResult<Vec<u8>> {
    assemble_with_cancel(sprite, &AtomicBool::new(false))
}

/// Like [`assemble`], checking `cancel` between frames.
pub fn assemble_with_cancel(sprite: &IndexedSprite, cancel: &AtomicBool) -> CodecResult<Vec<u8>> {
    if sprite.is_closed() {
        return Err(CodecError::Closed);
    }
    let palette = sprite.palette.as_ref().ok_or(CodecError::MissingPalette)?;
    validate(sprite)?;

    let mut data = Vec::with_capacity(sprite.frames.iter().map(|f| f.pixels.len()).sum());
    let mut offsets = Vec::with_capacity(sprite.frames.len());
    for frame in &sprite.frames {
        check_cancel(cancel)?;
        offsets.push(data.len());
        if frame.compressed {
            rle::encode_into(&frame.pixels, sprite.rle_index, &mut data);
        } else {
            data.extend_from_slice(&frame.pixels);
        }
    }

    let lookup_len: usize = sprite.cycles.iter().map(|cycle| cycle.len()).sum();
    let frame_table = V1_HEADER_SIZE;
    let cycle_table = frame_table + sprite.frames.len() * V1_FRAME_ENTRY_SIZE;
    let palette_offset = cycle_table + sprite.cycles.len() * CYCLE_ENTRY_SIZE;
    let lookup_table = palette_offset + PALETTE_BYTES;
    let data_start = lookup_table + lookup_len * 2;

    let max_offset = (FRAME_UNCOMPRESSED_BIT - 1) as usize;
    for (index, offset) in offsets.iter_mut().enumerate() {
        *offset += data_start;
        if *offset > max_offset {
            return Err(limit(LimitKind::DataOffset, Entity::Frame(index), max_offset, *offset));
        }
    }

    let mut writer = ByteWriter::with_capacity(data_start + data.len());
    encode_v1_header(
        &V1Header {
            frame_count: sprite.frames.len() as u16,
            cycle_count: sprite.cycles.len() as u8,
            rle_index: sprite.rle_index,
            frame_table_offset: frame_table as u32,
            palette_offset: palette_offset as u32,
            lookup_table_offset: lookup_table as u32,
        },
        &mut writer,
    );
    for (frame, offset) in sprite.frames.iter().zip(&offsets) {
        V1FrameEntry {
            width: frame.width as u16,
            height: frame.height as u16,
            center_x: frame.center_x as i16,
            center_y: frame.center_y as i16,
            data_offset: *offset as u32,
            compressed: frame.compressed,
        }
        .write(&mut writer);
    }
    let mut start = 0usize;
    for cycle in &sprite.cycles {
        CycleEntry {
            frame_count: cycle.len() as u16,
            start_index: start as u16,
        }
        .write(&mut writer);
        start += cycle.len();
    }
    writer.write_bytes(&palette_bytes(palette));
    for cycle in &sprite.cycles {
        for &frame in cycle.frames() {
            writer.write_u16(frame as u16);
        }
    }
    writer.write_bytes(&data);
    Ok(writer.finish())
}

/// Exports `source` and assembles the result in one step.
pub fn encode_v1<D: Decoder + ?Sized>(source: &D, options: &ExportOptions) -> CodecResult<Vec<u8>> {
    encode_v1_with_cancel(source, options, &AtomicBool::new(false))
}

/// Like [`encode_v1`], checking `cancel` between frames.
pub fn encode_v1_with_cancel<D: Decoder + ?Sized>(
    source: &D,
    options: &ExportOptions,
    cancel: &AtomicBool,
) -> CodecResult<Vec<u8>> {
    let sprite = export_with_cancel(source, options, cancel)?;
    assemble_with_cancel(&sprite, cancel)
}

/// Opaque palettes are written in the legacy alpha-less form.
fn palette_bytes(palette: &Palette) -> [u8; PALETTE_BYTES] {
    if palette.entries().iter().all(|color| color.alpha() == 0xFF) {
        palette.to_legacy_bytes()
    } else {
        palette.to_bytes()
    }
}

fn validate(sprite: &IndexedSprite) -> CodecResult<()> {
    if sprite.frames.is_empty() {
        return Err(FormatReason::Empty {
            field: CountField::Frames,
        }
        .into());
    }
    if sprite.cycles.is_empty() {
        return Err(FormatReason::Empty {
            field: CountField::Cycles,
        }
        .into());
    }
    check(LimitKind::Frames, Entity::Resource, MAX_FRAMES_V1, sprite.frames.len())?;
    check(LimitKind::Cycles, Entity::Resource, MAX_CYCLES_V1, sprite.cycles.len())?;

    let max_start = u16::MAX as usize;
    let mut start = 0usize;
    for (index, cycle) in sprite.cycles.iter().enumerate() {
        let entity = Entity::Cycle(index);
        check(LimitKind::CycleLength, entity, MAX_FRAMES_PER_CYCLE_V1, cycle.len())?;
        if !cycle.is_empty() {
            check(LimitKind::LookupStart, entity, max_start, start)?;
        }
        for &frame in cycle.frames() {
            check(LimitKind::FrameIndex, entity, MAX_FRAMES_V1, frame)?;
        }
        start += cycle.len();
    }

    let (min_center, max_center) = (i64::from(i16::MIN), i64::from(i16::MAX));
    for (index, frame) in sprite.frames.iter().enumerate() {
        let entity = Entity::Frame(index);
        check(LimitKind::Width, entity, u16::MAX as usize, frame.width as usize)?;
        check(LimitKind::Height, entity, u16::MAX as usize, frame.height as usize)?;
        for (kind, value) in [
            (LimitKind::CenterX, i64::from(frame.center_x)),
            (LimitKind::CenterY, i64::from(frame.center_y)),
        ] {
            if value < min_center || value > max_center {
                let bound = if value < min_center { min_center } else { max_center };
                return Err(CodecError::LimitExceeded {
                    kind,
                    entity,
                    limit: bound,
                    actual: value,
                });
            }
        }
        let expected = frame.info().pixel_count();
        if frame.pixels.len() != expected {
            return Err(CodecError::PixelDataMismatch {
                frame: index,
                expected,
                actual: frame.pixels.len(),
            });
        }
    }
    Ok(())
}

fn check(kind: LimitKind, entity: Entity, limit_value: usize, actual: usize) -> CodecResult<()> {
    if actual > limit_value {
        return Err(limit(kind, entity, limit_value, actual));
    }
    Ok(())
}

fn limit(kind: LimitKind, entity: Entity, limit: usize, actual: usize) -> CodecError {
    CodecError::LimitExceeded {
        kind,
        entity,
        limit: limit as i64,
        actual: actual as i64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indexed::IndexedFrame;
    use crate::types::Cycle;
    use crate::v1::PaletteRleDecoder;
    use format::Limits;
    use palette::Color;

    fn frame(width: u32, height: u32, fill: u8) -> IndexedFrame {
        IndexedFrame {
            width,
            height,
            center_x: 0,
            center_y: 0,
            pixels: vec![fill; (width * height) as usize],
            compressed: true,
        }
    }

    fn sprite() -> IndexedSprite {
        let palette = Palette::from_colors(&[Color::GREEN_KEY, Color::rgb(9, 8, 7)]);
        let mut sprite = IndexedSprite::new(palette, 0);
        sprite.frames.push(frame(3, 2, 0));
        sprite.frames.push(frame(2, 2, 1));
        sprite.cycles.push(Cycle::new(vec![1, 0]));
        sprite.cycles.push(Cycle::new(vec![0]));
        sprite
    }

    #[test]
    fn layout_round_trips_through_decoder() {
        let bytes = assemble(&sprite()).unwrap();
        let decoder = PaletteRleDecoder::decode(bytes, &Limits::default()).unwrap();
        assert_eq!(decoder.frame_count(), 2);
        assert_eq!(decoder.cycle(0).unwrap().frames(), &[1, 0]);
        assert_eq!(decoder.cycle(1).unwrap().frames(), &[0]);
        assert_eq!(decoder.frame_indices(0).unwrap(), (vec![0; 6], true));
        assert_eq!(decoder.frame_indices(1).unwrap(), (vec![1; 4], true));
        assert_eq!(decoder.palette().get(1), Color::rgb(9, 8, 7));
    }

    #[test]
    fn uncompressed_frames_set_top_bit() {
        let mut sprite = sprite();
        sprite.frames[1].compressed = false;
        let bytes = assemble(&sprite).unwrap();
        let entry = V1_HEADER_SIZE + V1_FRAME_ENTRY_SIZE + 8;
        let raw = u32::from_le_bytes(bytes[entry..entry + 4].try_into().unwrap());
        assert_ne!(raw & FRAME_UNCOMPRESSED_BIT, 0);
        let decoder = PaletteRleDecoder::decode(bytes, &Limits::default()).unwrap();
        assert_eq!(decoder.frame_is_compressed(1), Some(false));
    }

    #[test]
    fn missing_palette() {
        let mut sprite = sprite();
        sprite.palette = None;
        assert_eq!(assemble(&sprite).unwrap_err(), CodecError::MissingPalette);
    }

    #[test]
    fn pixel_mismatch() {
        let mut sprite = sprite();
        sprite.frames[0].pixels.pop();
        assert_eq!(
            assemble(&sprite).unwrap_err(),
            CodecError::PixelDataMismatch {
                frame: 0,
                expected: 6,
                actual: 5
            }
        );
    }

    #[test]
    fn center_out_of_range() {
        let mut sprite = sprite();
        sprite.frames[1].center_y = -40_000;
        assert_eq!(
            assemble(&sprite).unwrap_err(),
            CodecError::LimitExceeded {
                kind: LimitKind::CenterY,
                entity: Entity::Frame(1),
                limit: -32_768,
                actual: -40_000
            }
        );
    }

    #[test]
    fn too_many_cycles() {
        let mut sprite = sprite();
        sprite.cycles = vec![Cycle::new(vec![0]); 256];
        assert!(matches!(
            assemble(&sprite).unwrap_err(),
            CodecError::LimitExceeded {
                kind: LimitKind::Cycles,
                ..
            }
        ));
    }

    #[test]
    fn wide_frame_rejected() {
        let mut sprite = sprite();
        sprite.frames[0] = frame(65_536, 1, 0);
        assert!(matches!(
            assemble(&sprite).unwrap_err(),
            CodecError::LimitExceeded {
                kind: LimitKind::Width,
                entity: Entity::Frame(0),
                ..
            }
        ));
    }

    #[test]
    fn empty_sprite_rejected() {
        let sprite = IndexedSprite::new(Palette::default(), 0);
        assert!(matches!(
            assemble(&sprite).unwrap_err(),
            CodecError::InvalidFormat {
                reason: FormatReason::Empty { .. }
            }
        ));
    }

    #[test]
    fn alpha_palette_preserved() {
        let mut sprite = sprite();
        let mut palette = sprite.palette.clone().unwrap();
        palette.set(1, Color::from_argb(0x40, 9, 8, 7));
        sprite.palette = Some(palette);
        let decoder = PaletteRleDecoder::decode(assemble(&sprite).unwrap(), &Limits::default())
            .unwrap();
        assert_eq!(decoder.palette().get(1).alpha(), 0x40);
    }

    #[test]
    fn cancelled_before_output() {
        let cancel = AtomicBool::new(true);
        assert_eq!(
            assemble_with_cancel(&sprite(), &cancel).unwrap_err(),
            CodecError::Cancelled
        );
    }
}
