//! Reduces arbitrary ARGB frames to one shared palette.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};

use palette::{median_cut, Color, ColorMapper, Palette};

use crate::decoder::Decoder;
use crate::error::{CodecError, CodecResult};
use crate::indexed::{IndexedFrame, IndexedSprite};
use crate::options::{CompressionPolicy, ExportOptions};
use crate::rle;

/// Palette slot holding the transparent key color; also the RLE index.
pub const TRANSPARENT_INDEX: u8 = 0;

/// Converts every frame of `source` into a palette sprite.
///
/// Index 0 is reserved for the `RGB(0, 255, 0)` transparency key and used as
/// the RLE index. Pixels with alpha below the threshold map to it. When the
/// opaque colors fit the budget they are used exactly; otherwise they are
/// reduced by median cut.
pub fn export<D: Decoder + ?Sized>(source: &D, options: &ExportOptions) -> CodecResult<IndexedSprite> {
    export_with_cancel(source, options, &AtomicBool::new(false))
}

/// Like [`export`], checking `cancel` between frames.
pub fn export_with_cancel<D: Decoder + ?Sized>(
    source: &D,
    options: &ExportOptions,
    cancel: &AtomicBool,
) -> CodecResult<IndexedSprite> {
    if source.is_closed() {
        return Err(CodecError::Closed);
    }
    options.validate()?;

    let mut images = Vec::with_capacity(source.frame_count());
    for index in 0..source.frame_count() {
        check_cancel(cancel)?;
        let Some(info) = source.frame_info(index) else {
            continue;
        };
        let pixels = if info.is_empty() {
            Vec::new()
        } else {
            source
                .render_frame(index)
                .map(|rendered| rendered.image.into_pixels())
                .unwrap_or_default()
        };
        images.push((info, pixels));
    }

    let opaque: Vec<Color> = images
        .iter()
        .flat_map(|(_, pixels)| pixels.iter())
        .filter(|color| color.alpha() >= options.alpha_threshold.max(1))
        .map(|color| color.with_alpha(0xFF))
        .collect();
    let colors = palette_colors(&opaque, options.max_colors)?;

    let mut entries = Vec::with_capacity(colors.len() + 1);
    entries.push(Color::GREEN_KEY);
    entries.extend(colors);
    let mut mapper = ColorMapper::new(&entries).with_reserved(TRANSPARENT_INDEX);

    let mut sprite = IndexedSprite::new(Palette::from_colors(&entries), TRANSPARENT_INDEX);
    for (info, pixels) in images {
        check_cancel(cancel)?;
        let mut indices: Vec<u8> = pixels
            .iter()
            .map(|color| {
                if color.alpha() < options.alpha_threshold.max(1) {
                    TRANSPARENT_INDEX
                } else {
                    mapper.nearest(color.with_alpha(0xFF))
                }
            })
            .collect();
        indices.resize(info.pixel_count(), TRANSPARENT_INDEX);
        let compressed = match options.compression {
            CompressionPolicy::Never => false,
            CompressionPolicy::Always => true,
            CompressionPolicy::Auto => rle::encode(&indices, TRANSPARENT_INDEX).len() < indices.len(),
        };
        sprite.frames.push(IndexedFrame {
            width: info.width,
            height: info.height,
            center_x: info.center_x,
            center_y: info.center_y,
            pixels: indices,
            compressed,
        });
    }
    sprite.cycles = (0..source.cycle_count())
        .filter_map(|index| source.cycle(index).cloned())
        .collect();
    Ok(sprite)
}

fn palette_colors(opaque: &[Color], budget: usize) -> CodecResult<Vec<Color>> {
    if opaque.is_empty() {
        return Ok(Vec::new());
    }
    let distinct: BTreeSet<u32> = opaque.iter().map(|color| color.raw()).collect();
    if distinct.len() <= budget {
        return Ok(distinct.into_iter().map(Color::new).collect());
    }
    Ok(median_cut(opaque, budget, false)?)
}

pub(crate) fn check_cancel(cancel: &AtomicBool) -> CodecResult<()> {
    if cancel.load(Ordering::Relaxed) {
        return Err(CodecError::Cancelled);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitmap::Bitmap;
    use crate::memory::MemoryDecoder;

    fn two_color_frame() -> Bitmap {
        let mut bitmap = Bitmap::new(4, 1);
        bitmap.set(1, 0, Color::rgb(200, 10, 10));
        bitmap.set(2, 0, Color::rgb(200, 10, 10));
        bitmap.set(3, 0, Color::rgb(10, 10, 200));
        bitmap
    }

    #[test]
    fn exact_palette_when_within_budget() {
        let mut source = MemoryDecoder::new();
        source.add_frame(two_color_frame(), 1, 2);
        source.add_cycle(vec![0]);
        let sprite = export(&source, &ExportOptions::default()).unwrap();

        let palette = sprite.palette.as_ref().unwrap();
        assert_eq!(palette.get(0), Color::GREEN_KEY);
        let frame = &sprite.frames[0];
        assert_eq!(frame.pixels[0], TRANSPARENT_INDEX);
        assert_eq!(palette.get(frame.pixels[1]), Color::rgb(200, 10, 10));
        assert_eq!(palette.get(frame.pixels[3]), Color::rgb(10, 10, 200));
        assert_eq!((frame.center_x, frame.center_y), (1, 2));
        assert_eq!(sprite.rle_index, TRANSPARENT_INDEX);
        assert_eq!(sprite.cycles.len(), 1);
    }

    #[test]
    fn quantizes_when_over_budget() {
        let mut image = Bitmap::new(32, 1);
        for x in 0..32 {
            image.set(x, 0, Color::rgb((x * 8) as u8, 0, 0));
        }
        let mut source = MemoryDecoder::new();
        source.add_frame(image, 0, 0);
        let sprite = export(&source, &ExportOptions::for_testing()).unwrap();
        let frame = &sprite.frames[0];
        assert!(frame.pixels.iter().all(|&i| (1..=16).contains(&i)));
    }

    #[test]
    fn compression_policy_applied() {
        let mut source = MemoryDecoder::new();
        source.add_frame(Bitmap::new(8, 8), 0, 0);
        source.add_frame(two_color_frame(), 0, 0);

        let auto = export(&source, &ExportOptions::default()).unwrap();
        assert!(auto.frames[0].compressed);
        assert!(!auto.frames[1].compressed);

        let never = ExportOptions::default().with_compression(CompressionPolicy::Never);
        assert!(!export(&source, &never).unwrap().frames[0].compressed);

        let always = ExportOptions::default().with_compression(CompressionPolicy::Always);
        assert!(export(&source, &always).unwrap().frames[1].compressed);
    }

    #[test]
    fn zero_area_frame_kept() {
        let mut source = MemoryDecoder::new();
        source.add_frame(Bitmap::new(0, 3), 4, 4);
        let sprite = export(&source, &ExportOptions::default()).unwrap();
        assert_eq!(sprite.frames[0].width, 0);
        assert!(sprite.frames[0].pixels.is_empty());
    }

    #[test]
    fn cancel_flag_stops_export() {
        let mut source = MemoryDecoder::new();
        source.add_frame(two_color_frame(), 0, 0);
        let cancel = AtomicBool::new(true);
        assert_eq!(
            export_with_cancel(&source, &ExportOptions::default(), &cancel).unwrap_err(),
            CodecError::Cancelled
        );
    }

    #[test]
    fn closed_source_rejected() {
        let mut source = MemoryDecoder::new();
        source.close();
        assert_eq!(
            export(&source, &ExportOptions::default()).unwrap_err(),
            CodecError::Closed
        );
    }
}
