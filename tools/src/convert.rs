//! Re-encoding resources as palette + RLE.

use codec::{
    assemble, encode_v1, AnyDecoder, CodecResult, CompressionPolicy, ExportOptions, IndexedSprite,
};

/// Encodes `decoder` as a `BAM V1  ` resource.
///
/// V1 input keeps its palette, indices and RLE index unless `requantize` is
/// set. On that path only the compression policy applies: `Auto` keeps each
/// frame's stored flag, `Never`/`Always` override it. Everything else goes
/// through the quantizing exporter.
pub fn convert_to_v1(
    decoder: &AnyDecoder,
    options: &ExportOptions,
    requantize: bool,
) -> CodecResult<Vec<u8>> {
    match decoder.as_palette_rle() {
        Some(v1) if !requantize => {
            let mut sprite = IndexedSprite::from_palette_rle(v1);
            let forced = match options.compression {
                CompressionPolicy::Never => Some(false),
                CompressionPolicy::Always => Some(true),
                CompressionPolicy::Auto => None,
            };
            if let Some(compressed) = forced {
                for frame in &mut sprite.frames {
                    frame.compressed = compressed;
                }
            }
            tracing::debug!(frames = sprite.frames.len(), "copying V1 indices");
            assemble(&sprite)
        }
        _ => encode_v1(decoder, options),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codec::{BamLoader, Bitmap, Color, Cycle, IndexedFrame, MemoryDecoder, Palette};

    /// Palette order and RLE index a quantizer would not reproduce.
    fn hand_built() -> Vec<u8> {
        let palette = Palette::from_colors(&[
            Color::rgb(200, 10, 10),
            Color::GREEN_KEY,
            Color::rgb(10, 10, 200),
        ]);
        let mut sprite = IndexedSprite::new(palette, 2);
        sprite.frames.push(IndexedFrame {
            width: 3,
            height: 2,
            center_x: 1,
            center_y: 1,
            pixels: vec![2, 2, 2, 0, 1, 2],
            compressed: true,
        });
        sprite.cycles.push(Cycle::new(vec![0]));
        assemble(&sprite).unwrap()
    }

    #[test]
    fn v1_input_copied_byte_for_byte() {
        let bytes = hand_built();
        let decoder = BamLoader::new().load(bytes.clone()).unwrap();
        let converted = convert_to_v1(&decoder, &ExportOptions::default(), false).unwrap();
        assert_eq!(converted, bytes);
    }

    #[test]
    fn requantize_goes_through_exporter() {
        let bytes = hand_built();
        let decoder = BamLoader::new().load(bytes.clone()).unwrap();
        let options = ExportOptions::default();
        let converted = convert_to_v1(&decoder, &options, true).unwrap();
        assert_eq!(converted, encode_v1(&decoder, &options).unwrap());
        assert_ne!(converted, bytes);
    }

    #[test]
    fn explicit_policy_overrides_stored_flags() {
        let decoder = BamLoader::new().load(hand_built()).unwrap();
        let options = ExportOptions::default().with_compression(CompressionPolicy::Never);
        let converted = convert_to_v1(&decoder, &options, false).unwrap();

        let reloaded = BamLoader::new().load(converted).unwrap();
        let v1 = reloaded.as_palette_rle().unwrap();
        assert_eq!(v1.frame_is_compressed(0), Some(false));
        assert_eq!(v1.rle_index(), 2);
        assert_eq!(
            v1.frame_indices(0).map(|(pixels, _)| pixels),
            Some(vec![2, 2, 2, 0, 1, 2])
        );
    }

    #[test]
    fn memory_source_matches_exporter() {
        let mut source = MemoryDecoder::new();
        let mut image = Bitmap::new(2, 2);
        image.fill(Color::rgb(30, 60, 90));
        source.add_frame(image, 0, 0);
        source.add_cycle(vec![0]);
        let first = encode_v1(&source, &ExportOptions::default()).unwrap();

        let decoder = BamLoader::new().load(first.clone()).unwrap();
        assert_eq!(
            convert_to_v1(&decoder, &ExportOptions::default(), false).unwrap(),
            first
        );
    }
}
