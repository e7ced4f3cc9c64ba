//! Palette-indexed sprites ready for V1 assembly.

use palette::{Color, Palette, TransparencyPolicy};

use crate::bitmap::Bitmap;
use crate::decoder::{Decoder, RenderedFrame};
use crate::types::{Cycle, FrameInfo};
use crate::v1::PaletteRleDecoder;

/// One frame of palette indices.
///
/// Fields are public so callers can build frames directly; the assembler
/// validates dimensions and pixel length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedFrame {
    pub width: u32,
    pub height: u32,
    pub center_x: i32,
    pub center_y: i32,
    /// Row-major palette indices, `width * height` long.
    pub pixels: Vec<u8>,
    /// Whether runs of the sprite's RLE index are folded.
    pub compressed: bool,
}

impl IndexedFrame {
    #[must_use]
    pub const fn info(&self) -> FrameInfo {
        FrameInfo::new(self.width, self.height, self.center_x, self.center_y)
    }
}

/// A sprite whose frames share one palette.
#[derive(Debug, Clone, Default)]
pub struct IndexedSprite {
    pub frames: Vec<IndexedFrame>,
    pub cycles: Vec<Cycle>,
    pub palette: Option<Palette>,
    /// Palette index eligible for run-length compression.
    pub rle_index: u8,
    /// Transparency applied when rendering this sprite.
    pub transparency: TransparencyPolicy,
    closed: bool,
}

impl IndexedSprite {
    #[must_use]
    pub fn new(palette: Palette, rle_index: u8) -> Self {
        Self {
            palette: Some(palette),
            rle_index,
            ..Self::default()
        }
    }

    /// Copies a V1 resource without requantizing.
    ///
    /// Indices, palette, RLE index and per-frame compression are preserved.
    #[must_use]
    pub fn from_palette_rle(source: &PaletteRleDecoder) -> Self {
        let mut sprite = Self::new(source.palette().clone(), source.rle_index());
        sprite.transparency = source.transparency();
        for index in 0..source.frame_count() {
            let (Some(info), Some((pixels, _))) =
                (source.frame_info(index), source.frame_indices(index))
            else {
                continue;
            };
            sprite.frames.push(IndexedFrame {
                width: info.width,
                height: info.height,
                center_x: info.center_x,
                center_y: info.center_y,
                pixels,
                compressed: source.frame_is_compressed(index).unwrap_or(false),
            });
        }
        sprite.cycles = (0..source.cycle_count())
            .filter_map(|index| source.cycle(index).cloned())
            .collect();
        sprite
    }
}

impl Decoder for IndexedSprite {
    fn frame_count(&self) -> usize {
        self.frames.len()
    }

    fn frame_info(&self, index: usize) -> Option<FrameInfo> {
        self.frames.get(index).map(IndexedFrame::info)
    }

    fn cycle_count(&self) -> usize {
        self.cycles.len()
    }

    fn cycle(&self, index: usize) -> Option<&Cycle> {
        self.cycles.get(index)
    }

    fn render_frame(&self, index: usize) -> Option<RenderedFrame> {
        let frame = self.frames.get(index)?;
        if frame.info().is_empty() {
            return Some(RenderedFrame::placeholder());
        }
        let colors = self.palette.as_ref()?.resolve(self.transparency);
        let mut pixels: Vec<Color> = frame
            .pixels
            .iter()
            .map(|&i| colors[usize::from(i)])
            .collect();
        pixels.resize(frame.info().pixel_count(), Color::TRANSPARENT);
        Bitmap::from_pixels(frame.width, frame.height, pixels).map(RenderedFrame::new)
    }

    fn close(&mut self) {
        self.frames = Vec::new();
        self.cycles = Vec::new();
        self.palette = None;
        self.closed = true;
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}
