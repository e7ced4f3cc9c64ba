//! Editable in-memory sprites.

use crate::bitmap::Bitmap;
use crate::decoder::{Decoder, RenderIssue, RenderedFrame};
use crate::types::{Cycle, FrameInfo};

#[derive(Debug, Clone)]
struct MemoryFrame {
    image: Bitmap,
    center_x: i32,
    center_y: i32,
}

impl MemoryFrame {
    fn info(&self) -> FrameInfo {
        FrameInfo::new(
            self.image.width(),
            self.image.height(),
            self.center_x,
            self.center_y,
        )
    }
}

/// A sprite built from arbitrary ARGB frames with no binary backing.
///
/// Frame dimensions are fixed when a frame is added; centers and cycles can
/// be edited freely. This is the input to [`export`](crate::export).
#[derive(Debug, Clone, Default)]
pub struct MemoryDecoder {
    frames: Vec<MemoryFrame>,
    cycles: Vec<Cycle>,
    closed: bool,
}

impl MemoryDecoder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Captures every frame, center and cycle of `source`.
    ///
    /// Frames are rendered individually; issues from the source renders are
    /// returned alongside. Zero-area source frames stay zero-area.
    pub fn from_decoder<D: Decoder + ?Sized>(source: &D) -> (Self, Vec<RenderIssue>) {
        let mut decoder = Self::new();
        let mut issues = Vec::new();
        for index in 0..source.frame_count() {
            let Some(info) = source.frame_info(index) else {
                continue;
            };
            let image = if info.is_empty() {
                Bitmap::new(info.width, info.height)
            } else {
                match source.render_frame(index) {
                    Some(rendered) => {
                        issues.extend(rendered.issues);
                        rendered.image
                    }
                    None => Bitmap::new(info.width, info.height),
                }
            };
            decoder.add_frame(image, info.center_x, info.center_y);
        }
        for index in 0..source.cycle_count() {
            if let Some(cycle) = source.cycle(index) {
                decoder.cycles.push(cycle.clone());
            }
        }
        (decoder, issues)
    }

    /// Appends a frame and returns its index.
    pub fn add_frame(&mut self, image: Bitmap, center_x: i32, center_y: i32) -> usize {
        self.frames.push(MemoryFrame {
            image,
            center_x,
            center_y,
        });
        self.frames.len() - 1
    }

    /// Overrides the center of frame `index`; returns `false` if out of range.
    pub fn set_center(&mut self, index: usize, center_x: i32, center_y: i32) -> bool {
        let Some(frame) = self.frames.get_mut(index) else {
            return false;
        };
        frame.center_x = center_x;
        frame.center_y = center_y;
        true
    }

    /// The stored image of frame `index`.
    #[must_use]
    pub fn frame_image(&self, index: usize) -> Option<&Bitmap> {
        self.frames.get(index).map(|frame| &frame.image)
    }

    /// Appends a cycle and returns its index.
    pub fn add_cycle(&mut self, cycle: impl Into<Cycle>) -> usize {
        self.cycles.push(cycle.into());
        self.cycles.len() - 1
    }

    /// Mutable access to cycle `index`.
    pub fn cycle_mut(&mut self, index: usize) -> Option<&mut Cycle> {
        self.cycles.get_mut(index)
    }

    /// Removes cycle `index`; returns `false` if out of range.
    pub fn remove_cycle(&mut self, index: usize) -> bool {
        if index >= self.cycles.len() {
            return false;
        }
        self.cycles.remove(index);
        true
    }
}

impl Decoder for MemoryDecoder {
    fn frame_count(&self) -> usize {
        self.frames.len()
    }

    fn frame_info(&self, index: usize) -> Option<FrameInfo> {
        self.frames.get(index).map(MemoryFrame::info)
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
        Some(RenderedFrame::new(frame.image.clone()))
    }

    fn close(&mut self) {
        self.frames = Vec::new();
        self.cycles = Vec::new();
        self.closed = true;
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}
