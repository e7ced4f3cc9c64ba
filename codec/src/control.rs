//! Render cursor over a decoder's cycles, with shared-canvas layout.

use format::Limits;

use crate::bitmap::Bitmap;
use crate::decoder::{Decoder, RenderIssue, RenderedFrame};
use crate::types::{FrameInfo, Rect};

/// How frames are positioned when rendered through a [`Controller`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RenderMode {
    /// Each frame at its own size, top-left at the origin.
    #[default]
    Individual,
    /// Every frame on one canvas, aligned by center point.
    Shared,
}

/// Computes the canvas that holds `frames` aligned at a common origin.
///
/// Unknown frame indices are skipped. With no frames the result is
/// [`Rect::EMPTY`]. The result does not depend on iteration order.
pub fn shared_canvas<D, I>(decoder: &D, frames: I, mirrored: bool) -> Rect
where
    D: Decoder + ?Sized,
    I: IntoIterator<Item = usize>,
{
    let mut bounds: Option<(i64, i64, i64, i64)> = None;
    for info in frames.into_iter().filter_map(|index| decoder.frame_info(index)) {
        let cx = info.effective_center_x(mirrored);
        let cy = i64::from(info.center_y);
        let left = -cx;
        let top = -cy;
        let right = i64::from(info.width) - cx;
        let bottom = i64::from(info.height) - cy;
        bounds = Some(match bounds {
            None => (left, top, right, bottom),
            Some((x1, y1, x2, y2)) => (x1.min(left), y1.min(top), x2.max(right), y2.max(bottom)),
        });
    }
    bounds.map_or(Rect::EMPTY, |(x1, y1, x2, y2)| {
        Rect::new(
            saturate(x1),
            saturate(y1),
            saturate(x2 - x1 + 1),
            saturate(y2 - y1 + 1),
        )
    })
}

/// Top-left position of a frame on `canvas`.
///
/// `mirrored` must match the value used to build `canvas`.
#[must_use]
pub const fn frame_placement(info: &FrameInfo, canvas: Rect, mirrored: bool) -> (i32, i32) {
    (
        saturate(-(canvas.x as i64) - info.effective_center_x(mirrored)),
        saturate(-(canvas.y as i64) - info.center_y as i64),
    )
}

const fn saturate(value: i64) -> i32 {
    if value < i32::MIN as i64 {
        i32::MIN
    } else if value > i32::MAX as i64 {
        i32::MAX
    } else {
        value as i32
    }
}

/// A stateful cursor over one decoder.
///
/// Holds the current cycle and frame position plus render settings. The
/// shared canvas is recomputed whenever a setting that feeds it changes.
/// Any number of controllers may borrow the same decoder; a controller
/// never modifies it.
#[derive(Debug)]
pub struct Controller<'a, D: ?Sized> {
    decoder: &'a D,
    cycle: usize,
    frame: usize,
    mode: RenderMode,
    shared_per_cycle: bool,
    mirrored: bool,
    shared_rect: Rect,
    max_canvas_pixels: usize,
}

impl<'a, D: Decoder + ?Sized> Controller<'a, D> {
    /// Creates a controller positioned on cycle 0, frame 0.
    pub fn new(decoder: &'a D) -> Self {
        let mut controller = Self {
            decoder,
            cycle: 0,
            frame: 0,
            mode: RenderMode::Individual,
            shared_per_cycle: false,
            mirrored: false,
            shared_rect: Rect::EMPTY,
            max_canvas_pixels: Limits::default().max_frame_pixels,
        };
        controller.update_shared_rect();
        controller
    }

    #[must_use]
    pub const fn decoder(&self) -> &'a D {
        self.decoder
    }

    #[must_use]
    pub const fn mode(&self) -> RenderMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: RenderMode) {
        if self.mode != mode {
            self.mode = mode;
            self.update_shared_rect();
        }
    }

    #[must_use]
    pub const fn shared_per_cycle(&self) -> bool {
        self.shared_per_cycle
    }

    /// Restricts the shared canvas to the current cycle's frames.
    pub fn set_shared_per_cycle(&mut self, per_cycle: bool) {
        if self.shared_per_cycle != per_cycle {
            self.shared_per_cycle = per_cycle;
            self.update_shared_rect();
        }
    }

    #[must_use]
    pub const fn mirrored(&self) -> bool {
        self.mirrored
    }

    /// Renders frames flipped horizontally around their center.
    pub fn set_mirrored(&mut self, mirrored: bool) {
        if self.mirrored != mirrored {
            self.mirrored = mirrored;
            self.update_shared_rect();
        }
    }

    /// Largest shared canvas, in pixels, that rendering will allocate.
    ///
    /// Defaults to the decode-side frame bound of [`Limits::default`].
    #[must_use]
    pub const fn max_canvas_pixels(&self) -> usize {
        self.max_canvas_pixels
    }

    pub fn set_max_canvas_pixels(&mut self, max_pixels: usize) {
        self.max_canvas_pixels = max_pixels;
    }

    /// The canvas used in [`RenderMode::Shared`].
    #[must_use]
    pub const fn shared_rect(&self) -> Rect {
        self.shared_rect
    }

    /// Computes the shared canvas for the current frame selection.
    #[must_use]
    pub fn calculate_shared_canvas(&self, mirrored: bool) -> Rect {
        if self.shared_per_cycle {
            self.decoder.cycle(self.cycle).map_or(Rect::EMPTY, |cycle| {
                shared_canvas(self.decoder, cycle.frames().iter().copied(), mirrored)
            })
        } else {
            shared_canvas(self.decoder, 0..self.decoder.frame_count(), mirrored)
        }
    }

    #[must_use]
    pub fn cycle_count(&self) -> usize {
        self.decoder.cycle_count()
    }

    /// Index of the current cycle.
    #[must_use]
    pub const fn current_cycle(&self) -> usize {
        self.cycle
    }

    /// Selects cycle `index` and rewinds to its first frame.
    pub fn cycle_set(&mut self, index: usize) -> bool {
        if index >= self.decoder.cycle_count() {
            return false;
        }
        if self.cycle != index {
            self.cycle = index;
            if self.shared_per_cycle {
                self.update_shared_rect();
            }
        }
        self.frame = 0;
        true
    }

    /// Number of entries in the current cycle.
    #[must_use]
    pub fn cycle_frame_count(&self) -> usize {
        self.decoder.cycle(self.cycle).map_or(0, |cycle| cycle.len())
    }

    /// Position within the current cycle.
    #[must_use]
    pub const fn cycle_get_frame_index(&self) -> usize {
        self.frame
    }

    /// Moves to position `index` within the current cycle.
    pub fn cycle_set_frame_index(&mut self, index: usize) -> bool {
        if index >= self.cycle_frame_count() {
            return false;
        }
        self.frame = index;
        true
    }

    /// Absolute frame index at the current position.
    #[must_use]
    pub fn cycle_get_frame_index_absolute(&self) -> Option<usize> {
        self.cycle_frame_index_absolute_at(self.frame)
    }

    /// Absolute frame index at `position` within the current cycle.
    #[must_use]
    pub fn cycle_frame_index_absolute_at(&self, position: usize) -> Option<usize> {
        self.decoder.cycle(self.cycle)?.get(position)
    }

    #[must_use]
    pub fn cycle_has_next_frame(&self) -> bool {
        self.frame + 1 < self.cycle_frame_count()
    }

    /// Advances one position; returns `false` at the end of the cycle.
    pub fn cycle_next_frame(&mut self) -> bool {
        if self.cycle_has_next_frame() {
            self.frame += 1;
            true
        } else {
            false
        }
    }

    /// Rewinds to the first position of the current cycle.
    pub fn cycle_reset(&mut self) {
        self.frame = 0;
    }

    /// Renders the current frame honoring the render mode.
    #[must_use]
    pub fn cycle_get_frame(&self) -> RenderedFrame {
        self.render(self.cycle_get_frame_index_absolute())
    }

    /// Renders position `position` of the current cycle.
    #[must_use]
    pub fn cycle_get_frame_at(&self, position: usize) -> RenderedFrame {
        self.render(self.cycle_frame_index_absolute_at(position))
    }

    /// Renders the current frame into `canvas`, clipped to its size.
    ///
    /// The canvas is cleared first; unresolved frames leave it empty.
    pub fn cycle_get_frame_into(&self, canvas: &mut Bitmap) -> Vec<RenderIssue> {
        canvas.clear();
        let Some((rendered, left, top)) = self.layer(self.cycle_get_frame_index_absolute()) else {
            return Vec::new();
        };
        canvas.blit(&rendered.image, i64::from(left), i64::from(top));
        rendered.issues
    }

    /// Renders absolute frame `index` honoring the render mode.
    #[must_use]
    pub fn render_frame(&self, index: usize) -> RenderedFrame {
        self.render(Some(index))
    }

    fn render(&self, index: Option<usize>) -> RenderedFrame {
        match self.mode {
            RenderMode::Individual => self
                .layer(index)
                .map_or_else(RenderedFrame::placeholder, |(rendered, _, _)| rendered),
            RenderMode::Shared => {
                let rect = self.shared_rect;
                if rect.is_empty() {
                    return RenderedFrame::placeholder();
                }
                let area =
                    u64::from(rect.width.unsigned_abs()) * u64::from(rect.height.unsigned_abs());
                if area > self.max_canvas_pixels as u64 {
                    let mut placeholder = RenderedFrame::placeholder();
                    placeholder.issues.push(RenderIssue::CanvasTooLarge {
                        width: rect.width,
                        height: rect.height,
                        limit: self.max_canvas_pixels,
                    });
                    return placeholder;
                }
                let mut canvas = Bitmap::new(rect.width as u32, rect.height as u32);
                let issues = match self.layer(index) {
                    Some((rendered, left, top)) => {
                        canvas.blit(&rendered.image, i64::from(left), i64::from(top));
                        rendered.issues
                    }
                    None => Vec::new(),
                };
                RenderedFrame {
                    image: canvas,
                    issues,
                }
            }
        }
    }

    /// The frame image and its position for the current mode.
    fn layer(&self, index: Option<usize>) -> Option<(RenderedFrame, i32, i32)> {
        let index = index?;
        let info = self.decoder.frame_info(index)?;
        let mut rendered = self.decoder.render_frame(index)?;
        if self.mirrored {
            rendered.image = rendered.image.flipped_horizontal();
        }
        let (left, top) = match self.mode {
            RenderMode::Individual => (0, 0),
            RenderMode::Shared => frame_placement(&info, self.shared_rect, self.mirrored),
        };
        Some((rendered, left, top))
    }

    fn update_shared_rect(&mut self) {
        self.shared_rect = self.calculate_shared_canvas(self.mirrored);
    }
}
