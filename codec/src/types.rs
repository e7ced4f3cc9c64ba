//! Core geometric and structural types.

/// A rectangle on a render canvas. `x`/`y` may be negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    /// The all-zero rectangle.
    pub const EMPTY: Self = Self::new(0, 0, 0, 0);

    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Returns `true` if the rectangle covers no pixels.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

/// Frame metadata shared by every decoder variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameInfo {
    pub width: u32,
    pub height: u32,
    pub center_x: i32,
    pub center_y: i32,
}

impl FrameInfo {
    #[must_use]
    pub const fn new(width: u32, height: u32, center_x: i32, center_y: i32) -> Self {
        Self {
            width,
            height,
            center_x,
            center_y,
        }
    }

    /// Returns `true` if the frame has no pixels.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Number of pixels in the frame.
    #[must_use]
    pub const fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Horizontal center, taking mirroring into account.
    ///
    /// Widened to `i64` so extreme centers cannot overflow.
    #[must_use]
    pub const fn effective_center_x(&self, mirrored: bool) -> i64 {
        if mirrored {
            self.width as i64 - self.center_x as i64 - 1
        } else {
            self.center_x as i64
        }
    }
}

/// An ordered list of absolute frame indices.
///
/// Duplicates are allowed and order is significant. Indices are not checked
/// against the owning decoder; unresolved entries render as empty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cycle {
    frames: Vec<usize>,
}

impl Cycle {
    #[must_use]
    pub const fn new(frames: Vec<usize>) -> Self {
        Self { frames }
    }

    #[must_use]
    pub fn frames(&self) -> &[usize] {
        &self.frames
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Absolute frame index at `position`.
    #[must_use]
    pub fn get(&self, position: usize) -> Option<usize> {
        self.frames.get(position).copied()
    }

    /// Appends a frame index.
    pub fn push(&mut self, frame: usize) {
        self.frames.push(frame);
    }
}

impl From<Vec<usize>> for Cycle {
    fn from(frames: Vec<usize>) -> Self {
        Self::new(frames)
    }
}

/// A source rectangle within a texture page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PageRect {
    #[must_use]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// A V2 frame fragment: a page rectangle copied to `(dst_x, dst_y)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DataBlock {
    pub page: u32,
    pub source: PageRect,
    pub dst_x: u32,
    pub dst_y: u32,
}

impl From<format::DataBlockEntry> for DataBlock {
    fn from(entry: format::DataBlockEntry) -> Self {
        Self {
            page: entry.page,
            source: PageRect::new(entry.src_x, entry.src_y, entry.width, entry.height),
            dst_x: entry.dst_x,
            dst_y: entry.dst_y,
        }
    }
}
