//! The decoder capability shared by every sprite variant.

use crate::bitmap::Bitmap;
use crate::types::{Cycle, FrameInfo};

/// A problem encountered while rendering that did not abort the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderIssue {
    /// A texture page could not be resolved; the block was skipped.
    PageMissing { frame: usize, block: usize, page: u32 },
    /// Pixel data ended early; the remaining pixels are transparent.
    TruncatedData { frame: usize },
    /// The shared canvas exceeds the controller's pixel bound and was not allocated.
    CanvasTooLarge { width: i32, height: i32, limit: usize },
}

impl std::fmt::Display for RenderIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PageMissing { frame, block, page } => {
                write!(f, "frame {frame} block {block}: page {page} missing")
            }
            Self::TruncatedData { frame } => write!(f, "frame {frame}: pixel data truncated"),
            Self::CanvasTooLarge {
                width,
                height,
                limit,
            } => write!(f, "shared canvas {width}x{height} exceeds {limit} pixels"),
        }
    }
}

/// A decoded frame image plus any non-fatal issues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFrame {
    pub image: Bitmap,
    pub issues: Vec<RenderIssue>,
}

impl RenderedFrame {
    #[must_use]
    pub const fn new(image: Bitmap) -> Self {
        Self {
            image,
            issues: Vec::new(),
        }
    }

    /// The 1×1 transparent stand-in for empty or unresolved frames.
    #[must_use]
    pub fn placeholder() -> Self {
        Self::new(Bitmap::placeholder())
    }
}

/// Read access to one sprite resource: frames, cycles and rendering.
///
/// Frame images come back in the frame's own coordinate space; positioning
/// on a shared canvas is the [`Controller`](crate::Controller)'s job.
/// Every index-taking method returns `None` rather than failing.
pub trait Decoder {
    /// Number of frames; zero once closed.
    fn frame_count(&self) -> usize;

    /// Metadata for frame `index`.
    fn frame_info(&self, index: usize) -> Option<FrameInfo>;

    /// Number of cycles; zero once closed.
    fn cycle_count(&self) -> usize;

    /// Cycle `index`.
    fn cycle(&self, index: usize) -> Option<&Cycle>;

    /// Renders frame `index` at its own size.
    ///
    /// Zero-area frames render as a 1×1 transparent placeholder.
    fn render_frame(&self, index: usize) -> Option<RenderedFrame>;

    /// Releases backing buffers and caches. Idempotent.
    fn close(&mut self);

    /// Returns `true` after [`close`](Self::close).
    fn is_closed(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_is_single_transparent_pixel() {
        let frame = RenderedFrame::placeholder();
        assert_eq!((frame.image.width(), frame.image.height()), (1, 1));
        assert!(frame.image.pixels()[0].is_transparent());
        assert!(frame.issues.is_empty());
    }

    #[test]
    fn issue_display() {
        let issue = RenderIssue::PageMissing {
            frame: 2,
            block: 1,
            page: 40,
        };
        assert!(issue.to_string().contains("page 40"));
    }
}
