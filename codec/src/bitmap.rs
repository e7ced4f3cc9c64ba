//! ARGB pixel buffers.

use palette::Color;

use crate::types::PageRect;

/// A row-major ARGB image.
#[derive(Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl Bitmap {
    /// Creates a fully transparent bitmap.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::TRANSPARENT; width as usize * height as usize],
        }
    }

    /// The 1×1 transparent image standing in for zero-area frames.
    #[must_use]
    pub fn placeholder() -> Self {
        Self::new(1, 1)
    }

    /// Wraps existing pixels. Returns `None` if the length does not match.
    #[must_use]
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Color>) -> Option<Self> {
        (pixels.len() == width as usize * height as usize).then_some(Self {
            width,
            height,
            pixels,
        })
    }

    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [Color] {
        &mut self.pixels
    }

    #[must_use]
    pub fn into_pixels(self) -> Vec<Color> {
        self.pixels
    }

    /// Returns the pixel at `(x, y)`, or `None` outside the image.
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(self.index(x, y)).copied()
    }

    /// Sets the pixel at `(x, y)`; returns `false` outside the image.
    pub fn set(&mut self, x: u32, y: u32, color: Color) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let index = self.index(x, y);
        self.pixels[index] = color;
        true
    }

    /// Fills the whole image with `color`.
    pub fn fill(&mut self, color: Color) {
        self.pixels.fill(color);
    }

    /// Resets every pixel to transparent.
    pub fn clear(&mut self) {
        self.fill(Color::TRANSPARENT);
    }

    /// Copies `src` onto this image with its top-left at `(left, top)`.
    ///
    /// Pixels overwrite (no blending). Parts falling outside this image are
    /// clipped.
    pub fn blit(&mut self, src: &Self, left: i64, top: i64) {
        let x0 = left.max(0);
        let y0 = top.max(0);
        let x1 = (left + i64::from(src.width)).min(i64::from(self.width));
        let y1 = (top + i64::from(src.height)).min(i64::from(self.height));
        if x0 >= x1 || y0 >= y1 {
            return;
        }
        let span = (x1 - x0) as usize;
        for y in y0..y1 {
            let src_start = ((y - top) as usize) * src.width as usize + (x0 - left) as usize;
            let dst_start = (y as usize) * self.width as usize + x0 as usize;
            self.pixels[dst_start..dst_start + span]
                .copy_from_slice(&src.pixels[src_start..src_start + span]);
        }
    }

    /// Copies out `rect`. Parts outside this image come back transparent.
    #[must_use]
    pub fn crop(&self, rect: PageRect) -> Self {
        let mut out = Self::new(rect.width, rect.height);
        out.blit(self, -i64::from(rect.x), -i64::from(rect.y));
        out
    }

    /// Returns a horizontally flipped copy.
    #[must_use]
    pub fn flipped_horizontal(&self) -> Self {
        let mut pixels = self.pixels.clone();
        if self.width > 0 {
            for row in pixels.chunks_exact_mut(self.width as usize) {
                row.reverse();
            }
        }
        Self {
            width: self.width,
            height: self.height,
            pixels,
        }
    }

    const fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

impl std::fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bitmap")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = Color::rgb(255, 0, 0);
    const BLUE: Color = Color::rgb(0, 0, 255);

    fn solid(width: u32, height: u32, color: Color) -> Bitmap {
        let mut bitmap = Bitmap::new(width, height);
        bitmap.fill(color);
        bitmap
    }

    #[test]
    fn new_is_transparent() {
        let bitmap = Bitmap::new(3, 2);
        assert_eq!(bitmap.pixels().len(), 6);
        assert!(bitmap.pixels().iter().all(|c| c.is_transparent()));
    }

    #[test]
    fn from_pixels_checks_length() {
        assert!(Bitmap::from_pixels(2, 2, vec![RED; 4]).is_some());
        assert!(Bitmap::from_pixels(2, 2, vec![RED; 3]).is_none());
    }

    #[test]
    fn get_set_bounds() {
        let mut bitmap = Bitmap::new(2, 2);
        assert!(bitmap.set(1, 1, RED));
        assert!(!bitmap.set(2, 0, RED));
        assert_eq!(bitmap.get(1, 1), Some(RED));
        assert_eq!(bitmap.get(0, 2), None);
    }

    #[test]
    fn blit_overwrites_and_clips() {
        let mut canvas = solid(4, 4, BLUE);
        let src = Bitmap::new(3, 3);
        canvas.blit(&src, 2, 2);
        assert_eq!(canvas.get(1, 1), Some(BLUE));
        assert_eq!(canvas.get(2, 2), Some(Color::TRANSPARENT));
        assert_eq!(canvas.get(3, 3), Some(Color::TRANSPARENT));
    }

    #[test]
    fn blit_negative_origin() {
        let mut canvas = Bitmap::new(2, 2);
        let mut src = Bitmap::new(3, 3);
        src.set(2, 2, RED);
        canvas.blit(&src, -1, -1);
        assert_eq!(canvas.get(1, 1), Some(RED));
        assert_eq!(canvas.get(0, 0), Some(Color::TRANSPARENT));
    }

    #[test]
    fn blit_fully_outside_is_noop() {
        let mut canvas = solid(2, 2, BLUE);
        canvas.blit(&solid(2, 2, RED), 5, 0);
        canvas.blit(&solid(2, 2, RED), -2, 0);
        assert!(canvas.pixels().iter().all(|c| *c == BLUE));
    }

    #[test]
    fn crop_clips_to_transparent() {
        let page = solid(4, 4, RED);
        let cropped = page.crop(PageRect::new(3, 3, 2, 2));
        assert_eq!(cropped.get(0, 0), Some(RED));
        assert_eq!(cropped.get(1, 1), Some(Color::TRANSPARENT));
    }

    #[test]
    fn flip_reverses_rows() {
        let mut bitmap = Bitmap::new(3, 1);
        bitmap.set(0, 0, RED);
        let flipped = bitmap.flipped_horizontal();
        assert_eq!(flipped.get(2, 0), Some(RED));
        assert_eq!(flipped.get(0, 0), Some(Color::TRANSPARENT));
    }
}
