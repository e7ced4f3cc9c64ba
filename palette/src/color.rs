//! Packed ARGB colors.

use std::fmt;

/// A packed `0xAARRGGBB` color.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct Color(u32);

impl Color {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self(0);

    /// Opaque `RGB(0, 255, 0)`, the legacy transparency key.
    pub const GREEN_KEY: Self = Self(0xFF00_FF00);

    /// Creates a color from a packed `0xAARRGGBB` value.
    #[must_use]
    pub const fn new(argb: u32) -> Self {
        Self(argb)
    }

    /// Creates a color from its components.
    #[must_use]
    pub const fn from_argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self((a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32)
    }

    /// Creates an opaque color.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::from_argb(0xFF, r, g, b)
    }

    /// Returns the packed `0xAARRGGBB` value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[must_use]
    pub const fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    #[must_use]
    pub const fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    #[must_use]
    pub const fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    #[must_use]
    pub const fn blue(self) -> u8 {
        self.0 as u8
    }

    /// Returns the color with its alpha replaced.
    #[must_use]
    pub const fn with_alpha(self, alpha: u8) -> Self {
        Self(self.0 & 0x00FF_FFFF | (alpha as u32) << 24)
    }

    /// Returns `true` if the color has zero alpha.
    #[must_use]
    pub const fn is_transparent(self) -> bool {
        self.alpha() == 0
    }

    /// Returns `true` if the RGB part equals the green transparency key.
    #[must_use]
    pub const fn is_green_key(self) -> bool {
        self.0 & 0x00FF_FFFF == Self::GREEN_KEY.0 & 0x00FF_FFFF
    }

    /// Squared euclidean distance in RGB space; alpha is ignored.
    #[must_use]
    pub const fn distance_sq(self, other: Self) -> u32 {
        let dr = self.red().abs_diff(other.red()) as u32;
        let dg = self.green().abs_diff(other.green()) as u32;
        let db = self.blue().abs_diff(other.blue()) as u32;
        dr * dr + dg * dg + db * db
    }
}

impl From<u32> for Color {
    fn from(argb: u32) -> Self {
        Self(argb)
    }
}

impl From<Color> for u32 {
    fn from(color: Color) -> Self {
        color.0
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Color(0x{:08X})", self.0)
    }
}
