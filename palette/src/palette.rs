//! 256-entry palettes and the transparency policy applied when rendering.

use crate::color::Color;
use crate::error::PaletteError;

/// Number of palette entries.
pub const PALETTE_LEN: usize = 256;

/// Size of a stored palette in bytes.
pub const PALETTE_BYTES: usize = PALETTE_LEN * 4;

/// Which palette entry counts as transparent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransparentIndexRule {
    /// Entry 0 is always the transparent one.
    FirstIndex,
    /// The first entry whose RGB is `(0, 255, 0)`; entry 0 when none matches.
    #[default]
    GreenMatch,
}

/// Transparency treatment applied on top of the stored palette.
///
/// This is a capability switch supplied by the caller (which target engine is
/// being emulated); the palette data itself is never modified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransparencyPolicy {
    /// When `false` every entry renders with its stored alpha.
    pub enabled: bool,
    /// How the transparent entry is located.
    pub rule: TransparentIndexRule,
}

impl Default for TransparencyPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            rule: TransparentIndexRule::GreenMatch,
        }
    }
}

impl TransparencyPolicy {
    /// A policy that renders every entry as stored.
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            enabled: false,
            rule: TransparentIndexRule::GreenMatch,
        }
    }
}

/// A 256-entry ARGB palette.
#[derive(Clone, PartialEq, Eq)]
pub struct Palette {
    entries: [Color; PALETTE_LEN],
}

impl Palette {
    /// Creates a palette from up to 256 colors; missing entries are opaque black.
    #[must_use]
    pub fn from_colors(colors: &[Color]) -> Self {
        let mut entries = [Color::rgb(0, 0, 0); PALETTE_LEN];
        for (slot, color) in entries.iter_mut().zip(colors) {
            *slot = *color;
        }
        Self { entries }
    }

    /// Loads a palette stored as 256 × `B, G, R, A`.
    ///
    /// Legacy palettes carry no alpha channel: if no entry has a non-zero
    /// alpha byte, every entry is made fully opaque.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PaletteError> {
        if bytes.len() < PALETTE_BYTES {
            return Err(PaletteError::Truncated {
                needed: PALETTE_BYTES,
                available: bytes.len(),
            });
        }
        let mut entries = [Color::TRANSPARENT; PALETTE_LEN];
        for (slot, chunk) in entries.iter_mut().zip(bytes.chunks_exact(4)) {
            *slot = Color::from_argb(chunk[3], chunk[2], chunk[1], chunk[0]);
        }
        if entries.iter().all(|color| color.alpha() == 0) {
            for entry in &mut entries {
                *entry = entry.with_alpha(0xFF);
            }
        }
        Ok(Self { entries })
    }

    /// Serializes as 256 × `B, G, R, A`.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; PALETTE_BYTES] {
        let mut out = [0u8; PALETTE_BYTES];
        for (chunk, color) in out.chunks_exact_mut(4).zip(&self.entries) {
            chunk.copy_from_slice(&[color.blue(), color.green(), color.red(), color.alpha()]);
        }
        out
    }

    /// Serializes in the legacy form with every alpha byte zero.
    #[must_use]
    pub fn to_legacy_bytes(&self) -> [u8; PALETTE_BYTES] {
        let mut out = self.to_bytes();
        for chunk in out.chunks_exact_mut(4) {
            chunk[3] = 0;
        }
        out
    }

    /// Returns the stored entries.
    #[must_use]
    pub const fn entries(&self) -> &[Color; PALETTE_LEN] {
        &self.entries
    }

    /// Returns the stored color at `index`.
    #[must_use]
    pub const fn get(&self, index: u8) -> Color {
        self.entries[index as usize]
    }

    /// Replaces the color at `index`.
    pub fn set(&mut self, index: u8, color: Color) {
        self.entries[index as usize] = color;
    }

    /// Locates the transparent entry under `rule`.
    #[must_use]
    pub fn transparent_index(&self, rule: TransparentIndexRule) -> u8 {
        match rule {
            TransparentIndexRule::FirstIndex => 0,
            TransparentIndexRule::GreenMatch => self
                .entries
                .iter()
                .position(|color| color.is_green_key())
                .map_or(0, |index| index as u8),
        }
    }

    /// Returns the entries as they render under `policy`.
    #[must_use]
    pub fn resolve(&self, policy: TransparencyPolicy) -> [Color; PALETTE_LEN] {
        let mut resolved = self.entries;
        if policy.enabled {
            let index = self.transparent_index(policy.rule) as usize;
            resolved[index] = resolved[index].with_alpha(0);
        }
        resolved
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::from_colors(&[])
    }
}

impl std::fmt::Debug for Palette {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Palette")
            .field("first", &self.entries[0])
            .field("len", &PALETTE_LEN)
            .finish()
    }
}
