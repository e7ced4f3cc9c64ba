//! Export configuration.

use crate::error::{CodecError, CodecResult, Entity, LimitKind};

/// Per-frame run-length compression choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CompressionPolicy {
    /// Store every frame uncompressed.
    Never,
    /// Compress every frame.
    Always,
    /// Compress a frame only when that makes it strictly smaller.
    #[default]
    Auto,
}

/// Options for turning arbitrary ARGB frames into a palette sprite.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExportOptions {
    /// Run-length compression per frame.
    pub compression: CompressionPolicy,

    /// Pixels with alpha below this map to the transparent entry.
    pub alpha_threshold: u8,

    /// Opaque colors available besides the transparent entry (1..=255).
    pub max_colors: usize,
}

/// Opaque palette slots left once index 0 is reserved for transparency.
pub const MAX_EXPORT_COLORS: usize = 255;

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            compression: CompressionPolicy::Auto,
            alpha_threshold: 0x80,
            max_colors: MAX_EXPORT_COLORS,
        }
    }
}

impl ExportOptions {
    /// Creates options with small palettes, for exercising the quantizer.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            compression: CompressionPolicy::Auto,
            alpha_threshold: 0x80,
            max_colors: 16,
        }
    }

    /// Returns these options with a different compression policy.
    #[must_use]
    pub const fn with_compression(mut self, compression: CompressionPolicy) -> Self {
        self.compression = compression;
        self
    }

    /// Returns these options with a different color budget.
    #[must_use]
    pub const fn with_max_colors(mut self, max_colors: usize) -> Self {
        self.max_colors = max_colors;
        self
    }

    pub(crate) fn validate(&self) -> CodecResult<()> {
        if self.max_colors == 0 || self.max_colors > MAX_EXPORT_COLORS {
            return Err(CodecError::LimitExceeded {
                kind: LimitKind::Colors,
                entity: Entity::Resource,
                limit: MAX_EXPORT_COLORS as i64,
                actual: self.max_colors as i64,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_use_full_palette() {
        let options = ExportOptions::default();
        assert_eq!(options.max_colors, 255);
        assert_eq!(options.compression, CompressionPolicy::Auto);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn testing_options_smaller() {
        assert!(ExportOptions::for_testing().max_colors < ExportOptions::default().max_colors);
    }

    #[test]
    fn color_budget_validated() {
        assert!(ExportOptions::default().with_max_colors(0).validate().is_err());
        assert!(ExportOptions::default().with_max_colors(256).validate().is_err());
        assert!(ExportOptions::default().with_max_colors(1).validate().is_ok());
    }
}
