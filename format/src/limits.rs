//! Configurable limits for bounded decoding.

use crate::header::{MAX_CYCLES_V1, MAX_FRAMES_V1};

/// Decode-side limits.
///
/// These limits are enforced while parsing headers and tables so a malformed
/// or hostile resource cannot request unbounded allocations. The hard caps of
/// the V1 layout itself live in [`crate::header`] and apply to encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    /// Maximum resource size in bytes (after container decompression).
    pub max_input_bytes: usize,

    /// Maximum number of frames.
    pub max_frames: usize,

    /// Maximum number of cycles.
    pub max_cycles: usize,

    /// Maximum number of V2 data blocks.
    pub max_blocks: usize,

    /// Maximum `width * height` of a single frame.
    pub max_frame_pixels: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_input_bytes: 256 * 1024 * 1024,

            // V1 caps; V2 counts are 32-bit but nothing in practice exceeds these
            max_frames: MAX_FRAMES_V1,
            max_cycles: MAX_FRAMES_V1,
            max_blocks: 1 << 20,

            max_frame_pixels: 16 * 1024 * 1024,
        }
    }
}

impl Limits {
    /// Creates limits suitable for testing with smaller values.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            max_input_bytes: 64 * 1024,
            max_frames: 64,
            max_cycles: MAX_CYCLES_V1,
            max_blocks: 256,
            max_frame_pixels: 256 * 256,
        }
    }

    /// Creates limits with no restrictions (use with caution).
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_input_bytes: usize::MAX,
            max_frames: usize::MAX,
            max_cycles: usize::MAX,
            max_blocks: usize::MAX,
            max_frame_pixels: usize::MAX,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_limits_cover_v1_caps() {
        let limits = Limits::default();
        assert_eq!(limits.max_frames, 65_535);
        assert!(limits.max_cycles >= MAX_CYCLES_V1);
    }

    #[test]
    fn testing_limits_smaller() {
        let test_limits = Limits::for_testing();
        let default_limits = Limits::default();

        assert!(test_limits.max_input_bytes < default_limits.max_input_bytes);
        assert!(test_limits.max_frames < default_limits.max_frames);
        assert!(test_limits.max_blocks < default_limits.max_blocks);
        assert!(test_limits.max_frame_pixels < default_limits.max_frame_pixels);
    }

    #[test]
    fn unlimited_limits() {
        let limits = Limits::unlimited();
        assert_eq!(limits.max_input_bytes, usize::MAX);
        assert_eq!(limits.max_frames, usize::MAX);
        assert_eq!(limits.max_frame_pixels, usize::MAX);
    }

    #[test]
    fn limits_const_constructible() {
        const LIMITS: Limits = Limits::for_testing();
        assert_eq!(LIMITS.max_frames, 64);
    }
}
