//! Palettes and color quantization for BAM resources.
//!
//! This crate owns everything color-related that is independent of the binary
//! layout:
//!
//! - [`Color`], a packed ARGB value
//! - [`Palette`], 256 entries with legacy alpha normalization
//! - [`TransparencyPolicy`], the caller-supplied transparency switch
//! - [`median_cut`], reducing arbitrary colors to a target palette size
//! - [`ColorMapper`], nearest-entry lookup memoized for one export pass

mod color;
mod error;
mod mapper;
mod palette;
mod quantize;

pub use color::Color;
pub use error::{PaletteError, QuantizeError, QuantizeResult};
pub use mapper::ColorMapper;
pub use palette::{Palette, TransparencyPolicy, TransparentIndexRule, PALETTE_BYTES, PALETTE_LEN};
pub use quantize::{median_cut, MAX_COLORS};
