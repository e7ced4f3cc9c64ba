//! Inspection, PNG export and conversion tools for BAM sprites.
//!
//! This crate backs the `bam-tools` binary and keeps its filesystem and
//! image plumbing testable:
//!
//! - Resolve resources by name from a directory ([`DirectorySource`])
//! - Load V2 texture pages from PNG files ([`PngPages`])
//! - Summarize resource structure as text or JSON ([`inspect`])
//! - Re-encode as V1, copying V1 input losslessly ([`convert_to_v1`])
//!
//! # Design Principles
//!
//! - **First-class tooling** - These tools are part of the product, not afterthoughts.
//! - **Human-readable output** - Make it easy to understand what a resource contains.

mod convert;
mod inspect;
mod source;

pub use convert::convert_to_v1;
pub use inspect::{format_pretty, inspect, FrameReport, InspectReport, ResourceKind};
pub use source::{bitmap_to_rgba, rgba_to_bitmap, DirectorySource, PngPages};
