//! Signature dispatch from raw bytes to a decoder.

use std::sync::Arc;

use format::{Limits, Signature};
use palette::TransparencyPolicy;

use crate::container::{unwrap_bamc, BlobCompressor, ZlibCompressor};
use crate::decoder::{Decoder, RenderedFrame};
use crate::error::{CodecResult, FormatReason};
use crate::pages::NoPages;
use crate::types::{Cycle, FrameInfo};
use crate::v1::PaletteRleDecoder;
use crate::v2::{BlockDecoder, SharedTextureSource};

/// Looks up raw resource bytes by logical name.
pub trait ResourceSource {
    fn read(&self, name: &str) -> CodecResult<Vec<u8>>;
}

/// A decoder of either binary variant.
#[derive(Debug)]
pub enum AnyDecoder {
    PaletteRle(PaletteRleDecoder),
    Block(BlockDecoder),
}

impl AnyDecoder {
    /// Returns the V1 decoder, if this is one.
    #[must_use]
    pub const fn as_palette_rle(&self) -> Option<&PaletteRleDecoder> {
        match self {
            Self::PaletteRle(decoder) => Some(decoder),
            Self::Block(_) => None,
        }
    }

    /// Returns the V2 decoder, if this is one.
    #[must_use]
    pub const fn as_block(&self) -> Option<&BlockDecoder> {
        match self {
            Self::Block(decoder) => Some(decoder),
            Self::PaletteRle(_) => None,
        }
    }

    fn inner(&self) -> &dyn Decoder {
        match self {
            Self::PaletteRle(decoder) => decoder,
            Self::Block(decoder) => decoder,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Decoder {
        match self {
            Self::PaletteRle(decoder) => decoder,
            Self::Block(decoder) => decoder,
        }
    }
}

impl Decoder for AnyDecoder {
    fn frame_count(&self) -> usize {
        self.inner().frame_count()
    }

    fn frame_info(&self, index: usize) -> Option<FrameInfo> {
        self.inner().frame_info(index)
    }

    fn cycle_count(&self) -> usize {
        self.inner().cycle_count()
    }

    fn cycle(&self, index: usize) -> Option<&Cycle> {
        self.inner().cycle(index)
    }

    fn render_frame(&self, index: usize) -> Option<RenderedFrame> {
        self.inner().render_frame(index)
    }

    fn close(&mut self) {
        self.inner_mut().close();
    }

    fn is_closed(&self) -> bool {
        self.inner().is_closed()
    }
}

/// Builds decoders from raw bytes.
///
/// `BAMC` containers are unwrapped first; V2 resources render from the
/// configured texture pages (none by default, so every block reports a
/// missing page).
pub struct BamLoader {
    limits: Limits,
    pages: SharedTextureSource,
    compressor: Box<dyn BlobCompressor + Send + Sync>,
    transparency: TransparencyPolicy,
}

impl Default for BamLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl BamLoader {
    #[must_use]
    pub fn new() -> Self {
        Self {
            limits: Limits::default(),
            pages: Arc::new(NoPages),
            compressor: Box::new(ZlibCompressor::default()),
            transparency: TransparencyPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Texture pages for V2 resources.
    #[must_use]
    pub fn with_pages(mut self, pages: SharedTextureSource) -> Self {
        self.pages = pages;
        self
    }

    /// Decompressor for `BAMC` containers.
    #[must_use]
    pub fn with_compressor(mut self, compressor: Box<dyn BlobCompressor + Send + Sync>) -> Self {
        self.compressor = compressor;
        self
    }

    /// Transparency policy handed to V1 decoders.
    #[must_use]
    pub fn with_transparency(mut self, transparency: TransparencyPolicy) -> Self {
        self.transparency = transparency;
        self
    }

    #[must_use]
    pub const fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Sniffs the signature and builds the matching decoder.
    pub fn load(&self, data: Vec<u8>) -> CodecResult<AnyDecoder> {
        match Signature::sniff(&data) {
            Some(Signature::V1) => self.load_v1(data),
            Some(Signature::V2) => Ok(AnyDecoder::Block(BlockDecoder::decode(
                &data,
                &self.limits,
                Arc::clone(&self.pages),
            )?)),
            Some(Signature::Compressed) => {
                let resource = unwrap_bamc(&data, self.compressor.as_ref(), &self.limits)?;
                self.load_v1(resource)
            }
            None => Err(FormatReason::UnknownSignature.into()),
        }
    }

    /// Reads `name` from `source` and loads it.
    pub fn load_resource(&self, source: &dyn ResourceSource, name: &str) -> CodecResult<AnyDecoder> {
        self.load(source.read(name)?)
    }

    fn load_v1(&self, data: Vec<u8>) -> CodecResult<AnyDecoder> {
        let decoder =
            PaletteRleDecoder::decode(data, &self.limits)?.with_transparency(self.transparency);
        Ok(AnyDecoder::PaletteRle(decoder))
    }
}

impl std::fmt::Debug for BamLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BamLoader")
            .field("limits", &self.limits)
            .field("transparency", &self.transparency)
            .finish_non_exhaustive()
    }
}
