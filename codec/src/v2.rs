//! Block-composited decoder (`BAM V2  `).

use std::sync::Arc;

use format::{decode_data_blocks, decode_v2_cycles, decode_v2_frames, decode_v2_header, Limits};

use crate::bitmap::Bitmap;
use crate::decoder::{Decoder, RenderIssue, RenderedFrame};
use crate::error::{CodecResult, FormatReason};
use crate::pages::TextureSource;
use crate::types::{Cycle, DataBlock, FrameInfo};

/// Shared handle to a texture-page service.
pub type SharedTextureSource = Arc<dyn TextureSource + Send + Sync>;

#[derive(Debug, Clone)]
struct V2Frame {
    info: FrameInfo,
    blocks: std::ops::Range<usize>,
}

/// Decoder for V2 resources.
///
/// Frames are assembled from rectangles of external texture pages. The
/// decoder keeps only the parsed tables, not the resource bytes.
pub struct BlockDecoder {
    frames: Vec<V2Frame>,
    blocks: Vec<DataBlock>,
    cycles: Vec<Cycle>,
    pages: SharedTextureSource,
    closed: bool,
}

impl BlockDecoder {
    /// Parses a V2 resource that will render from `pages`.
    pub fn decode(data: &[u8], limits: &Limits, pages: SharedTextureSource) -> CodecResult<Self> {
        let header = decode_v2_header(data, limits)?;
        let entries = decode_v2_frames(data, &header, limits)?;
        let cycle_entries = decode_v2_cycles(data, &header)?;
        let blocks: Vec<DataBlock> = decode_data_blocks(data, &header)?
            .into_iter()
            .map(DataBlock::from)
            .collect();

        let mut frames = Vec::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            let start = usize::from(entry.block_start);
            let end = start + usize::from(entry.block_count);
            if end > blocks.len() {
                return Err(FormatReason::BlockRangeOutOfBounds { frame: index }.into());
            }
            frames.push(V2Frame {
                info: FrameInfo::new(
                    u32::from(entry.width),
                    u32::from(entry.height),
                    i32::from(entry.center_x),
                    i32::from(entry.center_y),
                ),
                blocks: start..end,
            });
        }

        let cycles = cycle_entries
            .iter()
            .map(|entry| Cycle::new((entry.start_index as usize..entry.end_index()).collect()))
            .collect();

        Ok(Self {
            frames,
            blocks,
            cycles,
            pages,
            closed: false,
        })
    }

    /// Data blocks composing frame `index`, in render order.
    #[must_use]
    pub fn frame_blocks(&self, index: usize) -> Option<&[DataBlock]> {
        let frame = self.frames.get(index)?;
        self.blocks.get(frame.blocks.clone())
    }

    /// Total number of data blocks.
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }
}

impl Decoder for BlockDecoder {
    fn frame_count(&self) -> usize {
        self.frames.len()
    }

    fn frame_info(&self, index: usize) -> Option<FrameInfo> {
        self.frames.get(index).map(|frame| frame.info)
    }

    fn cycle_count(&self) -> usize {
        self.cycles.len()
    }

    fn cycle(&self, index: usize) -> Option<&Cycle> {
        self.cycles.get(index)
    }

    fn render_frame(&self, index: usize) -> Option<RenderedFrame> {
        let frame = self.frames.get(index)?;
        if frame.info.is_empty() {
            return Some(RenderedFrame::placeholder());
        }

        let mut rendered = RenderedFrame::new(Bitmap::new(frame.info.width, frame.info.height));
        for block_index in frame.blocks.clone() {
            let block = &self.blocks[block_index];
            match self.pages.read_block(block.page, block.source) {
                Ok(pixels) => rendered.image.blit(
                    &pixels,
                    i64::from(block.dst_x),
                    i64::from(block.dst_y),
                ),
                Err(_) => rendered.issues.push(RenderIssue::PageMissing {
                    frame: index,
                    block: block_index,
                    page: block.page,
                }),
            }
        }
        Some(rendered)
    }

    fn close(&mut self) {
        self.frames = Vec::new();
        self.blocks = Vec::new();
        self.cycles = Vec::new();
        self.closed = true;
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

impl std::fmt::Debug for BlockDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockDecoder")
            .field("frames", &self.frames.len())
            .field("blocks", &self.blocks.len())
            .field("cycles", &self.cycles.len())
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}
