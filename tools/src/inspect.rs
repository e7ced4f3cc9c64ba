//! Structural summaries of BAM resources.

use codec::{
    shared_canvas, AnyDecoder, BamLoader, CodecResult, Cycle, Decoder, FrameInfo, Rect,
};
use format::Signature;
use serde::Serialize;

/// Which binary variant a resource was stored as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    PaletteRle,
    Compressed,
    Block,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrameReport {
    pub index: usize,
    #[serde(flatten)]
    pub info: FrameInfo,
    /// V1 only: whether the pixel data is run-length coded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compressed: Option<bool>,
    /// V2 only: number of data blocks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocks: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InspectReport {
    pub kind: ResourceKind,
    pub size: usize,
    pub frames: Vec<FrameReport>,
    pub cycles: Vec<Cycle>,
    /// Canvas holding every frame of every cycle.
    pub canvas: Rect,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rle_index: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transparent_index: Option<u8>,
}

/// Loads `bytes` with `loader` and summarizes the result.
pub fn inspect(bytes: Vec<u8>, loader: &BamLoader) -> CodecResult<InspectReport> {
    let size = bytes.len();
    let compressed_container = Signature::sniff(&bytes) == Some(Signature::Compressed);
    let decoder = loader.load(bytes)?;
    let kind = match &decoder {
        AnyDecoder::Block(_) => ResourceKind::Block,
        AnyDecoder::PaletteRle(_) if compressed_container => ResourceKind::Compressed,
        AnyDecoder::PaletteRle(_) => ResourceKind::PaletteRle,
    };

    let frames = (0..decoder.frame_count())
        .filter_map(|index| {
            let info = decoder.frame_info(index)?;
            Some(FrameReport {
                index,
                info,
                compressed: decoder
                    .as_palette_rle()
                    .and_then(|v1| v1.frame_is_compressed(index)),
                blocks: decoder
                    .as_block()
                    .and_then(|v2| v2.frame_blocks(index))
                    .map(<[_]>::len),
            })
        })
        .collect();
    let cycles: Vec<Cycle> = (0..decoder.cycle_count())
        .filter_map(|index| decoder.cycle(index).cloned())
        .collect();
    let canvas = shared_canvas(
        &decoder,
        cycles.iter().flat_map(|cycle| cycle.frames().iter().copied()),
        false,
    );
    let v1 = decoder.as_palette_rle();

    Ok(InspectReport {
        kind,
        size,
        frames,
        cycles,
        canvas,
        rle_index: v1.map(|v1| v1.rle_index()),
        transparent_index: v1.and_then(|v1| v1.transparent_index()),
    })
}

/// Multi-line human-readable rendering of a report.
#[must_use]
pub fn format_pretty(report: &InspectReport) -> String {
    let mut out = format!(
        "kind: {:?} ({} bytes)\nframes: {} cycles: {}\n",
        report.kind,
        report.size,
        report.frames.len(),
        report.cycles.len()
    );
    if let Some(rle_index) = report.rle_index {
        out.push_str(&format!("rle index: {rle_index}\n"));
    }
    if let Some(transparent) = report.transparent_index {
        out.push_str(&format!("transparent index: {transparent}\n"));
    }
    let canvas = report.canvas;
    out.push_str(&format!(
        "canvas: {}x{} at ({}, {})\n",
        canvas.width, canvas.height, canvas.x, canvas.y
    ));
    for frame in &report.frames {
        let info = frame.info;
        out.push_str(&format!(
            "  frame {}: {}x{} center ({}, {})",
            frame.index, info.width, info.height, info.center_x, info.center_y
        ));
        if let Some(compressed) = frame.compressed {
            out.push_str(if compressed { " rle" } else { " raw" });
        }
        if let Some(blocks) = frame.blocks {
            out.push_str(&format!(" {blocks} blocks"));
        }
        out.push('\n');
    }
    for (index, cycle) in report.cycles.iter().enumerate() {
        out.push_str(&format!("  cycle {index}: {:?}\n", cycle.frames()));
    }
    out
}
