//! Run-length coding of V1 index streams.
//!
//! Only runs of one designated index are compressed. A run of `n + 1` pixels
//! of that index is stored as the pair `(index, n)`; every other byte stands
//! for itself.

/// Longest run a single pair can hold.
pub const MAX_RUN: usize = 256;

/// Compresses `indices`, folding runs of `rle_index`.
#[must_use]
pub fn encode(indices: &[u8], rle_index: u8) -> Vec<u8> {
    let mut out = Vec::with_capacity(indices.len());
    encode_into(indices, rle_index, &mut out);
    out
}

/// Appends the compressed form of `indices` to `out`.
pub fn encode_into(indices: &[u8], rle_index: u8, out: &mut Vec<u8>) {
    let mut pos = 0;
    while pos < indices.len() {
        let value = indices[pos];
        if value != rle_index {
            out.push(value);
            pos += 1;
            continue;
        }
        let run = indices[pos..]
            .iter()
            .take(MAX_RUN)
            .take_while(|&&b| b == rle_index)
            .count();
        out.push(rle_index);
        out.push((run - 1) as u8);
        pos += run;
    }
}

/// Expands a complete compressed stream.
#[must_use]
pub fn decode(src: &[u8], rle_index: u8) -> Vec<u8> {
    let mut out = Vec::with_capacity(src.len());
    let mut iter = src.iter().copied();
    while let Some(value) = iter.next() {
        out.push(value);
        if value == rle_index {
            let extra = iter.next().unwrap_or(0);
            out.extend(std::iter::repeat(value).take(usize::from(extra)));
        }
    }
    out
}

/// Expands `src` into `out` until `out` is full.
///
/// With `compressed` unset every source byte is one pixel. Returns the number
/// of pixels written; less than `out.len()` means the source ran short.
pub fn decode_into(src: &[u8], rle_index: u8, compressed: bool, out: &mut [u8]) -> usize {
    if !compressed {
        let len = src.len().min(out.len());
        out[..len].copy_from_slice(&src[..len]);
        return len;
    }

    let mut written = 0;
    let mut run_remaining = 0usize;
    let mut last = 0u8;
    let mut source = src.iter().copied();
    while written < out.len() {
        if run_remaining > 0 {
            run_remaining -= 1;
        } else {
            let Some(value) = source.next() else { break };
            last = value;
            if value == rle_index {
                run_remaining = source.next().map_or(0, usize::from);
            }
        }
        out[written] = last;
        written += 1;
    }
    written
}
