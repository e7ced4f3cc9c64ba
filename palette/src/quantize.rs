//! Median-cut color reduction.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::ops::Range;

use crate::color::Color;
use crate::error::{QuantizeError, QuantizeResult};

/// Largest palette the quantizer produces.
pub const MAX_COLORS: usize = 256;

/// Reduces `pixels` to exactly `desired` colors by recursive median split.
///
/// Each pixel is treated as an `(R, G, B)` point. With `ignore_alpha` unset,
/// fully transparent pixels are dropped before quantizing. Boxes are split
/// longest axis first; a single-point box that must still be split is
/// duplicated, so the output always holds `desired` entries even when the
/// input has fewer distinct colors. Output colors are opaque averages, in
/// queue order.
pub fn median_cut(pixels: &[Color], desired: usize, ignore_alpha: bool) -> QuantizeResult<Vec<Color>> {
    if !(1..=MAX_COLORS).contains(&desired) {
        return Err(QuantizeError::InvalidColorCount { requested: desired });
    }

    let mut points: Vec<[u8; 3]> = pixels
        .iter()
        .filter(|color| ignore_alpha || !color.is_transparent())
        .map(|color| [color.red(), color.green(), color.blue()])
        .collect();
    if points.is_empty() {
        return Err(QuantizeError::NoPixels);
    }

    let mut queue = BinaryHeap::with_capacity(desired);
    let mut seq = 0u64;
    queue.push(QueuedBox::new(ColorBox::shrink(&points, 0..points.len()), &mut seq));

    while queue.len() < desired {
        let Some(next) = queue.pop() else { break };
        let range = next.color_box.range.clone();
        if range.len() < 2 {
            queue.push(QueuedBox::new(next.color_box.clone(), &mut seq));
            queue.push(QueuedBox::new(next.color_box, &mut seq));
            continue;
        }

        let axis = next.color_box.longest_axis();
        points[range.clone()].sort_by_key(|point| point[axis]);
        let mid = range.start + range.len() / 2;
        queue.push(QueuedBox::new(ColorBox::shrink(&points, range.start..mid), &mut seq));
        queue.push(QueuedBox::new(ColorBox::shrink(&points, mid..range.end), &mut seq));
    }

    Ok(queue
        .into_sorted_vec()
        .iter()
        .rev()
        .map(|queued| queued.color_box.average(&points))
        .collect())
}

/// Axis-aligned bounds of a contiguous run of points.
#[derive(Debug, Clone)]
struct ColorBox {
    range: Range<usize>,
    min: [u8; 3],
    max: [u8; 3],
}

impl ColorBox {
    fn shrink(points: &[[u8; 3]], range: Range<usize>) -> Self {
        let mut min = [u8::MAX; 3];
        let mut max = [u8::MIN; 3];
        for point in &points[range.clone()] {
            for axis in 0..3 {
                min[axis] = min[axis].min(point[axis]);
                max[axis] = max[axis].max(point[axis]);
            }
        }
        Self { range, min, max }
    }

    fn axis_len(&self, axis: usize) -> u8 {
        self.max[axis].saturating_sub(self.min[axis])
    }

    /// Lowest-numbered axis among the longest.
    fn longest_axis(&self) -> usize {
        (0..3).fold(0, |best, axis| {
            if self.axis_len(axis) > self.axis_len(best) {
                axis
            } else {
                best
            }
        })
    }

    fn average(&self, points: &[[u8; 3]]) -> Color {
        let slice = &points[self.range.clone()];
        let count = slice.len().max(1) as u64;
        let mut sum = [0u64; 3];
        for point in slice {
            for axis in 0..3 {
                sum[axis] += u64::from(point[axis]);
            }
        }
        Color::rgb(
            (sum[0] / count) as u8,
            (sum[1] / count) as u8,
            (sum[2] / count) as u8,
        )
    }
}

/// Heap entry: longest axis first, then oldest first.
#[derive(Debug)]
struct QueuedBox {
    priority: u8,
    seq: u64,
    color_box: ColorBox,
}

impl QueuedBox {
    fn new(color_box: ColorBox, seq: &mut u64) -> Self {
        let priority = color_box.axis_len(color_box.longest_axis());
        *seq += 1;
        Self {
            priority,
            seq: *seq,
            color_box,
        }
    }
}

impl PartialEq for QueuedBox {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueuedBox {}

impl PartialOrd for QueuedBox {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueuedBox {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority
            .cmp(&other.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}
