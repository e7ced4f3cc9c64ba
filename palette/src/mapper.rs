//! Nearest-color lookup with a per-pass memo.

use std::collections::HashMap;

use crate::color::Color;

/// Maps arbitrary colors to the nearest palette index.
///
/// Results are memoized by exact input color. A mapper is meant to live for a
/// single quantization/export pass and is dropped with it; the memo is never
/// shared across passes.
#[derive(Debug)]
pub struct ColorMapper<'a> {
    palette: &'a [Color],
    reserved: Option<u8>,
    cache: HashMap<u32, u8>,
}

impl<'a> ColorMapper<'a> {
    /// Creates a mapper over up to 256 palette entries.
    #[must_use]
    pub fn new(palette: &'a [Color]) -> Self {
        Self {
            palette: &palette[..palette.len().min(256)],
            reserved: None,
            cache: HashMap::new(),
        }
    }

    /// Excludes `index` from the search (typically the transparent entry).
    #[must_use]
    pub fn with_reserved(mut self, index: u8) -> Self {
        self.reserved = Some(index);
        self.cache.clear();
        self
    }

    /// Returns the index of the entry closest to `color` in RGB space.
    ///
    /// Ties resolve to the lowest index. When no entry is eligible the
    /// reserved index (or 0) is returned.
    pub fn nearest(&mut self, color: Color) -> u8 {
        if let Some(index) = self.cache.get(&color.raw()) {
            return *index;
        }
        let index = self.search(color);
        self.cache.insert(color.raw(), index);
        index
    }

    /// Number of memoized colors.
    #[must_use]
    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    fn search(&self, color: Color) -> u8 {
        let mut best: Option<(u32, u8)> = None;
        for (index, entry) in self.palette.iter().enumerate() {
            let index = index as u8;
            if Some(index) == self.reserved {
                continue;
            }
            let distance = entry.distance_sq(color);
            if best.map_or(true, |(current, _)| distance < current) {
                best = Some((distance, index));
                if distance == 0 {
                    break;
                }
            }
        }
        best.map_or_else(|| self.reserved.unwrap_or(0), |(_, index)| index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Color> {
        vec![
            Color::GREEN_KEY,
            Color::rgb(0, 0, 0),
            Color::rgb(255, 255, 255),
            Color::rgb(200, 0, 0),
        ]
    }

    #[test]
    fn exact_match() {
        let palette = sample();
        let mut mapper = ColorMapper::new(&palette);
        assert_eq!(mapper.nearest(Color::rgb(200, 0, 0)), 3);
    }

    #[test]
    fn nearest_by_distance() {
        let palette = sample();
        let mut mapper = ColorMapper::new(&palette);
        assert_eq!(mapper.nearest(Color::rgb(10, 10, 10)), 1);
        assert_eq!(mapper.nearest(Color::rgb(240, 250, 240)), 2);
        assert_eq!(mapper.nearest(Color::rgb(150, 20, 10)), 3);
    }

    #[test]
    fn reserved_index_skipped() {
        let palette = sample();
        let mut mapper = ColorMapper::new(&palette).with_reserved(0);
        assert_eq!(mapper.nearest(Color::GREEN_KEY), 1);
    }

    #[test]
    fn ties_resolve_to_lowest_index() {
        let palette = [Color::rgb(10, 0, 0), Color::rgb(30, 0, 0)];
        let mut mapper = ColorMapper::new(&palette);
        assert_eq!(mapper.nearest(Color::rgb(20, 0, 0)), 0);
    }

    #[test]
    fn cache_reuses_results() {
        let palette = sample();
        let mut mapper = ColorMapper::new(&palette);
        mapper.nearest(Color::rgb(1, 1, 1));
        mapper.nearest(Color::rgb(1, 1, 1));
        mapper.nearest(Color::rgb(2, 2, 2));
        assert_eq!(mapper.cached(), 2);
    }

    #[test]
    fn only_reserved_entry_falls_back() {
        let palette = [Color::GREEN_KEY];
        let mut mapper = ColorMapper::new(&palette).with_reserved(0);
        assert_eq!(mapper.nearest(Color::rgb(3, 3, 3)), 0);
    }
}
