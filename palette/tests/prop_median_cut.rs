use palette::{median_cut, Color, ColorMapper};
use proptest::prelude::*;

fn color_strategy() -> impl Strategy<Value = Color> {
    any::<u32>().prop_map(|raw| Color::new(raw).with_alpha(0xFF))
}

proptest! {
    #[test]
    fn prop_returns_exactly_k_colors(
        pixels in prop::collection::vec(color_strategy(), 1..200),
        k in 1usize..=256,
    ) {
        let colors = median_cut(&pixels, k, false).unwrap();
        prop_assert_eq!(colors.len(), k);
        prop_assert!(colors.iter().all(|color| color.alpha() == 0xFF));
    }

    #[test]
    fn prop_output_within_input_bounds(pixels in prop::collection::vec(color_strategy(), 1..64), k in 1usize..16) {
        let colors = median_cut(&pixels, k, false).unwrap();
        let min_r = pixels.iter().map(|c| c.red()).min().unwrap();
        let max_r = pixels.iter().map(|c| c.red()).max().unwrap();
        for color in colors {
            prop_assert!(color.red() >= min_r && color.red() <= max_r);
        }
    }

    #[test]
    fn prop_mapper_is_stable(pixels in prop::collection::vec(color_strategy(), 1..64)) {
        let colors = median_cut(&pixels, 8, false).unwrap();
        let mut cached = ColorMapper::new(&colors);
        for pixel in &pixels {
            let first = cached.nearest(*pixel);
            let mut fresh = ColorMapper::new(&colors);
            prop_assert_eq!(first, fresh.nearest(*pixel));
            prop_assert_eq!(first, cached.nearest(*pixel));
        }
    }
}
