use codec::rle;
use proptest::prelude::*;

/// Index streams biased towards long runs of a few values.
fn indices_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec((0u8..4, 1usize..400), 0..12).prop_map(|runs| {
        runs.into_iter()
            .flat_map(|(value, len)| std::iter::repeat(value).take(len))
            .collect()
    })
}

proptest! {
    #[test]
    fn prop_decode_inverts_encode(indices in indices_strategy(), rle_index in 0u8..4) {
        let encoded = rle::encode(&indices, rle_index);
        prop_assert_eq!(rle::decode(&encoded, rle_index), indices);
    }

    #[test]
    fn prop_decode_into_fills_exactly(indices in indices_strategy(), rle_index in 0u8..4) {
        let encoded = rle::encode(&indices, rle_index);
        let mut out = vec![0xEE; indices.len()];
        let written = rle::decode_into(&encoded, rle_index, true, &mut out);
        prop_assert_eq!(written, indices.len());
        prop_assert_eq!(out, indices);
    }

    #[test]
    fn prop_encoding_never_grows_other_values(indices in prop::collection::vec(1u8..=255, 0..300)) {
        prop_assert_eq!(rle::encode(&indices, 0), indices);
    }

    #[test]
    fn prop_short_source_reports_partial(indices in indices_strategy(), cut in 0usize..64) {
        let encoded = rle::encode(&indices, 0);
        let kept = encoded.len().saturating_sub(cut);
        let mut out = vec![0; indices.len()];
        let written = rle::decode_into(&encoded[..kept], 0, true, &mut out);
        prop_assert!(written <= indices.len());
        prop_assert_eq!(&out[..written], &indices[..written]);
    }
}
