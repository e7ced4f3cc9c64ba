#![no_main]

use codec::rle;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Some((&rle_index, rest)) = data.split_first() else {
        return;
    };
    let decoded = rle::decode(rest, rle_index);
    let reencoded = rle::encode(&decoded, rle_index);
    assert_eq!(rle::decode(&reencoded, rle_index), decoded);

    let mut out = vec![0u8; rest.len().min(4096)];
    let written = rle::decode_into(rest, rle_index, true, &mut out);
    assert!(written <= out.len());
    assert_eq!(&out[..written], &decoded[..written.min(decoded.len())]);
});
