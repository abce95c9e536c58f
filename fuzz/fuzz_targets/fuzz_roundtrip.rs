#![no_main]

use libfuzzer_sys::fuzz_target;
use lzwin::{CodecParams, NO_OUTPUT_LIMIT};

fuzz_target!(|data: &[u8]| {
    if data.len() < 3 {
        return;
    }

    // First bytes pick the parameters, the rest is the input
    let window = 1 + (u16::from_le_bytes([data[0], data[1]]) as usize);
    let min_match = 1 + (data[2] % 6) as usize;
    let Ok(params) = CodecParams::new(window, min_match, min_match + (data[2] as usize)) else {
        return;
    };
    let input = &data[3..];

    let packed = lzwin::compress(input, &params).expect("compress");
    let restored = lzwin::decompress(&packed, &params, NO_OUTPUT_LIMIT).expect("decompress");
    assert_eq!(restored, input);
});
