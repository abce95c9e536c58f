#![no_main]

use libfuzzer_sys::fuzz_target;
use lzwin::{CodecParams, StreamDecoder};

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must fail cleanly, never panic or run away
    for params in [CodecParams::default(), CodecParams::lzss(), CodecParams::lz4()] {
        let _ = lzwin::decompress(data, &params, 1 << 20);

        if let Ok(mut decoder) = StreamDecoder::new(params) {
            decoder = decoder.with_output_limit(1 << 20);
            let _ = decoder.decode_stream(data, std::io::sink());
        }
    }
});
