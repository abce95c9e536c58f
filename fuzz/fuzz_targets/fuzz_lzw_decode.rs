#![no_main]

use libfuzzer_sys::fuzz_target;
use lzwin::{Codec, FullPolicy, LzwCodec, LzwConfig};

fuzz_target!(|data: &[u8]| {
    for on_full in [FullPolicy::Reset, FullPolicy::Freeze] {
        let config = LzwConfig { on_full, ..Default::default() };
        if let Ok(mut codec) = LzwCodec::new(config) {
            let _ = codec.decompress(data, 1 << 20);
        }
    }
});
