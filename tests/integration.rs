//! End-to-end integration tests for lzwin.
//!
//! Exercises the public API and the CLI with synthetic data.

use std::fs;
use std::path::Path;
use std::process::Command;

use lzwin::wire::{TokenReader, TokenWriter};
use lzwin::{
    Codec, CodecParams, CompressionLevel, Corruption, Decoder, EncodeOptions, EndOfStream, Error,
    FullPolicy, LzCodec, LzwCodec, LzwConfig, StreamDecoder, StreamEncoder, Strategy, Token,
    TokenStream, WireFormat, NO_OUTPUT_LIMIT,
};

// ============================================================================
// Test Data Generators
// ============================================================================

/// Generate random data using a simple PRNG
fn generate_random_data(size: usize, seed: u64) -> Vec<u8> {
    let mut data = Vec::with_capacity(size);
    let mut state = seed;
    for _ in 0..size {
        // Simple xorshift PRNG
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        data.push((state & 0xFF) as u8);
    }
    data
}

/// Generate highly repetitive data (good compression)
fn generate_repetitive_data(size: usize) -> Vec<u8> {
    let pattern = b"ABCDABCDABCDABCE";
    pattern.iter().cycle().take(size).copied().collect()
}

/// Generate data with mixed patterns (moderate compression)
fn generate_mixed_data(size: usize, seed: u64) -> Vec<u8> {
    let words: [&[u8]; 6] =
        [b"window ", b"match ", b"literal ", b"distance ", b"length ", b"token\n"];
    let noise = generate_random_data(size, seed);
    let mut data = Vec::with_capacity(size);
    let mut i = 0;
    while data.len() < size {
        if noise[i % noise.len()] < 40 {
            data.push(noise[(i * 7) % noise.len()]);
        } else {
            data.extend_from_slice(words[noise[i % noise.len()] as usize % words.len()]);
        }
        i += 1;
    }
    data.truncate(size);
    data
}

/// Parameter sets covering narrow, classic and wide layouts
fn param_grid() -> Vec<CodecParams> {
    vec![
        CodecParams::default(),
        CodecParams::lzss(),
        CodecParams::lz4(),
        CodecParams::new(1, 1, 1).unwrap(),
        CodecParams::new(16, 2, 5).unwrap(),
        CodecParams::new(300, 4, 300).unwrap(),
    ]
}

/// Reference greedy parser: scans every distance directly
fn reference_parse(input: &[u8], params: &CodecParams) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut literals = Vec::new();
    let mut pos = 0;
    while pos < input.len() {
        let max_len = params.max_match.min(input.len() - pos);
        let mut best = (0usize, 0usize);
        for distance in 1..=params.window_size.min(pos) {
            let start = pos - distance;
            let length = (0..max_len).take_while(|&i| input[start + i] == input[pos + i]).count();
            if length > best.1 {
                best = (distance, length);
            }
        }
        if best.1 >= params.min_match {
            if !literals.is_empty() {
                tokens.push(Token::Literal(std::mem::take(&mut literals)));
            }
            tokens.push(Token::Match { distance: best.0, length: best.1 });
            pos += best.1;
        } else {
            literals.push(input[pos]);
            pos += 1;
        }
    }
    if !literals.is_empty() {
        tokens.push(Token::Literal(literals));
    }
    tokens
}

fn assert_token_bounds(stream: &TokenStream, params: &CodecParams) {
    let mut position = 0usize;
    for token in stream.iter() {
        if let Token::Match { distance, length } = *token {
            let reach = params.window_size.min(position);
            assert!(distance >= 1 && distance <= reach, "distance {} at {}", distance, position);
            assert!(length >= params.min_match && length <= params.max_match, "length {}", length);
        }
        position += token.uncompressed_size();
    }
}

// ============================================================================
// Round-trip and token-model properties
// ============================================================================

#[test]
fn test_roundtrip_all_params() {
    let inputs = [
        Vec::new(),
        b"a".to_vec(),
        generate_random_data(3000, 7),
        generate_repetitive_data(5000),
        generate_mixed_data(8000, 99),
    ];
    for params in param_grid() {
        for input in &inputs {
            let stream = lzwin::encode(input, &params).unwrap();
            let decoded = lzwin::decode(&stream, &params, NO_OUTPUT_LIMIT).unwrap();
            assert_eq!(&decoded, input, "{}", params);

            let packed = lzwin::compress(input, &params).unwrap();
            let restored = lzwin::decompress(&packed, &params, NO_OUTPUT_LIMIT).unwrap();
            assert_eq!(&restored, input, "{}", params);
        }
    }
}

#[test]
fn test_decode_twice_same_result() {
    let params = CodecParams::default();
    let stream = lzwin::encode(&generate_mixed_data(4000, 3), &params).unwrap();
    let first = lzwin::decode(&stream, &params, NO_OUTPUT_LIMIT).unwrap();
    let second = lzwin::decode(&stream, &params, NO_OUTPUT_LIMIT).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_distance_and_length_bounds() {
    for params in param_grid() {
        for input in [generate_repetitive_data(4000), generate_mixed_data(6000, 5)] {
            let stream = lzwin::encode(&input, &params).unwrap();
            assert_token_bounds(&stream, &params);
        }
    }
}

#[test]
fn test_matches_reference_greedy_parser() {
    let cases = [
        (CodecParams::new(64, 3, 18).unwrap(), generate_mixed_data(2000, 11)),
        (CodecParams::new(16, 2, 5).unwrap(), generate_mixed_data(1500, 12)),
        (CodecParams::new(512, 4, 40).unwrap(), generate_repetitive_data(1200)),
        (CodecParams::new(256, 3, 258).unwrap(), generate_random_data(1000, 13)),
        (CodecParams::new(1, 1, 3).unwrap(), b"aaaabbbbabab".to_vec()),
    ];
    for (params, input) in cases {
        let stream = lzwin::encode(&input, &params).unwrap();
        assert_eq!(stream.tokens(), reference_parse(&input, &params).as_slice(), "{}", params);
    }
}

#[test]
fn test_overlap_example() {
    let params = CodecParams::new(32768, 3, 258).unwrap();
    let stream = lzwin::encode(b"ababababab", &params).unwrap();
    assert_eq!(
        stream.tokens(),
        &[Token::Literal(b"ab".to_vec()), Token::Match { distance: 2, length: 8 }]
    );
    assert_eq!(lzwin::decode(&stream, &params, NO_OUTPUT_LIMIT).unwrap(), b"ababababab");
}

#[test]
fn test_zero_distance_is_corrupt() {
    let params = CodecParams::default();
    let stream = TokenStream::from_tokens(
        params,
        vec![Token::Literal(b"xyz".to_vec()), Token::Match { distance: 0, length: 3 }],
    );
    assert!(matches!(
        lzwin::decode(&stream, &params, NO_OUTPUT_LIMIT),
        Err(Error::CorruptStream(Corruption::ZeroDistance))
    ));
}

#[test]
fn test_empty_input() {
    let params = CodecParams::default();
    let stream = lzwin::encode(b"", &params).unwrap();
    assert!(stream.is_empty());
    assert!(lzwin::decode(&stream, &params, NO_OUTPUT_LIMIT).unwrap().is_empty());
}

#[test]
fn test_input_shorter_than_min_match() {
    let params = CodecParams::default();
    let stream = lzwin::encode(b"zz", &params).unwrap();
    assert!(stream.iter().all(|t| !t.is_match()));
}

#[test]
fn test_tie_break_picks_smallest_distance() {
    // "xyz" occurs at distances 8 and 4 from the final copy
    let input = b"xyz-xyz+xyz";
    let stream = lzwin::encode(input, &CodecParams::default()).unwrap();
    assert_eq!(stream.tokens().last(), Some(&Token::Match { distance: 4, length: 3 }));
}

#[test]
fn test_config_mismatch_rejected_before_decoding() {
    let data = generate_mixed_data(1000, 21);
    let stream = lzwin::encode(&data, &CodecParams::default()).unwrap();
    let other = CodecParams::new(32768, 4, 258).unwrap();
    assert!(matches!(
        lzwin::decode(&stream, &other, NO_OUTPUT_LIMIT),
        Err(Error::ConfigMismatch { .. })
    ));
}

#[test]
fn test_output_limit_guard() {
    let params = CodecParams::default();
    // A tiny stream that claims a long run
    let mut tokens = vec![Token::Literal(b"B".to_vec())];
    tokens.extend(std::iter::repeat(Token::Match { distance: 1, length: 258 }).take(1000));
    let stream = TokenStream::from_tokens(params, tokens);

    assert!(matches!(
        lzwin::decode(&stream, &params, 100_000),
        Err(Error::OutputLimitExceeded { limit: 100_000 })
    ));
    assert_eq!(lzwin::decode(&stream, &params, 258_001).unwrap().len(), 258_001);
}

#[test]
fn test_partial_decode_is_opt_in() {
    let params = CodecParams::default();
    let tokens = vec![Token::Literal(b"keep".to_vec()), Token::Match { distance: 9, length: 3 }];

    let decoder = Decoder::new(params).unwrap();
    assert!(decoder.decode_tokens(&tokens).is_err());

    let partial = decoder.decode_partial(&tokens);
    assert_eq!(partial.output, b"keep");
    assert!(matches!(
        partial.error,
        Some(Error::CorruptStream(Corruption::DistanceOutOfRange { distance: 9, available: 4 }))
    ));
}

#[test]
fn test_levels_and_lazy_still_roundtrip() {
    let data = generate_mixed_data(20_000, 42);
    let params = CodecParams::default();
    for level in 1..=9 {
        for strategy in [Strategy::Greedy, Strategy::Lazy] {
            let level_setting = CompressionLevel::from_level(level);
            let options = EncodeOptions { level: level_setting, strategy, ..Default::default() };
            let mut codec = LzCodec::new(params).unwrap().with_options(options).unwrap();
            let packed = codec.compress(&data).unwrap();
            let restored = codec.decompress(&packed, NO_OUTPUT_LIMIT).unwrap();
            assert_eq!(restored, data, "level {} {:?}", level, strategy);
        }
    }
}

// ============================================================================
// Wire format
// ============================================================================

#[test]
fn test_wire_truncation_detected() {
    let params = CodecParams::default();
    let packed = lzwin::compress(&generate_mixed_data(3000, 8), &params).unwrap();
    for cut in [1, packed.len() / 2, packed.len() - 2] {
        let result = lzwin::decompress(&packed[..cut], &params, NO_OUTPUT_LIMIT);
        assert!(matches!(result, Err(Error::CorruptStream(_))), "cut at {}", cut);
    }
}

#[test]
fn test_wire_reference_before_start() {
    let params = CodecParams::lzss();
    let mut writer = TokenWriter::new(params, WireFormat::default());
    writer.write_literals(b"abc");
    writer.write_match(100, 5).unwrap();
    let packed = writer.finish();

    assert!(matches!(
        lzwin::decompress(&packed, &params, NO_OUTPUT_LIMIT),
        Err(Error::CorruptStream(Corruption::DistanceOutOfRange { distance: 100, available: 3 }))
    ));
}

#[test]
fn test_wire_literal_chunking_roundtrip() {
    let data = generate_random_data(5000, 77);
    for literal_bits in [1, 4, 8, 16] {
        let format = WireFormat { literal_bits, ..Default::default() };
        let mut codec = LzCodec::new(CodecParams::default()).unwrap().with_format(format).unwrap();
        let packed = codec.compress(&data).unwrap();
        let restored = codec.decompress(&packed, NO_OUTPUT_LIMIT).unwrap();
        assert_eq!(restored, data, "literal_bits {}", literal_bits);
    }
}

#[test]
fn test_wire_external_count() {
    let params = CodecParams::default();
    let format = WireFormat { end_of_stream: EndOfStream::External, ..Default::default() };
    let data = generate_mixed_data(2500, 31);
    let codec = LzCodec::new(params).unwrap().with_format(format).unwrap();
    let (packed, records) = codec.compress_counted(&data).unwrap();

    let stream = TokenReader::new(packed.as_slice(), params, format).read_counted(records).unwrap();
    assert_eq!(stream.uncompressed_size(), data.len());
    assert_eq!(codec.decompress_counted(&packed, records, NO_OUTPUT_LIMIT).unwrap(), data);
}

#[test]
fn test_random_bytes_never_panic() {
    let params = CodecParams::lzss();
    for seed in 1..200u64 {
        let junk = generate_random_data(64, seed);
        let _ = lzwin::decompress(&junk, &params, 1 << 20);
    }
}

// ============================================================================
// Streaming
// ============================================================================

#[test]
fn test_streaming_equals_one_shot() {
    let data = generate_mixed_data(150_000, 1234);
    let narrow = CodecParams::new(100, 3, 50).unwrap();
    for params in [CodecParams::default(), CodecParams::lzss(), narrow] {
        let expected = lzwin::compress(&data, &params).unwrap();

        let mut packed = Vec::new();
        let mut encoder = StreamEncoder::new(params).unwrap().with_chunk_size(10_000);
        encoder.encode_stream(data.as_slice(), &mut packed).unwrap();
        assert_eq!(packed, expected, "{}", params);

        let mut restored = Vec::new();
        let mut decoder = StreamDecoder::new(params).unwrap();
        decoder.decode_stream(packed.as_slice(), &mut restored).unwrap();
        assert_eq!(restored, data);
    }
}

#[test]
fn test_streaming_decode_with_wrong_params_never_reproduces() {
    let data = generate_repetitive_data(10_000);
    let packed = lzwin::compress(&data, &CodecParams::default()).unwrap();

    // Different field widths misparse the stream; it must fail or differ, never panic
    let narrow = CodecParams::lzss();
    let mut out = Vec::new();
    let result = StreamDecoder::new(narrow).unwrap().decode_stream(packed.as_slice(), &mut out);
    assert!(result.is_err() || out != data);
}

// ============================================================================
// LZW
// ============================================================================

#[test]
fn test_lzw_roundtrip() {
    let inputs = [
        Vec::new(),
        b"x".to_vec(),
        generate_random_data(20_000, 3),
        generate_repetitive_data(50_000),
        generate_mixed_data(80_000, 4),
    ];
    for on_full in [FullPolicy::Reset, FullPolicy::Freeze] {
        for max_code_bits in [9, 12, 16] {
            let config = LzwConfig { max_code_bits, on_full, ..Default::default() };
            let mut codec = LzwCodec::new(config).unwrap();
            for input in &inputs {
                let packed = codec.compress(input).unwrap();
                let restored = codec.decompress(&packed, NO_OUTPUT_LIMIT).unwrap();
                assert_eq!(&restored, input, "{:?}", config);
            }
        }
    }
}

#[test]
fn test_lzw_compresses_repetitive_data() {
    let data = generate_repetitive_data(100_000);
    let packed = LzwCodec::new(LzwConfig::default()).unwrap().compress(&data).unwrap();
    assert!(packed.len() < data.len() / 10);
}

#[test]
fn test_lzw_output_limit() {
    let data = generate_repetitive_data(10_000);
    let mut codec = LzwCodec::new(LzwConfig::default()).unwrap();
    let packed = codec.compress(&data).unwrap();
    let result = codec.decompress(&packed, 5_000);
    assert!(matches!(result, Err(Error::OutputLimitExceeded { limit: 5_000 })));
}

#[test]
fn test_lzw_random_bytes_never_panic() {
    let mut codec = LzwCodec::new(LzwConfig::default()).unwrap();
    for seed in 1..200u64 {
        let junk = generate_random_data(100, seed);
        let _ = codec.decompress(&junk, 1 << 20);
    }
}

// ============================================================================
// Binary CLI Tests
// ============================================================================

fn cli() -> Command {
    Command::new(env!("CARGO_BIN_EXE_lzwin"))
}

fn cli_roundtrip(dir: &Path, data: &[u8], extra: &[&str]) {
    let input = dir.join("input.bin");
    fs::write(&input, data).unwrap();

    let status = cli().args(extra).arg(&input).status().unwrap();
    assert!(status.success());

    let packed = dir.join("input.bin.lzwin");
    assert!(packed.exists());
    fs::remove_file(&input).unwrap();

    let status = cli().arg("-d").args(extra).arg(&packed).status().unwrap();
    assert!(status.success());
    assert_eq!(fs::read(&input).unwrap(), data);
}

#[test]
fn test_cli_roundtrip_lz77() {
    let dir = tempfile::tempdir().unwrap();
    cli_roundtrip(dir.path(), &generate_mixed_data(50_000, 9), &[]);
}

#[test]
fn test_cli_roundtrip_custom_params() {
    let dir = tempfile::tempdir().unwrap();
    let extra = [
        "--window",
        "4096",
        "--min-match",
        "3",
        "--max-match",
        "18",
        "-l",
        "5",
        "--lazy",
        "--literal-bits",
        "4",
    ];
    cli_roundtrip(dir.path(), &generate_mixed_data(30_000, 10), &extra);
}

#[test]
fn test_cli_roundtrip_lzw() {
    let dir = tempfile::tempdir().unwrap();
    let extra = ["-a", "lzw", "--code-bits", "14"];
    cli_roundtrip(dir.path(), &generate_mixed_data(40_000, 11), &extra);
}

#[test]
fn test_cli_empty_file() {
    let dir = tempfile::tempdir().unwrap();
    cli_roundtrip(dir.path(), b"", &[]);
}

#[test]
fn test_cli_stdin_to_stdout() {
    use std::io::Write;
    use std::process::Stdio;

    let data = generate_mixed_data(20_000, 12);
    let mut child = cli()
        .args(["-", "-o", "-"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(&data).unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());
    assert_eq!(output.stdout, lzwin::compress(&data, &CodecParams::default()).unwrap());
}

#[test]
fn test_cli_multiple_inputs_in_parallel() {
    let dir = tempfile::tempdir().unwrap();
    let mut paths = Vec::new();
    for i in 0..6u64 {
        let path = dir.path().join(format!("file{}.txt", i));
        fs::write(&path, generate_mixed_data(10_000 + i as usize * 1000, i)).unwrap();
        paths.push(path);
    }

    let status = cli().args(["-t", "3"]).args(&paths).status().unwrap();
    assert!(status.success());

    for (i, path) in paths.iter().enumerate() {
        let packed = fs::read(path.with_extension("txt.lzwin")).unwrap();
        let expected = generate_mixed_data(10_000 + i * 1000, i as u64);
        let params = CodecParams::default();
        let restored = lzwin::decompress(&packed, &params, NO_OUTPUT_LIMIT).unwrap();
        assert_eq!(restored, expected);
    }
}

#[test]
fn test_cli_refuses_overwrite_without_force() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("data");
    fs::write(&input, b"hello hello hello").unwrap();
    fs::write(dir.path().join("data.lzwin"), b"existing").unwrap();

    let output = cli().arg(&input).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert_eq!(fs::read(dir.path().join("data.lzwin")).unwrap(), b"existing");

    let status = cli().arg("-f").arg(&input).status().unwrap();
    assert!(status.success());
    assert_ne!(fs::read(dir.path().join("data.lzwin")).unwrap(), b"existing");
}

#[test]
fn test_cli_corrupt_input_fails_and_cleans_up() {
    let dir = tempfile::tempdir().unwrap();
    let packed = dir.path().join("bad.lzwin");
    // A match record pointing before the start of output
    let mut writer = TokenWriter::new(CodecParams::default(), WireFormat::default());
    writer.write_match(5, 3).unwrap();
    fs::write(&packed, writer.finish()).unwrap();

    let output = cli().arg("-d").arg(&packed).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error"));
    assert!(!dir.path().join("bad").exists());
}

#[test]
fn test_cli_max_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("zeros");
    fs::write(&input, vec![0u8; 100_000]).unwrap();
    assert!(cli().arg(&input).status().unwrap().success());

    let output = cli()
        .args(["-d", "--max-output", "1000", "-o"])
        .arg(dir.path().join("out"))
        .arg(dir.path().join("zeros.lzwin"))
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_cli_verbose_summary() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("v.txt");
    fs::write(&input, generate_repetitive_data(5000)).unwrap();

    let output = cli().arg("-v").arg(&input).output().unwrap();
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Compression complete"));
    assert!(stderr.contains("Matches:"));
}

#[test]
fn test_cli_decompress_requires_known_extension() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("plain.bin");
    fs::write(&input, b"abc").unwrap();
    let output = cli().arg("-d").arg(&input).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
}
