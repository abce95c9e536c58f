pub mod bits;
pub mod codec;
pub mod error;
pub mod lzw;
pub mod matcher;
pub mod tokens;
pub mod window;
pub mod wire;

pub use codec::{Decoder, Encoder, LzCodec, PartialDecode, StreamDecoder, StreamEncoder};
pub use error::{Corruption, Error, Result};
pub use lzw::{FullPolicy, LzwCodec, LzwConfig, LzwStats};
pub use matcher::{Match, MatchFinder};
pub use tokens::{StreamStats, Token, TokenStream};
pub use window::{History, SlidingWindow};
pub use wire::{EndOfStream, WireFormat};

use std::fmt;

/// Pass as `max_output_size` to decode without an output guard
pub const NO_OUTPUT_LIMIT: usize = usize::MAX;

/// Window and match-length bounds shared by encoder and decoder
///
/// A stream can only be decoded with exactly the parameters it was encoded
/// with; anything else is rejected as [`Error::ConfigMismatch`] before any
/// token is applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CodecParams {
    /// Dictionary horizon W: the largest distance a match may use
    pub window_size: usize,
    /// Shortest match worth encoding
    pub min_match: usize,
    /// Longest match a single token may carry
    pub max_match: usize,
}

impl CodecParams {
    /// Largest supported window (distance field up to 24 bits)
    pub const MAX_WINDOW_SIZE: usize = 1 << 24;
    /// Largest supported match length (length field up to 16 bits)
    pub const MAX_MATCH_LIMIT: usize = 1 << 16;

    /// Create validated parameters
    pub fn new(window_size: usize, min_match: usize, max_match: usize) -> Result<Self> {
        let params = Self { window_size, min_match, max_match };
        params.validate()?;
        Ok(params)
    }

    /// Classic LZSS layout: 4 KiB window, 4-bit length field
    pub fn lzss() -> Self {
        Self { window_size: 4096, min_match: 3, max_match: 18 }
    }

    /// LZ4-style bounds: 64 KiB window, 4-byte minimum match
    pub fn lz4() -> Self {
        Self { window_size: 65535, min_match: 4, max_match: 65535 }
    }

    pub fn validate(&self) -> Result<()> {
        if self.window_size == 0 || self.window_size > Self::MAX_WINDOW_SIZE {
            return Err(Error::InvalidParams {
                name: "window_size",
                reason: format!("{} not in 1..={}", self.window_size, Self::MAX_WINDOW_SIZE),
            });
        }
        if self.min_match == 0 {
            return Err(Error::InvalidParams {
                name: "min_match",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.max_match < self.min_match || self.max_match > Self::MAX_MATCH_LIMIT {
            return Err(Error::InvalidParams {
                name: "max_match",
                reason: format!(
                    "{} not in {}..={}",
                    self.max_match,
                    self.min_match,
                    Self::MAX_MATCH_LIMIT
                ),
            });
        }
        Ok(())
    }

    /// Reject a stream produced under different parameters
    pub fn ensure_matches(&self, found: &CodecParams) -> Result<()> {
        if self != found {
            return Err(Error::ConfigMismatch { expected: *self, found: *found });
        }
        Ok(())
    }

    /// Width of the wire distance field (stores `distance - 1`)
    pub fn distance_bits(&self) -> u8 {
        bits::bits_for(self.window_size - 1)
    }

    /// Width of the wire length field (stores `length - min_match`)
    pub fn length_bits(&self) -> u8 {
        bits::bits_for(self.max_match - self.min_match)
    }
}

impl Default for CodecParams {
    fn default() -> Self {
        Self { window_size: 32768, min_match: 3, max_match: 258 }
    }
}

impl fmt::Display for CodecParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "window={} min_match={} max_match={}",
            self.window_size, self.min_match, self.max_match
        )
    }
}

/// Match search effort (1-9)
///
/// - Levels 1-8: hash-chain walk bounded to 4..1024 candidates (faster, may pick shorter matches)
/// - Level 9: full chain walk; the exact longest-match, smallest-distance policy
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum CompressionLevel {
    Level1 = 1,
    Level2 = 2,
    Level3 = 3,
    Level4 = 4,
    Level5 = 5,
    Level6 = 6,
    Level7 = 7,
    Level8 = 8,
    #[default]
    Level9 = 9,
}

impl CompressionLevel {
    /// Create from numeric level (1-9), clamped to valid range
    pub fn from_level(level: u8) -> Self {
        match level {
            0 | 1 => Self::Level1,
            2 => Self::Level2,
            3 => Self::Level3,
            4 => Self::Level4,
            5 => Self::Level5,
            6 => Self::Level6,
            7 => Self::Level7,
            8 => Self::Level8,
            _ => Self::Level9,
        }
    }

    /// Get numeric level (1-9)
    pub fn level(&self) -> u8 {
        *self as u8
    }

    /// Maximum hash-chain candidates examined per position; `None` is unbounded
    pub fn chain_limit(&self) -> Option<usize> {
        match self {
            Self::Level1 => Some(4),
            Self::Level2 => Some(8),
            Self::Level3 => Some(16),
            Self::Level4 => Some(32),
            Self::Level5 => Some(64),
            Self::Level6 => Some(128),
            Self::Level7 => Some(256),
            Self::Level8 => Some(1024),
            Self::Level9 => None,
        }
    }
}

/// Parsing strategy
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Take the longest match at every position
    #[default]
    Greedy,
    /// Defer one byte when the next position has a strictly longer match.
    /// Changes output bytes relative to `Greedy`, never correctness.
    Lazy,
}

/// Encoder-only tuning; never affects whether a stream decodes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncodeOptions {
    pub level: CompressionLevel,
    pub strategy: Strategy,
    /// Hash-head table holds `2^hash_bits` entries (8-20)
    pub hash_bits: u8,
}

impl EncodeOptions {
    pub fn validate(&self) -> Result<()> {
        if !(8..=20).contains(&self.hash_bits) {
            return Err(Error::InvalidParams {
                name: "hash_bits",
                reason: format!("{} not in 8..=20", self.hash_bits),
            });
        }
        Ok(())
    }
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self { level: CompressionLevel::Level9, strategy: Strategy::Greedy, hash_bits: 15 }
    }
}

/// A complete byte-to-byte compression scheme
pub trait Codec {
    /// Compress `input` into a self-terminating byte stream
    fn compress(&mut self, input: &[u8]) -> Result<Vec<u8>>;

    /// Reverse [`compress`](Self::compress), failing rather than producing
    /// more than `max_output_size` bytes
    fn decompress(&mut self, input: &[u8], max_output_size: usize) -> Result<Vec<u8>>;
}

/// Tokenize `input` with the exact greedy policy
///
/// Fails only when `params` are invalid.
pub fn encode(input: &[u8], params: &CodecParams) -> Result<TokenStream> {
    let mut encoder = Encoder::new(*params, EncodeOptions::default())?;
    Ok(encoder.encode(input))
}

/// Replay a token stream produced by [`encode`] with the same `params`
pub fn decode(
    stream: &TokenStream,
    params: &CodecParams,
    max_output_size: usize,
) -> Result<Vec<u8>> {
    Decoder::new(*params)?.with_output_limit(max_output_size).decode(stream)
}

/// Tokenize and serialize `input` with the default wire format
pub fn compress(input: &[u8], params: &CodecParams) -> Result<Vec<u8>> {
    LzCodec::new(*params)?.compress(input)
}

/// Parse and replay bytes produced by [`compress`] with the same `params`
pub fn decompress(input: &[u8], params: &CodecParams, max_output_size: usize) -> Result<Vec<u8>> {
    LzCodec::new(*params)?.decompress(input, max_output_size)
}
