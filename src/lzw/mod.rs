//! Dynamic-dictionary (LZW) codec.
//!
//! Instead of pointing back into a byte window, each code names a sequence
//! learned earlier in the stream. Both sides grow the same dictionary in
//! lockstep: codes 0-255 are single bytes, 256 clears the dictionary, 257
//! ends the data and learned sequences start at 258. Codes are packed
//! LSB-first; the width grows from `min_code_bits` to `max_code_bits` as the
//! dictionary fills.

pub mod decoder;
pub mod dictionary;
pub mod encoder;

pub use decoder::LzwDecoder;
pub use dictionary::{CodeTable, CLEAR_CODE, END_CODE, FIRST_FREE_CODE};
pub use encoder::LzwEncoder;

use crate::bits::bits_for;
use crate::error::{Error, Result};
use crate::Codec;
use std::io::{BufWriter, Read, Write};

/// What happens once every code of `max_code_bits` is taken
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FullPolicy {
    /// Emit CLEAR and start learning again
    #[default]
    Reset,
    /// Keep using the full dictionary without learning more
    Freeze,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LzwConfig {
    /// Starting code width (9-16)
    pub min_code_bits: u8,
    /// Widest code and therefore dictionary size `2^max_code_bits` (`min_code_bits`-16)
    pub max_code_bits: u8,
    pub on_full: FullPolicy,
}

impl LzwConfig {
    pub fn validate(&self) -> Result<()> {
        if !(9..=16).contains(&self.min_code_bits) {
            return Err(Error::InvalidParams {
                name: "min_code_bits",
                reason: format!("{} not in 9..=16", self.min_code_bits),
            });
        }
        if self.max_code_bits < self.min_code_bits || self.max_code_bits > 16 {
            return Err(Error::InvalidParams {
                name: "max_code_bits",
                reason: format!("{} not in {}..=16", self.max_code_bits, self.min_code_bits),
            });
        }
        Ok(())
    }

    /// Number of codes the dictionary can hold
    pub fn capacity(&self) -> u32 {
        1 << self.max_code_bits
    }

    /// Width of the next code when the mirrored code counter is `counter`
    #[inline]
    pub fn code_width(&self, counter: u32) -> u8 {
        self.min_code_bits.max(bits_for(counter as usize - 1))
    }
}

impl Default for LzwConfig {
    fn default() -> Self {
        Self { min_code_bits: 9, max_code_bits: 12, on_full: FullPolicy::Reset }
    }
}

/// Statistics from an LZW encode or decode
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LzwStats {
    /// Data codes (CLEAR and END excluded)
    pub codes: u64,
    /// Dictionary resets
    pub resets: u64,
    pub input_bytes: u64,
    pub output_bytes: u64,
}

/// LZW compressor implementing [`Codec`]
#[derive(Clone, Debug)]
pub struct LzwCodec {
    config: LzwConfig,
    chunk_size: usize,
}

impl LzwCodec {
    pub fn new(config: LzwConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, chunk_size: 64 * 1024 })
    }

    pub fn config(&self) -> &LzwConfig {
        &self.config
    }

    /// Compress from `input` to `output` without buffering either side whole
    pub fn compress_stream<R: Read, W: Write>(
        &mut self,
        mut input: R,
        output: W,
    ) -> Result<LzwStats> {
        let mut writer = BufWriter::with_capacity(self.chunk_size, output);
        let mut encoder = LzwEncoder::new(self.config)?;
        let mut chunk = vec![0u8; self.chunk_size];

        loop {
            let n = match input.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(Error::Io(e)),
            };
            encoder.push(&chunk[..n]);
            encoder.drain_to(&mut writer)?;
        }

        let stats = encoder.finish_into(&mut writer)?;
        writer.flush()?;
        Ok(stats)
    }

    /// Decompress from `input` to `output`; bytes before a failure have
    /// already been written when an error is returned
    pub fn decompress_stream<R: Read, W: Write>(
        &mut self,
        input: R,
        output: W,
        max_output_size: usize,
    ) -> Result<LzwStats> {
        let mut writer = BufWriter::with_capacity(self.chunk_size, output);
        let stats = LzwDecoder::new(self.config)?
            .with_output_limit(max_output_size)
            .decode_to(input, &mut writer)?;
        writer.flush()?;
        Ok(stats)
    }
}

impl Codec for LzwCodec {
    fn compress(&mut self, input: &[u8]) -> Result<Vec<u8>> {
        let mut encoder = LzwEncoder::new(self.config)?;
        encoder.push(input);
        Ok(encoder.finish())
    }

    fn decompress(&mut self, input: &[u8], max_output_size: usize) -> Result<Vec<u8>> {
        let reserve = input.len().saturating_mul(3).min(max_output_size).min(1 << 26);
        let mut output = Vec::with_capacity(reserve);
        LzwDecoder::new(self.config)?
            .with_output_limit(max_output_size)
            .decode_to(input, &mut output)?;
        Ok(output)
    }
}
