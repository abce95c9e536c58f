use super::dictionary::{CodeTable, CLEAR_CODE, END_CODE, FIRST_FREE_CODE};
use super::{LzwConfig, LzwStats};
use crate::bits::BitReader;
use crate::error::{Corruption, Error, Result};
use crate::NO_OUTPUT_LIMIT;
use std::io::{Read, Write};

/// LZW decoder mirroring [`LzwEncoder`](super::LzwEncoder)
///
/// Learns one entry per data code after the first, one step behind the
/// encoder. A code equal to the next free code is the sequence being
/// defined right now: the previous sequence plus its own first byte.
pub struct LzwDecoder {
    config: LzwConfig,
    table: CodeTable,
    max_output_size: usize,
}

impl LzwDecoder {
    pub fn new(config: LzwConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            table: CodeTable::new(config.capacity()),
            config,
            max_output_size: NO_OUTPUT_LIMIT,
        })
    }

    pub fn with_output_limit(mut self, limit: usize) -> Self {
        self.max_output_size = limit;
        self
    }

    /// Decode one stream up to its END code, writing sequences to `output`
    pub fn decode_to<R: Read, W: Write>(&mut self, input: R, output: &mut W) -> Result<LzwStats> {
        let mut bits = BitReader::new(input);
        let capacity = self.config.capacity();
        let mut counter = FIRST_FREE_CODE;
        let mut prev: Option<u32> = None;
        let mut produced = 0usize;
        let mut scratch = Vec::with_capacity(256);
        let mut stats = LzwStats::default();

        self.table.reset();

        loop {
            let code = match bits.read_bits(self.config.code_width(counter)) {
                Ok(code) => code,
                // Only zero padding left: the stream stopped between codes
                Err(Error::UnexpectedEof) if bits.buffered_bits() < 8 => {
                    return Err(Corruption::MissingEndMarker.into());
                }
                Err(e) => return Err(e.truncated()),
            };

            match code {
                END_CODE => break,
                CLEAR_CODE => {
                    self.table.reset();
                    counter = FIRST_FREE_CODE;
                    prev = None;
                    stats.resets += 1;
                    continue;
                }
                _ => {}
            }

            let next = self.table.next_code();
            let first = match prev {
                _ if code < next => self.table.first_byte(code),
                Some(p) if code == next && !self.table.is_full() => self.table.first_byte(p),
                _ => return Err(Corruption::InvalidCode { code, next }.into()),
            };

            if let Some(p) = prev {
                self.table.insert(p, first);
            }

            let len = self.table.len_of(code);
            if produced.saturating_add(len) > self.max_output_size {
                return Err(Error::OutputLimitExceeded { limit: self.max_output_size });
            }

            scratch.clear();
            self.table.expand_into(code, &mut scratch);
            output.write_all(&scratch)?;
            produced += len;

            stats.codes += 1;
            prev = Some(code);
            if counter < capacity {
                counter += 1;
            }
        }

        stats.input_bytes = bits.bytes_read();
        stats.output_bytes = produced as u64;
        Ok(stats)
    }
}
