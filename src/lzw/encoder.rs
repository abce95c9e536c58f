use super::dictionary::{CodeTable, CLEAR_CODE, END_CODE, FIRST_FREE_CODE};
use super::{FullPolicy, LzwConfig, LzwStats};
use crate::bits::BitWriter;
use crate::error::Result;
use std::io::Write;

/// Incremental LZW encoder
///
/// Bytes can be pushed in any number of pieces; the output only depends on
/// their concatenation.
pub struct LzwEncoder {
    config: LzwConfig,
    table: CodeTable,
    bits: BitWriter,
    /// Code of the longest known sequence ending at the input so far
    current: Option<u32>,
    /// Code counter mirrored by the decoder; sets the code width
    counter: u32,
    stats: LzwStats,
}

impl LzwEncoder {
    pub fn new(config: LzwConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            table: CodeTable::new(config.capacity()),
            config,
            bits: BitWriter::new(),
            current: None,
            counter: FIRST_FREE_CODE,
            stats: LzwStats::default(),
        })
    }

    pub fn push(&mut self, input: &[u8]) {
        self.stats.input_bytes += input.len() as u64;

        for &byte in input {
            let Some(prefix) = self.current else {
                self.current = Some(u32::from(byte));
                continue;
            };
            if let Some(code) = self.table.find(prefix, byte) {
                self.current = Some(code);
                continue;
            }

            self.emit_data(prefix);
            self.table.insert(prefix, byte);
            if self.config.on_full == FullPolicy::Reset && self.table.is_full() {
                self.emit(CLEAR_CODE);
                self.table.reset();
                self.counter = FIRST_FREE_CODE;
                self.stats.resets += 1;
            }
            self.current = Some(u32::from(byte));
        }
    }

    #[inline]
    fn emit(&mut self, code: u32) {
        self.bits.write_bits(code, self.config.code_width(self.counter));
    }

    #[inline]
    fn emit_data(&mut self, code: u32) {
        self.emit(code);
        self.stats.codes += 1;
        if self.counter < self.config.capacity() {
            self.counter += 1;
        }
    }

    /// Hand complete bytes to `sink`
    pub fn drain_to<W: Write>(&mut self, sink: &mut W) -> Result<()> {
        self.bits.drain_to(sink)
    }

    fn terminate(&mut self) {
        if let Some(code) = self.current.take() {
            self.emit_data(code);
        }
        self.emit(END_CODE);
    }

    /// End the stream and return the undrained bytes
    pub fn finish(mut self) -> Vec<u8> {
        self.terminate();
        self.bits.finish()
    }

    /// End the stream, draining everything into `sink`
    pub fn finish_into<W: Write>(mut self, sink: &mut W) -> Result<LzwStats> {
        self.terminate();
        self.bits.align_to_byte();
        self.bits.drain_to(sink)?;
        self.stats.output_bytes = self.bits.bytes_written();
        Ok(self.stats)
    }
}
