use super::format::{EndOfStream, WireFormat};
use crate::bits::BitWriter;
use crate::codec::check_match;
use crate::error::Result;
use crate::tokens::Token;
use crate::CodecParams;
use std::io::Write;

/// Serializes tokens into the wire format
pub struct TokenWriter {
    bits: BitWriter,
    params: CodecParams,
    format: WireFormat,
    distance_bits: u8,
    length_bits: u8,
    /// Records written so far (after literal chunking)
    records: u64,
}

impl TokenWriter {
    pub fn new(params: CodecParams, format: WireFormat) -> Self {
        Self {
            bits: BitWriter::new(),
            distance_bits: params.distance_bits(),
            length_bits: params.length_bits(),
            params,
            format,
            records: 0,
        }
    }

    /// Write one token; literal runs are split into records the format can carry
    pub fn write_token(&mut self, token: &Token) -> Result<()> {
        match token {
            Token::Literal(run) => {
                self.write_literals(run);
                Ok(())
            }
            Token::Match { distance, length } => self.write_match(*distance, *length),
        }
    }

    pub fn write_literals(&mut self, run: &[u8]) {
        for chunk in run.chunks(self.format.max_literal_run()) {
            self.bits.write_bit(false);
            self.bits.write_bits(chunk.len() as u32, self.format.literal_bits);
            for &byte in chunk {
                self.bits.write_byte(byte);
            }
            self.records += 1;
        }
    }

    pub fn write_match(&mut self, distance: usize, length: usize) -> Result<()> {
        check_match(&self.params, distance, length, self.params.window_size)?;

        self.bits.write_bit(true);
        self.bits.write_bits((distance - 1) as u32, self.distance_bits);
        self.bits.write_bits((length - self.params.min_match) as u32, self.length_bits);
        self.records += 1;
        Ok(())
    }

    /// Records written so far; the count a container stores for [`EndOfStream::External`]
    pub fn records(&self) -> u64 {
        self.records
    }

    /// Hand complete bytes to `sink` without ending the stream
    pub fn drain_to<W: Write>(&mut self, sink: &mut W) -> Result<()> {
        self.bits.drain_to(sink)
    }

    fn terminate(&mut self) {
        if self.format.end_of_stream == EndOfStream::Sentinel {
            self.bits.write_bit(false);
            self.bits.write_bits(0, self.format.literal_bits);
        }
        self.bits.align_to_byte();
    }

    /// End the stream and return the undrained bytes
    pub fn finish(mut self) -> Vec<u8> {
        self.terminate();
        self.bits.finish()
    }

    /// End the stream, draining everything into `sink`; returns total bytes written
    pub fn finish_into<W: Write>(mut self, sink: &mut W) -> Result<u64> {
        self.terminate();
        self.bits.drain_to(sink)?;
        Ok(self.bits.bytes_written())
    }
}
