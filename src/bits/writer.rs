use crate::error::Result;
use std::io::Write;

/// Bit-level writer for token and code streams
///
/// Writes bits LSB-first. Complete bytes accumulate in an internal buffer
/// that can either be taken at the end ([`finish`](Self::finish)) or drained
/// into a sink as the stream grows ([`drain_to`](Self::drain_to)).
pub struct BitWriter {
    /// Complete output bytes not yet drained
    output: Vec<u8>,
    /// Pending bits (fewer than 8 between calls)
    acc: u64,
    /// Number of pending bits in `acc`
    pending: u8,
    /// Bytes already handed to a sink
    drained: u64,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::with_capacity(65536)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { output: Vec::with_capacity(capacity), acc: 0, pending: 0, drained: 0 }
    }

    /// Write the low `n` bits (0-32) of `value` in LSB-first order
    pub fn write_bits(&mut self, value: u32, n: u8) {
        debug_assert!(n <= 32);

        if n == 0 {
            return;
        }

        let mask = (1u64 << n) - 1;
        self.acc |= (value as u64 & mask) << self.pending;
        self.pending += n;

        while self.pending >= 8 {
            self.output.push(self.acc as u8);
            self.acc >>= 8;
            self.pending -= 8;
        }
    }

    /// Write a single bit
    #[inline]
    pub fn write_bit(&mut self, bit: bool) {
        self.write_bits(bit as u32, 1);
    }

    /// Write a full byte, taking the fast path when aligned
    #[inline]
    pub fn write_byte(&mut self, byte: u8) {
        if self.pending == 0 {
            self.output.push(byte);
        } else {
            self.write_bits(byte as u32, 8);
        }
    }

    /// Pad to byte boundary with zero bits
    pub fn align_to_byte(&mut self) {
        if self.pending > 0 {
            self.output.push(self.acc as u8);
            self.acc = 0;
            self.pending = 0;
        }
    }

    /// Move all complete bytes into `sink`, keeping the partial byte pending
    pub fn drain_to<W: Write>(&mut self, sink: &mut W) -> Result<()> {
        if !self.output.is_empty() {
            sink.write_all(&self.output)?;
            self.drained += self.output.len() as u64;
            self.output.clear();
        }
        Ok(())
    }

    /// Finish and return the (undrained) output bytes
    pub fn finish(mut self) -> Vec<u8> {
        self.align_to_byte();
        self.output
    }

    /// Total bytes produced so far, including drained bytes and a partial byte
    pub fn bytes_written(&self) -> u64 {
        self.drained + self.output.len() as u64 + u64::from(self.pending > 0)
    }

    /// Check if nothing has been written
    pub fn is_empty(&self) -> bool {
        self.bytes_written() == 0
    }
}

impl Default for BitWriter {
    fn default() -> Self {
        Self::new()
    }
}
