use crate::error::{Error, Result};
use std::io::Read;

/// Bit-level reader for token and code streams
///
/// Bits are consumed LSB-first within each byte, the same order
/// [`BitWriter`](super::BitWriter) produces.
pub struct BitReader<R: Read> {
    reader: R,
    /// Buffer holding up to 64 bits
    buffer: u64,
    /// Number of valid bits in buffer (0-64)
    bits_available: u8,
    /// Total bytes pulled from the underlying reader
    bytes_read: u64,
}

impl<R: Read> BitReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, buffer: 0, bits_available: 0, bytes_read: 0 }
    }

    /// Ensure at least `n` bits are buffered.
    ///
    /// Refills several bytes per call while there is room so that narrow
    /// fields do not cost one `read` each.
    fn fill_buffer(&mut self, n: u8) -> Result<()> {
        debug_assert!(n <= 57, "Cannot request more than 57 bits at once");

        if self.bits_available >= n {
            return Ok(());
        }

        let room = ((64 - self.bits_available) / 8) as usize;
        let mut bulk = [0u8; 8];
        loop {
            match self.reader.read(&mut bulk[..room]) {
                Ok(got) => {
                    for &byte in &bulk[..got] {
                        self.buffer |= (byte as u64) << self.bits_available;
                        self.bits_available += 8;
                    }
                    self.bytes_read += got as u64;
                    if got == 0 {
                        break;
                    }
                    if self.bits_available >= n {
                        return Ok(());
                    }
                    // Short read: fall through to the byte-wise path
                    break;
                }
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(Error::Io(e)),
            }
        }

        while self.bits_available < n {
            let mut byte = [0u8; 1];
            match self.reader.read_exact(&mut byte) {
                Ok(()) => {
                    self.buffer |= (byte[0] as u64) << self.bits_available;
                    self.bits_available += 8;
                    self.bytes_read += 1;
                }
                Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                    return Err(Error::UnexpectedEof);
                }
                Err(e) => return Err(Error::Io(e)),
            }
        }
        Ok(())
    }

    /// Read `n` bits (0-32) in LSB-first order
    pub fn read_bits(&mut self, n: u8) -> Result<u32> {
        debug_assert!(n <= 32, "Cannot read more than 32 bits at once");

        if n == 0 {
            return Ok(0);
        }

        self.fill_buffer(n)?;

        let mask = (1u64 << n) - 1;
        let result = (self.buffer & mask) as u32;
        self.buffer >>= n;
        self.bits_available -= n;

        Ok(result)
    }

    /// Read a single bit
    #[inline]
    pub fn read_bit(&mut self) -> Result<bool> {
        Ok(self.read_bits(1)? != 0)
    }

    /// Read one full byte (not necessarily aligned)
    #[inline]
    pub fn read_byte(&mut self) -> Result<u8> {
        self.read_bits(8).map(|v| v as u8)
    }

    /// Bits read from the underlying reader but not consumed yet
    pub fn buffered_bits(&self) -> u8 {
        self.bits_available
    }

    /// Bytes pulled from the underlying reader so far
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }
}
