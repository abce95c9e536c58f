use crate::error::{Error, Result};
use std::io::Read;

/// Encoder-side input buffer for bounded-memory compression
///
/// Holds the retained history plus the unprocessed lookahead as one
/// contiguous slice. `base` is the logical position of `data[0]`, so
/// match-finder positions stay logical while old bytes are discarded.
pub struct LookaheadBuffer {
    data: Vec<u8>,
    base: usize,
    eof: bool,
}

impl LookaheadBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self { data: Vec::with_capacity(capacity), base: 0, eof: false }
    }

    /// Read up to `chunk` more bytes from `reader`.
    ///
    /// Returns the number of bytes appended; 0 marks end of input.
    pub fn refill<R: Read>(&mut self, reader: &mut R, chunk: usize) -> Result<usize> {
        if self.eof {
            return Ok(0);
        }

        let start = self.data.len();
        self.data.resize(start + chunk, 0);
        let mut filled = start;
        while filled < self.data.len() {
            match reader.read(&mut self.data[filled..]) {
                Ok(0) => {
                    self.eof = true;
                    break;
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.data.truncate(filled);
                    return Err(Error::Io(e));
                }
            }
        }
        self.data.truncate(filled);
        Ok(filled - start)
    }

    /// Drop bytes before logical position `keep_from`, once at least
    /// `threshold` of them have accumulated.
    pub fn discard_before(&mut self, keep_from: usize, threshold: usize) {
        if keep_from <= self.base {
            return;
        }
        let excess = (keep_from - self.base).min(self.data.len());
        if excess >= threshold.max(1) {
            self.data.drain(..excess);
            self.base += excess;
        }
    }

    /// Logical position of the first retained byte
    pub fn base(&self) -> usize {
        self.base
    }

    /// Logical position one past the last buffered byte
    pub fn end(&self) -> usize {
        self.base + self.data.len()
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Whether the reader has reported end of input
    pub fn is_eof(&self) -> bool {
        self.eof
    }
}
