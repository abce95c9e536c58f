//! Already-processed bytes that back-references may point into.
//!
//! Encoder and decoder must see byte-identical history at every step; the
//! decoder never has information the encoder lacked. Positions are logical
//! and only ever grow, no matter how much history is physically retained.

pub mod lookahead;
pub mod sliding;

pub use lookahead::LookaheadBuffer;
pub use sliding::SlidingWindow;

/// Byte history addressed by absolute (logical) position.
pub trait History {
    /// Current position: total bytes appended so far.
    fn position(&self) -> usize;

    /// Number of trailing bytes a back-reference may still reach.
    fn reachable(&self) -> usize;

    /// Byte at absolute position `pos`, if it is still retained.
    fn get(&self, pos: usize) -> Option<u8>;

    /// Append bytes verbatim.
    fn extend_bytes(&mut self, bytes: &[u8]);

    /// Append `length` bytes copied from `distance` bytes back.
    ///
    /// The source may overlap the bytes being produced; they are read in
    /// increasing order so `length > distance` repeats the tail. Callers must
    /// ensure `1 <= distance <= self.reachable()`.
    fn replay(&mut self, distance: usize, length: usize);
}

/// Unbounded history: the output buffer of a one-shot decode.
impl History for Vec<u8> {
    fn position(&self) -> usize {
        self.len()
    }

    fn reachable(&self) -> usize {
        self.len()
    }

    fn get(&self, pos: usize) -> Option<u8> {
        self.as_slice().get(pos).copied()
    }

    fn extend_bytes(&mut self, bytes: &[u8]) {
        self.extend_from_slice(bytes);
    }

    fn replay(&mut self, distance: usize, length: usize) {
        debug_assert!(distance >= 1 && distance <= self.len());

        self.reserve(length);
        let mut src = self.len() - distance;
        let mut remaining = length;
        // Each chunk is at most `distance` bytes, so its source range is
        // fully written before it is copied.
        while remaining > 0 {
            let chunk = remaining.min(self.len() - src);
            self.extend_from_within(src..src + chunk);
            src += chunk;
            remaining -= chunk;
        }
    }
}
