/// Marks an empty head slot or the end of a chain
const NIL: usize = usize::MAX;

/// Multiplier for the key hash; 0x1E35_A7BD is common across LZ implementations.
const HASH_MULTIPLIER: u32 = 0x1E35_A7BD;

/// Longest key prefix that is hashed
const MAX_HASH_LEN: usize = 4;

/// Chained hash index of window positions
///
/// `head[h]` is the newest position whose key hashes to `h`; `prev[pos % W]`
/// links each position to the next older one with the same hash. Because the
/// link table is exactly W slots, a slot is only overwritten once its
/// position has scrolled out of the window, and walks stop there.
pub struct HashChain {
    head: Vec<usize>,
    prev: Vec<usize>,
    hash_bits: u8,
    hash_len: usize,
    window_size: usize,
}

impl HashChain {
    pub fn new(window_size: usize, min_match: usize, hash_bits: u8) -> Self {
        Self {
            head: vec![NIL; 1 << hash_bits],
            prev: vec![NIL; window_size],
            hash_bits,
            hash_len: min_match.clamp(1, MAX_HASH_LEN),
            window_size,
        }
    }

    /// Bytes of each key that feed the hash
    pub fn hash_len(&self) -> usize {
        self.hash_len
    }

    #[inline]
    fn hash(&self, key: &[u8]) -> usize {
        let packed = key[..self.hash_len].iter().fold(0u32, |acc, &b| (acc << 8) | b as u32);
        (packed.wrapping_mul(HASH_MULTIPLIER) >> (32 - self.hash_bits)) as usize
    }

    /// Index `pos`, whose bytes start at `key` (at least `hash_len` long)
    #[inline]
    pub fn insert(&mut self, pos: usize, key: &[u8]) {
        let h = self.hash(key);
        self.prev[pos % self.window_size] = self.head[h];
        self.head[h] = pos;
    }

    /// Positions sharing `key`'s hash, newest (smallest distance) first.
    ///
    /// Only positions in `[max(pos - W, floor), pos)` are yielded.
    pub fn candidates(&self, pos: usize, key: &[u8], floor: usize) -> Candidates<'_> {
        Candidates {
            chain: self,
            next: self.head[self.hash(key)],
            pos,
            min_pos: pos.saturating_sub(self.window_size).max(floor),
        }
    }

    /// Forget every indexed position
    pub fn reset(&mut self) {
        self.head.fill(NIL);
    }
}

/// Iterator over one hash chain, see [`HashChain::candidates`]
pub struct Candidates<'a> {
    chain: &'a HashChain,
    next: usize,
    pos: usize,
    min_pos: usize,
}

impl Iterator for Candidates<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let q = self.next;
        if q == NIL || q >= self.pos || q < self.min_pos {
            return None;
        }
        let older = self.chain.prev[q % self.chain.window_size];
        self.next = if older < q { older } else { NIL };
        Some(q)
    }
}
