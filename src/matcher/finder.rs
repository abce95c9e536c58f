use super::hash_chain::HashChain;
use crate::CodecParams;

/// A back-reference candidate chosen by the finder
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Match {
    pub distance: usize,
    pub length: usize,
}

/// Greedy longest-match search
///
/// For position `p` it considers every distance in `1..=min(W, p)` whose
/// prefix hashes like the lookahead, and reports the longest match, breaking
/// ties by the smallest distance. Lengths may exceed the distance: the
/// source run is read from the same buffer and overlaps the lookahead.
///
/// Positions are logical. Callers hand in a buffer `data` whose first byte
/// sits at logical position `base`; everything from `p - W` up to the end of
/// the lookahead must be present.
pub struct MatchFinder {
    params: CodecParams,
    chain: HashChain,
    /// Maximum candidates examined per search; `None` walks the whole chain
    chain_limit: Option<usize>,
    /// First position not yet indexed
    next_insert: usize,
}

impl MatchFinder {
    pub fn new(params: CodecParams, hash_bits: u8, chain_limit: Option<usize>) -> Self {
        Self {
            chain: HashChain::new(params.window_size, params.min_match, hash_bits),
            params,
            chain_limit,
            next_insert: 0,
        }
    }

    pub fn params(&self) -> &CodecParams {
        &self.params
    }

    /// Start over at logical position 0
    pub fn reset(&mut self) {
        self.chain.reset();
        self.next_insert = 0;
    }

    /// Index every position before `pos` that has not been indexed yet.
    ///
    /// Positions whose hash key runs past the end of `data` are skipped; no
    /// match of `min_match` bytes can start there anyway once input has ended.
    pub fn advance_to(&mut self, data: &[u8], base: usize, pos: usize) {
        let hash_len = self.chain.hash_len();
        let from = self.next_insert.max(base);
        for q in from..pos {
            let idx = q - base;
            if idx + hash_len > data.len() {
                break;
            }
            self.chain.insert(q, &data[idx..]);
        }
        self.next_insert = self.next_insert.max(pos);
    }

    /// Longest match for the bytes at `pos`, or `None` if nothing reaches `min_match`
    pub fn find(&self, data: &[u8], base: usize, pos: usize) -> Option<Match> {
        let idx = pos - base;
        let ahead = data.len().saturating_sub(idx);
        let max_len = self.params.max_match.min(ahead);
        if max_len < self.params.min_match {
            return None;
        }

        let lookahead = &data[idx..];
        let mut best = Match { distance: 0, length: 0 };

        for (visited, q) in self.chain.candidates(pos, lookahead, base).enumerate() {
            if self.chain_limit.is_some_and(|limit| visited >= limit) {
                break;
            }
            let length = common_prefix(&data[q - base..], lookahead, max_len);
            // Strictly longer only: earlier candidates have smaller distances
            if length > best.length {
                best = Match { distance: pos - q, length };
                if length == max_len {
                    break;
                }
            }
        }

        (best.length >= self.params.min_match).then_some(best)
    }
}

/// Count equal leading bytes of `a` and `b`, up to `limit`
#[inline]
fn common_prefix(a: &[u8], b: &[u8], limit: usize) -> usize {
    a[..limit].iter().zip(&b[..limit]).take_while(|(x, y)| x == y).count()
}
