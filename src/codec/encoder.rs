use crate::error::Result;
use crate::matcher::{Match, MatchFinder};
use crate::tokens::{Token, TokenStream};
use crate::{CodecParams, EncodeOptions, Strategy};

/// Single-pass parser turning bytes into tokens
///
/// Scanning: at each position ask the match finder; on a match, flush the
/// pending literal run and emit the match, otherwise extend the run by one
/// byte. Flush: whatever run is pending becomes the final literal token.
///
/// One encoder can be reused for many inputs; all state is reset per call.
pub struct Encoder {
    params: CodecParams,
    options: EncodeOptions,
    finder: MatchFinder,
    /// Literal run not yet emitted
    pending: Vec<u8>,
}

impl Encoder {
    pub fn new(params: CodecParams, options: EncodeOptions) -> Result<Self> {
        params.validate()?;
        options.validate()?;

        Ok(Self {
            finder: MatchFinder::new(params, options.hash_bits, options.level.chain_limit()),
            params,
            options,
            pending: Vec::new(),
        })
    }

    pub fn params(&self) -> &CodecParams {
        &self.params
    }

    pub fn options(&self) -> &EncodeOptions {
        &self.options
    }

    /// Tokenize a complete input
    pub fn encode(&mut self, input: &[u8]) -> TokenStream {
        let mut tokens = Vec::with_capacity(input.len() / 8 + 1);
        self.encode_into(input, &mut tokens);
        TokenStream::from_tokens(self.params, tokens)
    }

    /// Tokenize a complete input into a caller-provided buffer
    pub fn encode_into(&mut self, input: &[u8], tokens: &mut Vec<Token>) {
        tokens.clear();
        self.reset();
        self.scan(input, 0, 0, input.len(), tokens);
        self.flush(tokens);
    }

    pub(crate) fn reset(&mut self) {
        self.finder.reset();
        self.pending.clear();
    }

    /// Process positions from `pos` while `pos < until`; returns the next position.
    ///
    /// `data` starts at logical position `base` and must hold the window
    /// behind `pos` plus at least `max_match + 1` bytes past `until`, unless
    /// it ends at the true end of input. The returned position can lie past
    /// `until` when the last match straddles it.
    pub(crate) fn scan(
        &mut self,
        data: &[u8],
        base: usize,
        mut pos: usize,
        until: usize,
        tokens: &mut Vec<Token>,
    ) -> usize {
        while pos < until {
            self.finder.advance_to(data, base, pos);
            let found = self.finder.find(data, base, pos);

            let chosen = match found {
                Some(m) if self.options.strategy == Strategy::Lazy => {
                    self.defer_if_better(data, base, &mut pos, m)
                }
                other => other,
            };

            match chosen {
                Some(m) => {
                    self.flush(tokens);
                    tokens.push(Token::Match { distance: m.distance, length: m.length });
                    pos += m.length;
                }
                None => {
                    self.pending.push(data[pos - base]);
                    pos += 1;
                }
            }
        }
        pos
    }

    /// Lazy step: take the match at `pos + 1` instead when it is strictly longer.
    fn defer_if_better(
        &mut self,
        data: &[u8],
        base: usize,
        pos: &mut usize,
        current: Match,
    ) -> Option<Match> {
        if current.length >= self.params.max_match {
            return Some(current);
        }

        self.finder.advance_to(data, base, *pos + 1);
        match self.finder.find(data, base, *pos + 1) {
            Some(next) if next.length > current.length => {
                self.pending.push(data[*pos - base]);
                *pos += 1;
                Some(next)
            }
            _ => Some(current),
        }
    }

    /// Emit the pending literal run, if any
    pub(crate) fn flush(&mut self, tokens: &mut Vec<Token>) {
        if !self.pending.is_empty() {
            tokens.push(Token::Literal(std::mem::take(&mut self.pending)));
        }
    }

    /// Split off the longest prefix of the pending run that is a whole
    /// number of `unit`-byte chunks
    pub(crate) fn take_pending_prefix(&mut self, unit: usize) -> Option<Vec<u8>> {
        let take = self.pending.len() / unit * unit;
        if take == 0 {
            return None;
        }
        let rest = self.pending.split_off(take);
        Some(std::mem::replace(&mut self.pending, rest))
    }
}
