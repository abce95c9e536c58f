use super::token::Token;
use crate::CodecParams;

/// An ordered replay log of tokens plus the parameters it was produced with
///
/// Concatenating the expansions of the tokens in order reproduces the
/// original input. The parameters travel with the tokens so a decoder can
/// reject a stream encoded under a different configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenStream {
    params: CodecParams,
    tokens: Vec<Token>,
}

impl TokenStream {
    pub fn new(params: CodecParams) -> Self {
        Self { params, tokens: Vec::new() }
    }

    pub fn from_tokens(params: CodecParams, tokens: Vec<Token>) -> Self {
        Self { params, tokens }
    }

    pub fn params(&self) -> &CodecParams {
        &self.params
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    /// Total bytes the stream expands to (saturating)
    pub fn uncompressed_size(&self) -> usize {
        self.tokens.iter().fold(0usize, |acc, t| acc.saturating_add(t.uncompressed_size()))
    }

    pub fn stats(&self) -> StreamStats {
        let mut stats = StreamStats::default();
        for token in &self.tokens {
            stats.record(token);
        }
        stats
    }
}

impl<'a> IntoIterator for &'a TokenStream {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

/// Statistics from an encode or decode operation
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StreamStats {
    pub tokens: u64,
    pub literal_tokens: u64,
    pub match_tokens: u64,
    pub literal_bytes: u64,
    pub matched_bytes: u64,
    /// Bytes consumed from the input side (streaming calls only)
    pub input_bytes: u64,
    /// Bytes written to the output side (streaming calls only)
    pub output_bytes: u64,
}

impl StreamStats {
    pub fn record(&mut self, token: &Token) {
        self.tokens += 1;
        match token {
            Token::Literal(run) => {
                self.literal_tokens += 1;
                self.literal_bytes += run.len() as u64;
            }
            Token::Match { length, .. } => {
                self.match_tokens += 1;
                self.matched_bytes += *length as u64;
            }
        }
    }

    pub fn uncompressed_bytes(&self) -> u64 {
        self.literal_bytes + self.matched_bytes
    }
}
