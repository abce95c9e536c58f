use super::check_match;
use crate::error::{Error, Result};
use crate::tokens::{Token, TokenStream};
use crate::window::History;
use crate::{CodecParams, NO_OUTPUT_LIMIT};

/// Up-front reservation cap so a lying stream cannot force a huge allocation
const MAX_RESERVE: usize = 1 << 26;

/// Replays a token stream into bytes
///
/// Reading: literals are appended verbatim; a match copies from the output
/// produced so far, one chunk of at most `distance` bytes at a time, so
/// overlapping references repeat correctly. Done: the token list is
/// exhausted. Any invalid reference or an output-guard breach stops
/// decoding with an error and no output.
#[derive(Clone, Debug)]
pub struct Decoder {
    params: CodecParams,
    max_output_size: usize,
}

/// Result of a best-effort decode
#[derive(Debug)]
pub struct PartialDecode {
    /// Bytes produced before the first failure (all of them on success)
    pub output: Vec<u8>,
    /// The failure that stopped decoding, if any
    pub error: Option<Error>,
}

impl PartialDecode {
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }
}

impl Decoder {
    pub fn new(params: CodecParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { params, max_output_size: NO_OUTPUT_LIMIT })
    }

    /// Fail with [`Error::OutputLimitExceeded`] rather than produce more than `limit` bytes
    pub fn with_output_limit(mut self, limit: usize) -> Self {
        self.max_output_size = limit;
        self
    }

    pub fn params(&self) -> &CodecParams {
        &self.params
    }

    pub fn max_output_size(&self) -> usize {
        self.max_output_size
    }

    /// Decode a stream, first checking it was encoded with our parameters
    pub fn decode(&self, stream: &TokenStream) -> Result<Vec<u8>> {
        self.params.ensure_matches(stream.params())?;

        if stream.uncompressed_size() > self.max_output_size {
            return Err(Error::OutputLimitExceeded { limit: self.max_output_size });
        }
        self.decode_tokens(stream.tokens())
    }

    /// Decode a bare token sequence assumed to follow our parameters
    pub fn decode_tokens(&self, tokens: &[Token]) -> Result<Vec<u8>> {
        let mut output = Vec::with_capacity(self.reserve_hint(tokens));
        for token in tokens {
            self.apply(&mut output, token)?;
        }
        Ok(output)
    }

    /// Decode as far as possible, keeping the bytes produced before a failure
    pub fn decode_partial(&self, tokens: &[Token]) -> PartialDecode {
        let mut output = Vec::with_capacity(self.reserve_hint(tokens));
        for token in tokens {
            if let Err(error) = self.apply(&mut output, token) {
                return PartialDecode { output, error: Some(error) };
            }
        }
        PartialDecode { output, error: None }
    }

    /// Apply one token to `history`, validating it against the bytes produced so far
    pub fn apply<H: History>(&self, history: &mut H, token: &Token) -> Result<()> {
        if let Token::Match { distance, length } = *token {
            check_match(&self.params, distance, length, history.position())?;
        }

        if history.position().saturating_add(token.uncompressed_size()) > self.max_output_size {
            return Err(Error::OutputLimitExceeded { limit: self.max_output_size });
        }

        match token {
            Token::Literal(run) => history.extend_bytes(run),
            Token::Match { distance, length } => history.replay(*distance, *length),
        }
        Ok(())
    }

    fn reserve_hint(&self, tokens: &[Token]) -> usize {
        tokens
            .iter()
            .fold(0usize, |acc, t| acc.saturating_add(t.uncompressed_size()))
            .min(self.max_output_size)
            .min(MAX_RESERVE)
    }
}
