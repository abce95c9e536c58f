/// One unit of the compressed representation
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
    /// A run of bytes copied verbatim
    Literal(Vec<u8>),
    /// A back-reference: copy `length` bytes from `distance` bytes back.
    /// The source may overlap the bytes being produced.
    Match { distance: usize, length: usize },
}

impl Token {
    /// Returns the uncompressed size this token represents
    pub fn uncompressed_size(&self) -> usize {
        match self {
            Token::Literal(run) => run.len(),
            Token::Match { length, .. } => *length,
        }
    }

    pub fn is_match(&self) -> bool {
        matches!(self, Token::Match { .. })
    }
}
