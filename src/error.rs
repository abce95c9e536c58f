use crate::CodecParams;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Configuration errors
    #[error("Invalid parameter `{name}`: {reason}")]
    InvalidParams { name: &'static str, reason: String },

    #[error("Parameter mismatch: stream encoded with {expected}, decoder expects {found}")]
    ConfigMismatch { expected: CodecParams, found: CodecParams },

    // Stream errors
    #[error("Corrupt stream: {0}")]
    CorruptStream(Corruption),

    #[error("Output limit exceeded: decoding needs more than {limit} bytes")]
    OutputLimitExceeded { limit: usize },

    // Internal errors
    #[error("Unexpected end of input")]
    UnexpectedEof,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// What exactly was wrong with a corrupt stream.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Corruption {
    #[error("match distance is zero")]
    ZeroDistance,

    #[error("match distance {distance} exceeds window size {window_size}")]
    DistanceBeyondWindow { distance: usize, window_size: usize },

    #[error("match distance {distance} exceeds {available} bytes of history")]
    DistanceOutOfRange { distance: usize, available: usize },

    #[error("match length {length} outside {min}..={max}")]
    LengthOutOfRange { length: usize, min: usize, max: usize },

    #[error("stream truncated mid-record")]
    Truncated,

    #[error("literal record with zero length")]
    EmptyLiteralRecord,

    #[error("invalid code {code} (next free code is {next})")]
    InvalidCode { code: u32, next: u32 },

    #[error("stream ended without an end-of-data code")]
    MissingEndMarker,
}

impl Error {
    /// Map a bit-level EOF into stream truncation; everything else passes through.
    pub(crate) fn truncated(self) -> Self {
        match self {
            Error::UnexpectedEof => Error::CorruptStream(Corruption::Truncated),
            other => other,
        }
    }
}

impl From<Corruption> for Error {
    fn from(corruption: Corruption) -> Self {
        Error::CorruptStream(corruption)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
