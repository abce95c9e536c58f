use crate::error::{Error, Result};

/// How the end of a token stream is signalled
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum EndOfStream {
    /// A zero-length literal record terminates the stream
    #[default]
    Sentinel,
    /// No terminator; the caller knows how many records to read
    External,
}

/// Wire-level layout choices that are independent of [`CodecParams`](crate::CodecParams)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WireFormat {
    /// Width of the literal-run length field (1-16); longer runs are chunked
    pub literal_bits: u8,
    pub end_of_stream: EndOfStream,
}

impl WireFormat {
    pub fn validate(&self) -> Result<()> {
        if !(1..=16).contains(&self.literal_bits) {
            return Err(Error::InvalidParams {
                name: "literal_bits",
                reason: format!("{} not in 1..=16", self.literal_bits),
            });
        }
        Ok(())
    }

    /// Longest literal run a single record can carry
    pub fn max_literal_run(&self) -> usize {
        (1usize << self.literal_bits) - 1
    }
}

impl Default for WireFormat {
    fn default() -> Self {
        Self { literal_bits: 8, end_of_stream: EndOfStream::Sentinel }
    }
}
