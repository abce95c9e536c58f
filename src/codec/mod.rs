//! Sliding-window codec drivers.
//!
//! The [`Encoder`] turns bytes into a [`TokenStream`](crate::TokenStream) and
//! the [`Decoder`] replays it. [`LzCodec`] couples both to the wire format;
//! the streaming variants do the same over `Read`/`Write` with bounded memory.

pub mod decoder;
pub mod encoder;
pub mod streaming;

pub use decoder::{Decoder, PartialDecode};
pub use encoder::Encoder;
pub use streaming::{StreamDecoder, StreamEncoder};

use crate::error::{Corruption, Result};
use crate::tokens::StreamStats;
use crate::wire::{EndOfStream, TokenReader, TokenWriter, WireFormat};
use crate::{Codec, CodecParams, EncodeOptions, Error};

/// Validate a back-reference against the parameters and the `available` history.
///
/// Checks run in a fixed order so every decoder reports the same error for
/// the same bad token.
pub(crate) fn check_match(
    params: &CodecParams,
    distance: usize,
    length: usize,
    available: usize,
) -> std::result::Result<(), Corruption> {
    if distance == 0 {
        return Err(Corruption::ZeroDistance);
    }
    if distance > params.window_size {
        return Err(Corruption::DistanceBeyondWindow { distance, window_size: params.window_size });
    }
    if distance > available {
        return Err(Corruption::DistanceOutOfRange { distance, available });
    }
    if length < params.min_match || length > params.max_match {
        return Err(Corruption::LengthOutOfRange {
            length,
            min: params.min_match,
            max: params.max_match,
        });
    }
    Ok(())
}

/// Sliding-window compressor producing the bit-packed wire format
#[derive(Clone, Debug)]
pub struct LzCodec {
    params: CodecParams,
    options: EncodeOptions,
    format: WireFormat,
}

impl LzCodec {
    pub fn new(params: CodecParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { params, options: EncodeOptions::default(), format: WireFormat::default() })
    }

    pub fn with_options(mut self, options: EncodeOptions) -> Result<Self> {
        options.validate()?;
        self.options = options;
        Ok(self)
    }

    pub fn with_format(mut self, format: WireFormat) -> Result<Self> {
        format.validate()?;
        self.format = format;
        Ok(self)
    }

    pub fn params(&self) -> &CodecParams {
        &self.params
    }

    pub fn options(&self) -> &EncodeOptions {
        &self.options
    }

    pub fn format(&self) -> &WireFormat {
        &self.format
    }

    /// Compress and return the wire bytes together with the record count
    /// an [`EndOfStream::External`] container has to store.
    pub fn compress_counted(&self, input: &[u8]) -> Result<(Vec<u8>, u64)> {
        let (writer, _) = self.serialize(input)?;
        let records = writer.records();
        Ok((writer.finish(), records))
    }

    /// Compress and report token statistics alongside the wire bytes
    pub fn compress_with_stats(&self, input: &[u8]) -> Result<(Vec<u8>, StreamStats)> {
        let (writer, mut stats) = self.serialize(input)?;
        let bytes = writer.finish();
        stats.input_bytes = input.len() as u64;
        stats.output_bytes = bytes.len() as u64;
        Ok((bytes, stats))
    }

    fn serialize(&self, input: &[u8]) -> Result<(TokenWriter, StreamStats)> {
        let stream = Encoder::new(self.params, self.options)?.encode(input);

        let mut writer = TokenWriter::new(self.params, self.format);
        for token in stream.iter() {
            writer.write_token(token)?;
        }
        Ok((writer, stream.stats()))
    }

    /// Decompress a stream of exactly `records` records
    pub fn decompress_counted(
        &self,
        input: &[u8],
        records: u64,
        max_output_size: usize,
    ) -> Result<Vec<u8>> {
        let stream = TokenReader::new(input, self.params, self.format).read_counted(records)?;
        self.decoder(max_output_size)?.decode(&stream)
    }

    fn decoder(&self, max_output_size: usize) -> Result<Decoder> {
        Ok(Decoder::new(self.params)?.with_output_limit(max_output_size))
    }
}

impl Codec for LzCodec {
    fn compress(&mut self, input: &[u8]) -> Result<Vec<u8>> {
        self.serialize(input).map(|(writer, _)| writer.finish())
    }

    fn decompress(&mut self, input: &[u8], max_output_size: usize) -> Result<Vec<u8>> {
        if self.format.end_of_stream == EndOfStream::External {
            return Err(Error::InvalidParams {
                name: "end_of_stream",
                reason: "use decompress_counted for externally terminated streams".to_string(),
            });
        }
        let stream = TokenReader::new(input, self.params, self.format).read_all()?;
        self.decoder(max_output_size)?.decode(&stream)
    }
}
