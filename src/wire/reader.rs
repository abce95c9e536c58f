use super::format::{EndOfStream, WireFormat};
use crate::bits::BitReader;
use crate::error::{Corruption, Error, Result};
use crate::tokens::{Token, TokenStream};
use crate::CodecParams;
use std::io::Read;

/// Parses the wire format back into tokens
///
/// Field values are checked against the parameters as they are read
/// (distance within W, length within bounds); whether a distance reaches
/// into bytes that actually exist is the decoder's concern.
pub struct TokenReader<R: Read> {
    bits: BitReader<R>,
    params: CodecParams,
    format: WireFormat,
    distance_bits: u8,
    length_bits: u8,
    /// Sentinel seen
    finished: bool,
    records: u64,
}

impl<R: Read> TokenReader<R> {
    pub fn new(reader: R, params: CodecParams, format: WireFormat) -> Self {
        Self {
            bits: BitReader::new(reader),
            distance_bits: params.distance_bits(),
            length_bits: params.length_bits(),
            params,
            format,
            finished: false,
            records: 0,
        }
    }

    /// Read the next record. Returns `None` once the sentinel has been read.
    ///
    /// With [`EndOfStream::External`] this never returns `None`; the caller
    /// stops after the number of records it was told about.
    pub fn read_token(&mut self) -> Result<Option<Token>> {
        if self.finished {
            return Ok(None);
        }
        self.read_record().map_err(Error::truncated)
    }

    fn read_record(&mut self) -> Result<Option<Token>> {
        let is_match = self.bits.read_bit()?;

        if !is_match {
            let run = self.bits.read_bits(self.format.literal_bits)? as usize;
            if run == 0 {
                return match self.format.end_of_stream {
                    EndOfStream::Sentinel => {
                        self.finished = true;
                        Ok(None)
                    }
                    EndOfStream::External => Err(Corruption::EmptyLiteralRecord.into()),
                };
            }

            let mut bytes = Vec::with_capacity(run);
            for _ in 0..run {
                bytes.push(self.bits.read_byte()?);
            }
            self.records += 1;
            return Ok(Some(Token::Literal(bytes)));
        }

        let distance = self.bits.read_bits(self.distance_bits)? as usize + 1;
        let length = self.bits.read_bits(self.length_bits)? as usize + self.params.min_match;

        if distance > self.params.window_size {
            return Err(Corruption::DistanceBeyondWindow {
                distance,
                window_size: self.params.window_size,
            }
            .into());
        }
        if length > self.params.max_match {
            return Err(Corruption::LengthOutOfRange {
                length,
                min: self.params.min_match,
                max: self.params.max_match,
            }
            .into());
        }

        self.records += 1;
        Ok(Some(Token::Match { distance, length }))
    }

    /// Read every record up to the sentinel
    pub fn read_all(mut self) -> Result<TokenStream> {
        if self.format.end_of_stream == EndOfStream::External {
            return Err(Error::InvalidParams {
                name: "end_of_stream",
                reason: "external termination needs a record count".to_string(),
            });
        }

        let mut stream = TokenStream::new(self.params);
        while let Some(token) = self.read_token()? {
            stream.push(token);
        }
        Ok(stream)
    }

    /// Read exactly `records` records (the count a container supplied)
    pub fn read_counted(mut self, records: u64) -> Result<TokenStream> {
        if self.format.end_of_stream == EndOfStream::Sentinel {
            return Err(Error::InvalidParams {
                name: "end_of_stream",
                reason: "record counts only apply to externally terminated streams".to_string(),
            });
        }

        let mut stream = TokenStream::new(self.params);
        for _ in 0..records {
            match self.read_token()? {
                Some(token) => stream.push(token),
                None => return Err(Corruption::Truncated.into()),
            }
        }
        Ok(stream)
    }

    /// Records read so far (sentinel excluded)
    pub fn records(&self) -> u64 {
        self.records
    }

    pub fn bytes_read(&self) -> u64 {
        self.bits.bytes_read()
    }
}
