use super::{check_match, Encoder};
use crate::error::{Corruption, Error, Result};
use crate::tokens::{StreamStats, Token};
use crate::window::{History, LookaheadBuffer, SlidingWindow};
use crate::wire::{EndOfStream, TokenReader, TokenWriter, WireFormat};
use crate::{CodecParams, EncodeOptions, NO_OUTPUT_LIMIT};
use std::io::{BufReader, BufWriter, Read, Write};

/// Default read chunk and I/O buffer size
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Bounded-memory compressor over `Read`/`Write`
///
/// Produces exactly the bytes [`LzCodec`](super::LzCodec) would for the same
/// input, while holding no more than the window, one match of lookahead and
/// one read chunk in memory.
#[derive(Clone, Debug)]
pub struct StreamEncoder {
    params: CodecParams,
    options: EncodeOptions,
    format: WireFormat,
    chunk_size: usize,
}

impl StreamEncoder {
    pub fn new(params: CodecParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            params,
            options: EncodeOptions::default(),
            format: WireFormat::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        })
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

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn encode_stream<R: Read, W: Write>(
        &mut self,
        mut input: R,
        output: W,
    ) -> Result<StreamStats> {
        let mut writer = BufWriter::with_capacity(self.chunk_size, output);

        // Phase 1: Initialize components
        let mut encoder = Encoder::new(self.params, self.options)?;
        let mut tokens: Vec<Token> = Vec::with_capacity(1024);
        let mut token_writer = TokenWriter::new(self.params, self.format);

        let margin = self.params.max_match + 1;
        // Oldest byte still needed: the window behind the last match start
        let history = self.params.window_size + self.params.max_match;
        let mut buffer = LookaheadBuffer::with_capacity(history + margin + self.chunk_size);
        let unit = self.format.max_literal_run();

        let mut stats = StreamStats::default();
        let mut run_open = false;
        let mut pos = 0usize;

        // Phase 2: Scan each chunk up to where a full match of lookahead remains
        loop {
            stats.input_bytes += buffer.refill(&mut input, self.chunk_size)? as u64;

            let until = if buffer.is_eof() {
                buffer.end()
            } else {
                buffer.end().saturating_sub(margin)
            };
            if pos < until {
                pos = encoder.scan(buffer.data(), buffer.base(), pos, until, &mut tokens);
            }

            for token in tokens.drain(..) {
                record(&mut stats, &mut run_open, &token);
                token_writer.write_token(&token)?;
            }

            if buffer.is_eof() {
                break;
            }

            // Emit whole records of a long literal run early; the wire bytes are
            // the same as if the run were written in one piece.
            if let Some(prefix) = encoder.take_pending_prefix(unit) {
                let token = Token::Literal(prefix);
                record(&mut stats, &mut run_open, &token);
                token_writer.write_token(&token)?;
            }

            token_writer.drain_to(&mut writer)?;
            buffer.discard_before(pos.saturating_sub(history), self.chunk_size);
        }

        // Phase 3: Flush the final run and terminate
        encoder.flush(&mut tokens);
        for token in tokens.drain(..) {
            record(&mut stats, &mut run_open, &token);
            token_writer.write_token(&token)?;
        }

        stats.output_bytes = token_writer.finish_into(&mut writer)?;
        writer.flush()?;

        Ok(stats)
    }
}

/// Count a token, treating consecutive literal pieces as one run
fn record(stats: &mut StreamStats, run_open: &mut bool, token: &Token) {
    match token {
        Token::Literal(run) if *run_open => stats.literal_bytes += run.len() as u64,
        Token::Literal(_) => {
            stats.record(token);
            *run_open = true;
        }
        Token::Match { .. } => {
            stats.record(token);
            *run_open = false;
        }
    }
}

/// Bounded-memory decompressor over `Read`/`Write`
///
/// History lives in a [`SlidingWindow`] ring, so memory stays at about W
/// regardless of output size. Output is written as it is produced: when an
/// error is returned, bytes before the failure have already reached the sink.
#[derive(Clone, Debug)]
pub struct StreamDecoder {
    params: CodecParams,
    format: WireFormat,
    max_output_size: usize,
    /// Records to read when the stream has no sentinel
    record_count: Option<u64>,
}

impl StreamDecoder {
    pub fn new(params: CodecParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            params,
            format: WireFormat::default(),
            max_output_size: NO_OUTPUT_LIMIT,
            record_count: None,
        })
    }

    pub fn with_format(mut self, format: WireFormat) -> Result<Self> {
        format.validate()?;
        self.format = format;
        Ok(self)
    }

    pub fn with_output_limit(mut self, limit: usize) -> Self {
        self.max_output_size = limit;
        self
    }

    /// Record count for [`EndOfStream::External`] streams; a sentinel-terminated
    /// stream refuses one
    pub fn with_record_count(mut self, records: u64) -> Self {
        self.record_count = Some(records);
        self
    }

    pub fn decode_stream<R: Read, W: Write>(&mut self, input: R, output: W) -> Result<StreamStats> {
        let mut remaining = match (self.format.end_of_stream, self.record_count) {
            (EndOfStream::Sentinel, None) => None,
            (EndOfStream::Sentinel, Some(_)) => {
                return Err(Error::InvalidParams {
                    name: "end_of_stream",
                    reason: "record counts only apply to externally terminated streams".to_string(),
                });
            }
            (EndOfStream::External, Some(records)) => Some(records),
            (EndOfStream::External, None) => {
                return Err(Error::InvalidParams {
                    name: "end_of_stream",
                    reason: "external termination needs a record count".to_string(),
                });
            }
        };

        let reader = BufReader::with_capacity(DEFAULT_CHUNK_SIZE, input);
        let mut writer = BufWriter::with_capacity(DEFAULT_CHUNK_SIZE, output);
        let mut tokens = TokenReader::new(reader, self.params, self.format);
        let mut window = SlidingWindow::new(self.params.window_size);
        let mut scratch = Vec::with_capacity(self.params.max_match);
        let mut stats = StreamStats::default();

        loop {
            if let Some(left) = remaining.as_mut() {
                if *left == 0 {
                    break;
                }
                *left -= 1;
            }
            let Some(token) = tokens.read_token()? else {
                if remaining.is_some() {
                    return Err(Corruption::Truncated.into());
                }
                break;
            };

            if let Token::Match { distance, length } = token {
                check_match(&self.params, distance, length, window.reachable())?;
            }
            if window.position().saturating_add(token.uncompressed_size()) > self.max_output_size {
                return Err(Error::OutputLimitExceeded { limit: self.max_output_size });
            }

            match &token {
                Token::Literal(run) => {
                    window.push_bytes(run);
                    writer.write_all(run)?;
                }
                Token::Match { distance, length } => {
                    scratch.clear();
                    window.replay_with(*distance, *length, |b| scratch.push(b));
                    writer.write_all(&scratch)?;
                }
            }
            stats.record(&token);
        }

        writer.flush()?;
        stats.input_bytes = tokens.bytes_read();
        stats.output_bytes = window.position() as u64;
        Ok(stats)
    }
}
