//! Concrete bit-level encoding of a token stream.
//!
//! Records are packed LSB-first. Each starts with a 1-bit tag:
//!
//! ```text
//! 0 | n: literal_bits      | n bytes (8 bits each)     literal record, n >= 1
//! 0 | 0: literal_bits      |                           end-of-stream sentinel
//! 1 | distance-1: Db       | length-min_match: Lb      match record
//! ```
//!
//! `Db = bits_for(W - 1)` and `Lb = bits_for(max_match - min_match)`, so the
//! field widths follow from [`CodecParams`](crate::CodecParams). The writer
//! pads the final byte with zero bits. With [`EndOfStream::External`] no
//! sentinel is written and the surrounding container supplies the record
//! count instead.

pub mod format;
pub mod reader;
pub mod writer;

pub use format::{EndOfStream, WireFormat};
pub use reader::TokenReader;
pub use writer::TokenWriter;
