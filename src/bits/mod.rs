pub mod reader;
pub mod writer;

pub use reader::BitReader;
pub use writer::BitWriter;

/// Number of bits needed to represent `value` (0 for 0).
pub fn bits_for(value: usize) -> u8 {
    (usize::BITS - value.leading_zeros()) as u8
}
