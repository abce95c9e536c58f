//! Longest-match search over the window.
//!
//! Candidates come from a chained hash index keyed on the first
//! `min(min_match, 4)` bytes; every candidate is verified byte by byte, so
//! hash collisions never produce a match.

pub mod finder;
pub mod hash_chain;

pub use finder::{Match, MatchFinder};
pub use hash_chain::HashChain;
