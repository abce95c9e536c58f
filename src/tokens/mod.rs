pub mod stream;
pub mod token;

pub use stream::{StreamStats, TokenStream};
pub use token::Token;
