//! Scanner for control files: names, strings, numbers and bracketed vectors.

mod error;
mod lexer;


pub use error::{ParseError, Position};
pub use lexer::{Token, Tokenizer};
