//! Source scanning: the command alphabet, the lexer, and a token listing.

pub mod lexer;
pub mod token;
pub mod token_dumper;
