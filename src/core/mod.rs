//! Source text to parse tree: the token stream and the recursive-descent parser.

pub mod lexer;
pub mod parser;
pub mod token;

pub use lexer::Lexer;
pub use parser::Parser;
pub use token::{Token, TokenKind};
