//! Parse and evaluate boolean-logic expressions.
//!
//! The vocabulary is `true`, `false`, `and`/`&&`, `or`/`||`, `xor`/`^`,
//! `not`/`!` and parentheses, matched without regard to ASCII case. The binary
//! operators share a single precedence level and are applied left to right.
//!
//! ```
//! assert!(boolit::parse("true or false and true").unwrap().evaluate());
//!
//! let err = boolit::parse("true && and false").unwrap_err();
//! assert_eq!(err.kind(), boolit::ErrorKind::InvalidConsecutiveOperands);
//! assert_eq!(err.index(), 8);
//! ```

pub mod error;
pub mod eval;
pub mod expression;
pub mod lex;
pub mod marker;
pub mod parse;
pub mod token;

pub use error::{Error, ErrorKind, ParseError};
pub use eval::evaluate;
pub use expression::Expression;
pub use lex::{Lexer, Token};
pub use marker::{MarkerError, insert_marker};
pub use parse::{DEFAULT_MAX_DEPTH, Node, Parser};
pub use token::TokenKind;

/// Parse `input` with the default nesting limit.
pub fn parse(input: &str) -> Result<Node, ParseError> {
    Parser::new(input).parse()
}
