use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

use crate::{marker::insert_marker, token::accepted_combinations};

/// What went wrong while lexing or parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A non-whitespace character that starts no known lexeme.
    UnsupportedToken,
    /// Two boolean literals recognized back to back.
    InvalidConsecutiveBoolTokens,
    /// Two operators or parentheses forming a pair absent from the adjacency
    /// table.
    InvalidConsecutiveOperands,
    /// A `)` with no open group pending.
    UnbalancedParentheses,
    /// A `(` whose group is not followed by `)`.
    MissingClosingParenthesis,
    /// A token that cannot start a term, or a token left over after a
    /// complete expression.
    UnexpectedToken,
    /// Input ran out while a term was expected.
    UnexpectedEndOfExpression,
    /// Groups and negations nested past the parser's limit.
    NestingTooDeep { max: usize },
}

impl ErrorKind {
    fn help(self) -> Option<String> {
        let help = match self {
            ErrorKind::UnsupportedToken => {
                "supported tokens are: true, false, and, &&, or, ||, xor, ^, not, !, (, )".into()
            }
            ErrorKind::InvalidConsecutiveBoolTokens => {
                "join the values with `and`, `or` or `xor`".into()
            }
            ErrorKind::InvalidConsecutiveOperands => accepted_combinations(),
            ErrorKind::UnbalancedParentheses => {
                "remove this `)` or open a group before it".into()
            }
            ErrorKind::MissingClosingParenthesis => "close the group with `)`".into(),
            ErrorKind::UnexpectedToken => {
                "a term starts with `true`, `false`, `not` or `(`".into()
            }
            ErrorKind::UnexpectedEndOfExpression => {
                "finish the expression with a value or a group".into()
            }
            ErrorKind::NestingTooDeep { .. } => return None,
        };
        Some(help)
    }
}

/// A malformed expression, located at a character `index` of the source.
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
#[error("{}", render(.kind, .expression, .index))]
#[diagnostic(code(boolit::parse))]
pub struct ParseError {
    kind: ErrorKind,

    #[source_code]
    expression: String,

    index: usize,

    #[label("here")]
    span: SourceSpan,

    #[help]
    help: Option<String>,
}

impl ParseError {
    pub(crate) fn new(
        kind: ErrorKind,
        expression: &str,
        index: usize,
        span: impl Into<SourceSpan>,
    ) -> Self {
        ParseError {
            kind,
            expression: expression.to_string(),
            index,
            span: span.into(),
            help: kind.help(),
        }
    }

    /// Reported at the last character of `expression`.
    pub(crate) fn end_of_expression(expression: &str) -> Self {
        Self::at_last_char(ErrorKind::UnexpectedEndOfExpression, expression)
    }

    pub(crate) fn at_last_char(kind: ErrorKind, expression: &str) -> Self {
        let (offset, last) = expression.char_indices().last().unwrap_or((0, ' '));
        let len = if expression.is_empty() { 0 } else { last.len_utf8() };
        let index = expression.chars().count().saturating_sub(1);
        Self::new(kind, expression, index, offset..offset + len)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The full source the error was found in.
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Character index of the offending token.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Byte span of the offending token.
    pub fn span(&self) -> SourceSpan {
        self.span
    }
}

/// `"<description> at index N; \"<source with marker>\""`, except for a
/// premature end which quotes the source untouched.
fn render(kind: &ErrorKind, expression: &str, index: &usize) -> String {
    let index = *index;
    let description = match kind {
        ErrorKind::UnexpectedEndOfExpression => {
            return format!("Unexpected end of expression \"{expression}\"");
        }
        ErrorKind::UnsupportedToken => format!("Unsupported token at index {index}"),
        ErrorKind::InvalidConsecutiveBoolTokens => format!(
            "Invalid consecutive tokens at index {index}; \
             boolean values must be separated by operators: AND, OR, XOR"
        ),
        ErrorKind::InvalidConsecutiveOperands => format!(
            "Invalid consecutive operands at index {index}; {}",
            accepted_combinations()
        ),
        ErrorKind::UnbalancedParentheses => {
            format!("Unmatched closing parenthesis at index {index}")
        }
        ErrorKind::MissingClosingParenthesis => {
            format!("Expected closing parenthesis at or before index {index}")
        }
        ErrorKind::UnexpectedToken => format!("Unexpected token at index {index}"),
        ErrorKind::NestingTooDeep { max } => {
            format!("Nesting deeper than {max} levels at index {index}")
        }
    };
    let marked = insert_marker(expression, index).unwrap_or_else(|_| expression.to_string());
    format!("{description}; \"{marked}\"")
}

/// Errors surfaced by [`Expression`](crate::Expression).
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum Error {
    #[error("Expression cannot be empty or whitespace")]
    #[diagnostic(code(boolit::empty), help("pass an expression such as `true and not false`"))]
    Empty,

    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),
}
