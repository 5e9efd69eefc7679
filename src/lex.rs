use std::{fmt::Display, iter::FusedIterator};

use log::trace;

use crate::{
    error::{ErrorKind, ParseError},
    token::{TokenKind, candidates, lookup},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'de> {
    pub kind: TokenKind,
    /// The lexeme as written in the source, original casing kept.
    pub literal: &'de str,
    /// Byte offset into the source.
    pub offset: usize,
    /// Character index into the source; this is what diagnostics report.
    pub index: usize,
}

impl Display for Token<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.kind, self.literal, self.index)
    }
}

/// On-demand tokenizer.
///
/// Every token is checked against the one emitted before it, so most
/// malformed adjacency (`true false`, `and or`, `()`) is rejected here rather
/// than in the parser. The first error ends the stream.
pub struct Lexer<'de> {
    whole: &'de str,
    rest: &'de str,
    byte: usize,
    index: usize,
    previous: Option<TokenKind>,
    failed: bool,
}

impl<'de> Lexer<'de> {
    pub fn new(input: &'de str) -> Self {
        let mut lexer = Lexer {
            whole: input,
            rest: input,
            byte: 0,
            index: 0,
            previous: None,
            failed: false,
        };
        lexer.skip_whitespace();
        lexer
    }

    fn skip_whitespace(&mut self) {
        let trimmed = self.rest.trim_start();
        let skipped = &self.rest[..self.rest.len() - trimmed.len()];
        self.byte += skipped.len();
        self.index += skipped.chars().count();
        self.rest = trimmed;
    }

    fn validate(&self, kind: TokenKind, len: usize) -> Result<(), ParseError> {
        let Some(previous) = self.previous else {
            return Ok(());
        };

        let rejected = match (previous, kind) {
            (TokenKind::Bool(_), TokenKind::Bool(_)) => ErrorKind::InvalidConsecutiveBoolTokens,
            (prev, next)
                if prev.is_operand_like() && next.is_operand_like() && !prev.may_precede(next) =>
            {
                ErrorKind::InvalidConsecutiveOperands
            }
            _ => return Ok(()),
        };

        Err(ParseError::new(
            rejected,
            self.whole,
            self.index,
            self.byte..self.byte + len,
        ))
    }

    fn fail(&mut self, error: ParseError) -> Option<Result<Token<'de>, ParseError>> {
        self.failed = true;
        Some(Err(error))
    }
}

impl<'de> Iterator for Lexer<'de> {
    type Item = Result<Token<'de>, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        self.skip_whitespace();

        let rest = self.rest;
        let c = rest.chars().next()?;

        let matched = candidates(c.to_ascii_lowercase())
            .iter()
            .find_map(|&lexeme| {
                let head = rest.get(..lexeme.len())?;
                if head.eq_ignore_ascii_case(lexeme) {
                    lookup(lexeme).map(|kind| (head, kind))
                } else {
                    None
                }
            });

        let Some((literal, kind)) = matched else {
            return self.fail(ParseError::new(
                ErrorKind::UnsupportedToken,
                self.whole,
                self.index,
                self.byte..self.byte + c.len_utf8(),
            ));
        };

        if let Err(e) = self.validate(kind, literal.len()) {
            return self.fail(e);
        }

        let token = Token {
            kind,
            literal,
            offset: self.byte,
            index: self.index,
        };
        trace!(kind:? = token.kind, index = token.index; "Recognized token");

        self.rest = &rest[literal.len()..];
        self.byte += literal.len();
        self.index += literal.chars().count();
        self.previous = Some(kind);
        self.skip_whitespace();

        Some(Ok(token))
    }
}

impl FusedIterator for Lexer<'_> {}
