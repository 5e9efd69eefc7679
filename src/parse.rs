use std::{fmt::Display, mem};

use log::debug;

use crate::{
    error::{ErrorKind, ParseError},
    lex::{Lexer, Token},
    token::TokenKind,
};

/// How many groups and negations may be open at once before the parser
/// gives up.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Syntax tree. Flat chains lean left, so `a and b and c` is
/// `And(And(a, b), c)` and the tree is as deep as the chain is long; display
/// and drop walk it with an explicit stack.
#[derive(Debug, PartialEq, Eq)]
pub enum Node {
    Literal(bool),
    Not(Box<Node>),
    And(Box<Node>, Box<Node>),
    Or(Box<Node>, Box<Node>),
    Xor(Box<Node>, Box<Node>),
}

enum Piece<'a> {
    Node(&'a Node),
    Text(&'static str),
}

impl Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut pending = vec![Piece::Node(self)];
        while let Some(piece) = pending.pop() {
            let node = match piece {
                Piece::Text(text) => {
                    f.write_str(text)?;
                    continue;
                }
                Piece::Node(node) => node,
            };
            match node {
                Node::Literal(value) => write!(f, "{value}")?,
                Node::Not(child) => {
                    f.write_str("(not ")?;
                    pending.extend([Piece::Text(")"), Piece::Node(child)]);
                }
                Node::And(left, right) | Node::Or(left, right) | Node::Xor(left, right) => {
                    let open = match node {
                        Node::And(..) => "(and ",
                        Node::Or(..) => "(or ",
                        _ => "(xor ",
                    };
                    f.write_str(open)?;
                    pending.extend([
                        Piece::Text(")"),
                        Piece::Node(right),
                        Piece::Text(" "),
                        Piece::Node(left),
                    ]);
                }
            }
        }
        Ok(())
    }
}

impl Node {
    /// Move every non-literal child out onto `pending`, leaving literals in
    /// their place.
    fn detach_children(&mut self, pending: &mut Vec<Node>) {
        let mut detach = |child: &mut Box<Node>| {
            if !matches!(**child, Node::Literal(_)) {
                pending.push(mem::replace(&mut **child, Node::Literal(false)));
            }
        };
        match self {
            Node::Literal(_) => {}
            Node::Not(child) => detach(child),
            Node::And(left, right) | Node::Or(left, right) | Node::Xor(left, right) => {
                detach(left);
                detach(right);
            }
        }
    }
}

impl Drop for Node {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.detach_children(&mut pending);
        while let Some(mut node) = pending.pop() {
            node.detach_children(&mut pending);
        }
    }
}

/// Recursive-descent parser over a [`Lexer`].
///
/// ```text
/// expression := term ( (AND | OR | XOR) term )*
/// term       := BOOL | NOT term | '(' expression ')'
/// ```
///
/// The three binary operators share one precedence level and fold left, so
/// `true or false and true` reads as `(true or false) and true`.
pub struct Parser<'de> {
    whole: &'de str,
    lexer: Lexer<'de>,
    current: Option<Token<'de>>,
    parens: usize,
    depth: usize,
    max_depth: usize,
}

impl<'de> Parser<'de> {
    pub fn new(whole: &'de str) -> Self {
        Parser {
            whole,
            lexer: Lexer::new(whole),
            current: None,
            parens: 0,
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Parse the whole input as one expression. Tokens left over once the
    /// top-level expression is complete, as in `(true) false`, are rejected
    /// with [`ErrorKind::UnexpectedToken`] rather than ignored.
    pub fn parse(mut self) -> Result<Node, ParseError> {
        debug!(expression = self.whole, max_depth = self.max_depth; "Parsing expression");

        let parsed = self.parse_expression().and_then(|node| match self.current {
            // anything the top-level loop stopped on is left over
            Some(token) => Err(self.error_at(ErrorKind::UnexpectedToken, token)),
            None => Ok(node),
        });

        match &parsed {
            Ok(node) => debug!(ast:% = node; "Parsed expression"),
            Err(e) => debug!(kind:? = e.kind(), index = e.index(); "Rejected expression"),
        }
        parsed
    }

    /// Pull the next token into `current`; `None` once input is exhausted.
    fn advance(&mut self) -> Result<Option<Token<'de>>, ParseError> {
        self.current = self.lexer.next().transpose()?;
        Ok(self.current)
    }

    fn parse_expression(&mut self) -> Result<Node, ParseError> {
        let mut node = self.parse_term()?;

        while let Some(token) = self.advance()? {
            node = match token.kind {
                TokenKind::And => Node::And(Box::new(node), Box::new(self.parse_term()?)),
                TokenKind::Or => Node::Or(Box::new(node), Box::new(self.parse_term()?)),
                TokenKind::Xor => Node::Xor(Box::new(node), Box::new(self.parse_term()?)),
                TokenKind::CloseParen if self.parens == 0 => {
                    return Err(self.error_at(ErrorKind::UnbalancedParentheses, token));
                }
                _ => break,
            };
        }

        Ok(node)
    }

    fn parse_term(&mut self) -> Result<Node, ParseError> {
        let Some(token) = self.advance()? else {
            return Err(ParseError::end_of_expression(self.whole));
        };

        match token.kind {
            TokenKind::Bool(value) => Ok(Node::Literal(value)),
            TokenKind::Not => {
                self.descend(token)?;
                let child = self.parse_term()?;
                self.depth -= 1;
                Ok(Node::Not(Box::new(child)))
            }
            TokenKind::OpenParen => {
                self.descend(token)?;
                self.parens += 1;
                let node = self.parse_expression()?;

                match self.current {
                    Some(Token {
                        kind: TokenKind::CloseParen,
                        ..
                    }) => {}
                    Some(other) => {
                        return Err(self.error_at(ErrorKind::MissingClosingParenthesis, other));
                    }
                    None => {
                        return Err(ParseError::at_last_char(
                            ErrorKind::MissingClosingParenthesis,
                            self.whole,
                        ));
                    }
                }

                self.parens -= 1;
                self.depth -= 1;
                Ok(node)
            }
            TokenKind::And | TokenKind::Or | TokenKind::Xor | TokenKind::CloseParen => {
                Err(self.error_at(ErrorKind::UnexpectedToken, token))
            }
        }
    }

    fn descend(&mut self, token: Token<'de>) -> Result<(), ParseError> {
        if self.depth >= self.max_depth {
            return Err(self.error_at(
                ErrorKind::NestingTooDeep {
                    max: self.max_depth,
                },
                token,
            ));
        }
        self.depth += 1;
        Ok(())
    }

    fn error_at(&self, kind: ErrorKind, token: Token<'de>) -> ParseError {
        ParseError::new(
            kind,
            self.whole,
            token.index,
            token.offset..token.offset + token.literal.len(),
        )
    }
}
