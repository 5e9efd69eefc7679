//! Token kinds, the lexeme vocabulary and the adjacency table.

use std::{collections::BTreeMap, fmt::Display};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Bool(bool),
    And,
    Or,
    Xor,
    Not,
    OpenParen,
    CloseParen,
}

/// Every recognized lexeme and the kind it produces. Matching is ASCII
/// case-insensitive.
pub const LEXEMES: &[(&str, TokenKind)] = &[
    ("true", TokenKind::Bool(true)),
    ("false", TokenKind::Bool(false)),
    ("and", TokenKind::And),
    ("&&", TokenKind::And),
    ("or", TokenKind::Or),
    ("||", TokenKind::Or),
    ("xor", TokenKind::Xor),
    ("^", TokenKind::Xor),
    ("not", TokenKind::Not),
    ("!", TokenKind::Not),
    ("(", TokenKind::OpenParen),
    (")", TokenKind::CloseParen),
];

/// Pairs of operand-like tokens that may appear back to back.
pub const VALID_PAIRS: &[(TokenKind, TokenKind)] = &[
    (TokenKind::OpenParen, TokenKind::Not),
    (TokenKind::And, TokenKind::Not),
    (TokenKind::Or, TokenKind::Not),
    (TokenKind::Xor, TokenKind::Not),
    (TokenKind::Not, TokenKind::Not),
    (TokenKind::Not, TokenKind::OpenParen),
    (TokenKind::And, TokenKind::OpenParen),
    (TokenKind::Or, TokenKind::OpenParen),
    (TokenKind::Xor, TokenKind::OpenParen),
    (TokenKind::OpenParen, TokenKind::OpenParen),
    (TokenKind::CloseParen, TokenKind::And),
    (TokenKind::CloseParen, TokenKind::Or),
    (TokenKind::CloseParen, TokenKind::Xor),
    (TokenKind::CloseParen, TokenKind::CloseParen),
];

impl TokenKind {
    /// Anything but a boolean literal.
    pub fn is_operand_like(self) -> bool {
        !matches!(self, TokenKind::Bool(_))
    }

    /// Whether `next` may directly follow `self`.
    ///
    /// Only meaningful for operand-like kinds; two literals are rejected by
    /// the lexer before the table is consulted.
    pub fn may_precede(self, next: TokenKind) -> bool {
        VALID_PAIRS.contains(&(self, next))
    }

    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Bool(true) => "True",
            TokenKind::Bool(false) => "False",
            TokenKind::And => "And",
            TokenKind::Or => "Or",
            TokenKind::Xor => "Xor",
            TokenKind::Not => "Not",
            TokenKind::OpenParen => "OpenParenthesis",
            TokenKind::CloseParen => "CloseParenthesis",
        }
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Bool(true) => write!(f, "TRUE"),
            TokenKind::Bool(false) => write!(f, "FALSE"),
            TokenKind::And => write!(f, "AND"),
            TokenKind::Or => write!(f, "OR"),
            TokenKind::Xor => write!(f, "XOR"),
            TokenKind::Not => write!(f, "NOT"),
            TokenKind::OpenParen => write!(f, "LEFT_PAREN"),
            TokenKind::CloseParen => write!(f, "RIGHT_PAREN"),
        }
    }
}

/// Candidate lexemes starting with `first` (already lower-cased), longest
/// first so the first hit is the greedy match.
pub fn candidates(first: char) -> &'static [&'static str] {
    match first {
        't' => &["true"],
        'f' => &["false"],
        'a' => &["and"],
        '&' => &["&&"],
        'o' => &["or"],
        '|' => &["||"],
        'x' => &["xor"],
        '^' => &["^"],
        'n' => &["not"],
        '!' => &["!"],
        '(' => &["("],
        ')' => &[")"],
        _ => &[],
    }
}

/// Resolve a lexeme to its kind, ignoring ASCII case.
pub fn lookup(lexeme: &str) -> Option<TokenKind> {
    LEXEMES
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(lexeme))
        .map(|&(_, kind)| kind)
}

/// Help text listing every valid pair, grouped by the leading token.
pub fn accepted_combinations() -> String {
    let mut grouped: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for (prev, next) in VALID_PAIRS {
        grouped.entry(prev.name()).or_default().push(next.name());
    }

    let groups = grouped
        .into_iter()
        .map(|(prev, mut nexts)| {
            nexts.sort_unstable();
            format!("{prev} followed by {}", nexts.join(", "))
        })
        .collect::<Vec<_>>();

    format!("Accepted combinations are: {}", groups.join(", or "))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    const OPERAND_LIKE: [TokenKind; 6] = [
        TokenKind::And,
        TokenKind::Or,
        TokenKind::Xor,
        TokenKind::Not,
        TokenKind::OpenParen,
        TokenKind::CloseParen,
    ];

    #[rstest]
    #[case("TRUE", TokenKind::Bool(true))]
    #[case("False", TokenKind::Bool(false))]
    #[case("aNd", TokenKind::And)]
    #[case("&&", TokenKind::And)]
    #[case("OR", TokenKind::Or)]
    #[case("||", TokenKind::Or)]
    #[case("Xor", TokenKind::Xor)]
    #[case("^", TokenKind::Xor)]
    #[case("NOT", TokenKind::Not)]
    #[case("!", TokenKind::Not)]
    #[case("(", TokenKind::OpenParen)]
    #[case(")", TokenKind::CloseParen)]
    fn lookup_ignores_case(#[case] lexeme: &str, #[case] expected: TokenKind) {
        assert_eq!(lookup(lexeme), Some(expected));
    }

    #[test]
    fn lookup_rejects_unknown_lexemes() {
        assert_eq!(lookup("nand"), None);
        assert_eq!(lookup("&"), None);
        assert_eq!(lookup(""), None);
    }

    #[test]
    fn every_lexeme_is_a_candidate_for_its_first_char() {
        for (lexeme, _) in LEXEMES {
            let first = lexeme.chars().next().unwrap().to_ascii_lowercase();
            assert!(
                candidates(first).contains(lexeme),
                "`{lexeme}` missing from candidates for `{first}`"
            );
        }
    }

    #[test]
    fn adjacency_table_has_exactly_fourteen_pairs() {
        let allowed = OPERAND_LIKE
            .iter()
            .flat_map(|&prev| OPERAND_LIKE.iter().map(move |&next| (prev, next)))
            .filter(|&(prev, next)| prev.may_precede(next))
            .count();
        assert_eq!(allowed, 14);
    }

    #[rstest]
    #[case(TokenKind::OpenParen, TokenKind::CloseParen)]
    #[case(TokenKind::CloseParen, TokenKind::OpenParen)]
    #[case(TokenKind::And, TokenKind::Or)]
    #[case(TokenKind::Not, TokenKind::CloseParen)]
    #[case(TokenKind::CloseParen, TokenKind::Not)]
    #[case(TokenKind::Xor, TokenKind::Xor)]
    fn rejects_pairs_outside_the_table(#[case] prev: TokenKind, #[case] next: TokenKind) {
        assert!(!prev.may_precede(next));
    }

    #[test]
    fn accepted_combinations_are_grouped_and_sorted() {
        let message = accepted_combinations();
        assert!(message.starts_with(
            "Accepted combinations are: And followed by Not, OpenParenthesis, or \
             CloseParenthesis followed by And, CloseParenthesis, Or, Xor"
        ));
        assert!(message.ends_with("Xor followed by Not, OpenParenthesis"));
    }
}
