use std::{fmt::Display, str::FromStr, sync::OnceLock};

use log::debug;

use crate::{
    error::{Error, ParseError},
    parse::{DEFAULT_MAX_DEPTH, Parser},
};

/// A boolean expression whose value is worked out on first use and then
/// cached, errors included.
///
/// ```
/// use boolit::Expression;
///
/// let expression = Expression::new("true or false and false").unwrap();
/// assert!(!expression.evaluate().unwrap());
/// assert_eq!(
///     expression.to_string(),
///     "Expression: \"true or false and false\" evaluates to false",
/// );
/// ```
#[derive(Debug)]
pub struct Expression {
    source: String,
    max_depth: usize,
    outcome: OnceLock<Result<bool, ParseError>>,
}

impl Expression {
    /// Fails with [`Error::Empty`] when `source` is empty or only whitespace.
    pub fn new(source: impl Into<String>) -> Result<Self, Error> {
        let source = source.into();
        if source.trim().is_empty() {
            return Err(Error::Empty);
        }
        Ok(Expression {
            source,
            max_depth: DEFAULT_MAX_DEPTH,
            outcome: OnceLock::new(),
        })
    }

    /// Nesting limit handed to the parser; see [`Parser::with_max_depth`].
    /// Drops any outcome cached under the previous limit.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self.outcome = OnceLock::new();
        self
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Lex, parse and evaluate on the first call; later calls, from any
    /// thread, return the cached outcome.
    pub fn evaluate(&self) -> Result<bool, Error> {
        self.outcome
            .get_or_init(|| {
                debug!(expression = self.source.as_str(); "Evaluating expression");
                Parser::new(&self.source)
                    .with_max_depth(self.max_depth)
                    .parse()
                    .map(|ast| ast.evaluate())
            })
            .clone()
            .map_err(Error::from)
    }
}

impl FromStr for Expression {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Expression::new(s)
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.evaluate() {
            Ok(value) => write!(f, "Expression: \"{}\" evaluates to {value}", self.source),
            Err(e) => write!(f, "Expression: \"{}\" is invalid: {e}", self.source),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, thread};

    use rstest::rstest;

    use super::*;
    use crate::error::ErrorKind;

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("\t\n")]
    fn rejects_blank_source(#[case] source: &str) {
        assert_eq!(Expression::new(source).unwrap_err(), Error::Empty);
        assert!(source.parse::<Expression>().is_err());
    }

    #[test]
    fn caches_the_outcome() {
        let expression = Expression::new("!(true ^ false)").unwrap();
        assert!(expression.outcome.get().is_none());
        assert_eq!(expression.evaluate(), Ok(false));
        assert!(expression.outcome.get().is_some());
        assert_eq!(expression.evaluate(), Ok(false));
    }

    #[test]
    fn caches_failures_too() {
        let expression = Expression::new("true and").unwrap();
        let first = expression.evaluate().unwrap_err();
        let second = expression.evaluate().unwrap_err();
        assert_eq!(first, second);
        assert!(
            matches!(first, Error::Parse(ref e) if e.kind() == ErrorKind::UnexpectedEndOfExpression)
        );
    }

    #[test]
    fn displays_value_or_error() {
        let ok = Expression::new("not false").unwrap();
        assert_eq!(ok.to_string(), "Expression: \"not false\" evaluates to true");

        let bad = Expression::new("true true").unwrap();
        assert_eq!(
            bad.to_string(),
            "Expression: \"true true\" is invalid: Invalid consecutive tokens at index 5; \
             boolean values must be separated by operators: AND, OR, XOR; \"true *true\""
        );
    }

    #[test]
    fn honours_the_nesting_limit() {
        let expression = Expression::new("((true))").unwrap().with_max_depth(1);
        assert!(matches!(
            expression.evaluate(),
            Err(Error::Parse(ref e)) if e.kind() == ErrorKind::NestingTooDeep { max: 1 }
        ));
    }

    #[test]
    fn changing_the_limit_discards_the_cached_outcome() {
        let expression = Expression::new("((true))").unwrap();
        assert_eq!(expression.evaluate(), Ok(true));

        let expression = expression.with_max_depth(1);
        assert!(matches!(
            expression.evaluate(),
            Err(Error::Parse(ref e)) if e.kind() == ErrorKind::NestingTooDeep { max: 1 }
        ));
    }

    #[test]
    fn keeps_the_source_as_given() {
        let expression: Expression = "  TRUE && !false ".parse().unwrap();
        assert_eq!(expression.source(), "  TRUE && !false ");
        assert_eq!(expression.evaluate(), Ok(true));
    }

    #[test]
    fn shared_instance_evaluates_consistently_across_threads() {
        let expression = Arc::new(Expression::new("(true or false) xor not false").unwrap());
        let handles = (0..8)
            .map(|_| {
                let expression = Arc::clone(&expression);
                thread::spawn(move || expression.evaluate())
            })
            .collect::<Vec<_>>();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), Ok(false));
        }
    }
}
