//! Marker insertion: point at an offending character inside a copy of the
//! source so that diagnostics read well on a single line.

use thiserror::Error;

pub const MARKER: char = '*';

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarkerError {
    #[error("expression cannot be empty")]
    Empty,

    #[error("index {index} is outside the expression (length {len})")]
    OutOfBounds { index: usize, len: usize },
}

/// Insert [`MARKER`] next to the character at `index` (a char index, not a
/// byte offset).
///
/// The marker goes in front of the first character and behind the last one.
/// Elsewhere it hugs the token: placed at `index` when the preceding
/// character is whitespace, otherwise right after `index`.
///
/// ```
/// assert_eq!(
///     boolit::insert_marker("true and && true", 9).unwrap(),
///     "true and *&& true",
/// );
/// ```
pub fn insert_marker(expression: &str, index: usize) -> Result<String, MarkerError> {
    if expression.is_empty() {
        return Err(MarkerError::Empty);
    }

    let chars = expression.chars().collect::<Vec<_>>();
    let len = chars.len();
    if index > len {
        return Err(MarkerError::OutOfBounds { index, len });
    }

    let insert_at = if index == 0 {
        0
    } else if index + 1 >= len {
        // last character, or one past it
        len
    } else if chars[index - 1].is_whitespace() {
        index
    } else {
        // whether or not `index + 1` is whitespace the marker lands there
        index + 1
    };

    let mut marked = String::with_capacity(expression.len() + MARKER.len_utf8());
    marked.extend(&chars[..insert_at]);
    marked.push(MARKER);
    marked.extend(&chars[insert_at..]);
    Ok(marked)
}
