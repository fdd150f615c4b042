//! Selector parser.
//!
//! Parsing runs in three layers. The selector layer splits the pattern on
//! combinators, the sequence layer splits each sequence into simple
//! selector tokens, and the simple selector grammars type each token.
//! Quotes and brackets suspend combinator and prefix recognition at every
//! layer, and `\` escapes any single character.

mod attribute;
mod path;
mod pseudo;
mod sequence;
mod simple;

use crate::error::ParseError;
use crate::scanner::Scanner;
use crate::selector::{Combinator, Selector};

pub use attribute::parse_attribute;
pub use path::parse_path;
pub use pseudo::parse_pseudo;
pub use sequence::parse_sequence;
pub use simple::parse_simple_selector;

/// Parse a full selector pattern such as `vehicles>car .crossover`.
///
/// # Errors
///
/// Returns a [`ParseError`] for an empty pattern, a malformed simple
/// selector, a combinator with no sequence after it, or a structural
/// violation such as a leading combinator.
///
/// # Example
///
/// ```
/// let selector = sift_selector::parse("article > .news").unwrap();
/// assert_eq!(selector.len(), 2);
/// assert_eq!(selector.to_string(), "article>.news");
/// ```
pub fn parse(pattern: &str) -> Result<Selector, ParseError> {
    let scanner = Scanner::new(pattern);
    if scanner.is_empty() {
        return Err(ParseError::EmptyPattern);
    }

    let mut selector = Selector::new();
    let mut cursor = Some(0);

    while let Some(position) = cursor {
        let (start, combinator) = read_combinator(&scanner, position, selector.is_empty())?;

        let end = scanner.find_any(&Combinator::CHARS, start, false);
        if end == Some(start) {
            return Err(ParseError::DanglingCombinator { position });
        }
        let end = end.unwrap_or(scanner.len());

        let sequence = parse_sequence(&scanner.slice(start, end))?;
        let _ = selector.append_sequence(sequence, combinator)?;
        cursor = (end < scanner.len()).then_some(end);
    }

    Ok(selector)
}

/// Read the combinator in front of the sequence at `position`.
///
/// Whitespace implies a descendant combinator unless an explicit one
/// follows it. Returns the start of the sequence and the combinator, which
/// is `None` only before the first sequence.
fn read_combinator(
    scanner: &Scanner,
    position: usize,
    first: bool,
) -> Result<(usize, Option<Combinator>), ParseError> {
    let dangling = || ParseError::DanglingCombinator { position };

    let mut combinator = if first {
        None
    } else {
        let c = scanner.char_at(position).ok_or_else(dangling)?;
        Some(Combinator::from_char(c).unwrap_or(Combinator::Descendant))
    };
    let mut start = scanner.seek_key(true, position).ok_or_else(dangling)?;

    let explicit = scanner
        .char_at(start)
        .and_then(Combinator::from_char)
        .filter(|explicit| *explicit != Combinator::Descendant);
    if let Some(explicit) = explicit {
        combinator = Some(explicit);
        start = scanner.seek_key(true, start + 1).ok_or_else(dangling)?;
    }

    Ok((start, combinator))
}
