//! Splits one sequence (`article.news[year>2020]:limit(5)`) into simple
//! selector tokens.

use super::simple::{PREFIX_CHARS, kind_for, parse_simple_selector};
use crate::error::ParseError;
use crate::scanner::Scanner;
use crate::selector::{SelectorKind, Sequence};

/// Parse a sequence of simple selectors with no combinators between them.
///
/// # Errors
///
/// Fails when a token does not parse, or when a universal, element or path
/// selector is not the first token.
pub fn parse_sequence(pattern: &str) -> Result<Sequence, ParseError> {
    let scanner = Scanner::new(pattern);
    let mut sequence = Sequence::new();
    let mut cursor = scanner.seek_key(true, 0);

    while let Some(start) = cursor {
        let end = token_end(&scanner, start);
        let token = scanner.slice(start, end);
        sequence.append(parse_simple_selector(&token)?)?;
        cursor = scanner.seek_key(true, end);
    }

    Ok(sequence)
}

/// Exclusive end of the token starting at `start`.
fn token_end(scanner: &Scanner, start: usize) -> usize {
    let end = match scanner.char_at(start).and_then(kind_for) {
        // Paths contain `/`, `#`, `$`, `.` and `*` freely.
        Some(SelectorKind::Path) => scanner.find_any(&['[', ':'], start + 1, false),
        Some(SelectorKind::Attribute) => scanner.enclosure_end(start).map(|close| close + 1),
        _ => scanner.find_any(&PREFIX_CHARS, start + 1, false),
    };
    end.unwrap_or(scanner.len())
}
