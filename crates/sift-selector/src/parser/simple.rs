//! Simple selector dispatch.
//!
//! Every simple selector is recognised by its enclosure: the character it
//! starts with and, for attributes, the one it ends with. The grammar
//! table below is tried in order and the first matching row parses the
//! token.

use super::{attribute, path, pseudo};
use crate::error::ParseError;
use crate::scanner::{ESCAPE, unescape};
use crate::selector::{SelectorKind, SimpleSelector};

/// How a grammar recognises the first character of a token.
#[derive(Debug, Clone, Copy)]
enum Prefix {
    Char(char),
    WordChar,
}

impl Prefix {
    fn matches(self, c: char) -> bool {
        match self {
            Self::Char(prefix) => c == prefix,
            Self::WordChar => c.is_alphanumeric() || c == '_',
        }
    }
}

struct Grammar {
    kind: SelectorKind,
    prefix: Prefix,
    suffix: Option<char>,
    /// Parses the token with prefix and suffix already removed
    parse: fn(&str) -> Result<SimpleSelector, ParseError>,
}

static GRAMMARS: [Grammar; 8] = [
    Grammar {
        kind: SelectorKind::Universal,
        prefix: Prefix::Char('*'),
        suffix: None,
        parse: parse_universal,
    },
    Grammar {
        kind: SelectorKind::Element,
        prefix: Prefix::WordChar,
        suffix: None,
        parse: parse_element,
    },
    Grammar {
        kind: SelectorKind::Id,
        prefix: Prefix::Char('#'),
        suffix: None,
        parse: parse_id,
    },
    Grammar {
        kind: SelectorKind::Role,
        prefix: Prefix::Char('$'),
        suffix: None,
        parse: parse_role,
    },
    Grammar {
        kind: SelectorKind::Class,
        prefix: Prefix::Char('.'),
        suffix: None,
        parse: parse_class,
    },
    Grammar {
        kind: SelectorKind::Path,
        prefix: Prefix::Char('/'),
        suffix: None,
        parse: path::parse,
    },
    Grammar {
        kind: SelectorKind::Attribute,
        prefix: Prefix::Char('['),
        suffix: Some(']'),
        parse: attribute::parse,
    },
    Grammar {
        kind: SelectorKind::Pseudo,
        prefix: Prefix::Char(':'),
        suffix: None,
        parse: pseudo::parse,
    },
];

/// Characters that start a new simple selector inside a sequence.
pub const PREFIX_CHARS: [char; 7] = ['*', '#', '$', '.', '/', '[', ':'];

/// Kind of the grammar that would claim a token starting with `c`.
#[must_use]
pub fn kind_for(c: char) -> Option<SelectorKind> {
    GRAMMARS
        .iter()
        .find(|grammar| grammar.prefix.matches(c))
        .map(|grammar| grammar.kind)
}

/// Parse one simple selector token such as `#id`, `[a=1]` or `:limit(5)`.
///
/// # Errors
///
/// Returns [`ParseError::UnrecognizedSelector`] when no grammar claims the
/// token, or the error of the grammar that does.
pub fn parse_simple_selector(token: &str) -> Result<SimpleSelector, ParseError> {
    let unrecognized = || ParseError::UnrecognizedSelector {
        token: token.to_string(),
    };

    let first = token.chars().next().ok_or_else(unrecognized)?;
    let grammar = GRAMMARS
        .iter()
        .find(|grammar| grammar.prefix.matches(first))
        .ok_or_else(unrecognized)?;

    let body = match grammar.prefix {
        Prefix::WordChar => token,
        Prefix::Char(prefix) => &token[prefix.len_utf8()..],
    };
    let body = match grammar.suffix {
        None => body,
        Some(suffix) => match body.strip_suffix(suffix) {
            Some(inner) if !ends_with_escape(inner) => inner,
            _ => {
                return Err(ParseError::UnterminatedAttribute {
                    token: token.to_string(),
                });
            }
        },
    };

    (grammar.parse)(body)
}

/// Whether the character after `text` would be escaped.
fn ends_with_escape(text: &str) -> bool {
    text.chars().rev().take_while(|c| *c == ESCAPE).count() % 2 == 1
}

fn parse_universal(body: &str) -> Result<SimpleSelector, ParseError> {
    if body.is_empty() {
        Ok(SimpleSelector::Universal)
    } else {
        Err(ParseError::UnexpectedUniversalValue {
            token: format!("*{body}"),
        })
    }
}

fn parse_element(body: &str) -> Result<SimpleSelector, ParseError> {
    Ok(SimpleSelector::Element(unescape(body)))
}

fn value_of(kind: SelectorKind, body: &str) -> Result<String, ParseError> {
    if body.is_empty() {
        Err(ParseError::MissingValue { kind })
    } else {
        Ok(unescape(body))
    }
}

fn parse_id(body: &str) -> Result<SimpleSelector, ParseError> {
    value_of(SelectorKind::Id, body).map(SimpleSelector::Id)
}

fn parse_role(body: &str) -> Result<SimpleSelector, ParseError> {
    value_of(SelectorKind::Role, body).map(SimpleSelector::Role)
}

fn parse_class(body: &str) -> Result<SimpleSelector, ParseError> {
    value_of(SelectorKind::Class, body).map(SimpleSelector::Class)
}
