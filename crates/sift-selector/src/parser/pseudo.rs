//! Pseudo selector body: `name` or `name(value)`.
//!
//! Named pseudo classes with their own value grammar are listed in
//! [`SUB_GRAMMARS`]; every other name becomes a generic [`Pseudo::Class`].

use crate::error::ParseError;
use crate::scanner::{Scanner, unescape};
use crate::selector::{Pseudo, SimpleSelector, SortOrder};

type SubGrammar = fn(Option<&str>, &str) -> Result<Pseudo, ParseError>;

static SUB_GRAMMARS: [(&str, SubGrammar); 1] = [("sort", parse_sort)];

/// Parse the text after the leading `:`.
pub(super) fn parse(body: &str) -> Result<SimpleSelector, ParseError> {
    parse_pseudo(body).map(SimpleSelector::Pseudo)
}

/// Parse a pseudo selector body such as `limit(5)` or `sort(name desc)`.
///
/// # Errors
///
/// Fails on an empty class name, a missing `)` or a value the named
/// sub-grammar rejects.
pub fn parse_pseudo(body: &str) -> Result<Pseudo, ParseError> {
    let scanner = Scanner::new(body);
    let open = scanner.find_any(&['('], 0, false);

    let name = unescape(&scanner.trimmed_slice(0, open.unwrap_or(scanner.len())));
    if name.is_empty() {
        return Err(ParseError::InvalidPseudo {
            pattern: body.to_string(),
        });
    }

    let value = match open {
        None => None,
        Some(open) => {
            let close = scanner.find_any(&[')'], open + 1, false).ok_or_else(|| {
                ParseError::MissingClosingParen {
                    pattern: body.to_string(),
                }
            })?;
            Some(unescape(&scanner.trimmed_slice(open + 1, close)))
                .filter(|value| !value.is_empty())
        }
    };

    match SUB_GRAMMARS.iter().find(|(registered, _)| *registered == name) {
        Some((_, sub_grammar)) => sub_grammar(value.as_deref(), body),
        None => Ok(Pseudo::class(name, value)),
    }
}

/// `attribute [asc|desc]`; the attribute may be double quoted.
fn parse_sort(value: Option<&str>, body: &str) -> Result<Pseudo, ParseError> {
    let invalid = || ParseError::InvalidPseudo {
        pattern: body.to_string(),
    };

    let value = value.ok_or_else(invalid)?;
    // Only the first word after the attribute names the order.
    let (attribute, order) = match value.split_once(char::is_whitespace) {
        Some((attribute, rest)) => (attribute, rest.split_whitespace().next().unwrap_or("")),
        None => (value, ""),
    };

    let attribute = attribute.trim_matches('"');
    if attribute.is_empty() {
        return Err(invalid());
    }

    let order = if order.is_empty() {
        SortOrder::default()
    } else {
        order
            .parse::<SortOrder>()
            .map_err(|_| ParseError::InvalidSortOrder {
                order: order.to_string(),
            })?
    };

    Ok(Pseudo::Sort {
        attribute: attribute.to_string(),
        order,
    })
}
