//! Attribute selector body: `name`, `name op value` or `name~=a "b" 3`.

use crate::error::ParseError;
use crate::scanner::{Scanner, unescape};
use crate::selector::{Attribute, Operator, SimpleSelector, Value};

/// Parse the text between `[` and `]`.
pub(super) fn parse(body: &str) -> Result<SimpleSelector, ParseError> {
    parse_attribute(body).map(SimpleSelector::Attribute)
}

/// Parse an attribute selector body such as `abc~=def ghi`.
///
/// # Errors
///
/// Fails on an empty name, an unsupported operator or an unterminated
/// quoted value.
pub fn parse_attribute(body: &str) -> Result<Attribute, ParseError> {
    let scanner = Scanner::new(body);
    let Some(start) = scanner.seek_key(true, 0) else {
        return Err(ParseError::EmptyAttributeName {
            pattern: body.to_string(),
        });
    };

    // The first character always belongs to the name.
    let operator_at = scanner.find_any(&Operator::LEAD_CHARS, start + 1, false);
    let name = unescape(&scanner.trimmed_slice(start, operator_at.unwrap_or(scanner.len())));

    let Some(operator_at) = operator_at else {
        return Ok(Attribute::exists(name));
    };

    let (operator, value_at) = parse_operator(&scanner, operator_at, body)?;
    let condition = match scanner.seek_key(true, value_at) {
        None if operator == Operator::InList => Value::List(Vec::new()),
        None => Value::Null,
        Some(start) if operator == Operator::InList => parse_list(&scanner, start)?,
        Some(start) => parse_scalar(&scanner, start)?,
    };

    Ok(Attribute {
        name,
        operator: Some(operator),
        condition,
    })
}

/// Read the operator at `at`: one lead character, optionally followed by
/// `=`. Returns the operator and the position after it.
fn parse_operator(
    scanner: &Scanner,
    at: usize,
    body: &str,
) -> Result<(Operator, usize), ParseError> {
    let mut symbol = String::with_capacity(2);
    let mut next = at;
    if let Some(lead) = scanner.char_at(at) {
        symbol.push(lead);
        next += 1;
    }
    if scanner.char_at(next) == Some('=') {
        symbol.push('=');
        next += 1;
    }

    Operator::from_symbol(&symbol)
        .map(|operator| (operator, next))
        .ok_or_else(|| ParseError::InvalidOperator {
            operator: symbol,
            pattern: body.trim().to_string(),
        })
}

fn is_quote(c: Option<char>) -> bool {
    matches!(c, Some('"' | '\''))
}

/// Read a quoted string starting at `open`. Returns the value and the
/// position of the closing quote.
fn parse_quoted(scanner: &Scanner, open: usize) -> Result<(Value, usize), ParseError> {
    let quote = scanner.char_at(open).unwrap_or('"');
    let close = scanner
        .find_char(quote, open + 1)
        .ok_or_else(|| ParseError::UnterminatedQuote {
            pattern: scanner.slice(open, scanner.len()),
        })?;
    Ok((Value::String(unescape(&scanner.slice(open + 1, close))), close))
}

fn parse_scalar(scanner: &Scanner, start: usize) -> Result<Value, ParseError> {
    if is_quote(scanner.char_at(start)) {
        return parse_quoted(scanner, start).map(|(value, _)| value);
    }
    Ok(coerce(&scanner.trimmed_slice(start, scanner.len())))
}

/// Space separated items; quoted items stay strings, the rest are coerced.
fn parse_list(scanner: &Scanner, start: usize) -> Result<Value, ParseError> {
    let mut items = Vec::new();
    let mut cursor = Some(start);

    while let Some(start) = cursor {
        let next = if is_quote(scanner.char_at(start)) {
            let (value, close) = parse_quoted(scanner, start)?;
            items.push(value);
            close + 1
        } else {
            let end = scanner.find_char(' ', start).unwrap_or(scanner.len());
            items.push(coerce(&scanner.slice(start, end)));
            end
        };
        cursor = scanner.seek_key(true, next);
    }

    Ok(Value::List(items))
}

/// Type an unquoted literal.
fn coerce(raw: &str) -> Value {
    match raw.to_ascii_lowercase().as_str() {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        "null" => return Value::Null,
        _ => {}
    }

    if looks_numeric(raw) {
        if !raw.contains(['.', 'e', 'E']) {
            if let Ok(int) = raw.parse::<i64>() {
                return Value::Int(int);
            }
        }
        // Out of range literals stay text so they print back unchanged.
        if let Some(float) = raw.parse::<f64>().ok().filter(|float| float.is_finite()) {
            return Value::Float(float);
        }
    }

    Value::String(unescape(raw))
}

/// Optional sign, digits with at most one decimal point, optional exponent.
fn looks_numeric(raw: &str) -> bool {
    let unsigned = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    let (mantissa, exponent) = match unsigned.find(['e', 'E']) {
        Some(at) => (&unsigned[..at], Some(&unsigned[at + 1..])),
        None => (unsigned, None),
    };

    let mut digits = 0;
    let mut points = 0;
    for c in mantissa.chars() {
        match c {
            '0'..='9' => digits += 1,
            '.' => points += 1,
            _ => return false,
        }
    }
    if digits == 0 || points > 1 {
        return false;
    }

    exponent.is_none_or(|exponent| {
        let exponent = exponent.strip_prefix(['+', '-']).unwrap_or(exponent);
        !exponent.is_empty() && exponent.chars().all(|c| c.is_ascii_digit())
    })
}
