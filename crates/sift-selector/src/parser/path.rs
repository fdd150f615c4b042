//! Path selector body: `seg/seg/*`, optionally rooted at `#id` or `$role`.

use super::simple::parse_simple_selector;
use crate::error::ParseError;
use crate::scanner::{Scanner, unescape};
use crate::selector::{Path, PathItem, SimpleSelector};

/// Parse the text after the leading `/`.
pub(super) fn parse(body: &str) -> Result<SimpleSelector, ParseError> {
    parse_path(body).map(SimpleSelector::Path)
}

/// Parse a path body such as `news/2024/*` or `#4e2a1f/children`.
///
/// A leading empty segment is dropped, so `/a/b` and `a/b` are the same
/// path.
///
/// # Errors
///
/// Fails when an embedded root does not parse as an id or role selector.
pub fn parse_path(body: &str) -> Result<Path, ParseError> {
    let scanner = Scanner::new(body);
    let mut raw_segments = Vec::new();
    let mut start = 0;
    loop {
        let end = scanner
            .find_any(&[Path::SEPARATOR], start, false)
            .unwrap_or(scanner.len());
        raw_segments.push(scanner.slice(start, end));
        if end >= scanner.len() {
            break;
        }
        start = end + 1;
    }

    if raw_segments.first().is_some_and(String::is_empty) {
        let _ = raw_segments.remove(0);
    }

    let mut items = Vec::with_capacity(raw_segments.len());
    for (index, raw) in raw_segments.iter().enumerate() {
        if index == 0 && raw.starts_with(['#', '$']) {
            let root = parse_simple_selector(raw)?;
            items.push(PathItem::Selector(Box::new(root)));
        } else {
            items.push(PathItem::Segment(unescape(raw)));
        }
    }

    Ok(Path::new(items)?)
}
