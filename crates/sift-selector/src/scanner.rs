//! Position-based character scanner shared by every selector grammar.
//!
//! The scanner never consumes input. Parsers ask it questions about
//! positions ("where is the next unescaped `]`?", "is this character
//! escaped?") and slice the source themselves. All lookups return
//! `Option`; whether a miss is fatal is up to the caller.

/// Characters treated as insignificant whitespace.
pub const WHITESPACE: [char; 5] = [' ', '\t', '\n', '\r', '\u{000C}'];

/// Escape character.
pub const ESCAPE: char = '\\';

/// Opening enclosures and their matching closers.
///
/// Quotes do not nest; brackets nest and may contain quotes.
pub const ENCLOSURES: [(char, char); 5] = [
    ('"', '"'),
    ('\'', '\''),
    ('[', ']'),
    ('(', ')'),
    ('{', '}'),
];

/// Returns the closer for an opening enclosure character.
#[must_use]
pub fn closing_enclosure(open: char) -> Option<char> {
    ENCLOSURES
        .iter()
        .find(|(opener, _)| *opener == open)
        .map(|(_, closer)| *closer)
}

/// Returns true for [`WHITESPACE`] characters.
#[must_use]
pub fn is_whitespace(c: char) -> bool {
    WHITESPACE.contains(&c)
}

const fn is_quote(c: char) -> bool {
    matches!(c, '"' | '\'')
}

/// Read-only view over a trimmed selector fragment.
#[derive(Debug, Clone)]
pub struct Scanner {
    /// Source characters, with unescaped leading and trailing whitespace removed
    chars: Vec<char>,
    /// `escaped[i]` is true when `chars[i]` follows an odd run of backslashes
    escaped: Vec<bool>,
}

impl Scanner {
    /// Create a scanner over `source`.
    #[must_use]
    pub fn new(source: impl AsRef<str>) -> Self {
        let mut chars: Vec<char> = source.as_ref().chars().collect();

        let mut escaped = Vec::with_capacity(chars.len());
        let mut run = 0usize;
        for &c in &chars {
            escaped.push(run % 2 == 1);
            if c == ESCAPE {
                run += 1;
            } else {
                run = 0;
            }
        }

        // An escaped trailing space is part of the value.
        let mut end = chars.len();
        while end > 0 && is_whitespace(chars[end - 1]) && !escaped[end - 1] {
            end -= 1;
        }
        chars.truncate(end);
        escaped.truncate(end);

        let start = chars
            .iter()
            .position(|c| !is_whitespace(*c))
            .unwrap_or(chars.len());
        let _ = chars.drain(..start);
        let _ = escaped.drain(..start);

        Self { chars, escaped }
    }

    /// Number of characters in the trimmed source.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Whether the trimmed source is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Character at `index`.
    #[must_use]
    pub fn char_at(&self, index: usize) -> Option<char> {
        self.chars.get(index).copied()
    }

    /// Whether the character at `index` is preceded by an odd number of
    /// backslashes.
    #[must_use]
    pub fn is_escaped(&self, index: usize) -> bool {
        self.escaped.get(index).copied().unwrap_or(false)
    }

    /// The characters in `start..end` as a string. Out of range bounds are
    /// clamped.
    #[must_use]
    pub fn slice(&self, start: usize, end: usize) -> String {
        let end = end.min(self.chars.len());
        if start >= end {
            return String::new();
        }
        self.chars[start..end].iter().collect()
    }

    /// Like [`Scanner::slice`], but drops surrounding unescaped whitespace.
    #[must_use]
    pub fn trimmed_slice(&self, start: usize, end: usize) -> String {
        let end = end.min(self.chars.len());
        let Some(first) = self.seek_key(true, start).filter(|first| *first < end) else {
            return String::new();
        };

        let mut last = end;
        while last > first && is_whitespace(self.chars[last - 1]) && !self.escaped[last - 1] {
            last -= 1;
        }
        self.slice(first, last)
    }

    /// Returns the first non-whitespace position at or after `from`
    /// (`forward`), or at or before `from` (backward).
    #[must_use]
    pub fn seek_key(&self, forward: bool, from: usize) -> Option<usize> {
        if self.chars.is_empty() {
            return None;
        }

        if forward {
            (from..self.chars.len()).find(|&i| !is_whitespace(self.chars[i]))
        } else {
            let from = from.min(self.chars.len() - 1);
            (0..=from).rev().find(|&i| !is_whitespace(self.chars[i]))
        }
    }

    /// Whether `index` holds an unescaped opening enclosure.
    #[must_use]
    pub fn is_at_opening_enclosure(&self, index: usize) -> bool {
        self.char_at(index)
            .is_some_and(|c| !self.is_escaped(index) && closing_enclosure(c).is_some())
    }

    /// Whether `index` holds an unescaped closing enclosure.
    #[must_use]
    pub fn is_at_closing_enclosure(&self, index: usize) -> bool {
        self.char_at(index).is_some_and(|c| {
            !self.is_escaped(index) && ENCLOSURES.iter().any(|(_, closer)| *closer == c)
        })
    }

    /// Find the first position at or after `from` holding one of `targets`.
    ///
    /// Targets are matched before enclosures are considered, so searching
    /// for an opener finds it. Any other unescaped opener is skipped together
    /// with its contents. Escaped targets only match with `include_escaped`.
    #[must_use]
    pub fn find_any(&self, targets: &[char], from: usize, include_escaped: bool) -> Option<usize> {
        let mut index = from;

        while index < self.chars.len() {
            let c = self.chars[index];
            let escaped = self.escaped[index];

            if targets.contains(&c) && (include_escaped || !escaped) {
                return Some(index);
            }

            // An opener without a closer is an ordinary character.
            let end = if escaped {
                None
            } else {
                self.enclosure_end(index)
            };
            if let Some(end) = end {
                index = end + 1;
                continue;
            }

            index += 1;
        }

        None
    }

    /// Find the next unescaped `target` at or after `from`, ignoring
    /// enclosures.
    #[must_use]
    pub fn find_char(&self, target: char, from: usize) -> Option<usize> {
        (from..self.chars.len()).find(|&i| self.chars[i] == target && !self.escaped[i])
    }

    /// Position of the closer matching the opener at `open`.
    #[must_use]
    pub fn enclosure_end(&self, open: usize) -> Option<usize> {
        let opener = self.char_at(open)?;
        let closer = closing_enclosure(opener)?;

        if is_quote(opener) {
            self.find_char(closer, open + 1)
        } else {
            self.find_any(&[closer], open + 1, false)
        }
    }
}

/// Remove backslash escaping: `\x` becomes `x`, a lone trailing backslash
/// is dropped.
#[must_use]
pub fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == ESCAPE {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Prefix every backslash and every character in `specials` with a
/// backslash.
#[must_use]
pub fn escape(text: &str, specials: &[char]) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c == ESCAPE || specials.contains(&c) {
            out.push(ESCAPE);
        }
        out.push(c);
    }
    out
}
