//! Property tests: printing a parsed selector and parsing it again yields
//! the same AST.

use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::quickcheck;
use sift_selector::parse;

const LEADING: &[&str] = &[
    "",
    "*",
    "article",
    "car\\ park",
    "/news/2024",
    "/a/*",
    "/#4e2a1f/children",
    "/$people/old",
    "/path\\ is\\ \\>\\ road",
];

const TRAILING: &[&str] = &[
    "#x",
    "#a\\.b",
    "$admin",
    ".published",
    ".x\\:y",
    "[age]",
    "[age>=18]",
    "[ratio<0.5]",
    "[name^=\"Jo\"]",
    "[title=\"a > b\"]",
    "[quote=\"say \\\"hi\\\"\"]",
    "[tags~=red blue]",
    "[mixed~=true \"abc\" 2.4 def 5]",
    "[flag!=null]",
    "[name?=\"(?i)^jo\"]",
    ":published",
    ":limit(10)",
    ":sort(name desc)",
    ":sort(\"age\")",
];

const COMBINATORS: &[&str] = &[" ", ">", " > ", "+", " ~ ", "  "];

/// A randomly assembled, always valid selector pattern.
#[derive(Debug, Clone)]
struct Pattern(String);

impl Arbitrary for Pattern {
    fn arbitrary(g: &mut Gen) -> Self {
        let sequences = usize::arbitrary(g) % 4 + 1;
        let mut pattern = String::new();

        for index in 0..sequences {
            if index > 0 {
                pattern.push_str(g.choose(COMBINATORS).unwrap_or(&" "));
            }

            let leading = g.choose(LEADING).unwrap_or(&"");
            pattern.push_str(leading);

            let trailing = usize::arbitrary(g) % 4 + usize::from(leading.is_empty());
            for _ in 0..trailing {
                pattern.push_str(g.choose(TRAILING).unwrap_or(&".x"));
            }
        }

        Self(pattern)
    }
}

#[quickcheck]
fn printed_selector_parses_back_to_itself(pattern: Pattern) -> bool {
    let parsed = parse(&pattern.0).unwrap();
    let reparsed = parse(&parsed.to_string()).unwrap();
    reparsed == parsed
}

#[quickcheck]
fn canonical_text_is_a_fixed_point(pattern: Pattern) -> bool {
    let canonical = parse(&pattern.0).unwrap().to_string();
    parse(&canonical).unwrap().to_string() == canonical
}

#[quickcheck]
fn leading_selectors_only_come_first(pattern: Pattern) -> bool {
    parse(&pattern.0).unwrap().sequences().all(|sequence| {
        sequence
            .iter()
            .skip(1)
            .all(|item| !item.kind().is_leading())
    })
}
