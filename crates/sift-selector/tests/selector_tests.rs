//! Integration tests for selector parsing and canonical printing.

use sift_selector::{
    Combinator, ParseError, PathItem, PathStep, Pseudo, SelectorKind, SimpleSelector, SortOrder,
    StructureError, parse,
};

fn canonical(pattern: &str) -> String {
    parse(pattern).unwrap().to_string()
}

fn assert_round_trip(pattern: &str) {
    assert_eq!(canonical(pattern), pattern);
}

#[test]
fn test_round_trip_every_grammar_form() {
    for pattern in [
        "*",
        "article",
        "#4e2a1f",
        "$admin",
        ".published",
        "/news/2024",
        "/#4e2a1f/children",
        "/$people/old",
        "/docs/*",
        "[age]",
        "[age>=18]",
        "[name^=\"Jo\"]",
        "[tags~=\"red\" \"blue\"]",
        ":published",
        ":limit(10)",
        ":sort(name desc)",
        "* abc>#def+.ghi~[jkl=\"mno\"]:pqr",
    ] {
        assert_round_trip(pattern);
    }
}

#[test]
fn test_canonical_whitespace_around_combinators() {
    assert_eq!(canonical("article > .class"), "article>.class");
    assert_eq!(canonical("/article>.class"), "/article>.class");
    assert_eq!(canonical("  a   ~  b  "), "a~b");
}

#[test]
fn test_combinator_scenario() {
    let selector = parse("vehicles>car .crossover").unwrap();
    assert_eq!(selector.len(), 3);

    let path = selector.sequence_path();
    assert_eq!(path.len(), 5);
    assert!(matches!(path[0], PathStep::Sequence(s) if s.element() == Some("vehicles")));
    assert!(matches!(path[1], PathStep::Combinator(Combinator::Child)));
    assert!(matches!(path[2], PathStep::Sequence(s) if s.element() == Some("car")));
    assert!(matches!(path[3], PathStep::Combinator(Combinator::Descendant)));
    assert!(matches!(
        path[4],
        PathStep::Sequence(s) if s.item(0) == Some(&SimpleSelector::Class("crossover".into()))
    ));
}

#[test]
fn test_every_combinator() {
    let selector = parse("a b>c+d~e").unwrap();
    let combinators: Vec<_> = selector
        .sequence_path()
        .into_iter()
        .filter_map(|step| match step {
            PathStep::Combinator(combinator) => Some(combinator),
            PathStep::Sequence(_) => None,
        })
        .collect();
    assert_eq!(
        combinators,
        [
            Combinator::Descendant,
            Combinator::Child,
            Combinator::AdjacentSibling,
            Combinator::GeneralSibling,
        ]
    );
}

#[test]
fn test_ordering_invariant() {
    let selector = parse("article.a[b] * /x/y:limit(1) .c").unwrap();
    for sequence in selector.sequences() {
        for (index, item) in sequence.iter().enumerate() {
            if item.kind().is_leading() {
                assert_eq!(index, 0, "{sequence}");
            }
        }
    }

    for pattern in [".a*", ".c/d", "[a]/b", "#x*"] {
        assert!(matches!(
            parse(pattern),
            Err(ParseError::Structure(StructureError::NotFirstInSequence { .. }))
        ));
    }
}

#[test]
fn test_quotes_and_brackets_suspend_combinators() {
    let selector = parse("[title=\"a > b\"] [x~=\"c d\" e]:sort(\"f\" desc)").unwrap();
    assert_eq!(selector.len(), 2);
    assert_eq!(
        selector.to_string(),
        "[title=\"a > b\"] [x~=\"c d\" \"e\"]:sort(f desc)"
    );
}

#[test]
fn test_unmatched_quotes_are_plain_text() {
    let selector = parse("[title=5\"] > a").unwrap();
    assert_eq!(selector.len(), 2);
    assert_eq!(selector.to_string(), r#"[title="5\""]>a"#);

    let selector = parse("[name=O'Brien].x").unwrap();
    let sequence = selector.first_sequence().unwrap();
    assert_eq!(sequence.len(), 2);
    assert_eq!(sequence.item(1), Some(&SimpleSelector::Class("x".into())));
    assert_eq!(selector.to_string(), "[name=\"O'Brien\"].x");

    let selector = parse(":contains(it's)").unwrap();
    assert_eq!(
        selector.first_sequence().unwrap().item(0),
        Some(&SimpleSelector::Pseudo(Pseudo::class("contains", Some("it's".into()))))
    );
    assert_eq!(selector.to_string(), r":contains(it\'s)");

    for pattern in ["[title=5\"] > a", "[name=O'Brien].x", ":contains(it's)"] {
        let printed = canonical(pattern);
        assert_eq!(canonical(&printed), printed, "{pattern}");
    }
}

#[test]
fn test_escaped_combinators() {
    let selector = parse(r"/path\ is\ \>\ road\:\~\[impossible]").unwrap();
    assert_eq!(selector.len(), 1);
    let Some(SimpleSelector::Path(path)) = selector.first_sequence().unwrap().item(0) else {
        panic!("expected a path selector");
    };
    assert_eq!(
        path.items(),
        [PathItem::Segment("path is > road:~[impossible]".into())]
    );
    assert_round_trip(r"/path\ is\ \>\ road\:\~\[impossible]");
}

#[test]
fn test_escaped_values() {
    assert_eq!(
        parse(r"#a\.b.c").unwrap().first_sequence().unwrap().items(),
        [
            SimpleSelector::Id("a.b".into()),
            SimpleSelector::Class("c".into())
        ]
    );
    assert_round_trip(r"#a\.b.c");
    assert_round_trip(r"car\ park");
}

#[test]
fn test_path_with_pseudo() {
    let selector = parse("/$people/old:sort(age desc)").unwrap();
    let sequence = selector.first_sequence().unwrap();
    let Some(SimpleSelector::Path(path)) = sequence.item(0) else {
        panic!("expected a path selector");
    };
    assert_eq!(path.root(), Some(&SimpleSelector::Role("people".into())));
    assert_eq!(path.segments().collect::<Vec<_>>(), ["old"]);
    assert_eq!(
        sequence.item(1),
        Some(&SimpleSelector::Pseudo(Pseudo::Sort {
            attribute: "age".into(),
            order: SortOrder::Desc,
        }))
    );
}

#[test]
fn test_path_wildcard() {
    let selector = parse("/a/b/*").unwrap();
    let Some(SimpleSelector::Path(path)) = selector.first_sequence().unwrap().item(0) else {
        panic!("expected a path selector");
    };
    assert_eq!(path.segments().collect::<Vec<_>>(), ["a", "b", "*"]);
    assert!(path.has_wildcard());
}

#[test]
fn test_pseudo_edge_cases() {
    assert_eq!(canonical(":nth-child()"), ":nth-child");
    assert!(matches!(
        parse(":"),
        Err(ParseError::InvalidPseudo { .. })
    ));
    assert!(matches!(
        parse(":limit(1"),
        Err(ParseError::MissingClosingParen { .. })
    ));
}

#[test]
fn test_parse_errors() {
    assert_eq!(parse(""), Err(ParseError::EmptyPattern));
    assert!(matches!(
        parse("a > "),
        Err(ParseError::DanglingCombinator { .. })
    ));
    assert!(matches!(
        parse("-a"),
        Err(ParseError::UnrecognizedSelector { .. })
    ));
    assert!(matches!(
        parse("[a!^=1]"),
        Err(ParseError::InvalidOperator { .. })
    ));
    assert!(matches!(
        parse("/.x/y"),
        Ok(selector) if selector.first_sequence().unwrap().len() == 1
    ));
}

#[test]
fn test_kinds_report_lowercase_names() {
    assert_eq!(SelectorKind::Attribute.to_string(), "attribute");
    assert_eq!(
        ParseError::MissingValue {
            kind: SelectorKind::Class
        }
        .to_string(),
        "Class selector requires a value"
    );
}

#[test]
fn test_editing_parsed_selector() {
    let mut selector = parse("a>b c").unwrap();
    let last = selector.pop_sequence().unwrap();
    assert_eq!(last.to_string(), "c");
    let first = selector.shift_sequence().unwrap();
    assert_eq!(first.to_string(), "a");
    assert_eq!(selector.to_string(), "b");
    assert_eq!(selector.first(), selector.last());
}

#[test]
fn test_clone_is_deep() {
    let selector = parse("a>b").unwrap();
    let mut copy = selector.clone();
    let id = copy.last().unwrap();
    let _ = copy.get_mut(id).unwrap().set_element("z");
    assert_eq!(selector.to_string(), "a>b");
    assert_eq!(copy.to_string(), "a>z");
    assert_ne!(selector, copy);
}

#[test]
fn test_serialize_json() {
    let selector = parse("article>[age>=18]").unwrap();
    let json = serde_json::to_value(&selector).unwrap();
    assert_eq!(
        json,
        serde_json::json!([
            {
                "sequence": [{ "kind": "element", "value": "article" }],
                "combinator": "child"
            },
            {
                "sequence": [{
                    "kind": "attribute",
                    "value": { "name": "age", "operator": ">=", "condition": 18 }
                }]
            }
        ])
    );
}
