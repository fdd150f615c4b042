//! Integration tests for event dispatch while building a query.

use sift_query::{
    BuildError, Event, EventKind, EventRegistry, ListenerAggregate, ListenerId, QueryBuilder,
    Response,
};
use sift_selector::{SelectorKind, parse};
use strum::IntoEnumIterator;

type Trace = Vec<String>;

/// Records every event it sees and handles every selector.
#[derive(Default)]
struct Recorder {
    listeners: Vec<ListenerId>,
}

impl ListenerAggregate<Trace, String> for Recorder {
    fn attach(&mut self, registry: &mut EventRegistry<Trace, String>) {
        self.listeners.push(registry.attach_all(0, |event| {
            let entry = match (event.simple_selector(), event.sequence(), event.child_sequence()) {
                (Some(simple), _, _) => format!("{}:{simple}", event.kind()),
                (None, Some(sequence), Some(child)) => {
                    let combinator = event.combinator().map(|c| c.name()).unwrap_or_default();
                    format!("{}:{sequence}|{combinator}|{child}", event.kind())
                }
                _ => event.kind().to_string(),
            };
            event.accumulator_mut().push(entry);
            Response::Handled
        }));
    }

    fn detach(&mut self, registry: &mut EventRegistry<Trace, String>) {
        for id in self.listeners.drain(..) {
            let _ = registry.detach(id);
        }
    }
}

fn recording_builder() -> QueryBuilder<Trace, String> {
    let mut builder = QueryBuilder::new();
    Recorder::default().attach(builder.registry_mut());
    builder
}

#[test]
fn test_fold_order_is_innermost_first() {
    let trace = recording_builder()
        .build(&parse("a.x>b.y>c.z").unwrap())
        .unwrap();
    assert_eq!(
        trace,
        [
            "prepare-query",
            "apply-element-selector:c",
            "apply-class-selector:.z",
            "apply-element-selector:b",
            "apply-class-selector:.y",
            "combine-sequence:b.y|child|c.z",
            "apply-element-selector:a",
            "apply-class-selector:.x",
            "combine-sequence:a.x|child|b.y",
            "finalize-query",
        ]
    );
}

#[test]
fn test_combine_carries_combinator() {
    let trace = recording_builder().build(&parse("a ~ b").unwrap()).unwrap();
    assert!(trace.contains(&"combine-sequence:a|general-sibling|b".to_string()));
}

#[test]
fn test_build_with_initial_accumulator() {
    let trace = recording_builder()
        .build_with(&parse("*").unwrap(), vec!["seed".to_string()])
        .unwrap();
    assert_eq!(
        trace,
        [
            "seed",
            "prepare-query",
            "apply-universal-selector:*",
            "finalize-query"
        ]
    );
}

#[test]
fn test_unsupported_selector_names_its_kind() {
    let mut builder = QueryBuilder::<Trace, String>::new();
    let _ = builder
        .registry_mut()
        .attach(EventKind::ApplyElementSelector, 0, |_| Response::Handled);

    let error = builder.build(&parse("article#x").unwrap()).unwrap_err();
    assert_eq!(
        error,
        BuildError::SelectorNotSupported {
            kind: SelectorKind::Id
        }
    );
    assert_eq!(error.to_string(), "Id selector is not supported");
}

#[test]
fn test_every_kind_is_unsupported_without_handlers() {
    let mut builder = QueryBuilder::<Trace, String>::new();
    for (kind, pattern) in SelectorKind::iter().zip([
        "*", "a", "#a", "$a", ".a", "/a", "[a]", ":a",
    ]) {
        assert_eq!(
            builder.build(&parse(pattern).unwrap()),
            Err(BuildError::SelectorNotSupported { kind })
        );
    }
}

#[test]
fn test_handler_error_beats_unsupported() {
    let mut builder = QueryBuilder::<Trace, String>::new();
    let _ = builder
        .registry_mut()
        .attach(EventKind::ApplyIdSelector, 5, |event| {
            let simple = event
                .simple_selector()
                .map_or_else(String::new, ToString::to_string);
            Response::Failed(format!("cannot apply {simple}"))
        });
    let _ = builder
        .registry_mut()
        .attach(EventKind::ApplyIdSelector, 1, |_| Response::Failed("later".into()));
    let _ = builder
        .registry_mut()
        .attach(EventKind::ApplyIdSelector, 0, |_| Response::Unhandled);

    assert_eq!(
        builder.build(&parse("#x").unwrap()),
        Err(BuildError::Handler("cannot apply #x".to_string()))
    );
}

#[test]
fn test_lower_priority_handler_may_still_handle() {
    let mut builder = QueryBuilder::<Trace, String>::new();
    let _ = builder
        .registry_mut()
        .attach(EventKind::ApplyIdSelector, 5, |_| Response::Failed("first".into()));
    let _ = builder
        .registry_mut()
        .attach(EventKind::ApplyIdSelector, 0, |event| {
            event.accumulator_mut().push("handled".into());
            Response::Handled
        });

    assert_eq!(builder.build(&parse("#x").unwrap()), Ok(vec!["handled".to_string()]));
}

#[test]
fn test_structural_failure_aborts_build() {
    let mut builder = recording_builder();
    let _ = builder
        .registry_mut()
        .attach(EventKind::CombineSequence, 10, |_| Response::Failed("no hierarchy".into()));

    assert_eq!(
        builder.build(&parse("a>b").unwrap()),
        Err(BuildError::Handler("no hierarchy".to_string()))
    );
}

#[test]
fn test_detach_restores_unsupported() {
    let mut builder = QueryBuilder::<Trace, String>::new();
    let mut recorder = Recorder::default();
    recorder.attach(builder.registry_mut());
    assert!(builder.build(&parse(".a").unwrap()).is_ok());

    recorder.detach(builder.registry_mut());
    assert!(builder.registry().is_empty());
    assert_eq!(
        builder.build(&parse(".a").unwrap()),
        Err(BuildError::SelectorNotSupported {
            kind: SelectorKind::Class
        })
    );
}

#[test]
fn test_builder_is_reusable() {
    let mut builder = recording_builder();
    let selector = parse("a b").unwrap();
    let first = builder.build(&selector).unwrap();
    let second = builder.build(&selector).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_handlers_can_read_whole_selector() {
    let mut builder = QueryBuilder::<Trace, String>::new();
    let _ = builder.registry_mut().attach_all(0, |event: &mut Event<'_, Trace>| {
        if event.kind() == EventKind::FinalizeQuery {
            let sequences = event.selector().len();
            event.accumulator_mut().push(sequences.to_string());
        }
        Response::Handled
    });
    assert_eq!(builder.build(&parse("a>b c").unwrap()), Ok(vec!["3".to_string()]));
}
