use std::io;
use std::sync::{Arc, LazyLock, Mutex};

use jspb_decode::{
    Decodable, DecodeErrorKind, DecodeOptions, Extracted, Fields, Pattern, RepeatedTarget,
    alternation, decode, decode_with, ignore, integer, literal, null, record, repeated, rest,
    shape, string,
};
use jspb_value::jspb;

#[derive(Debug, PartialEq)]
struct Pair(i64);

impl Decodable for Pair {
    const NAME: &'static str = "Pair";

    fn pattern() -> &'static Pattern {
        static PATTERN: LazyLock<Pattern> = LazyLock::new(|| shape![integer(), rest()]);
        &PATTERN
    }

    fn construct(fields: &mut Fields) -> Result<Self, DecodeErrorKind> {
        Ok(Pair(fields.integer()?))
    }
}

#[derive(Debug, PartialEq)]
struct Wrapper(Pair);

impl Decodable for Wrapper {
    const NAME: &'static str = "Wrapper";

    fn pattern() -> &'static Pattern {
        static PATTERN: LazyLock<Pattern> =
            LazyLock::new(|| shape![literal("tag"), record::<Pair>()]);
        &PATTERN
    }

    fn construct(fields: &mut Fields) -> Result<Self, DecodeErrorKind> {
        Ok(Wrapper(fields.record()?))
    }
}

#[derive(Debug, PartialEq)]
struct Pairs(Vec<Pair>);

impl Decodable for Pairs {
    const NAME: &'static str = "Pairs";

    fn pattern() -> &'static Pattern {
        static PATTERN: LazyLock<Pattern> =
            LazyLock::new(|| repeated(alternation([record::<Pair>(), ignore()])));
        &PATTERN
    }

    fn construct(fields: &mut Fields) -> Result<Self, DecodeErrorKind> {
        Ok(Pairs(fields.records()?))
    }
}

/// Like `Pairs`, but an empty result is not a valid record.
#[derive(Debug, PartialEq)]
struct NonEmptyPairs(Vec<Pair>);

impl Decodable for NonEmptyPairs {
    const NAME: &'static str = "NonEmptyPairs";

    fn pattern() -> &'static Pattern {
        Pairs::pattern()
    }

    fn construct(fields: &mut Fields) -> Result<Self, DecodeErrorKind> {
        let pairs = fields.records()?;
        if pairs.is_empty() {
            return Err(fields.invariant("at least one pair required"));
        }
        Ok(NonEmptyPairs(pairs))
    }
}

/// Labelled tree, exercising a record that refers to itself.
#[derive(Debug, PartialEq)]
struct Tree {
    label: String,
    children: Vec<Tree>,
}

impl Decodable for Tree {
    const NAME: &'static str = "Tree";

    fn pattern() -> &'static Pattern {
        static PATTERN: LazyLock<Pattern> = LazyLock::new(|| {
            shape![string(), null(), repeated(record::<Tree>())]
        });
        &PATTERN
    }

    fn construct(fields: &mut Fields) -> Result<Self, DecodeErrorKind> {
        Ok(Tree {
            label: fields.string()?,
            children: fields.records()?,
        })
    }
}

/// Constructor that expects a string the pattern never extracts.
#[derive(Debug)]
struct Mismatched;

impl Decodable for Mismatched {
    const NAME: &'static str = "Mismatched";

    fn pattern() -> &'static Pattern {
        static PATTERN: LazyLock<Pattern> = LazyLock::new(|| shape![integer()]);
        &PATTERN
    }

    fn construct(fields: &mut Fields) -> Result<Self, DecodeErrorKind> {
        fields.string()?;
        Ok(Mismatched)
    }
}

#[test]
fn pair_ignores_trailing_elements() {
    let pair: Pair = decode(&jspb!(["7", "ignored", "ignored2"])).unwrap();
    assert_eq!(pair, Pair(7));
}

#[test]
fn wrapper_decodes_nested_record() {
    let wrapper: Wrapper = decode(&jspb!(["tag", ["3", "x"]])).unwrap();
    assert_eq!(wrapper, Wrapper(Pair(3)));
}

#[test]
fn wrapper_wrong_tag() {
    let err = decode::<Wrapper>(&jspb!(["gat", ["3"]])).unwrap_err();
    assert!(matches!(err.kind, DecodeErrorKind::LiteralMismatch { .. }));
    assert_eq!(err.path.to_string(), "$[0]");
}

#[test]
fn wrapper_nested_failure_names_record() {
    let err = decode::<Wrapper>(&jspb!(["tag", ["three"]])).unwrap_err();
    match &err.kind {
        DecodeErrorKind::Nested { record, source } => {
            assert_eq!(*record, "Pair");
            assert_eq!(source.path.to_string(), "$[1][0]");
            assert!(matches!(source.kind, DecodeErrorKind::IntegerParse { .. }));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.path.to_string(), "$[1]");
    assert_eq!(err.root_cause().path.to_string(), "$[1][0]");
}

#[test]
fn record_requires_sequence() {
    let err = decode::<Wrapper>(&jspb!(["tag", "3"])).unwrap_err();
    assert!(matches!(err.kind, DecodeErrorKind::TypeMismatch { .. }));
}

#[test]
fn repeated_alternation_skips_unrecognized_elements() {
    let pairs: Pairs = decode(&jspb!([["1"], "skip-me", ["2"]])).unwrap();
    assert_eq!(pairs, Pairs(vec![Pair(1), Pair(2)]));
}

#[test]
fn repeated_alternation_skips_malformed_records() {
    let pairs: Pairs = decode(&jspb!([["1"], ["nan"], [], ["2", null]])).unwrap();
    assert_eq!(pairs, Pairs(vec![Pair(1), Pair(2)]));
}

#[test]
fn constructor_invariant_rejects_empty_match() {
    let err = decode::<NonEmptyPairs>(&jspb!(["a", null])).unwrap_err();
    assert_eq!(
        err.kind,
        DecodeErrorKind::ConstructorInvariantViolation {
            record: "NonEmptyPairs",
            message: "at least one pair required".to_string(),
        }
    );
    assert!(err.path.is_root());

    let ok: NonEmptyPairs = decode(&jspb!([["5"]])).unwrap();
    assert_eq!(ok, NonEmptyPairs(vec![Pair(5)]));
}

#[test]
fn constructor_failure_inside_alternation_falls_through() {
    #[derive(Debug, PartialEq)]
    struct Groups(Vec<NonEmptyPairs>);

    impl Decodable for Groups {
        const NAME: &'static str = "Groups";

        fn pattern() -> &'static Pattern {
            static PATTERN: LazyLock<Pattern> = LazyLock::new(|| {
                repeated(alternation([record::<NonEmptyPairs>(), ignore()]))
            });
            &PATTERN
        }

        fn construct(fields: &mut Fields) -> Result<Self, DecodeErrorKind> {
            Ok(Groups(fields.records()?))
        }
    }

    let groups: Groups = decode(&jspb!([[["1"]], ["x"], [["2"], ["3"]]])).unwrap();
    assert_eq!(
        groups,
        Groups(vec![
            NonEmptyPairs(vec![Pair(1)]),
            NonEmptyPairs(vec![Pair(2), Pair(3)]),
        ])
    );
}

#[test]
fn recursive_record() {
    let tree: Tree = decode(&jspb!(["root", null, [["a", null, []], ["b", null, [["c", null, []]]]]]))
        .unwrap();
    assert_eq!(
        tree,
        Tree {
            label: "root".to_string(),
            children: vec![
                Tree {
                    label: "a".to_string(),
                    children: vec![],
                },
                Tree {
                    label: "b".to_string(),
                    children: vec![Tree {
                        label: "c".to_string(),
                        children: vec![],
                    }],
                },
            ],
        }
    );
}

#[test]
fn recursive_record_error_path_is_absolute() {
    let err = decode::<Tree>(&jspb!(["root", null, [["a", null, [[null, null, []]]]]]))
        .unwrap_err();
    let cause = err.root_cause();
    assert_eq!(cause.path.to_string(), "$[2][0][2][0][0]");
}

#[test]
fn pattern_constructor_disagreement_is_reported() {
    let err = decode::<Mismatched>(&jspb!(["1"])).unwrap_err();
    assert_eq!(
        err.kind,
        DecodeErrorKind::UnexpectedField {
            record: "Mismatched",
            index: 0,
            expected: "string".to_string(),
            found: "integer".to_string(),
        }
    );
}

#[test]
fn unused_values_are_reported() {
    #[derive(Debug)]
    struct TakesNothing;

    impl Decodable for TakesNothing {
        const NAME: &'static str = "TakesNothing";

        fn pattern() -> &'static Pattern {
            static PATTERN: LazyLock<Pattern> = LazyLock::new(|| shape![string(), string()]);
            &PATTERN
        }

        fn construct(_fields: &mut Fields) -> Result<Self, DecodeErrorKind> {
            Ok(TakesNothing)
        }
    }

    let err = decode::<TakesNothing>(&jspb!(["a", "b"])).unwrap_err();
    assert_eq!(
        err.kind,
        DecodeErrorKind::TrailingFields {
            record: "TakesNothing",
            count: 2,
        }
    );
}

#[test]
fn repeated_target_changes_constructor_input() {
    /// Counts whatever the pattern extracted.
    #[derive(Debug, PartialEq)]
    struct Count(usize);

    impl Decodable for Count {
        const NAME: &'static str = "Count";

        fn pattern() -> &'static Pattern {
            static PATTERN: LazyLock<Pattern> = LazyLock::new(|| {
                alternation([
                    shape![repeated(integer()), literal("end")],
                    shape![repeated(integer()), rest()],
                ])
            });
            &PATTERN
        }

        fn construct(fields: &mut Fields) -> Result<Self, DecodeErrorKind> {
            let items: Vec<Extracted> = fields.drain();
            Ok(Count(items.len()))
        }
    }

    let node = jspb!([["1", "2", "3"], "more"]);
    assert_eq!(decode::<Count>(&node).unwrap(), Count(6));

    let options = DecodeOptions {
        repeated_target: RepeatedTarget::Enclosing,
        ..DecodeOptions::default()
    };
    assert_eq!(decode_with::<Count>(&node, &options).unwrap(), Count(3));
}

#[test]
fn decoding_is_shareable_across_threads() {
    let inputs: Vec<_> = (0..8)
        .map(|i| jspb!([[(i.to_string())], "skip", [((i * 10).to_string())]]))
        .collect();
    std::thread::scope(|scope| {
        let handles: Vec<_> = inputs
            .iter()
            .map(|input| scope.spawn(move || decode::<Pairs>(input)))
            .collect();
        for (i, handle) in handles.into_iter().enumerate() {
            let pairs = handle.join().unwrap().unwrap();
            let i = i as i64;
            assert_eq!(pairs, Pairs(vec![Pair(i), Pair(i * 10)]));
        }
    });
}

/// Log sink shared between a test and the subscriber writing to it.
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn nested_record_failures_are_logged() {
    let logs = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer({
            let logs = logs.clone();
            move || logs.clone()
        })
        .finish();
    tracing::subscriber::with_default(subscriber, || {
        decode::<Wrapper>(&jspb!(["tag", ["three"]])).unwrap_err();
    });

    let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
    let nested = output
        .lines()
        .find(|line| line.contains("nested record failed"))
        .unwrap();
    assert!(nested.contains("Pair"));
    assert!(nested.contains("path=$[1]"));
    assert!(output.contains("decode failed"));
}
