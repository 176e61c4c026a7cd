//! Walks a pattern against a value tree and collects extracted values.

use jspb_value::{NodePath, Sequence, Value};
use tracing::{debug, trace};

use crate::error::{DecodeError, DecodeErrorKind, ExpectedKind};
use crate::options::{DecodeOptions, IntegerLeafRepr, RepeatedTarget};
use crate::pattern::{LeafKind, Pattern, RecordRef, ShapeField};
use crate::record::{Extracted, ExtractedRecord};

/// Match `pattern` against `node` and return what it extracted, without
/// constructing a record.
pub fn match_pattern(
    node: &Value,
    pattern: &Pattern,
    options: &DecodeOptions,
) -> Result<Vec<Extracted>, DecodeError> {
    Matcher::new(options, NodePath::root()).run(node, pattern)
}

/// State of one decode call.
///
/// `top` is the accumulator handed to the record constructor. Each
/// alternation candidate in progress pushes a scratch frame onto `scopes`;
/// the frame is spliced into its parent when the candidate matches and
/// dropped when it fails.
pub(crate) struct Matcher<'a> {
    options: &'a DecodeOptions,
    top: Vec<Extracted>,
    scopes: Vec<Vec<Extracted>>,
    path: NodePath,
}

impl<'a> Matcher<'a> {
    pub(crate) fn new(options: &'a DecodeOptions, path: NodePath) -> Self {
        Self {
            options,
            top: Vec::new(),
            scopes: Vec::new(),
            path,
        }
    }

    pub(crate) fn run(
        mut self,
        node: &Value,
        pattern: &Pattern,
    ) -> Result<Vec<Extracted>, DecodeError> {
        self.match_node(node, pattern)?;
        Ok(self.top)
    }

    fn output(&mut self) -> &mut Vec<Extracted> {
        match self.scopes.last_mut() {
            Some(scope) => scope,
            None => &mut self.top,
        }
    }

    fn emit(&mut self, item: Extracted) {
        self.output().push(item);
    }

    fn error(&self, node: &Value, kind: DecodeErrorKind) -> DecodeError {
        DecodeError::new(self.path.clone(), node, kind)
    }

    fn match_node(&mut self, node: &Value, pattern: &Pattern) -> Result<(), DecodeError> {
        match pattern {
            Pattern::Leaf(kind) => self.match_leaf(node, *kind),
            Pattern::Literal(expected) => match node {
                Value::String(text) if text == expected => Ok(()),
                _ => Err(self.error(
                    node,
                    DecodeErrorKind::LiteralMismatch {
                        expected: expected.to_string(),
                        actual: node.snippet(crate::error::SNIPPET_CHARS),
                    },
                )),
            },
            Pattern::Record(record) => self.match_record(node, record),
            Pattern::Shape(fields) => self.match_shape(node, fields),
            Pattern::Repeated(element) => self.match_repeated(node, element),
            Pattern::Alternation(candidates) => self.match_alternation(node, candidates),
            Pattern::Ignore => Ok(()),
        }
    }

    fn match_leaf(&mut self, node: &Value, kind: LeafKind) -> Result<(), DecodeError> {
        match (kind, node) {
            (LeafKind::String, Value::String(text)) => {
                self.emit(Extracted::String(text.clone()));
                Ok(())
            }
            (LeafKind::Integer, Value::String(text)) => {
                let n = text.parse::<i64>().map_err(|source| {
                    self.error(
                        node,
                        DecodeErrorKind::IntegerParse {
                            text: text.clone(),
                            source,
                        },
                    )
                })?;
                self.emit(Extracted::Integer(n));
                Ok(())
            }
            (LeafKind::Integer, Value::Integer(n))
                if self.options.integer_leaf == IntegerLeafRepr::StringOrInteger =>
            {
                self.emit(Extracted::Integer(*n));
                Ok(())
            }
            (LeafKind::Null, Value::Null) => Ok(()),
            (kind, node) => {
                let expected = match kind {
                    LeafKind::String => ExpectedKind::String,
                    LeafKind::Integer => ExpectedKind::EncodedInteger,
                    LeafKind::Null => ExpectedKind::Null,
                };
                Err(self.error(
                    node,
                    DecodeErrorKind::TypeMismatch {
                        expected,
                        actual: node.kind(),
                    },
                ))
            }
        }
    }

    fn expect_sequence<'v>(&self, node: &'v Value) -> Result<&'v Sequence, DecodeError> {
        node.as_sequence().ok_or_else(|| {
            self.error(
                node,
                DecodeErrorKind::TypeMismatch {
                    expected: ExpectedKind::Sequence,
                    actual: node.kind(),
                },
            )
        })
    }

    fn match_record(&mut self, node: &Value, record: &RecordRef) -> Result<(), DecodeError> {
        self.expect_sequence(node)?;
        let decoded: ExtractedRecord = record
            .decode(node, self.options, &self.path)
            .map_err(|source| {
                debug!(
                    record = record.name(),
                    path = %self.path,
                    error = %source,
                    "nested record failed"
                );
                self.error(
                    node,
                    DecodeErrorKind::Nested {
                        record: record.name(),
                        source: Box::new(source),
                    },
                )
            })?;
        self.emit(Extracted::Record(decoded));
        Ok(())
    }

    fn match_shape(&mut self, node: &Value, fields: &[ShapeField]) -> Result<(), DecodeError> {
        let items = self.expect_sequence(node)?;
        let len = items.len();
        let mut cursor = 0usize;
        let mut open_ended = false;

        for field in fields {
            match field {
                ShapeField::Rest => {
                    open_ended = true;
                    break;
                }
                ShapeField::Skip(count) => {
                    cursor = cursor.saturating_add(*count);
                }
                ShapeField::Pattern(pattern) => {
                    let Some(element) = items.get(cursor) else {
                        return Err(self.error(
                            node,
                            DecodeErrorKind::TooFewFields {
                                required: cursor + 1,
                                actual: len,
                            },
                        ));
                    };
                    self.path.push(cursor);
                    let result = self.match_node(element, pattern);
                    self.path.pop();
                    result?;
                    cursor += 1;
                }
            }
        }

        if !open_ended && cursor != len {
            return Err(self.error(
                node,
                DecodeErrorKind::TooManyFields {
                    expected: cursor,
                    actual: len,
                },
            ));
        }
        if cursor > len {
            return Err(self.error(
                node,
                DecodeErrorKind::OverskippedFields {
                    expected: cursor,
                    actual: len,
                },
            ));
        }
        Ok(())
    }

    fn match_repeated(&mut self, node: &Value, element: &Pattern) -> Result<(), DecodeError> {
        let items = self.expect_sequence(node)?;
        // With `TopLevel`, hide the open alternation scopes so that `output()`
        // resolves to the decode call's accumulator. Alternations nested in
        // `element` still open their own scopes on the emptied stack.
        let hidden = match self.options.repeated_target {
            RepeatedTarget::TopLevel => std::mem::take(&mut self.scopes),
            RepeatedTarget::Enclosing => Vec::new(),
        };
        let mut result = Ok(());
        for (index, item) in items.iter().enumerate() {
            self.path.push(index);
            result = self.match_node(item, element);
            self.path.pop();
            if result.is_err() {
                break;
            }
        }
        if self.options.repeated_target == RepeatedTarget::TopLevel {
            self.scopes = hidden;
        }
        result
    }

    fn match_alternation(
        &mut self,
        node: &Value,
        candidates: &[Pattern],
    ) -> Result<(), DecodeError> {
        let mut attempts = Vec::new();
        for (index, candidate) in candidates.iter().enumerate() {
            self.scopes.push(Vec::new());
            let result = self.match_node(node, candidate);
            let scope = self.scopes.pop().unwrap_or_default();
            match result {
                Ok(()) => {
                    self.output().extend(scope);
                    return Ok(());
                }
                Err(error) => {
                    trace!(candidate = index, pattern = %candidate, %error, "alternative rejected");
                    if self.options.collect_alternation_failures {
                        attempts.push(error);
                    }
                }
            }
        }
        Err(self.error(
            node,
            DecodeErrorKind::NoAlternativeMatched {
                tried: candidates.len(),
                attempts,
            },
        ))
    }
}
