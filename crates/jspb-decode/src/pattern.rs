//! Vocabulary for describing the expected shape of a value tree.

use std::borrow::Cow;
use std::fmt::{self, Display};

use jspb_value::{NodePath, Value};

use crate::error::DecodeError;
use crate::options::DecodeOptions;
use crate::record::{Decodable, ExtractedRecord, decode_at};

/// Scalar kinds a leaf pattern can extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeafKind {
    /// A string node; yields its text.
    String,
    /// A string node holding a decimal integer; yields the parsed integer.
    ///
    /// Numbers travel as strings on the wire, so this is the only place a
    /// string is coerced into an integer.
    Integer,
    /// A null node; yields nothing.
    Null,
}

/// Expected shape of a value node.
#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    Leaf(LeafKind),
    /// A string node equal to the given text. Yields nothing.
    Literal(Cow<'static, str>),
    /// A sequence node decoded as a nested record. Yields the record itself.
    Record(RecordRef),
    /// A sequence node matched element by element.
    Shape(Vec<ShapeField>),
    /// A sequence node whose every element matches the inner pattern.
    Repeated(Box<Pattern>),
    /// The first candidate that matches wins.
    Alternation(Vec<Pattern>),
    /// Matches any node and yields nothing.
    Ignore,
}

/// One positional entry of a [`Pattern::Shape`].
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeField {
    /// Consume one element.
    Pattern(Pattern),
    /// Advance over this many elements without looking at them.
    Skip(usize),
    /// Ignore every remaining element. Must be the last field.
    Rest,
}

impl From<Pattern> for ShapeField {
    fn from(pattern: Pattern) -> Self {
        ShapeField::Pattern(pattern)
    }
}

type ErasedDecode =
    fn(&Value, &DecodeOptions, &NodePath) -> Result<ExtractedRecord, DecodeError>;

/// Reference to a [`Decodable`] record type from inside a pattern.
///
/// Holds a function pointer instead of the record's pattern so that record
/// types may refer to each other, or to themselves, without eagerly building
/// every pattern they mention.
#[derive(Clone, Copy)]
pub struct RecordRef {
    name: &'static str,
    decode: ErasedDecode,
}

impl RecordRef {
    pub fn of<T: Decodable>() -> Self {
        Self {
            name: T::NAME,
            decode: decode_erased::<T>,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn decode(
        &self,
        node: &Value,
        options: &DecodeOptions,
        path: &NodePath,
    ) -> Result<ExtractedRecord, DecodeError> {
        (self.decode)(node, options, path)
    }
}

fn decode_erased<T: Decodable>(
    node: &Value,
    options: &DecodeOptions,
    path: &NodePath,
) -> Result<ExtractedRecord, DecodeError> {
    decode_at::<T>(node, options, path).map(ExtractedRecord::new)
}

impl fmt::Debug for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RecordRef").field(&self.name).finish()
    }
}

impl PartialEq for RecordRef {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Pattern {
    /// Positional shape from a list of fields.
    ///
    /// See also the [`shape!`](crate::shape) macro, which accepts patterns and
    /// shape markers side by side.
    pub fn shape(fields: impl IntoIterator<Item = ShapeField>) -> Self {
        Pattern::Shape(fields.into_iter().collect())
    }
}

pub fn string() -> Pattern {
    Pattern::Leaf(LeafKind::String)
}

pub fn integer() -> Pattern {
    Pattern::Leaf(LeafKind::Integer)
}

pub fn null() -> Pattern {
    Pattern::Leaf(LeafKind::Null)
}

pub fn literal(text: impl Into<Cow<'static, str>>) -> Pattern {
    Pattern::Literal(text.into())
}

pub fn record<T: Decodable>() -> Pattern {
    Pattern::Record(RecordRef::of::<T>())
}

pub fn repeated(element: Pattern) -> Pattern {
    Pattern::Repeated(Box::new(element))
}

pub fn alternation(candidates: impl IntoIterator<Item = Pattern>) -> Pattern {
    Pattern::Alternation(candidates.into_iter().collect())
}

/// Matches anything. Used as the last candidate of an alternation to silently
/// drop elements no other candidate recognizes.
pub fn ignore() -> Pattern {
    Pattern::Ignore
}

pub fn skip(count: usize) -> ShapeField {
    ShapeField::Skip(count)
}

pub fn rest() -> ShapeField {
    ShapeField::Rest
}

/// Build a [`Pattern::Shape`] from patterns and shape markers.
///
/// ```
/// use jspb_decode::{Pattern, ShapeField, integer, literal, rest, shape, skip};
///
/// let pattern = shape![literal("b.IssueComment"), skip(6), integer(), rest()];
/// assert!(matches!(pattern, Pattern::Shape(ref fields) if fields.len() == 4));
/// assert_eq!(pattern.to_string(), r#"shape("b.IssueComment", skip(6), integer, rest)"#);
/// ```
#[macro_export]
macro_rules! shape {
    ($($field:expr),* $(,)?) => {
        $crate::Pattern::Shape(::std::vec![
            $( ::core::convert::Into::<$crate::ShapeField>::into($field) ),*
        ])
    };
}

impl Display for LeafKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeafKind::String => write!(f, "string"),
            LeafKind::Integer => write!(f, "integer"),
            LeafKind::Null => write!(f, "null"),
        }
    }
}

impl Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::Leaf(kind) => write!(f, "{kind}"),
            Pattern::Literal(text) => write!(f, "{text:?}"),
            Pattern::Record(record) => write!(f, "{}", record.name),
            Pattern::Shape(fields) => {
                write!(f, "shape(")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{field}")?;
                }
                write!(f, ")")
            }
            Pattern::Repeated(element) => write!(f, "repeated({element})"),
            Pattern::Alternation(candidates) => {
                write!(f, "alternation(")?;
                for (i, candidate) in candidates.iter().enumerate() {
                    if i > 0 {
                        write!(f, " | ")?;
                    }
                    write!(f, "{candidate}")?;
                }
                write!(f, ")")
            }
            Pattern::Ignore => write!(f, "ignore"),
        }
    }
}

impl Display for ShapeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeField::Pattern(pattern) => write!(f, "{pattern}"),
            ShapeField::Skip(count) => write!(f, "skip({count})"),
            ShapeField::Rest => write!(f, "rest"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_nested() {
        let pattern = shape![
            literal("b.IssueEvent"),
            skip(2),
            repeated(alternation([string(), null(), ignore()])),
            rest(),
        ];
        assert_eq!(
            pattern.to_string(),
            r#"shape("b.IssueEvent", skip(2), repeated(alternation(string | null | ignore)), rest)"#
        );
    }

    #[test]
    fn test_shape_macro_matches_constructor() {
        let from_macro = shape![integer(), skip(1), rest()];
        let from_fn = Pattern::shape([ShapeField::from(integer()), skip(1), rest()]);
        assert_eq!(from_macro, from_fn);
    }

    #[test]
    fn test_empty_shape() {
        assert_eq!(shape![], Pattern::Shape(Vec::new()));
    }
}
