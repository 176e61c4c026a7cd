use std::fmt::{self, Display};
use std::num::ParseIntError;

use jspb_value::{NodePath, Value, ValueKind};

/// Longest node rendering kept in an error.
pub(crate) const SNIPPET_CHARS: usize = 80;

/// A failed decode, located at the node where matching stopped.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{kind} at {path} (found {snippet})")]
pub struct DecodeError {
    pub path: NodePath,
    /// Truncated rendering of the offending node.
    pub snippet: String,
    pub kind: DecodeErrorKind,
}

impl DecodeError {
    pub fn new(path: NodePath, node: &Value, kind: DecodeErrorKind) -> Self {
        Self {
            path,
            snippet: node.snippet(SNIPPET_CHARS),
            kind,
        }
    }

    /// The innermost error behind any chain of nested record failures.
    pub fn root_cause(&self) -> &DecodeError {
        let mut current = self;
        while let DecodeErrorKind::Nested { source, .. } = &current.kind {
            current = source;
        }
        current
    }
}

/// What a node was expected to be when its runtime type did not fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedKind {
    String,
    /// A string holding a decimal integer.
    EncodedInteger,
    Null,
    Sequence,
}

impl Display for ExpectedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpectedKind::String => write!(f, "string"),
            ExpectedKind::EncodedInteger => write!(f, "string-encoded integer"),
            ExpectedKind::Null => write!(f, "null"),
            ExpectedKind::Sequence => write!(f, "sequence"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DecodeErrorKind {
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        expected: ExpectedKind,
        actual: ValueKind,
    },

    #[error("invalid integer {text:?}: {source}")]
    IntegerParse {
        text: String,
        #[source]
        source: ParseIntError,
    },

    #[error("literal mismatch: expected {expected:?}, got {actual}")]
    LiteralMismatch { expected: String, actual: String },

    #[error("too few fields: expected at least {required}, got {actual}")]
    TooFewFields { required: usize, actual: usize },

    #[error("too many fields: expected {expected}, got {actual} (end the shape with rest to allow more)")]
    TooManyFields { expected: usize, actual: usize },

    #[error("skipped too many fields: expected a total of {expected}, got {actual}")]
    OverskippedFields { expected: usize, actual: usize },

    #[error("no alternative matched ({tried} candidates tried)")]
    NoAlternativeMatched {
        tried: usize,
        /// Failure of each candidate, in order. Empty when failure collection
        /// is turned off.
        attempts: Vec<DecodeError>,
    },

    #[error("failed to decode {record}: {source}")]
    Nested {
        record: &'static str,
        #[source]
        source: Box<DecodeError>,
    },

    #[error("{record}: {message}")]
    ConstructorInvariantViolation {
        record: &'static str,
        message: String,
    },

    #[error("{record}: missing field #{index}, expected {expected}")]
    MissingField {
        record: &'static str,
        index: usize,
        expected: String,
    },

    #[error("{record}: field #{index} is {found}, expected {expected}")]
    UnexpectedField {
        record: &'static str,
        index: usize,
        expected: String,
        found: String,
    },

    #[error("{record}: {count} extracted values left unused")]
    TrailingFields { record: &'static str, count: usize },
}
