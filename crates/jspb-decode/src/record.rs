//! Typed records and their positional construction.

use std::any::Any;
use std::fmt;

use jspb_value::{NodePath, Value};

use crate::error::{DecodeError, DecodeErrorKind};
use crate::matcher::Matcher;
use crate::options::DecodeOptions;
use crate::pattern::Pattern;

/// A record type that can be decoded from a value tree.
///
/// The pattern describes where the record's fields sit in the tree; the
/// constructor receives the extracted values in depth-first, left-to-right
/// order and may reject them with a
/// [`DecodeErrorKind::ConstructorInvariantViolation`] when a property cannot
/// be expressed positionally.
pub trait Decodable: fmt::Debug + Send + Sized + 'static {
    /// Name used in diagnostics.
    const NAME: &'static str;

    /// The record's schema. Built once and shared by every decode call.
    fn pattern() -> &'static Pattern;

    fn construct(fields: &mut Fields) -> Result<Self, DecodeErrorKind>;
}

/// Decode `node` as a `T` with the default options.
pub fn decode<T: Decodable>(node: &Value) -> Result<T, DecodeError> {
    decode_with(node, &DecodeOptions::default())
}

pub fn decode_with<T: Decodable>(node: &Value, options: &DecodeOptions) -> Result<T, DecodeError> {
    decode_at(node, options, &NodePath::root()).inspect_err(|error| {
        tracing::debug!(record = T::NAME, %error, "decode failed");
    })
}

/// Decode a record found at `path` in the enclosing tree. Paths in errors are
/// reported relative to the outermost decode call.
pub(crate) fn decode_at<T: Decodable>(
    node: &Value,
    options: &DecodeOptions,
    path: &NodePath,
) -> Result<T, DecodeError> {
    let extracted = Matcher::new(options, path.clone()).run(node, T::pattern())?;
    let mut fields = Fields::new(T::NAME, extracted);
    let record = T::construct(&mut fields)
        .and_then(|record| fields.finish().map(|()| record))
        .map_err(|kind| DecodeError::new(path.clone(), node, kind))?;
    Ok(record)
}

/// A value produced by matching a leaf or a nested record.
#[derive(Debug)]
pub enum Extracted {
    String(String),
    Integer(i64),
    Record(ExtractedRecord),
}

impl Extracted {
    /// Short description for diagnostics, e.g. `record IssueComment`.
    pub fn describe(&self) -> String {
        match self {
            Extracted::String(_) => "string".to_string(),
            Extracted::Integer(_) => "integer".to_string(),
            Extracted::Record(record) => format!("record {}", record.name()),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Extracted::String(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Extracted::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&ExtractedRecord> {
        match self {
            Extracted::Record(record) => Some(record),
            _ => None,
        }
    }
}

type DebugFn = fn(&(dyn Any + Send), &mut fmt::Formatter<'_>) -> fmt::Result;

/// A decoded record whose concrete type is only known at runtime.
pub struct ExtractedRecord {
    name: &'static str,
    value: Box<dyn Any + Send>,
    debug: DebugFn,
}

fn debug_record<T: Decodable>(value: &(dyn Any + Send), f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match value.downcast_ref::<T>() {
        Some(record) => record.fmt(f),
        None => f.write_str(T::NAME),
    }
}

impl ExtractedRecord {
    pub fn new<T: Decodable>(record: T) -> Self {
        Self {
            name: T::NAME,
            value: Box::new(record),
            debug: debug_record::<T>,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is<T: Decodable>(&self) -> bool {
        self.value.is::<T>()
    }

    pub fn downcast_ref<T: Decodable>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// Recover the concrete record, or get `self` back if it is another type.
    pub fn downcast<T: Decodable>(self) -> Result<T, Self> {
        let Self { name, value, debug } = self;
        value
            .downcast::<T>()
            .map(|record| *record)
            .map_err(|value| Self { name, value, debug })
    }
}

impl fmt::Debug for ExtractedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (self.debug)(self.value.as_ref(), f)
    }
}

/// Extracted values of one record, consumed front to back by its constructor.
///
/// Every accessor checks the next value's kind so that a schema whose pattern
/// disagrees with its constructor produces a descriptive error instead of a
/// panic. Values left over once the constructor returns are an error as well.
pub struct Fields {
    record: &'static str,
    items: std::vec::IntoIter<Extracted>,
    index: usize,
}

impl Fields {
    pub fn new(record: &'static str, items: Vec<Extracted>) -> Self {
        Self {
            record,
            items: items.into_iter(),
            index: 0,
        }
    }

    /// Name of the record being constructed.
    pub fn record_name(&self) -> &'static str {
        self.record
    }

    pub fn remaining(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Take the next value whatever its kind.
    pub fn take(&mut self) -> Result<Extracted, DecodeErrorKind> {
        self.take_expecting("any value")
    }

    fn take_expecting(&mut self, expected: &str) -> Result<Extracted, DecodeErrorKind> {
        let item = self.items.next().ok_or_else(|| DecodeErrorKind::MissingField {
            record: self.record,
            index: self.index,
            expected: expected.to_string(),
        })?;
        self.index += 1;
        Ok(item)
    }

    fn unexpected(&self, expected: String, found: &Extracted) -> DecodeErrorKind {
        DecodeErrorKind::UnexpectedField {
            record: self.record,
            index: self.index - 1,
            expected,
            found: found.describe(),
        }
    }

    pub fn string(&mut self) -> Result<String, DecodeErrorKind> {
        match self.take_expecting("string")? {
            Extracted::String(text) => Ok(text),
            other => Err(self.unexpected("string".to_string(), &other)),
        }
    }

    pub fn integer(&mut self) -> Result<i64, DecodeErrorKind> {
        match self.take_expecting("integer")? {
            Extracted::Integer(n) => Ok(n),
            other => Err(self.unexpected("integer".to_string(), &other)),
        }
    }

    pub fn record<T: Decodable>(&mut self) -> Result<T, DecodeErrorKind> {
        let expected = format!("record {}", T::NAME);
        match self.take_expecting(&expected)? {
            Extracted::Record(record) => record.downcast::<T>().map_err(|record| {
                self.unexpected(expected, &Extracted::Record(record))
            }),
            other => Err(self.unexpected(expected, &other)),
        }
    }

    /// Take every remaining value as a `T` record.
    pub fn records<T: Decodable>(&mut self) -> Result<Vec<T>, DecodeErrorKind> {
        let mut out = Vec::with_capacity(self.remaining());
        while !self.is_empty() {
            out.push(self.record::<T>()?);
        }
        Ok(out)
    }

    /// Take every remaining value as a string.
    pub fn strings(&mut self) -> Result<Vec<String>, DecodeErrorKind> {
        let mut out = Vec::with_capacity(self.remaining());
        while !self.is_empty() {
            out.push(self.string()?);
        }
        Ok(out)
    }

    /// Take every remaining value, for constructors that classify
    /// heterogeneous records themselves.
    pub fn drain(&mut self) -> Vec<Extracted> {
        self.index += self.items.len();
        self.items.by_ref().collect()
    }

    /// Error reporting that an invariant of the record does not hold.
    pub fn invariant(&self, message: impl Into<String>) -> DecodeErrorKind {
        DecodeErrorKind::ConstructorInvariantViolation {
            record: self.record,
            message: message.into(),
        }
    }

    fn finish(&self) -> Result<(), DecodeErrorKind> {
        match self.remaining() {
            0 => Ok(()),
            count => Err(DecodeErrorKind::TrailingFields {
                record: self.record,
                count,
            }),
        }
    }
}

impl fmt::Debug for Fields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fields")
            .field("record", &self.record)
            .field("index", &self.index)
            .field("remaining", &self.items.as_slice())
            .finish()
    }
}
