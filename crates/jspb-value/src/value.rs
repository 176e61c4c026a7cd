use core::fmt::{self, Display, Write as _};

use thisisplural::Plural;

/// One node of a positional payload.
///
/// The upstream wire format transmits most numbers as strings, so a decoded
/// payload is mostly strings, nulls and sequences. `Integer` only appears
/// where the payload carried a native JSON number.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    String(String),
    Integer(i64),
    Null,
    Sequence(Sequence),
}

/// Ordered list of child nodes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Plural)]
#[plural(len, is_empty, iter, into_iter, into_iter_ref, from_iter, new)]
pub struct Sequence(pub Vec<Value>);

impl Sequence {
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.0.get(index)
    }

    pub fn as_slice(&self) -> &[Value] {
        &self.0
    }
}

/// Runtime type of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    String,
    Integer,
    Null,
    Sequence,
}

impl Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::String => write!(f, "string"),
            ValueKind::Integer => write!(f, "integer"),
            ValueKind::Null => write!(f, "null"),
            ValueKind::Sequence => write!(f, "sequence"),
        }
    }
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::String(_) => ValueKind::String,
            Value::Integer(_) => ValueKind::Integer,
            Value::Null => ValueKind::Null,
            Value::Sequence(_) => ValueKind::Sequence,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&Sequence> {
        match self {
            Value::Sequence(sequence) => Some(sequence),
            _ => None,
        }
    }

    /// Compact rendering of this node for diagnostics, cut off after
    /// `max_chars` characters.
    pub fn snippet(&self, max_chars: usize) -> String {
        let rendered = self.to_string();
        if rendered.chars().count() <= max_chars {
            return rendered;
        }
        let mut out: String = rendered.chars().take(max_chars).collect();
        out.push('…');
        out
    }

    /// Visit every leaf (non-sequence node) in depth-first order together with
    /// its position path.
    pub fn walk_leaves<F>(&self, mut visit: F)
    where
        F: FnMut(&crate::NodePath, &Value),
    {
        fn go<F>(value: &Value, path: &mut crate::NodePath, visit: &mut F)
        where
            F: FnMut(&crate::NodePath, &Value),
        {
            match value {
                Value::Sequence(items) => {
                    for (index, item) in items.iter().enumerate() {
                        path.push(index);
                        go(item, path, visit);
                        path.pop();
                    }
                }
                leaf => visit(path, leaf),
            }
        }
        go(self, &mut crate::NodePath::root(), &mut visit);
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(text) => {
                f.write_char('"')?;
                for c in text.chars() {
                    match c {
                        '"' => f.write_str("\\\"")?,
                        '\\' => f.write_str("\\\\")?,
                        '\n' => f.write_str("\\n")?,
                        '\r' => f.write_str("\\r")?,
                        '\t' => f.write_str("\\t")?,
                        c if c.is_control() => write!(f, "\\u{:04x}", c as u32)?,
                        c => f.write_char(c)?,
                    }
                }
                f.write_char('"')
            }
            Value::Integer(n) => write!(f, "{n}"),
            Value::Null => f.write_str("null"),
            Value::Sequence(items) => {
                f.write_char('[')?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_char(',')?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_char(']')
            }
        }
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::String(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::String(text)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<Sequence> for Value {
    fn from(sequence: Sequence) -> Self {
        Value::Sequence(sequence)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Sequence(Sequence(items))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}
