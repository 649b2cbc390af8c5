use std::fmt;
use std::str::FromStr;

use crate::error::{DecodeError, ValueAccessError};
use crate::span::Span;

/// A decoded JSON node. Besides the value itself we keep the span of input it was decoded from,
/// so consumers can point back at the source when they report problems.
///
/// There is no way to build or mutate a [`Value`] outside of the decoder; a tree is complete and
/// fixed once [`parse`](crate::parse) hands it out.
#[derive(Debug, Clone, PartialEq)]
pub struct Value {
    pub(crate) span: Span,
    pub(crate) node: Node,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Node {
    Null,
    False,
    True,
    Number(f64),
    /// Decoded bytes: escapes resolved, raw bytes copied through unchecked.
    String(Vec<u8>),
    Array(Vec<Value>),
    /// This is not a hashmap or anything that relies on key equality. It is possible to have
    /// duplicate entries in terms of the key name; they are kept in input order. Every key is a
    /// [`Node::String`].
    Object(Vec<(Value, Value)>),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    False,
    True,
    Number,
    String,
    Array,
    Object,
}

impl ValueKind {
    pub fn desc(&self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::False => "false",
            ValueKind::True => "true",
            ValueKind::Number => "number",
            ValueKind::String => "string",
            ValueKind::Array => "array",
            ValueKind::Object => "object",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.desc())
    }
}

impl Value {
    pub(crate) fn new(span: Span, node: Node) -> Self {
        Value { span, node }
    }

    pub fn kind(&self) -> ValueKind {
        match self.node {
            Node::Null => ValueKind::Null,
            Node::False => ValueKind::False,
            Node::True => ValueKind::True,
            Node::Number(_) => ValueKind::Number,
            Node::String(_) => ValueKind::String,
            Node::Array(_) => ValueKind::Array,
            Node::Object(_) => ValueKind::Object,
        }
    }

    /// The input bytes this value was decoded from. For strings this includes the quotes, for
    /// containers the brackets.
    pub fn span(&self) -> Span {
        self.span
    }

    pub fn is_null(&self) -> bool {
        matches!(self.node, Node::Null)
    }

    pub fn as_bool(&self) -> Result<bool, ValueAccessError> {
        match self.node {
            Node::True => Ok(true),
            Node::False => Ok(false),
            _ => Err(self.mismatch("boolean")),
        }
    }

    pub fn as_number(&self) -> Result<f64, ValueAccessError> {
        match self.node {
            Node::Number(n) => Ok(n),
            _ => Err(self.mismatch("number")),
        }
    }

    /// The decoded bytes of a string, with every escape already resolved. Raw bytes from the
    /// input are passed through as-is, so this need not be UTF-8.
    pub fn as_bytes(&self) -> Result<&[u8], ValueAccessError> {
        match &self.node {
            Node::String(bytes) => Ok(bytes),
            _ => Err(self.mismatch("string")),
        }
    }

    /// The decoded text. Fails with [`ValueAccessError::InvalidUtf8`] if the string carried raw
    /// bytes that are not UTF-8; use [`Value::as_bytes`] to get at those.
    pub fn as_string(&self) -> Result<&str, ValueAccessError> {
        std::str::from_utf8(self.as_bytes()?).map_err(|e| ValueAccessError::InvalidUtf8 {
            valid_up_to: e.valid_up_to(),
        })
    }

    pub fn as_array(&self) -> Result<&[Value], ValueAccessError> {
        match &self.node {
            Node::Array(values) => Ok(values),
            _ => Err(self.mismatch("array")),
        }
    }

    /// Object members as `(key, value)` pairs in input order.
    pub fn as_object(&self) -> Result<&[(Value, Value)], ValueAccessError> {
        match &self.node {
            Node::Object(members) => Ok(members),
            _ => Err(self.mismatch("object")),
        }
    }

    pub fn array_len(&self) -> Result<usize, ValueAccessError> {
        self.as_array().map(<[Value]>::len)
    }

    pub fn array_get(&self, index: usize) -> Result<&Value, ValueAccessError> {
        let values = self.as_array()?;
        values
            .get(index)
            .ok_or(ValueAccessError::IndexOutOfRange {
                container: "array",
                index,
                len: values.len(),
            })
    }

    pub fn object_len(&self) -> Result<usize, ValueAccessError> {
        self.as_object().map(<[(Value, Value)]>::len)
    }

    /// The key of the `index`-th member. Always a string value.
    pub fn object_key(&self, index: usize) -> Result<&Value, ValueAccessError> {
        self.object_member(index).map(|(key, _)| key)
    }

    pub fn object_value(&self, index: usize) -> Result<&Value, ValueAccessError> {
        self.object_member(index).map(|(_, value)| value)
    }

    /// Iterate over object members with their keys as decoded bytes.
    pub fn entries(&self) -> Result<impl Iterator<Item = (&[u8], &Value)>, ValueAccessError> {
        Ok(self
            .as_object()?
            .iter()
            .filter_map(|(key, value)| key.as_bytes().ok().map(|key| (key, value))))
    }

    /// The value of the first member named `key`. This is a linear scan; later duplicates of the
    /// same key are never consulted.
    pub fn find(&self, key: &str) -> Result<Option<&Value>, ValueAccessError> {
        Ok(self
            .entries()?
            .find(|(name, _)| *name == key.as_bytes())
            .map(|(_, value)| value))
    }

    fn object_member(&self, index: usize) -> Result<&(Value, Value), ValueAccessError> {
        let members = self.as_object()?;
        members
            .get(index)
            .ok_or(ValueAccessError::IndexOutOfRange {
                container: "object",
                index,
                len: members.len(),
            })
    }

    fn mismatch(&self, expected: &'static str) -> ValueAccessError {
        ValueAccessError::TypeMismatch {
            expected,
            found: self.kind(),
        }
    }
}

impl FromStr for Value {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parse(s)
    }
}
