//! The in-memory JSON value tree.

mod map;
pub use map::Map;

use std::cmp::Ordering;
use std::fmt;

use crate::error::TypeError;
use crate::number::Number;

/// A parsed JSON value.
///
/// `Value` exclusively owns its payload; children are owned by the parent
/// and copying is always deep. [`Value::Invalid`] is the sentinel returned
/// by failed lookups (see [`crate::value::Map::get`] and pointer
/// navigation) — it must never appear inside a tree that gets serialized;
/// the serializer skips it defensively, but well-behaved code never
/// constructs one except as a "not found" result.
#[derive(Clone, Debug, Default)]
pub enum Value {
    /// Sentinel for "not present" / a failed lookup. Never written by the
    /// parser.
    #[default]
    Invalid,
    Null,
    Boolean(bool),
    Number(Number),
    String(Box<str>),
    Array(Vec<Value>),
    Object(Map),
}

/// The name of a [`Value`]'s runtime variant, as used by schema `type`
/// checks and the CLI's `type` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Kind {
    Invalid,
    Null,
    Boolean,
    Number,
    String,
    Array,
    Object,
}

impl Value {
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Value::Invalid => Kind::Invalid,
            Value::Null => Kind::Null,
            Value::Boolean(_) => Kind::Boolean,
            Value::Number(_) => Kind::Number,
            Value::String(_) => Kind::String,
            Value::Array(_) => Kind::Array,
            Value::Object(_) => Kind::Object,
        }
    }

    #[must_use]
    pub fn is_invalid(&self) -> bool {
        matches!(self, Value::Invalid)
    }
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
    #[must_use]
    pub fn is_boolean(&self) -> bool {
        matches!(self, Value::Boolean(_))
    }
    #[must_use]
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }
    #[must_use]
    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }
    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }
    #[must_use]
    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Value::Number(n) => Some(n),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        self.as_number().map(Number::as_f64)
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_array_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Value::Object(m) => Some(m),
            _ => None,
        }
    }

    /// Fallibly borrows this value as an object, raising [`TypeError`] if it
    /// is some other variant. Used by accessors that indicate programmer
    /// error distinctly from a parse failure.
    pub fn require_object(&self) -> Result<&Map, TypeError> {
        self.as_object().ok_or(TypeError {
            expected: "object",
            found: self.kind_name(),
        })
    }

    /// Fallibly borrows this value as an array; see [`Value::require_object`].
    pub fn require_array(&self) -> Result<&Vec<Value>, TypeError> {
        self.as_array().ok_or(TypeError {
            expected: "array",
            found: self.kind_name(),
        })
    }

    fn kind_name(&self) -> &'static str {
        match self.kind() {
            Kind::Invalid => "invalid",
            Kind::Null => "null",
            Kind::Boolean => "boolean",
            Kind::Number => "number",
            Kind::String => "string",
            Kind::Array => "array",
            Kind::Object => "object",
        }
    }

    /// Looks up `key` in an object value; returns [`Value::Invalid`] for any
    /// other variant or a missing key — never panics.
    #[must_use]
    pub fn get(&self, key: &str) -> Value {
        self.as_object().map_or(Value::Invalid, |m| m.get(key))
    }

    /// Looks up a 0-based array index; returns [`Value::Invalid`] out of
    /// bounds or for any other variant.
    #[must_use]
    pub fn get_index(&self, index: usize) -> Value {
        self.as_array()
            .and_then(|a| a.get(index))
            .cloned()
            .unwrap_or(Value::Invalid)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}
impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Number(Number::from(v))
    }
}
impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Number(Number::from(v))
    }
}
impl From<Number> for Value {
    fn from(v: Number) -> Self {
        Value::Number(v)
    }
}
impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v.into_boxed_str())
    }
}
impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.into())
    }
}
impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Array(v)
    }
}
impl From<Map> for Value {
    fn from(v: Map) -> Self {
        Value::Object(v)
    }
}

/// Semantic equality: object-member insertion order is ignored (delegated to
/// [`Map`]'s own order-insensitive `PartialEq`).
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Invalid, Value::Invalid) | (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            _ => false,
        }
    }
}

fn variant_rank(v: &Value) -> u8 {
    match v {
        Value::Invalid => 0,
        Value::Null => 1,
        Value::Boolean(_) => 2,
        Value::Number(_) => 3,
        Value::String(_) => 4,
        Value::Array(_) => 5,
        Value::Object(_) => 6,
    }
}

/// A total order used only to give the ordered multi-map's key-sorted view a
/// deterministic ordering within a run of equal keys. Not a JSON Schema
/// concept — plain variant-rank-then-natural-value comparison.
impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Boolean(a), Value::Boolean(b)) => a.cmp(b),
            (Value::Number(a), Value::Number(b)) => {
                a.partial_cmp(b).unwrap_or(Ordering::Equal)
            }
            (Value::String(a), Value::String(b)) => a.cmp(b),
            (Value::Array(a), Value::Array(b)) => a.cmp(b),
            (Value::Object(a), Value::Object(b)) => a.cmp(b),
            _ => variant_rank(self).cmp(&variant_rank(other)),
        }
    }
}
impl Eq for Value {}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", crate::format::to_string(self, crate::format::Format::COMPACT))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_on_non_object_is_invalid_not_panic() {
        let v = Value::from(1i64);
        assert_eq!(v.get("a"), Value::Invalid);
    }

    #[test]
    fn semantic_equality_ignores_member_order() {
        let a = Map::new();
        a.insert("x", Value::from(1i64));
        a.insert("y", Value::from(2i64));
        let b = Map::new();
        b.insert("y", Value::from(2i64));
        b.insert("x", Value::from(1i64));
        assert_eq!(Value::Object(a), Value::Object(b));
    }

    #[test]
    fn duplicate_members_last_wins() {
        let m = Map::new();
        m.insert("a", Value::from(1i64));
        m.insert("a", Value::from(2i64));
        let v = Value::Object(m);
        assert_eq!(v.get("a"), Value::from(2i64));
    }
}
