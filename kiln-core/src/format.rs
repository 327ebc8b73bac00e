//! The serializer: a recursive visitor over [`Value`] driven by a bitmask of
//! [`Format`] options.

use bitflags::bitflags;

use crate::escape::escape;
use crate::number::Number;
use crate::value::{Map, Value};

bitflags! {
    /// Formatting flags. See each flag's doc comment for its effect.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Format: u16 {
        /// Insert line breaks and indentation around container children.
        const PRETTY = 1 << 0;
        /// Keep array elements on one line even when `PRETTY` is set.
        const COMPACT_ARRAY = 1 << 1;
        /// Iterate objects in key-sorted order instead of insertion order.
        const SORTED = 1 << 2;
        /// Emit `/` as `\/` in strings.
        const ESCAPE_SLASH = 1 << 3;
        /// Indent with one tab per level instead of four spaces.
        const TABS = 1 << 4;
        /// Emit identifier-like object keys unquoted (unless reserved).
        const RELAXED = 1 << 5;
        /// Wrap tokens in ANSI color escapes. Never produces valid JSON.
        const COLOR = 1 << 6;
    }
}

impl Format {
    /// Compact, strict RFC 8259 output: no flags set.
    pub const COMPACT: Format = Format::empty();
}

const COLOR_PUNCT: &str = "\x1b[90m";
const COLOR_KEY: &str = "\x1b[36m";
const COLOR_STRING: &str = "\x1b[32m";
const COLOR_NUMBER: &str = "\x1b[33m";
const COLOR_KEYWORD: &str = "\x1b[35m";
const COLOR_RESET: &str = "\x1b[0m";

/// Serializes `value` to a `String` under the given `format` flags.
/// [`Value::Invalid`] is skipped wherever it is encountered (it must never
/// reach wire form).
#[must_use]
pub fn to_string(value: &Value, format: Format) -> String {
    let mut out = String::new();
    let mut w = Writer { format, out: &mut out };
    w.write_value(value, 0);
    out
}

struct Writer<'a> {
    format: Format,
    out: &'a mut String,
}

impl<'a> Writer<'a> {
    fn pretty(&self) -> bool {
        self.format.contains(Format::PRETTY)
    }

    fn indent(&mut self, level: usize) {
        if !self.pretty() {
            return;
        }
        self.out.push('\n');
        if self.format.contains(Format::TABS) {
            for _ in 0..level {
                self.out.push('\t');
            }
        } else {
            for _ in 0..level * 4 {
                self.out.push(' ');
            }
        }
    }

    fn colored(&mut self, color: &str, text: &str) {
        if self.format.contains(Format::COLOR) {
            self.out.push_str(color);
            self.out.push_str(text);
            self.out.push_str(COLOR_RESET);
        } else {
            self.out.push_str(text);
        }
    }

    fn write_value(&mut self, value: &Value, level: usize) {
        match value {
            Value::Invalid => {}
            Value::Null => self.colored(COLOR_KEYWORD, "null"),
            Value::Boolean(true) => self.colored(COLOR_KEYWORD, "true"),
            Value::Boolean(false) => self.colored(COLOR_KEYWORD, "false"),
            Value::Number(n) => self.write_number(n),
            Value::String(s) => self.write_string(s),
            Value::Array(items) => self.write_array(items, level),
            Value::Object(map) => self.write_object(map, level),
        }
    }

    fn write_number(&mut self, n: &Number) {
        let text = n.to_string();
        self.colored(COLOR_NUMBER, &text);
    }

    fn write_string(&mut self, s: &str) {
        let mut escaped = String::with_capacity(s.len() + 2);
        escaped.push('"');
        escape(s, self.format.contains(Format::ESCAPE_SLASH), &mut escaped);
        escaped.push('"');
        self.colored(COLOR_STRING, &escaped);
    }

    /// A bare identifier-safe, non-reserved key, used only under
    /// `Format::RELAXED`.
    fn write_key(&mut self, key: &str) {
        let bare = self.format.contains(Format::RELAXED)
            && is_bare_identifier(key)
            && !is_reserved_word(key);
        if bare {
            self.colored(COLOR_KEY, key);
        } else {
            let mut escaped = String::with_capacity(key.len() + 2);
            escaped.push('"');
            escape(key, self.format.contains(Format::ESCAPE_SLASH), &mut escaped);
            escaped.push('"');
            self.colored(COLOR_KEY, &escaped);
        }
    }

    fn write_array(&mut self, items: &[Value], level: usize) {
        let items: Vec<&Value> = items.iter().filter(|v| !v.is_invalid()).collect();
        if items.is_empty() {
            self.colored(COLOR_PUNCT, "[]");
            return;
        }
        if self.pretty() && is_one_liner(items.iter().copied()) {
            self.colored(COLOR_PUNCT, "[");
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    self.colored(COLOR_PUNCT, ", ");
                }
                self.write_value(item, level);
            }
            self.colored(COLOR_PUNCT, "]");
            return;
        }
        let compact = !self.pretty() || self.format.contains(Format::COMPACT_ARRAY);
        self.colored(COLOR_PUNCT, "[");
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.colored(COLOR_PUNCT, ",");
                if compact {
                    self.out.push(' ');
                }
            }
            if !compact {
                self.indent(level + 1);
            }
            self.write_value(item, level + 1);
        }
        if !compact {
            self.indent(level);
        }
        self.colored(COLOR_PUNCT, "]");
    }

    fn write_object(&mut self, map: &Map, level: usize) {
        let entries = if self.format.contains(Format::SORTED) {
            map.sorted_iter()
        } else {
            map.iter()
        };
        let entries: Vec<_> = entries.into_iter().filter(|(_, v)| !v.is_invalid()).collect();
        if entries.is_empty() {
            self.colored(COLOR_PUNCT, "{}");
            return;
        }
        if self.pretty() && entries.len() == 1 && is_scalar(&entries[0].1) {
            self.colored(COLOR_PUNCT, "{ ");
            self.write_key(&entries[0].0);
            self.colored(COLOR_PUNCT, ": ");
            self.write_value(&entries[0].1, level);
            self.colored(COLOR_PUNCT, " }");
            return;
        }
        self.colored(COLOR_PUNCT, "{");
        for (i, (key, value)) in entries.iter().enumerate() {
            if i > 0 {
                self.colored(COLOR_PUNCT, ",");
            }
            self.indent(level + 1);
            self.write_key(key);
            self.colored(COLOR_PUNCT, if self.pretty() { ": " } else { ":" });
            self.write_value(value, level + 1);
        }
        self.indent(level);
        self.colored(COLOR_PUNCT, "}");
    }
}

fn is_scalar(v: &Value) -> bool {
    !matches!(v, Value::Array(_) | Value::Object(_))
}

fn is_one_liner<'a>(mut items: impl Iterator<Item = &'a Value>) -> bool {
    items.all(is_scalar)
}

fn is_bare_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn is_reserved_word(s: &str) -> bool {
    matches!(s, "true" | "false" | "null")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse, Options};

    #[test]
    fn compact_array_one_liner() {
        let v = parse("[1,2,3]", Options::default()).unwrap();
        assert_eq!(
            to_string(&v, Format::PRETTY | Format::COMPACT_ARRAY),
            "[1, 2, 3]"
        );
    }

    #[test]
    fn invalid_is_skipped() {
        let v = Value::Array(vec![Value::from(1i64), Value::Invalid, Value::from(2i64)]);
        assert_eq!(to_string(&v, Format::COMPACT), "[1,2]");
    }

    #[test]
    fn sorted_object_keys() {
        let v = parse(r#"{"b":1,"a":2}"#, Options::default()).unwrap();
        assert_eq!(to_string(&v, Format::SORTED), r#"{"a":2,"b":1}"#);
    }

    #[test]
    fn escape_slash_flag() {
        let v = Value::from("a/b");
        assert_eq!(to_string(&v, Format::ESCAPE_SLASH), r#""a\/b""#);
        assert_eq!(to_string(&v, Format::COMPACT), r#""a/b""#);
    }

    #[test]
    fn nan_and_infinity_serialize_as_null() {
        let v = Value::from(f64::NAN);
        assert_eq!(to_string(&v, Format::COMPACT), "null");
        let v = Value::from(f64::INFINITY);
        assert_eq!(to_string(&v, Format::COMPACT), "null");
    }

    #[test]
    fn relaxed_identifier_keys_unquoted() {
        let v = parse(r#"{"foo":1}"#, Options::default()).unwrap();
        assert_eq!(to_string(&v, Format::RELAXED), "{foo:1}");
    }

    #[test]
    fn relaxed_reserved_key_stays_quoted() {
        let v = parse(r#"{"true":1}"#, Options::default()).unwrap();
        assert_eq!(to_string(&v, Format::RELAXED), r#"{"true":1}"#);
    }

    #[test]
    fn round_trip_strict_compact() {
        let src = r#"{"a":[1,2,{"b":true}],"c":null}"#;
        let v = parse(src, Options::default()).unwrap();
        let out = to_string(&v, Format::COMPACT);
        let reparsed = parse(&out, Options::default()).unwrap();
        assert_eq!(v, reparsed);
    }
}
