//! RFC 6901 JSON Pointer: parsing, navigation, and the `-` append sentinel.

use std::fmt;

use kiln_core::Value;

/// A single reference token between two `/` separators, already unescaped
/// (`~1` → `/`, `~0` → `~`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `true` if this token is the `-` "one past the end" sentinel used by
    /// add-style array operations.
    #[must_use]
    pub fn is_append(&self) -> bool {
        self.0 == "-"
    }

    /// Parses this token as an array index: `0` or `[1-9][0-9]*`. Leading
    /// zeros other than a lone `0`, and non-digit bytes, are rejected.
    #[must_use]
    pub fn as_index(&self) -> Option<usize> {
        let s = &self.0;
        if s == "0" {
            return Some(0);
        }
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        if s.as_bytes()[0] == b'0' {
            return None;
        }
        s.parse().ok()
    }
}

/// A parsed JSON Pointer: an ordered (possibly empty) sequence of tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pointer {
    tokens: Vec<Token>,
}

/// A pointer's textual form could not be parsed.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum PointerError {
    #[error("pointer must be empty or start with '/'")]
    MissingLeadingSlash,
    #[error("invalid escape sequence '~{0}' in pointer token")]
    InvalidEscape(char),
}

impl Pointer {
    /// The empty pointer, denoting the document root.
    #[must_use]
    pub fn root() -> Self {
        Pointer { tokens: Vec::new() }
    }

    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.tokens.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Parses the textual pointer form (`/a/b/0`, or `""` for the root).
    pub fn parse(text: &str) -> Result<Self, PointerError> {
        if text.is_empty() {
            return Ok(Pointer::root());
        }
        if !text.starts_with('/') {
            return Err(PointerError::MissingLeadingSlash);
        }
        let mut tokens = Vec::new();
        for raw in text[1..].split('/') {
            tokens.push(Token(unescape_token(raw)?));
        }
        Ok(Pointer { tokens })
    }

    /// Returns a new pointer with `token` appended.
    #[must_use]
    pub fn child(&self, token: impl Into<String>) -> Self {
        let mut tokens = self.tokens.clone();
        tokens.push(Token(token.into()));
        Pointer { tokens }
    }

    /// `true` if `other` is this pointer or a descendant of it.
    #[must_use]
    pub fn is_prefix_of(&self, other: &Pointer) -> bool {
        other.tokens.len() >= self.tokens.len() && self.tokens == other.tokens[..self.tokens.len()]
    }

    /// Returns this pointer with `other`'s tokens appended, treating `other`
    /// as relative to `self`.
    #[must_use]
    pub fn join(&self, other: &Pointer) -> Self {
        let mut tokens = self.tokens.clone();
        tokens.extend(other.tokens.iter().cloned());
        Pointer { tokens }
    }

    /// Resolves this pointer against `root`, descending per RFC 6901. Object
    /// keys are looked up by name (last-wins, per the backing multi-map's
    /// `get` semantics); array indices are parsed and bounds-checked. A
    /// malformed token, an out-of-range index, or a descent through a
    /// scalar yields [`Value::Invalid`] rather than an error — this mirrors
    /// [`Value::get`](kiln_core::Value::get)'s own "never panic" contract.
    #[must_use]
    pub fn resolve(&self, root: &Value) -> Value {
        let mut current = root.clone();
        for token in &self.tokens {
            current = match &current {
                Value::Object(_) => current.get(token.as_str()),
                Value::Array(items) => {
                    if token.is_append() {
                        return Value::Invalid;
                    }
                    match token.as_index() {
                        Some(i) => items.get(i).cloned().unwrap_or(Value::Invalid),
                        None => Value::Invalid,
                    }
                }
                _ => Value::Invalid,
            };
            if current.is_invalid() {
                return Value::Invalid;
            }
        }
        current
    }
}

impl fmt::Display for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.tokens {
            f.write_str("/")?;
            escape_token(&token.0, f)?;
        }
        Ok(())
    }
}

fn unescape_token(raw: &str) -> Result<String, PointerError> {
    if !raw.contains('~') {
        return Ok(raw.to_string());
    }
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '~' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('0') => out.push('~'),
            Some('1') => out.push('/'),
            Some(other) => return Err(PointerError::InvalidEscape(other)),
            None => return Err(PointerError::InvalidEscape('\0')),
        }
    }
    Ok(out)
}

fn escape_token(raw: &str, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for c in raw.chars() {
        match c {
            '~' => f.write_str("~0")?,
            '/' => f.write_str("~1")?,
            c => f.write_char(c)?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_core::parser::{parse, Options};

    #[test]
    fn parses_and_resolves_nested_pointer() {
        let v = parse(r#"{"a":{"b":[1,2,3]}}"#, Options::default()).unwrap();
        let p = Pointer::parse("/a/b/1").unwrap();
        assert_eq!(p.resolve(&v), Value::from(2i64));
    }

    #[test]
    fn escapes_tilde_and_slash() {
        let p = Pointer::parse("/a~0b/c~1d").unwrap();
        assert_eq!(p.tokens()[0].as_str(), "a~b");
        assert_eq!(p.tokens()[1].as_str(), "c/d");
        assert_eq!(p.to_string(), "/a~0b/c~1d");
    }

    #[test]
    fn root_pointer_is_empty() {
        let p = Pointer::parse("").unwrap();
        assert!(p.is_root());
        assert_eq!(p.to_string(), "");
    }

    #[test]
    fn missing_leading_slash_is_an_error() {
        assert_eq!(Pointer::parse("a/b"), Err(PointerError::MissingLeadingSlash));
    }

    #[test]
    fn out_of_range_index_is_invalid_value() {
        let v = parse("[1,2,3]", Options::default()).unwrap();
        let p = Pointer::parse("/7").unwrap();
        assert!(p.resolve(&v).is_invalid());
    }

    #[test]
    fn append_sentinel_resolves_to_invalid() {
        let v = parse("[1,2,3]", Options::default()).unwrap();
        let p = Pointer::parse("/-").unwrap();
        assert!(p.resolve(&v).is_invalid());
    }

    #[test]
    fn is_prefix_of_detects_ancestry() {
        let a = Pointer::parse("/a").unwrap();
        let b = Pointer::parse("/a/b").unwrap();
        assert!(a.is_prefix_of(&b));
        assert!(!b.is_prefix_of(&a));
    }
}
