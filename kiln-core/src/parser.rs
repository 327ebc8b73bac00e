//! Hand-written recursive-descent parser driven by the [`Tokenizer`].
//!
//! Grammar (relaxed extensions noted), matching the wire format this crate
//! implements:
//!
//! ```text
//! value     := str_value | number | object | array | true | false | null
//! str_value := STRING ( STRING )*              (concatenation: relaxed only)
//! array     := '[' ']' | '[' elements ']'
//! elements  := value (',' elements)? | value ','   (trailing ',': relaxed only)
//! object    := '{' '}' | '{' members '}'
//! members   := pair (',' members)? | pair ','      (trailing ',': relaxed only)
//! pair      := STRING ':' value | IDENTIFIER ':' value  (identifier: relaxed only)
//! ```

use crate::error::{ErrorCode, ParseError};
use crate::escape::unescape;
use crate::number::Number;
use crate::token::{Token, TokenKind, Tokenizer};
use crate::value::{Map, Value};

/// Parser configuration. `max_depth`/`max_array_size`/`max_object_size` of
/// `0` mean unbounded.
#[derive(Debug, Clone, Copy)]
pub struct Options {
    pub strict: bool,
    pub allow_duplicates: bool,
    pub max_depth: usize,
    pub max_array_size: usize,
    pub max_object_size: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            strict: true,
            allow_duplicates: true,
            max_depth: 0,
            max_array_size: 0,
            max_object_size: 0,
        }
    }
}

/// Parses `text` into a [`Value`] tree, or the first [`ParseError`]
/// encountered. Parsing halts at the first error.
#[tracing::instrument(level = "trace", skip(text), fields(len = text.len()))]
pub fn parse(text: &str, options: Options) -> Result<Value, ParseError> {
    let mut parser = Parser {
        tokenizer: Tokenizer::new(text, !options.strict),
        options,
        depth: 0,
    };
    let value = parser.parse_value()?;
    parser.expect_eof()?;
    Ok(value)
}

struct Parser<'a> {
    tokenizer: Tokenizer<'a>,
    options: Options,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn err(tok: &Token<'a>, code: ErrorCode) -> ParseError {
        ParseError::new(code, tok.row, tok.col)
    }

    /// Next non-comment token.
    fn advance(&mut self) -> Token<'a> {
        loop {
            let tok = self.tokenizer.next_token();
            if tok.kind != TokenKind::Comment {
                return tok;
            }
        }
    }

    fn expect_eof(&mut self) -> Result<(), ParseError> {
        let tok = self.advance();
        match tok.kind {
            TokenKind::Eof => Ok(()),
            TokenKind::BraceClose => Err(Self::err(&tok, ErrorCode::MisplacedCloseBrace)),
            TokenKind::BracketClose => Err(Self::err(&tok, ErrorCode::MisplacedCloseBracket)),
            TokenKind::Comma => Err(Self::err(&tok, ErrorCode::MisplacedComma)),
            TokenKind::Colon => Err(Self::err(&tok, ErrorCode::MisplacedColon)),
            _ => Err(Self::err(&tok, ErrorCode::InvalidToken)),
        }
    }

    fn parse_value(&mut self) -> Result<Value, ParseError> {
        let tok = self.advance();
        self.parse_value_from(tok)
    }

    fn parse_value_from(&mut self, tok: Token<'a>) -> Result<Value, ParseError> {
        match tok.kind {
            TokenKind::Null => Ok(Value::Null),
            TokenKind::True => Ok(Value::Boolean(true)),
            TokenKind::False => Ok(Value::Boolean(false)),
            TokenKind::Number => {
                let text = tok.text;
                if text.len() > 1 && text.starts_with('0') && text.as_bytes()[1].is_ascii_digit() {
                    return Err(Self::err(&tok, ErrorCode::InvalidNumber));
                }
                Ok(Value::Number(Number::parse(text)))
            }
            TokenKind::String => self.parse_string_value(tok),
            TokenKind::BraceOpen => self.parse_object(tok),
            TokenKind::BracketOpen => self.parse_array(tok),
            TokenKind::Eof => Err(Self::err(&tok, ErrorCode::UnexpectedEof)),
            TokenKind::Invalid(code) => Err(Self::err(&tok, code)),
            _ => Err(Self::err(&tok, ErrorCode::InvalidToken)),
        }
    }

    fn unescape_string_token(tok: &Token<'a>) -> Result<String, ParseError> {
        let inner = &tok.text[1..tok.text.len() - 1];
        unescape(inner).map_err(|code| Self::err(tok, code))
    }

    /// `str_value := STRING ( STRING )*` — adjacent string literals
    /// concatenate into one, but only in relaxed mode.
    fn parse_string_value(&mut self, first: Token<'a>) -> Result<Value, ParseError> {
        let mut s = Self::unescape_string_token(&first)?;
        if self.options.strict {
            return Ok(Value::String(s.into_boxed_str()));
        }
        loop {
            let save = self.tokenizer_checkpoint();
            let tok = self.advance();
            if tok.kind == TokenKind::String {
                s.push_str(&Self::unescape_string_token(&tok)?);
            } else {
                self.restore_checkpoint(save);
                break;
            }
        }
        Ok(Value::String(s.into_boxed_str()))
    }

    // The tokenizer has no internal state beyond its cursor, so a
    // checkpoint is just that cursor position; `Tokenizer` exposes it via
    // a small re-construction since it only borrows `&str`.
    fn tokenizer_checkpoint(&self) -> (usize, usize, usize) {
        self.tokenizer.checkpoint()
    }
    fn restore_checkpoint(&mut self, cp: (usize, usize, usize)) {
        self.tokenizer.restore(cp);
    }

    fn enter_container(&mut self, tok: &Token<'a>) -> Result<(), ParseError> {
        self.depth += 1;
        if self.options.max_depth != 0 && self.depth > self.options.max_depth {
            return Err(Self::err(tok, ErrorCode::MaxDepthExceeded));
        }
        Ok(())
    }

    fn parse_array(&mut self, open: Token<'a>) -> Result<Value, ParseError> {
        self.enter_container(&open)?;
        let mut items = Vec::new();
        let mut tok = self.advance();
        if tok.kind == TokenKind::BracketClose {
            self.depth -= 1;
            return Ok(Value::Array(items));
        }
        loop {
            let value = self.parse_value_from(tok)?;
            items.push(value);
            if self.options.max_array_size != 0 && items.len() > self.options.max_array_size {
                return Err(Self::err(&open, ErrorCode::MaxArraySizeExceeded));
            }
            tok = self.advance();
            match tok.kind {
                TokenKind::Comma => {
                    let next = self.advance();
                    if next.kind == TokenKind::BracketClose {
                        if self.options.strict {
                            return Err(Self::err(&next, ErrorCode::MisplacedComma));
                        }
                        self.depth -= 1;
                        return Ok(Value::Array(items));
                    }
                    tok = next;
                }
                TokenKind::BracketClose => {
                    self.depth -= 1;
                    return Ok(Value::Array(items));
                }
                TokenKind::Eof => return Err(Self::err(&tok, ErrorCode::UnterminatedArray)),
                TokenKind::Invalid(code) => return Err(Self::err(&tok, code)),
                _ => return Err(Self::err(&tok, ErrorCode::ExpectedCommaOrCloseBracket)),
            }
        }
    }

    fn parse_member_name(&mut self, tok: &Token<'a>) -> Result<String, ParseError> {
        match tok.kind {
            TokenKind::String => Self::unescape_string_token(tok),
            TokenKind::Identifier if !self.options.strict => Ok(tok.text.to_string()),
            TokenKind::Invalid(code) => Err(Self::err(tok, code)),
            _ => Err(Self::err(tok, ErrorCode::ExpectedMemberName)),
        }
    }

    fn parse_object(&mut self, open: Token<'a>) -> Result<Value, ParseError> {
        self.enter_container(&open)?;
        let map = Map::new();
        let mut count = 0usize;
        let mut tok = self.advance();
        if tok.kind == TokenKind::BraceClose {
            self.depth -= 1;
            return Ok(Value::Object(map));
        }
        loop {
            let key = self.parse_member_name(&tok)?;
            let colon = self.advance();
            if colon.kind != TokenKind::Colon {
                return Err(match colon.kind {
                    TokenKind::Invalid(code) => Self::err(&colon, code),
                    _ => Self::err(&colon, ErrorCode::ExpectedColon),
                });
            }
            let value = self.parse_value()?;
            if !self.options.allow_duplicates && map.contains(&key) {
                return Err(Self::err(&tok, ErrorCode::DuplicateMember));
            }
            map.insert(key, value);
            count += 1;
            if self.options.max_object_size != 0 && count > self.options.max_object_size {
                return Err(Self::err(&open, ErrorCode::MaxObjectSizeExceeded));
            }
            tok = self.advance();
            match tok.kind {
                TokenKind::Comma => {
                    let next = self.advance();
                    if next.kind == TokenKind::BraceClose {
                        if self.options.strict {
                            return Err(Self::err(&next, ErrorCode::MisplacedComma));
                        }
                        self.depth -= 1;
                        return Ok(Value::Object(map));
                    }
                    tok = next;
                }
                TokenKind::BraceClose => {
                    self.depth -= 1;
                    return Ok(Value::Object(map));
                }
                TokenKind::Eof => return Err(Self::err(&tok, ErrorCode::UnterminatedObject)),
                TokenKind::Invalid(code) => return Err(Self::err(&tok, code)),
                _ => return Err(Self::err(&tok, ErrorCode::ExpectedCommaOrCloseBrace)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strict(text: &str) -> Result<Value, ParseError> {
        parse(text, Options::default())
    }

    fn relaxed(text: &str) -> Result<Value, ParseError> {
        parse(
            text,
            Options {
                strict: false,
                ..Options::default()
            },
        )
    }

    #[test]
    fn parses_flat_object() {
        let v = strict(r#"{"a":1,"b":true,"c":null}"#).unwrap();
        assert_eq!(v.get("a"), Value::from(1i64));
        assert_eq!(v.get("b"), Value::Boolean(true));
        assert_eq!(v.get("c"), Value::Null);
    }

    #[test]
    fn duplicate_members_retained_when_allowed() {
        let v = strict(r#"{"a":1,"a":2}"#).unwrap();
        assert_eq!(v.get("a"), Value::from(2i64));
        assert_eq!(v.as_object().unwrap().equal_range("a").len(), 2);
    }

    #[test]
    fn duplicate_members_rejected_when_disallowed() {
        let err = parse(
            r#"{"a":1,"a":2}"#,
            Options {
                allow_duplicates: false,
                ..Options::default()
            },
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::DuplicateMember);
    }

    #[test]
    fn nested_arrays_and_objects() {
        let v = strict(r#"[1,[2,3],{"x":[]}]"#).unwrap();
        let a = v.as_array().unwrap();
        assert_eq!(a.len(), 3);
        assert_eq!(a[2].get("x"), Value::Array(vec![]));
    }

    #[test]
    fn leading_zero_rejected() {
        let err = strict("01").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidNumber);
    }

    #[test]
    fn trailing_comma_strict_rejected_relaxed_allowed() {
        assert!(strict("[1,]").is_err());
        assert!(relaxed("[1,]").is_ok());
    }

    #[test]
    fn relaxed_allows_comments_and_unquoted_keys() {
        let v = relaxed("{ // comment\n foo: 1 /* c */ }").unwrap();
        assert_eq!(v.get("foo"), Value::from(1i64));
    }

    #[test]
    fn relaxed_string_concatenation() {
        let v = relaxed(r#" "a" "b" "#).unwrap();
        assert_eq!(v, Value::from("ab"));
    }

    #[test]
    fn strict_rejects_string_concatenation_as_trailing_garbage() {
        assert!(strict(r#" "a" "b" "#).is_err());
    }

    #[test]
    fn max_depth_enforced() {
        let err = parse(
            "[[[1]]]",
            Options {
                max_depth: 2,
                ..Options::default()
            },
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::MaxDepthExceeded);
    }

    #[test]
    fn max_array_size_enforced() {
        let err = parse(
            "[1,2,3]",
            Options {
                max_array_size: 2,
                ..Options::default()
            },
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::MaxArraySizeExceeded);
    }

    #[test]
    fn reserved_identifier_key_rejected_in_relaxed_mode() {
        let err = relaxed("{true: 1}").unwrap_err();
        assert_eq!(err.code, ErrorCode::ReservedIdentifier);
    }

    #[test]
    fn empty_pointer_key_round_trips() {
        let v = strict(r#"{"":"x"}"#).unwrap();
        assert_eq!(v.get(""), Value::from("x"));
    }
}
