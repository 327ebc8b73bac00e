//! Single-pass byte-stream tokenizer.
//!
//! Tracks 0-based row/column as it consumes bytes (`\n` increments row and
//! resets column; `\r` is just another column-advancing byte). Produces
//! [`Token`]s whose `text` is the raw slice of source bytes the token
//! spans — for strings this includes the surrounding quotes and any
//! escapes; unescaping happens afterwards, in [`crate::escape`], once the
//! parser decides to materialize a `Value::String`.

use crate::error::ErrorCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    BraceOpen,
    BraceClose,
    BracketOpen,
    BracketClose,
    Comma,
    Colon,
    Null,
    True,
    False,
    String,
    Number,
    /// Relaxed-mode-only: an unquoted object key matching `[A-Za-z_][A-Za-z0-9_]*`.
    Identifier,
    /// Relaxed-mode-only: a `//...` or `/*...*/` comment. The parser skips these.
    Comment,
    Eof,
    Invalid(ErrorCode),
}

#[derive(Debug, Clone, Copy)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub row: usize,
    pub col: usize,
}

impl<'a> Token<'a> {
    #[must_use]
    pub fn error_code(&self) -> Option<ErrorCode> {
        match self.kind {
            TokenKind::Invalid(code) => Some(code),
            _ => None,
        }
    }
}

pub struct Tokenizer<'a> {
    src: &'a [u8],
    text: &'a str,
    pos: usize,
    row: usize,
    col: usize,
    pub relaxed: bool,
}

impl<'a> Tokenizer<'a> {
    #[must_use]
    pub fn new(text: &'a str, relaxed: bool) -> Self {
        Self {
            src: text.as_bytes(),
            text,
            pos: 0,
            row: 0,
            col: 0,
            relaxed,
        }
    }

    /// Captures the tokenizer's cursor, for the parser's one-token lookahead
    /// when deciding whether an adjacent string literal continues a
    /// relaxed-mode concatenation.
    #[must_use]
    pub fn checkpoint(&self) -> (usize, usize, usize) {
        (self.pos, self.row, self.col)
    }

    pub fn restore(&mut self, cp: (usize, usize, usize)) {
        (self.pos, self.row, self.col) = cp;
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.src.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        if b == b'\n' {
            self.row += 1;
            self.col = 0;
        } else {
            self.col += 1;
        }
        Some(b)
    }

    fn skip_whitespace(&mut self) {
        while let Some(b) = self.peek() {
            match b {
                b' ' | b'\t' | b'\r' | b'\n' => {
                    self.bump();
                }
                _ => break,
            }
        }
    }

    fn make(&self, kind: TokenKind, start: usize, row: usize, col: usize) -> Token<'a> {
        Token {
            kind,
            text: &self.text[start..self.pos],
            row,
            col,
        }
    }

    /// Scans and returns the next token, including comments and EOF.
    pub fn next_token(&mut self) -> Token<'a> {
        self.skip_whitespace();
        let start = self.pos;
        let (row, col) = (self.row, self.col);
        let Some(b) = self.peek() else {
            return self.make(TokenKind::Eof, start, row, col);
        };
        match b {
            b'{' => {
                self.bump();
                self.make(TokenKind::BraceOpen, start, row, col)
            }
            b'}' => {
                self.bump();
                self.make(TokenKind::BraceClose, start, row, col)
            }
            b'[' => {
                self.bump();
                self.make(TokenKind::BracketOpen, start, row, col)
            }
            b']' => {
                self.bump();
                self.make(TokenKind::BracketClose, start, row, col)
            }
            b',' => {
                self.bump();
                self.make(TokenKind::Comma, start, row, col)
            }
            b':' => {
                self.bump();
                self.make(TokenKind::Colon, start, row, col)
            }
            b'"' => self.scan_string(start, row, col),
            b'-' | b'0'..=b'9' => self.scan_number(start, row, col),
            b'/' if self.relaxed && matches!(self.peek_at(1), Some(b'/') | Some(b'*')) => {
                self.scan_comment(start, row, col)
            }
            b't' | b'f' | b'n' => self.scan_reserved_word(start, row, col),
            b if is_identifier_start(b) && self.relaxed => self.scan_identifier(start, row, col),
            _ => {
                self.bump();
                self.make(TokenKind::Invalid(ErrorCode::UnexpectedCharacter), start, row, col)
            }
        }
    }

    fn scan_comment(&mut self, start: usize, row: usize, col: usize) -> Token<'a> {
        self.bump(); // '/'
        match self.bump() {
            Some(b'/') => {
                while let Some(b) = self.peek() {
                    if b == b'\n' {
                        break;
                    }
                    self.bump();
                }
                self.make(TokenKind::Comment, start, row, col)
            }
            Some(b'*') => {
                loop {
                    match self.peek() {
                        None => {
                            return self.make(
                                TokenKind::Invalid(ErrorCode::UnexpectedEof),
                                start,
                                row,
                                col,
                            )
                        }
                        Some(b'*') if self.peek_at(1) == Some(b'/') => {
                            self.bump();
                            self.bump();
                            break;
                        }
                        _ => {
                            self.bump();
                        }
                    }
                }
                self.make(TokenKind::Comment, start, row, col)
            }
            _ => unreachable!("caller only dispatches here for '//' or '/*'"),
        }
    }

    fn scan_reserved_word(&mut self, start: usize, row: usize, col: usize) -> Token<'a> {
        let words: [(&[u8], TokenKind); 3] = [
            (b"null", TokenKind::Null),
            (b"true", TokenKind::True),
            (b"false", TokenKind::False),
        ];
        for (word, kind) in words {
            if self.src[self.pos..].starts_with(word) {
                let next = self.src.get(self.pos + word.len()).copied();
                let continues = next.is_some_and(is_identifier_continue);
                if !continues {
                    for _ in 0..word.len() {
                        self.bump();
                    }
                    return self.make(kind, start, row, col);
                }
                if self.relaxed {
                    return self.scan_identifier(start, row, col);
                }
                for _ in 0..word.len() {
                    self.bump();
                }
                return self.make(TokenKind::Invalid(ErrorCode::InvalidToken), start, row, col);
            }
        }
        if self.relaxed {
            self.scan_identifier(start, row, col)
        } else {
            self.bump();
            self.make(TokenKind::Invalid(ErrorCode::InvalidToken), start, row, col)
        }
    }

    fn scan_identifier(&mut self, start: usize, row: usize, col: usize) -> Token<'a> {
        while self.peek().is_some_and(is_identifier_continue) {
            self.bump();
        }
        let text = &self.text[start..self.pos];
        if matches!(
            text.to_ascii_lowercase().as_str(),
            "true" | "false" | "null"
        ) {
            return self.make(
                TokenKind::Invalid(ErrorCode::ReservedIdentifier),
                start,
                row,
                col,
            );
        }
        self.make(TokenKind::Identifier, start, row, col)
    }

    fn scan_number(&mut self, start: usize, row: usize, col: usize) -> Token<'a> {
        if self.peek() == Some(b'-') {
            self.bump();
            if !matches!(self.peek(), Some(b'0'..=b'9')) {
                return self.make(TokenKind::Invalid(ErrorCode::InvalidNumber), start, row, col);
            }
        }
        match self.peek() {
            Some(b'0') => {
                self.bump();
            }
            Some(b'1'..=b'9') => {
                while matches!(self.peek(), Some(b'0'..=b'9')) {
                    self.bump();
                }
            }
            _ => return self.make(TokenKind::Invalid(ErrorCode::InvalidNumber), start, row, col),
        }
        if self.peek() == Some(b'.') {
            self.bump();
            if !matches!(self.peek(), Some(b'0'..=b'9')) {
                return self.make(TokenKind::Invalid(ErrorCode::InvalidNumber), start, row, col);
            }
            while matches!(self.peek(), Some(b'0'..=b'9')) {
                self.bump();
            }
        }
        if matches!(self.peek(), Some(b'e') | Some(b'E')) {
            self.bump();
            if matches!(self.peek(), Some(b'+') | Some(b'-')) {
                self.bump();
            }
            if !matches!(self.peek(), Some(b'0'..=b'9')) {
                return self.make(TokenKind::Invalid(ErrorCode::InvalidNumber), start, row, col);
            }
            while matches!(self.peek(), Some(b'0'..=b'9')) {
                self.bump();
            }
        }
        self.make(TokenKind::Number, start, row, col)
    }

    fn scan_string(&mut self, start: usize, row: usize, col: usize) -> Token<'a> {
        self.bump(); // opening quote
        loop {
            match self.peek() {
                None => {
                    return self.make(
                        TokenKind::Invalid(ErrorCode::UnterminatedString),
                        start,
                        row,
                        col,
                    )
                }
                Some(b'"') => {
                    self.bump();
                    return self.make(TokenKind::String, start, row, col);
                }
                Some(b'\\') => {
                    self.bump();
                    match self.scan_escape() {
                        Ok(()) => {}
                        Err(code) => return self.make(TokenKind::Invalid(code), start, row, col),
                    }
                }
                Some(b) if b < 0x20 => {
                    return self.make(TokenKind::Invalid(ErrorCode::InvalidString), start, row, col)
                }
                Some(b) if b < 0x80 => {
                    self.bump();
                }
                Some(b) => {
                    if let Err(code) = self.scan_utf8_continuation(b) {
                        return self.make(TokenKind::Invalid(code), start, row, col);
                    }
                }
            }
        }
    }

    fn scan_escape(&mut self) -> Result<(), ErrorCode> {
        match self.peek() {
            Some(b'"' | b'\\' | b'/' | b'b' | b'f' | b'n' | b'r' | b't') => {
                self.bump();
                Ok(())
            }
            Some(b'u') => {
                self.bump();
                for _ in 0..4 {
                    match self.peek() {
                        Some(b) if b.is_ascii_hexdigit() => {
                            self.bump();
                        }
                        _ => return Err(ErrorCode::InvalidEscape),
                    }
                }
                Ok(())
            }
            _ => Err(ErrorCode::InvalidEscape),
        }
    }

    fn scan_utf8_continuation(&mut self, lead: u8) -> Result<(), ErrorCode> {
        let extra = match lead {
            0xC2..=0xDF => 1,
            0xE0..=0xEF => 2,
            0xF0..=0xF4 => 3,
            _ => return Err(ErrorCode::InvalidUtf8),
        };
        self.bump();
        for _ in 0..extra {
            match self.peek() {
                Some(b) if (0x80..=0xBF).contains(&b) => {
                    self.bump();
                }
                _ => return Err(ErrorCode::InvalidUtf8),
            }
        }
        Ok(())
    }
}

fn is_identifier_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}
fn is_identifier_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str, relaxed: bool) -> Vec<TokenKind> {
        let mut t = Tokenizer::new(src, relaxed);
        let mut out = vec![];
        loop {
            let tok = t.next_token();
            if tok.kind == TokenKind::Eof {
                break;
            }
            out.push(tok.kind);
        }
        out
    }

    #[test]
    fn tokenizes_object() {
        let k = kinds(r#"{"a":1}"#, false);
        assert_eq!(
            k,
            vec![
                TokenKind::BraceOpen,
                TokenKind::String,
                TokenKind::Colon,
                TokenKind::Number,
                TokenKind::BraceClose
            ]
        );
    }

    #[test]
    fn rejects_control_byte_in_string_strict() {
        let mut t = Tokenizer::new("\"a\u{0}b\"", false);
        let tok = t.next_token();
        assert_eq!(tok.error_code(), Some(ErrorCode::InvalidString));
    }

    #[test]
    fn relaxed_identifier_key() {
        let k = kinds("{foo: 1}", true);
        assert_eq!(k[1], TokenKind::Identifier);
    }

    #[test]
    fn relaxed_comment_is_a_token() {
        let k = kinds("// hi\n1", true);
        assert_eq!(k[0], TokenKind::Comment);
        assert_eq!(k[1], TokenKind::Number);
    }

    #[test]
    fn reserved_identifier_rejected() {
        let mut t = Tokenizer::new("true2", true);
        let tok = t.next_token();
        assert_eq!(tok.error_code(), None);
        assert_eq!(tok.kind, TokenKind::Identifier);
        let mut t = Tokenizer::new("TRUE", true);
        let tok = t.next_token();
        assert_eq!(tok.error_code(), Some(ErrorCode::ReservedIdentifier));
    }

    #[test]
    fn lone_minus_is_invalid_number() {
        let mut t = Tokenizer::new("-", false);
        let tok = t.next_token();
        assert_eq!(tok.error_code(), Some(ErrorCode::InvalidNumber));
    }

    #[test]
    fn row_col_tracks_newlines() {
        let mut t = Tokenizer::new("1\n22", false);
        let a = t.next_token();
        assert_eq!((a.row, a.col), (0, 0));
        let b = t.next_token();
        assert_eq!((b.row, b.col), (1, 0));
    }
}
