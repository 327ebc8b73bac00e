//! Error types produced while tokenizing, parsing, or accessing a [`Value`](crate::Value).
//!
//! Three disjoint families live here: [`ErrorCode`]/[`ParseError`] for
//! tokenizer and parser failures, and [`TypeError`] for calling a typed
//! accessor on a value of the wrong shape. Neither family is used to report
//! *validation* failures — those are ordinary [`Output`](crate) data, never
//! an `Err`.

use std::fmt;

/// One of the parser/tokenizer error codes a caller can match on to recover
/// or report a precise diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ErrorCode {
    InvalidString,
    UnterminatedString,
    InvalidEscape,
    InvalidUtf8,
    InvalidNumber,
    NumberOutOfRange,
    InvalidToken,
    MisplacedCloseBrace,
    MisplacedCloseBracket,
    MisplacedComma,
    MisplacedColon,
    ExpectedCommaOrCloseBracket,
    ExpectedCommaOrCloseBrace,
    ExpectedMemberName,
    ExpectedColon,
    DuplicateMember,
    ReservedIdentifier,
    UnterminatedArray,
    UnterminatedObject,
    UnexpectedCharacter,
    MaxDepthExceeded,
    MaxArraySizeExceeded,
    MaxObjectSizeExceeded,
    UnexpectedEof,
    Io,
    Internal,
}

/// A single-byte, 0-based (row, column) location within the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Location {
    pub row: usize,
    pub col: usize,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.row, self.col)
    }
}

/// A tokenizer or parser failure: an [`ErrorCode`] plus the location of the
/// offending token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{code} at {location}")]
pub struct ParseError {
    pub code: ErrorCode,
    pub location: Location,
}

impl ParseError {
    #[must_use]
    pub fn new(code: ErrorCode, row: usize, col: usize) -> Self {
        Self {
            code,
            location: Location { row, col },
        }
    }
}

/// A typed accessor (e.g. [`Value::as_object`](crate::Value::as_object)) was
/// called on a value whose runtime variant does not match.
///
/// This indicates programmer error and is kept distinct from [`ParseError`]
/// so callers never conflate "the document didn't parse" with "the caller
/// asked the tree for the wrong shape".
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("expected a {expected} value, found {found}")]
pub struct TypeError {
    pub expected: &'static str,
    pub found: &'static str,
}
