//! Shared helpers for this workspace's integration tests: parsing fixture
//! JSON literals with the default relaxed [`kiln_core::parser::Options`].

use kiln_core::parser::{parse, Options};
use kiln_core::Value;

/// Parses `text` in relaxed mode, panicking on a malformed fixture — a test
/// bug, not something under test.
#[track_caller]
pub fn json(text: &str) -> Value {
    parse(text, Options::default()).unwrap_or_else(|err| panic!("fixture failed to parse: {err}"))
}

/// Parses `text` in strict (RFC 8259) mode.
#[track_caller]
pub fn strict_json(text: &str) -> Value {
    let options = Options {
        strict: true,
        ..Options::default()
    };
    parse(text, options).unwrap_or_else(|err| panic!("fixture failed to parse: {err}"))
}
