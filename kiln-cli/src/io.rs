//! Reading JSON text from a file or standard input, and the document/pointer
//! resolution every read-only subcommand shares: parse the whole document,
//! then resolve an optional `--pointer` against it, reporting a distinct
//! message for each failure mode.

use std::fs;
use std::io::Read;

use kiln_core::parser::{parse, Options};
use kiln_core::Value;
use kiln_json_pointer::Pointer;

pub fn read_source(file: Option<&str>) -> std::io::Result<String> {
    match file {
        Some(path) if !path.is_empty() => fs::read_to_string(path),
        _ => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

/// Reads and parses `file` (or standard input), prints `Error reading ...`
/// on an I/O failure and `Parse error: ...` on a syntax failure, and returns
/// `None` in either case.
pub fn load_document(file: Option<&str>, options: Options) -> Option<Value> {
    let text = match read_source(file) {
        Ok(text) => text,
        Err(err) => {
            match file {
                Some(path) => eprintln!("Error reading file '{path}': {err}"),
                None => eprintln!("Error reading input: {err}"),
            }
            return None;
        }
    };
    match parse(&text, options) {
        Ok(value) => Some(value),
        Err(err) => {
            eprintln!("Parse error: {err}");
            None
        }
    }
}

/// Resolves `pointer` (empty string means the document root) against
/// `document`, printing `Pointer error: No such item` and returning `None`
/// if it doesn't resolve.
pub fn resolve_pointer(document: &Value, pointer: &str) -> Option<Value> {
    if pointer.is_empty() {
        return Some(document.clone());
    }
    let pointer = match Pointer::parse(pointer) {
        Ok(pointer) => pointer,
        Err(_) => {
            eprintln!("Pointer error: No such item");
            return None;
        }
    };
    let instance = pointer.resolve(document);
    if instance.is_invalid() {
        eprintln!("Pointer error: No such item");
        return None;
    }
    Some(instance)
}

/// Combines [`load_document`] and [`resolve_pointer`], as every read-only
/// subcommand needs.
pub fn load_instance(file: Option<&str>, pointer: &str, options: Options) -> Option<Value> {
    let document = load_document(file, options)?;
    resolve_pointer(&document, pointer)
}
