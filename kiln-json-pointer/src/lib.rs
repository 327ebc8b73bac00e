//! RFC 6901 JSON Pointer navigation and an RFC 6902 JSON Patch engine
//! built directly on top of [`kiln_core::Value`].

mod patch;
mod pointer;

pub use patch::{apply_patch, Outcome, Report};
pub use pointer::{Pointer, PointerError, Token};
