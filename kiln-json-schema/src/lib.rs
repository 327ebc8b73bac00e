//! JSON Schema 2020-12 loading and evaluation.
//!
//! This crate owns schema compilation (`$id`/`$anchor`/`$dynamicAnchor`
//! indexing, dialect/vocabulary checks) and evaluation (`$ref`/`$dynamicRef`
//! resolution, annotation collection, the `unevaluatedItems`/
//! `unevaluatedProperties` cross-keyword interaction). It builds on
//! `kiln-core`'s [`kiln_core::Value`] tree and `kiln-uri`'s [`kiln_uri`]
//! resolver; it does not know about JSON Pointer navigation or patching —
//! those live in `kiln-json-pointer`.

mod context;
mod error;
mod index;
mod keyword;
mod output;
mod resolve;
mod schema;

pub use context::{Annotation, Annotations, Ctx};
pub use error::SchemaError;
pub use output::{OutputFormat, OutputUnit};
pub use schema::{InvalidRefCallback, Schema};
