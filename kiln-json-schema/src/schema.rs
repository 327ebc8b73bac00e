/*
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
╔═══════════════════════════════════════════════════════════════════════╗
║                                                                       ║
║                                 Schema                                  ║
║                                 ¯¯¯¯¯¯                                  ║
╚═══════════════════════════════════════════════════════════════════════╝
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
*/
//! The compiled schema: the schema document(s) plus the side-indexes
//! [`crate::index`] built while loading, merged into one set of global
//! lookup tables [`$ref`/`$dynamicRef`](crate::resolve) resolution walks.

use std::collections::HashMap;

use kiln_core::Value;
use kiln_json_pointer::Pointer;

use crate::error::{self, SchemaError};
use crate::index::{self, SchemaIndex, DEFAULT_BASE_URI};
use crate::output::{OutputFormat, OutputUnit};

/// One schema document: its value tree plus the `$id`/anchor index built
/// for it alone. The root schema and every schema registered via
/// [`Schema::add_referenced`] are each one `Document`.
#[derive(Debug, Clone)]
pub(crate) struct Document {
    pub root: Value,
    pub index: SchemaIndex,
}

/// A callback giving the caller one chance to load and register a missing
/// referenced schema per unresolved `$ref`/`$dynamicRef` site. Returns
/// `true` if it registered something worth retrying resolution against.
///
/// Deliberately a plain function value with no captured `Schema` — the
/// schema being resolved is always passed in.
pub type InvalidRefCallback = Box<dyn Fn(&mut Schema, &str, &str) -> bool>;

/// A loaded, indexed JSON Schema 2020-12 document, ready to validate
/// instances against.
pub struct Schema {
    pub(crate) documents: HashMap<String, Document>,
    pub(crate) primary: String,
    /// Absolute URI (without fragment) → (document key, pointer into it).
    /// Merges every document's own `index.ids`.
    pub(crate) global_ids: HashMap<String, (String, Pointer)>,
    /// `"{base}#{anchor}"` → (document key, validation-path pointer,
    /// path-within-base). Merges `index.anchors` across every document, so
    /// a plain `$ref` can land on an anchor declared via `$dynamicAnchor`
    /// too (2020-12 allows this).
    pub(crate) global_anchors: HashMap<String, (String, Pointer, Pointer)>,
    /// Same shape, `index.dynamic_anchors` only — consulted by
    /// `$dynamicRef`'s outer-scope walk.
    pub(crate) global_dynamic_anchors: HashMap<String, (String, Pointer, Pointer)>,
    pub(crate) alias_to_canonical: HashMap<String, String>,
    pub(crate) invalid_ref_callback: Option<InvalidRefCallback>,
}

impl std::fmt::Debug for Schema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Schema")
            .field("primary", &self.primary)
            .field("documents", &self.documents.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl Schema {
    /// Loads `root` as the primary schema document, additionally indexing
    /// every schema in `referenced` (each under its own `$id`, if any —
    /// schemas without one must be registered later via
    /// [`Schema::add_referenced`] with an explicit alias).
    #[tracing::instrument(level = "debug", skip(root, referenced), fields(referenced = referenced.len()))]
    pub fn new(root: Value, referenced: Vec<Value>) -> Result<Self, SchemaError> {
        let mut schema = Schema {
            documents: HashMap::new(),
            primary: String::new(),
            global_ids: HashMap::new(),
            global_anchors: HashMap::new(),
            global_dynamic_anchors: HashMap::new(),
            alias_to_canonical: HashMap::new(),
            invalid_ref_callback: None,
        };
        let primary_base = root
            .get("$id")
            .as_str()
            .map(ToString::to_string)
            .unwrap_or_else(|| DEFAULT_BASE_URI.to_string());
        schema.insert_document(primary_base.clone(), root)?;
        schema.primary = primary_base;
        for value in referenced {
            schema.add_referenced(value, None)?;
        }
        Ok(schema)
    }

    /// Registers an additional schema document, reachable from `$ref`s
    /// inside the primary schema by its own `$id` and, if supplied, by
    /// `alias` as well.
    pub fn add_referenced(&mut self, value: Value, alias: Option<String>) -> Result<(), SchemaError> {
        let own_id = value.get("$id").as_str().map(ToString::to_string);
        let base = own_id
            .clone()
            .or_else(|| alias.clone())
            .ok_or_else(|| {
                error::MalformedCtx {
                    base_uri: String::new(),
                    pointer: String::new(),
                    message: "a referenced schema with no $id must be given an alias".to_string(),
                }
                .build()
            })?;
        self.insert_document(base.clone(), value)?;
        if let Some(alias) = alias {
            if alias != base {
                self.alias_to_canonical.insert(alias, base);
            }
        }
        Ok(())
    }

    /// Installs the invalid-reference callback: invoked when a
    /// `$ref`/`$dynamicRef` fails to resolve, giving the caller one chance
    /// to register the missing document before the evaluator gives up.
    pub fn set_invalid_ref_callback(&mut self, callback: InvalidRefCallback) {
        self.invalid_ref_callback = Some(callback);
    }

    fn insert_document(&mut self, base: String, root: Value) -> Result<(), SchemaError> {
        let index = index::load(&root, &base)?;
        for (uri, pointer) in &index.ids {
            self.global_ids.insert(uri.clone(), (base.clone(), pointer.clone()));
        }
        // The document's own declared base is always reachable too, even
        // for the common case of a root with no `$id` of its own.
        self.global_ids
            .entry(base.clone())
            .or_insert_with(|| (base.clone(), Pointer::root()));
        for (key, entry) in &index.anchors {
            self.global_anchors.insert(
                key.clone(),
                (base.clone(), entry.pointer.clone(), entry.path_within_base.clone()),
            );
        }
        for (key, entry) in &index.dynamic_anchors {
            self.global_dynamic_anchors.insert(
                key.clone(),
                (base.clone(), entry.pointer.clone(), entry.path_within_base.clone()),
            );
        }
        self.documents.insert(base, Document { root, index });
        Ok(())
    }

    pub(crate) fn document(&self, base: &str) -> Option<&Document> {
        let canonical = self.alias_to_canonical.get(base).map_or(base, String::as_str);
        self.documents.get(canonical)
    }

    /// The primary (root) schema document's value tree.
    #[must_use]
    pub fn root(&self) -> &Value {
        &self.documents[&self.primary].root
    }

    #[must_use]
    pub fn primary_base_uri(&self) -> &str {
        &self.primary
    }

    /// Validates `instance` against this schema, producing a
    /// [`OutputUnit`]. `fast_fail` selects abort-on-first-failure versus
    /// full-failure-collection mode; both modes agree on `valid` and differ
    /// only in how much of `errors`/`annotations` gets populated.
    #[tracing::instrument(level = "debug", skip(self, instance), fields(base_uri = %self.primary))]
    pub fn validate(&mut self, instance: &Value, fast_fail: bool) -> Result<OutputUnit, SchemaError> {
        let ctx = crate::context::Ctx::root(self.primary.clone(), fast_fail);
        let root = self.documents[&self.primary].root.clone();
        let (unit, _) = crate::keyword::evaluate(self, &root, &ctx, instance)?;
        tracing::debug!(valid = unit.valid, "validated instance");
        Ok(unit)
    }

    /// Convenience over [`Schema::validate`] that renders directly to a
    /// [`Value`] under the requested [`OutputFormat`].
    pub fn validate_to_value(
        &mut self,
        instance: &Value,
        fast_fail: bool,
        format: OutputFormat,
    ) -> Result<Value, SchemaError> {
        Ok(self.validate(instance, fast_fail)?.to_value(format))
    }
}
