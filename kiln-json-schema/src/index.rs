/*
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
╔═══════════════════════════════════════════════════════════════════════╗
║                                                                       ║
║                                 Index                                  ║
║                                 ¯¯¯¯¯                                   ║
╚═══════════════════════════════════════════════════════════════════════╝
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
*/
//! The one-pass schema walk: builds the side-indexes a schema's compiled
//! form carries alongside its value tree — `$id`s, `$anchor`s,
//! `$dynamicAnchor`s — and shape-checks every keyword it visits.

use std::collections::HashMap;

use kiln_core::Value;
use kiln_json_pointer::Pointer;
use kiln_uri::{AbsoluteUri, Uri};

use crate::error::{self, SchemaError};

/// The default base URI assigned to a root schema with no `$id` of its own.
pub const DEFAULT_BASE_URI: &str = "xri://root-schema";

const ONLY_SUPPORTED_DIALECT: &str = "https://json-schema.org/draft/2020-12/schema";

/// Where an anchor (static or dynamic) points: a base URI plus the
/// absolute keyword-path pointer of the subtree it names.
#[derive(Debug, Clone)]
pub struct AnchorEntry {
    pub base_uri: String,
    pub pointer: Pointer,
    /// The path from the nearest enclosing `$id` down to this anchor,
    /// used to reconstruct an accurate `absoluteKeywordLocation` (`pointer`
    /// is relative to the *document root*, which double-counts the
    /// enclosing `$id`'s own path when one is nested below the root).
    pub path_within_base: Pointer,
}

/// `$id`/`$anchor`/`$dynamicAnchor` side-indexes for one schema document,
/// plus any alias registered for it via
/// [`Schema::add_referenced`](crate::schema::Schema::add_referenced).
#[derive(Debug, Clone, Default)]
pub struct SchemaIndex {
    /// Absolute URI (without fragment) → pointer into its document.
    pub ids: HashMap<String, Pointer>,
    /// `"{base-uri}#{anchor-name}"` → target.
    pub anchors: HashMap<String, AnchorEntry>,
    /// Same shape as `anchors`, consulted with outer-scope fallback.
    pub dynamic_anchors: HashMap<String, AnchorEntry>,
    /// Alias → canonical id, for externally supplied referenced schemas
    /// that were registered under a name other than their own `$id`.
    pub id_aliases: HashMap<String, String>,
}

fn name_is_valid_anchor(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_'))
}

/// Walks `root` depth-first starting at `default_base`, recording every
/// `$id`/`$anchor`/`$dynamicAnchor` it finds into a fresh [`SchemaIndex`].
#[tracing::instrument(level = "debug", skip(root), fields(base_uri = default_base))]
pub fn load(root: &Value, default_base: &str) -> Result<SchemaIndex, SchemaError> {
    let mut index = SchemaIndex::default();
    walk(root, default_base, &Pointer::root(), &Pointer::root(), &mut index)?;
    tracing::debug!(
        ids = index.ids.len(),
        anchors = index.anchors.len(),
        dynamic_anchors = index.dynamic_anchors.len(),
        "indexed schema document"
    );
    Ok(index)
}

fn walk(
    node: &Value,
    base_uri: &str,
    path_within_base: &Pointer,
    validation_path: &Pointer,
    index: &mut SchemaIndex,
) -> Result<(), SchemaError> {
    // Boolean schemas carry no keywords to index.
    if !node.is_object() {
        return Ok(());
    }
    let obj = node.as_object().expect("checked above");

    let mut base_uri = base_uri.to_string();
    let mut path_within_base = path_within_base.clone();

    if let Some(schema_uri) = obj.get("$schema").as_str() {
        if schema_uri != ONLY_SUPPORTED_DIALECT {
            return error::UnsupportedDialectCtx {
                base_uri: base_uri.clone(),
                pointer: path_within_base.to_string(),
                dialect: schema_uri.to_string(),
            }
            .fail();
        }
    }

    if let Some(id) = obj.get("$id").as_str() {
        let resolved = resolve_id(&base_uri, id, &path_within_base)?;
        if !resolved.fragment_is_empty_or_none() {
            return error::IdHasFragmentCtx {
                base_uri: base_uri.clone(),
                pointer: path_within_base.to_string(),
            }
            .fail();
        }
        let canonical = resolved.as_str().to_string();
        if index.ids.contains_key(&canonical) {
            return error::DuplicateIdCtx {
                base_uri: base_uri.clone(),
                pointer: path_within_base.to_string(),
            }
            .fail();
        }
        index.ids.insert(canonical.clone(), validation_path.clone());
        base_uri = canonical;
        path_within_base = Pointer::root();
    }

    if let Some(name) = obj.get("$anchor").as_str() {
        insert_anchor(&mut index.anchors, &base_uri, name, validation_path, &path_within_base)?;
    }
    if let Some(name) = obj.get("$dynamicAnchor").as_str() {
        insert_anchor(
            &mut index.dynamic_anchors,
            &base_uri,
            name,
            validation_path,
            &path_within_base,
        )?;
    }

    if obj.contains("contentSchema") {
        return error::UnsupportedKeywordCtx {
            base_uri: base_uri.clone(),
            pointer: path_within_base.to_string(),
            keyword: "contentSchema".to_string(),
        }
        .fail();
    }

    for key in obj.keys() {
        let key = key.as_ref();
        let value = obj.get(key);
        let child_path = validation_path.child(key);
        let child_base_path = path_within_base.child(key);
        match key {
            "$defs" | "properties" | "patternProperties" | "dependentSchemas" => {
                if let Some(members) = value.as_object() {
                    for member_key in members.keys() {
                        let member_key = member_key.as_ref();
                        let member_value = members.get(member_key);
                        walk(
                            &member_value,
                            &base_uri,
                            &child_base_path.child(member_key),
                            &child_path.child(member_key),
                            index,
                        )?;
                    }
                }
            }
            "allOf" | "anyOf" | "oneOf" | "prefixItems" => {
                let items = value.as_array().ok_or_else(|| {
                    error::MalformedCtx {
                        base_uri: base_uri.clone(),
                        pointer: child_path.to_string(),
                        message: format!("{key} must be an array"),
                    }
                    .build()
                })?;
                if items.is_empty() {
                    return error::MalformedCtx {
                        base_uri: base_uri.clone(),
                        pointer: child_path.to_string(),
                        message: format!("{key} must not be empty"),
                    }
                    .fail();
                }
                for (i, item) in items.iter().enumerate() {
                    walk(
                        item,
                        &base_uri,
                        &child_base_path.child(i.to_string()),
                        &child_path.child(i.to_string()),
                        index,
                    )?;
                }
            }
            "not" | "if" | "then" | "else" | "items" | "contains" | "additionalProperties"
            | "propertyNames" | "unevaluatedItems" | "unevaluatedProperties" => {
                walk(&value, &base_uri, &child_base_path, &child_path, index)?;
            }
            "pattern" => {
                if let Some(pattern) = value.as_str() {
                    fancy_regex::Regex::new(pattern).map_err(|source| {
                        error::InvalidPatternCtx {
                            base_uri: base_uri.clone(),
                            pointer: child_path.to_string(),
                        }
                        .into_error(source)
                    })?;
                }
            }
            _ => {}
        }
    }

    Ok(())
}

fn resolve_id(base_uri: &str, id: &str, pointer: &Pointer) -> Result<AbsoluteUri, SchemaError> {
    let base = AbsoluteUri::parse(base_uri).map_err(|source| error::UriParseCtx {
        input: base_uri.to_string(),
    }
    .into_error(source))?;
    let reference = Uri::parse(id).map_err(|source| error::UriParseCtx {
        input: id.to_string(),
    }
    .into_error(source))?;
    base.resolve(&reference).map_err(|source| {
        error::MalformedCtx {
            base_uri: base_uri.to_string(),
            pointer: pointer.to_string(),
            message: format!("could not resolve $id {id:?}: {source}"),
        }
        .build()
    })
}

fn insert_anchor(
    table: &mut HashMap<String, AnchorEntry>,
    base_uri: &str,
    name: &str,
    validation_path: &Pointer,
    path_within_base: &Pointer,
) -> Result<(), SchemaError> {
    if !name_is_valid_anchor(name) {
        return error::MalformedAnchorCtx {
            base_uri: base_uri.to_string(),
            pointer: validation_path.to_string(),
            name: name.to_string(),
        }
        .fail();
    }
    let key = format!("{base_uri}#{name}");
    if table.contains_key(&key) {
        return error::DuplicateAnchorCtx {
            base_uri: base_uri.to_string(),
            pointer: validation_path.to_string(),
            name: name.to_string(),
        }
        .fail();
    }
    table.insert(
        key,
        AnchorEntry {
            base_uri: base_uri.to_string(),
            pointer: validation_path.clone(),
            path_within_base: path_within_base.clone(),
        },
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_core::parser::{parse, Options};

    #[test]
    fn indexes_root_with_default_base() {
        let schema = parse(r#"{"type":"object"}"#, Options::default()).unwrap();
        let index = load(&schema, DEFAULT_BASE_URI).unwrap();
        assert!(index.ids.is_empty());
    }

    #[test]
    fn indexes_nested_id_and_anchor() {
        let schema = parse(
            r#"{"$id":"https://example.com/root.json","$defs":{"a":{"$anchor":"foo","type":"string"}}}"#,
            Options::default(),
        )
        .unwrap();
        let index = load(&schema, DEFAULT_BASE_URI).unwrap();
        assert!(index.ids.contains_key("https://example.com/root.json"));
        assert!(index
            .anchors
            .contains_key("https://example.com/root.json#foo"));
    }

    #[test]
    fn rejects_duplicate_anchor() {
        let schema = parse(
            r#"{"$defs":{"a":{"$anchor":"x"},"b":{"$anchor":"x"}}}"#,
            Options::default(),
        )
        .unwrap();
        assert!(load(&schema, DEFAULT_BASE_URI).is_err());
    }

    #[test]
    fn rejects_empty_all_of() {
        let schema = parse(r#"{"allOf":[]}"#, Options::default()).unwrap();
        assert!(load(&schema, DEFAULT_BASE_URI).is_err());
    }

    #[test]
    fn rejects_content_schema() {
        let schema = parse(r#"{"contentSchema":{"type":"string"}}"#, Options::default()).unwrap();
        assert!(load(&schema, DEFAULT_BASE_URI).is_err());
    }
}
