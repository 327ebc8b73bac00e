/*
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
╔═══════════════════════════════════════════════════════════════════════╗
║                                                                       ║
║                               Resolve                                  ║
║                               ¯¯¯¯¯¯¯¯                                  ║
╚═══════════════════════════════════════════════════════════════════════╝
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
*/
//! `$ref`/`$dynamicRef` resolution: resolve like `$ref`, then check whether
//! the landing spot is a dynamic anchor reachable from the current
//! `dynamic_scope` stack.

use kiln_json_pointer::Pointer;
use kiln_uri::{AbsoluteUri, Uri};

use crate::context::Ctx;
use crate::schema::Schema;

/// Where a `$ref`/`$dynamicRef` landed: the document it points into, the
/// pointer (from that document's root) to navigate to, the base URI now in
/// effect (for further relative resolution from there), and the exact
/// string to report as `absoluteKeywordLocation`.
#[derive(Debug, Clone)]
pub struct Target {
    pub document_key: String,
    pub pointer: Pointer,
    pub base_uri: String,
    pub absolute_location: String,
}

fn fragment_of(base_uri: &str, reference: &str) -> Option<(String, Option<String>)> {
    let base = AbsoluteUri::parse(base_uri).ok()?;
    let target = base.resolve(&Uri::parse(reference).ok()?).ok()?;
    let without_fragment = target.without_fragment().as_str().to_string();
    let fragment = target.fragment_decoded_lossy();
    Some((without_fragment, fragment))
}

/// Resolves `reference` as a plain `$ref`: URI-resolve against `base_uri`,
/// then look the result up as either a JSON pointer fragment or an anchor
/// name against `schema`'s merged indexes.
#[must_use]
pub fn resolve_ref(schema: &Schema, base_uri: &str, reference: &str) -> Option<Target> {
    let (without_fragment, fragment) = fragment_of(base_uri, reference)?;
    resolve_against(schema, &without_fragment, fragment.as_deref())
}

fn resolve_against(schema: &Schema, without_fragment: &str, fragment: Option<&str>) -> Option<Target> {
    match fragment {
        None | Some("") => {
            let (doc, pointer) = schema.global_ids.get(without_fragment)?;
            Some(Target {
                document_key: doc.clone(),
                pointer: pointer.clone(),
                base_uri: without_fragment.to_string(),
                absolute_location: without_fragment.to_string(),
            })
        }
        Some(f) if f.starts_with('/') => {
            let (doc, base_pointer) = schema.global_ids.get(without_fragment)?;
            let relative = Pointer::parse(f).ok()?;
            Some(Target {
                document_key: doc.clone(),
                pointer: base_pointer.join(&relative),
                base_uri: without_fragment.to_string(),
                absolute_location: format!("{without_fragment}{f}"),
            })
        }
        Some(name) => {
            let key = format!("{without_fragment}#{name}");
            let (doc, pointer, path_within_base) = schema
                .global_anchors
                .get(&key)
                .or_else(|| schema.global_dynamic_anchors.get(&key))?;
            Some(Target {
                document_key: doc.clone(),
                pointer: pointer.clone(),
                base_uri: without_fragment.to_string(),
                absolute_location: format!("{without_fragment}{path_within_base}"),
            })
        }
    }
}

/// Resolves `reference` as a `$dynamicRef`: resolves statically
/// first; if the static landing spot was declared with `$dynamicAnchor`,
/// re-resolves the same anchor name against each base URI in
/// `ctx.dynamic_scope`, outermost first, and returns the first match
/// instead.
#[must_use]
pub fn resolve_dynamic_ref(schema: &Schema, ctx: &Ctx, reference: &str) -> Option<Target> {
    let (without_fragment, fragment) = fragment_of(&ctx.base_uri, reference)?;
    let static_target = resolve_against(schema, &without_fragment, fragment.as_deref())?;

    let Some(name) = fragment.as_deref().filter(|f| !f.is_empty() && !f.starts_with('/')) else {
        return Some(static_target);
    };
    let landed_on_dynamic_anchor = schema
        .global_dynamic_anchors
        .contains_key(&format!("{without_fragment}#{name}"));
    if !landed_on_dynamic_anchor {
        return Some(static_target);
    }

    for scope_base in &ctx.dynamic_scope {
        let key = format!("{scope_base}#{name}");
        if let Some((doc, pointer, path_within_base)) = schema.global_dynamic_anchors.get(&key) {
            return Some(Target {
                document_key: doc.clone(),
                pointer: pointer.clone(),
                base_uri: scope_base.clone(),
                absolute_location: format!("{scope_base}{path_within_base}"),
            });
        }
    }
    Some(static_target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_core::parser::{parse, Options};

    fn schema_from(text: &str) -> Schema {
        let value = parse(text, Options::default()).unwrap();
        Schema::new(value, Vec::new()).unwrap()
    }

    #[test]
    fn resolves_plain_pointer_fragment() {
        let schema = schema_from(r#"{"$defs":{"a":{"type":"string"}},"$ref":"#/$defs/a"}"#);
        let target = resolve_ref(&schema, schema.primary_base_uri(), "#/$defs/a").unwrap();
        assert_eq!(target.pointer.to_string(), "/$defs/a");
    }

    #[test]
    fn resolves_anchor_fragment() {
        let schema = schema_from(r#"{"$defs":{"a":{"$anchor":"foo","type":"string"}}}"#);
        let target = resolve_ref(&schema, schema.primary_base_uri(), "#foo").unwrap();
        assert_eq!(target.pointer.to_string(), "/$defs/a");
    }

    #[test]
    fn dynamic_ref_prefers_outermost_scope() {
        let schema = schema_from(
            r#"{
                "$id":"https://example.com/root",
                "$dynamicAnchor":"n",
                "$defs":{"inner":{"$id":"https://example.com/inner","$dynamicAnchor":"n"}}
            }"#,
        );
        let ctx = crate::context::Ctx::root("https://example.com/root".to_string(), false)
            .enter_base("https://example.com/inner".to_string(), None);
        let target = resolve_dynamic_ref(&schema, &ctx, "#n").unwrap();
        assert_eq!(target.document_key, "https://example.com/root");
        assert!(target.pointer.is_root());
    }
}
