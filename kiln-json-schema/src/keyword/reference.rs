/*
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
╔═══════════════════════════════════════════════════════════════════════╗
║                                                                       ║
║                              $ref/$dynamicRef                          ║
║                              ¯¯¯¯¯¯¯¯¯¯¯¯¯¯¯¯¯                         ║
╚═══════════════════════════════════════════════════════════════════════╝
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
*/
//! `$ref`/`$dynamicRef` evaluation: resolve via [`crate::resolve`], jump into
//! the target subschema in place (same instance location), and merge its
//! result back as though it were a sibling applicator.

use kiln_core::{Map, Value};

use crate::context::Ctx;
use crate::error::{self, SchemaError};
use crate::resolve::{resolve_dynamic_ref, resolve_ref, Target};
use crate::schema::Schema;

use super::KeywordResult;

pub(crate) fn eval_ref(
    schema: &mut Schema,
    obj: &Map,
    ctx: &Ctx,
    instance: &Value,
) -> Result<Option<KeywordResult>, SchemaError> {
    let Some(reference) = obj.get("$ref").as_str().map(str::to_string) else {
        return Ok(None);
    };
    eval_reference_like("$ref", &reference, schema, ctx, instance, false).map(Some)
}

pub(crate) fn eval_dynamic_ref(
    schema: &mut Schema,
    obj: &Map,
    ctx: &Ctx,
    instance: &Value,
) -> Result<Option<KeywordResult>, SchemaError> {
    let Some(reference) = obj.get("$dynamicRef").as_str().map(str::to_string) else {
        return Ok(None);
    };
    eval_reference_like("$dynamicRef", &reference, schema, ctx, instance, true).map(Some)
}

fn locate(schema: &Schema, ctx: &Ctx, reference: &str, dynamic: bool) -> Option<Target> {
    if dynamic {
        resolve_dynamic_ref(schema, ctx, reference)
    } else {
        resolve_ref(schema, &ctx.base_uri, reference)
    }
    .filter(|target| {
        schema
            .document(&target.document_key)
            .is_some_and(|doc| !target.pointer.resolve(&doc.root).is_invalid())
    })
}

fn invoke_invalid_ref_callback(schema: &mut Schema, base_uri: &str, reference: &str) -> bool {
    let Some(callback) = schema.invalid_ref_callback.take() else {
        return false;
    };
    let rescued = callback(schema, base_uri, reference);
    schema.invalid_ref_callback = Some(callback);
    rescued
}

fn eval_reference_like(
    keyword: &'static str,
    reference: &str,
    schema: &mut Schema,
    ctx: &Ctx,
    instance: &Value,
    dynamic: bool,
) -> Result<KeywordResult, SchemaError> {
    let mut target = locate(schema, ctx, reference, dynamic);
    if target.is_none() && invoke_invalid_ref_callback(schema, &ctx.base_uri, reference) {
        target = locate(schema, ctx, reference, dynamic);
    }
    let Some(target) = target else {
        return error::UnresolvedRefCtx {
            base_uri: ctx.base_uri.clone(),
            pointer: ctx.keyword_location.child(keyword).to_string(),
            reference: reference.to_string(),
        }
        .fail();
    };

    let document_root = schema
        .document(&target.document_key)
        .expect("resolve_ref only ever returns a target naming a loaded document")
        .root
        .clone();
    let sub_node = target.pointer.resolve(&document_root);

    let sub_ctx = ctx
        .keyword(keyword)
        .enter_base(target.base_uri.clone(), Some(target.absolute_location.clone()));
    let (unit, sub_annotations) = crate::keyword::evaluate(schema, &sub_node, &sub_ctx, instance)?;
    let ok = unit.valid;
    Ok(KeywordResult {
        unit,
        annotation: None,
        merge_annotations: if ok { Some(sub_annotations) } else { None },
    })
}
