/*
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
╔═══════════════════════════════════════════════════════════════════════╗
║                                                                       ║
║                              Unevaluated                                ║
║                              ¯¯¯¯¯¯¯¯¯¯¯¯¯                              ║
╚═══════════════════════════════════════════════════════════════════════╝
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
*/
//! `unevaluatedItems`/`unevaluatedProperties`: the two keywords that read the
//! fully merged annotation view (own frame plus every in-place applicator
//! that succeeded) rather than just their own sibling keywords.
//! `Annotations::all_evaluated_items`/`all_evaluated_properties`
//! (`context.rs`) do the aggregation this cross-keyword view depends on.

use kiln_core::{Map, Value};

use crate::context::{Annotation, Annotations, Ctx, ItemCoverage};
use crate::error::SchemaError;
use crate::output::OutputUnit;
use crate::schema::Schema;

use super::KeywordResult;

pub(crate) fn eval_unevaluated_items(
    schema: &mut Schema,
    obj: &Map,
    ctx: &Ctx,
    instance: &Value,
    annotations: &Annotations,
) -> Result<Option<KeywordResult>, SchemaError> {
    if !obj.contains("unevaluatedItems") {
        return Ok(None);
    }
    let sub = obj.get("unevaluatedItems");
    let Some(items) = instance.as_array() else {
        return Ok(Some(KeywordResult {
            unit: OutputUnit::valid(
                ctx.keyword_location.child("unevaluatedItems").to_string(),
                ctx.instance_location.to_string(),
            ),
            annotation: None,
            merge_annotations: None,
        }));
    };
    let coverage = annotations.all_evaluated_items();
    let keyword_ctx = ctx.keyword("unevaluatedItems");
    let mut children = Vec::new();
    let mut valid = true;
    let mut any = false;
    for (i, item) in items.iter().enumerate() {
        if coverage.covers(i) || annotations.contains_covers(i) {
            continue;
        }
        any = true;
        let sub_ctx = keyword_ctx.instance_child(i.to_string());
        let (unit, _) = crate::keyword::evaluate(schema, &sub, &sub_ctx, item)?;
        valid &= unit.valid;
        children.push(unit);
        if ctx.fast_fail && !valid {
            break;
        }
    }
    let unit = OutputUnit::collect(keyword_ctx.keyword_location.to_string(), ctx.instance_location.to_string(), children);
    let ok = unit.valid;
    Ok(Some(KeywordResult {
        unit,
        annotation: (ok && any).then_some(("unevaluatedItems", Annotation::ItemCount(ItemCoverage::All))),
        merge_annotations: None,
    }))
}

pub(crate) fn eval_unevaluated_properties(
    schema: &mut Schema,
    obj: &Map,
    ctx: &Ctx,
    instance: &Value,
    annotations: &Annotations,
) -> Result<Option<KeywordResult>, SchemaError> {
    if !obj.contains("unevaluatedProperties") {
        return Ok(None);
    }
    let sub = obj.get("unevaluatedProperties");
    let Some(instance_obj) = instance.as_object() else {
        return Ok(Some(KeywordResult {
            unit: OutputUnit::valid(
                ctx.keyword_location.child("unevaluatedProperties").to_string(),
                ctx.instance_location.to_string(),
            ),
            annotation: None,
            merge_annotations: None,
        }));
    };
    let covered = annotations.all_evaluated_properties();
    let keyword_ctx = ctx.keyword("unevaluatedProperties");
    let mut children = Vec::new();
    let mut valid = true;
    let mut newly_covered = std::collections::BTreeSet::new();
    for name in instance_obj.keys() {
        let name = name.to_string();
        if covered.contains(&name) {
            continue;
        }
        let sub_ctx = keyword_ctx.instance_child(name.clone());
        let (unit, _) = crate::keyword::evaluate(schema, &sub, &sub_ctx, &instance_obj.get(&name))?;
        if unit.valid {
            newly_covered.insert(name);
        } else {
            valid = false;
        }
        children.push(unit);
        if ctx.fast_fail && !valid {
            break;
        }
    }
    let unit = OutputUnit::collect(keyword_ctx.keyword_location.to_string(), ctx.instance_location.to_string(), children);
    let ok = unit.valid;
    Ok(Some(KeywordResult {
        unit,
        annotation: ok.then_some(("unevaluatedProperties", Annotation::PropertyNames(newly_covered))),
        merge_annotations: None,
    }))
}
