/*
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
╔═══════════════════════════════════════════════════════════════════════╗
║                                                                       ║
║                               Keyword                                  ║
║                               ¯¯¯¯¯¯¯                                  ║
╚═══════════════════════════════════════════════════════════════════════╝
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
*/
//! The evaluator: one schema object against one instance value,
//! dispatched keyword by keyword in the order `$ref`/`$dynamicRef`, then
//! applicators, then validation keywords, then
//! `additionalProperties`/`items`, then
//! `unevaluatedProperties`/`unevaluatedItems` last.
//!
//! Dispatch is plain recursive function calls over an explicit
//! [`crate::context::Ctx`] stack frame rather than trait-object lookup —
//! the keyword vocabulary is fixed (2020-12 only), so there is nothing to
//! register at runtime.

mod applicator;
mod reference;
mod unevaluated;
mod validation;

use kiln_core::Value;

use crate::context::{Annotations, Ctx};
use crate::error::SchemaError;
use crate::output::OutputUnit;
use crate::schema::Schema;

/// One keyword's contribution to a frame: the output unit it produced, an
/// annotation it records directly (`properties`, `prefixItems`, ...), and/or
/// a full `Annotations` set to merge in place (applicators that ran a
/// subschema against the *same* instance: `allOf`, `not`, `if`/`then`/`else`,
/// `dependentSchemas`, `$ref`, `$dynamicRef`).
pub(crate) struct KeywordResult {
    pub unit: OutputUnit,
    pub annotation: Option<(&'static str, crate::context::Annotation)>,
    pub merge_annotations: Option<Annotations>,
}

/// Builds a trivial leaf [`KeywordResult`] with no annotation, for keywords
/// that only ever pass or fail (the validation-keyword family).
pub(crate) fn leaf(ctx: &Ctx, keyword: &str, ok: bool, message: impl Into<String>) -> KeywordResult {
    let keyword_location = ctx.keyword_location.child(keyword).to_string();
    let instance_location = ctx.instance_location.to_string();
    let unit = if ok {
        OutputUnit::valid(keyword_location, instance_location)
    } else {
        OutputUnit::invalid(keyword_location, instance_location, message)
    };
    KeywordResult {
        unit,
        annotation: None,
        merge_annotations: None,
    }
}

/// Folds one keyword's (already-evaluated) result into the running frame
/// state. Returns `false` once fast-fail mode has seen a failure, signaling
/// the caller to stop evaluating further keywords in this frame.
fn fold(
    result: Option<KeywordResult>,
    valid: &mut bool,
    children: &mut Vec<OutputUnit>,
    annotations: &mut Annotations,
    fast_fail: bool,
) -> bool {
    if let Some(result) = result {
        *valid &= result.unit.valid;
        if result.unit.valid {
            if let Some(ann) = &result.merge_annotations {
                annotations.merge_in_place(ann);
            }
            if let Some((keyword, annotation)) = result.annotation {
                annotations.record(keyword, annotation);
            }
        }
        children.push(result.unit);
    }
    !(fast_fail && !*valid)
}

fn resolve_id(base_uri: &str, id: &str) -> Option<String> {
    let base = kiln_uri::AbsoluteUri::parse(base_uri).ok()?;
    let resolved = base.resolve(&kiln_uri::Uri::parse(id).ok()?).ok()?;
    Some(resolved.as_str().to_string())
}

/// Evaluates one schema node (`node`) against `instance` at the location
/// described by `ctx`, producing both the output unit for this frame and the
/// annotations it (and any in-place-applied children) produced.
pub fn evaluate(
    schema: &mut Schema,
    node: &Value,
    ctx: &Ctx,
    instance: &Value,
) -> Result<(OutputUnit, Annotations), SchemaError> {
    if let Some(b) = node.as_bool() {
        let unit = if b {
            OutputUnit::valid(ctx.keyword_location.to_string(), ctx.instance_location.to_string())
        } else {
            OutputUnit::invalid(
                ctx.keyword_location.to_string(),
                ctx.instance_location.to_string(),
                "boolean schema false",
            )
        };
        return Ok((with_absolute(unit, ctx), Annotations::new()));
    }

    let Some(obj) = node.as_object() else {
        // Not reached for a well-formed, already-indexed schema document;
        // treated as the trivially-true schema `{}` rather than panicking.
        return Ok((
            with_absolute(
                OutputUnit::valid(ctx.keyword_location.to_string(), ctx.instance_location.to_string()),
                ctx,
            ),
            Annotations::new(),
        ));
    };

    let mut ctx = ctx.clone();
    if let Some(id) = obj.get("$id").as_str() {
        if let Some(resolved) = resolve_id(&ctx.base_uri, id) {
            ctx = ctx.enter_base(resolved, None);
        }
    }

    let mut valid = true;
    let mut children = Vec::new();
    let mut annotations = Annotations::new();
    let fast_fail = ctx.fast_fail;

    macro_rules! step {
        ($result:expr) => {
            if !fold($result, &mut valid, &mut children, &mut annotations, fast_fail) {
                return Ok((finalize(&ctx, children), annotations));
            }
        };
    }

    // `$ref`/`$dynamicRef` (2020-12: coexist with sibling keywords).
    step!(reference::eval_ref(schema, obj, &ctx, instance)?);
    step!(reference::eval_dynamic_ref(schema, obj, &ctx, instance)?);

    // Applicators.
    step!(applicator::eval_all_of(schema, obj, &ctx, instance)?);
    step!(applicator::eval_any_of(schema, obj, &ctx, instance)?);
    step!(applicator::eval_one_of(schema, obj, &ctx, instance)?);
    step!(applicator::eval_not(schema, obj, &ctx, instance)?);
    step!(applicator::eval_if_then_else(schema, obj, &ctx, instance)?);
    step!(applicator::eval_dependent_schemas(schema, obj, &ctx, instance)?);
    step!(applicator::eval_property_names(schema, obj, &ctx, instance)?);
    step!(applicator::eval_prefix_items(schema, obj, &ctx, instance)?);
    step!(applicator::eval_contains(schema, obj, &ctx, instance)?);
    step!(applicator::eval_properties(schema, obj, &ctx, instance)?);
    step!(applicator::eval_pattern_properties(schema, obj, &ctx, instance)?);

    // Validation keywords.
    step!(validation::eval_type(obj, &ctx, instance));
    step!(validation::eval_enum(obj, &ctx, instance));
    step!(validation::eval_const(obj, &ctx, instance));
    step!(validation::eval_multiple_of(obj, &ctx, instance));
    step!(validation::eval_maximum(obj, &ctx, instance));
    step!(validation::eval_exclusive_maximum(obj, &ctx, instance));
    step!(validation::eval_minimum(obj, &ctx, instance));
    step!(validation::eval_exclusive_minimum(obj, &ctx, instance));
    step!(validation::eval_max_length(obj, &ctx, instance));
    step!(validation::eval_min_length(obj, &ctx, instance));
    step!(validation::eval_pattern(obj, &ctx, instance));
    step!(validation::eval_max_items(obj, &ctx, instance));
    step!(validation::eval_min_items(obj, &ctx, instance));
    step!(validation::eval_unique_items(obj, &ctx, instance));
    step!(validation::eval_max_contains(obj, &ctx, instance, &annotations));
    step!(validation::eval_min_contains(obj, &ctx, instance, &annotations));
    step!(validation::eval_max_properties(obj, &ctx, instance));
    step!(validation::eval_min_properties(obj, &ctx, instance));
    step!(validation::eval_required(obj, &ctx, instance));
    step!(validation::eval_dependent_required(obj, &ctx, instance));

    // After the others: `additionalProperties` and `items` read only the
    // annotations recorded so far in this same frame.
    step!(applicator::eval_items(schema, obj, &ctx, instance, &annotations)?);
    step!(applicator::eval_additional_properties(schema, obj, &ctx, instance, &annotations)?);

    // `unevaluatedItems`/`unevaluatedProperties` read the fully merged view,
    // including everything brought in by in-place applicators above.
    step!(unevaluated::eval_unevaluated_items(schema, obj, &ctx, instance, &annotations)?);
    step!(unevaluated::eval_unevaluated_properties(
        schema,
        obj,
        &ctx,
        instance,
        &annotations
    )?);

    Ok((finalize(&ctx, children), annotations))
}

fn with_absolute(unit: OutputUnit, ctx: &Ctx) -> OutputUnit {
    match &ctx.absolute_keyword_location {
        Some(loc) => unit.with_absolute_keyword_location(loc.clone()),
        None => unit,
    }
}

fn finalize(ctx: &Ctx, children: Vec<OutputUnit>) -> OutputUnit {
    let unit = OutputUnit::collect(ctx.keyword_location.to_string(), ctx.instance_location.to_string(), children);
    with_absolute(unit, ctx)
}
