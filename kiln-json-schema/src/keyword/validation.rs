/*
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
╔═══════════════════════════════════════════════════════════════════════╗
║                                                                       ║
║                               Validation                                ║
║                               ¯¯¯¯¯¯¯¯¯¯¯¯                              ║
╚═══════════════════════════════════════════════════════════════════════╝
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
*/
//! The validation vocabulary: leaf keywords that only ever pass or fail,
//! never producing annotations or recursing into a subschema — `type`,
//! `enum`, `const`, the numeric bounds (`multipleOf`/`maximum`/`minimum`/
//! `exclusiveMaximum`/`exclusiveMinimum`), the string/array/object size
//! bounds, `pattern`, `uniqueItems`, `required`, and `dependentRequired`.
//!
//! `maxContains`/`minContains` have no entry here: they only ever modify
//! sibling `contains`'s own bound check (done directly in
//! `applicator::eval_contains`) and are otherwise no-ops.

use kiln_core::{Map, Number, Value};

use crate::context::{Annotations, Ctx};

use super::{leaf, KeywordResult};

fn type_name_matches(name: &str, instance: &Value) -> bool {
    match name {
        "null" => instance.is_null(),
        "boolean" => instance.is_boolean(),
        "object" => instance.is_object(),
        "array" => instance.is_array(),
        "string" => instance.is_string(),
        "number" => instance.is_number(),
        "integer" => instance.as_number().is_some_and(Number::is_integer),
        _ => false,
    }
}

pub(crate) fn eval_type(obj: &Map, ctx: &Ctx, instance: &Value) -> Option<KeywordResult> {
    let value = obj.get("type");
    let ok = match &value {
        Value::String(name) => type_name_matches(name, instance),
        Value::Array(names) => names.iter().filter_map(Value::as_str).any(|name| type_name_matches(name, instance)),
        _ => return None,
    };
    Some(leaf(ctx, "type", ok, "instance does not match schema's \"type\""))
}

pub(crate) fn eval_enum(obj: &Map, ctx: &Ctx, instance: &Value) -> Option<KeywordResult> {
    let value = obj.get("enum");
    let values = value.as_array()?;
    let ok = values.iter().any(|v| v == instance);
    Some(leaf(ctx, "enum", ok, "instance does not equal any value in \"enum\""))
}

pub(crate) fn eval_const(obj: &Map, ctx: &Ctx, instance: &Value) -> Option<KeywordResult> {
    if !obj.contains("const") {
        return None;
    }
    let expected = obj.get("const");
    let ok = &expected == instance;
    Some(leaf(ctx, "const", ok, "instance does not equal \"const\" value"))
}

pub(crate) fn eval_multiple_of(obj: &Map, ctx: &Ctx, instance: &Value) -> Option<KeywordResult> {
    let divisor = obj.get("multipleOf");
    let divisor = divisor.as_number()?;
    let n = instance.as_number()?;
    let ok = n.is_multiple_of(divisor);
    Some(leaf(ctx, "multipleOf", ok, "instance is not a multiple of \"multipleOf\""))
}

pub(crate) fn eval_maximum(obj: &Map, ctx: &Ctx, instance: &Value) -> Option<KeywordResult> {
    let bound = obj.get("maximum");
    let bound = bound.as_number()?;
    let n = instance.as_number()?;
    let ok = n <= bound;
    Some(leaf(ctx, "maximum", ok, "instance exceeds \"maximum\""))
}

pub(crate) fn eval_exclusive_maximum(obj: &Map, ctx: &Ctx, instance: &Value) -> Option<KeywordResult> {
    let bound = obj.get("exclusiveMaximum");
    let bound = bound.as_number()?;
    let n = instance.as_number()?;
    let ok = n < bound;
    Some(leaf(ctx, "exclusiveMaximum", ok, "instance is not strictly less than \"exclusiveMaximum\""))
}

pub(crate) fn eval_minimum(obj: &Map, ctx: &Ctx, instance: &Value) -> Option<KeywordResult> {
    let bound = obj.get("minimum");
    let bound = bound.as_number()?;
    let n = instance.as_number()?;
    let ok = n >= bound;
    Some(leaf(ctx, "minimum", ok, "instance is less than \"minimum\""))
}

pub(crate) fn eval_exclusive_minimum(obj: &Map, ctx: &Ctx, instance: &Value) -> Option<KeywordResult> {
    let bound = obj.get("exclusiveMinimum");
    let bound = bound.as_number()?;
    let n = instance.as_number()?;
    let ok = n > bound;
    Some(leaf(ctx, "exclusiveMinimum", ok, "instance is not strictly greater than \"exclusiveMinimum\""))
}

pub(crate) fn eval_max_length(obj: &Map, ctx: &Ctx, instance: &Value) -> Option<KeywordResult> {
    let bound = obj.get("maxLength").as_f64()? as usize;
    let s = instance.as_str()?;
    let ok = s.chars().count() <= bound;
    Some(leaf(ctx, "maxLength", ok, "instance is longer than \"maxLength\""))
}

pub(crate) fn eval_min_length(obj: &Map, ctx: &Ctx, instance: &Value) -> Option<KeywordResult> {
    let bound = obj.get("minLength").as_f64()? as usize;
    let s = instance.as_str()?;
    let ok = s.chars().count() >= bound;
    Some(leaf(ctx, "minLength", ok, "instance is shorter than \"minLength\""))
}

pub(crate) fn eval_pattern(obj: &Map, ctx: &Ctx, instance: &Value) -> Option<KeywordResult> {
    let pattern = obj.get("pattern");
    let pattern = pattern.as_str()?;
    let s = instance.as_str()?;
    let ok = fancy_regex::Regex::new(pattern).ok().and_then(|re| re.is_match(s).ok()).unwrap_or(false);
    Some(leaf(ctx, "pattern", ok, "instance does not match \"pattern\""))
}

pub(crate) fn eval_max_items(obj: &Map, ctx: &Ctx, instance: &Value) -> Option<KeywordResult> {
    let bound = obj.get("maxItems").as_f64()? as usize;
    let items = instance.as_array()?;
    let ok = items.len() <= bound;
    Some(leaf(ctx, "maxItems", ok, "instance has more items than \"maxItems\""))
}

pub(crate) fn eval_min_items(obj: &Map, ctx: &Ctx, instance: &Value) -> Option<KeywordResult> {
    let bound = obj.get("minItems").as_f64()? as usize;
    let items = instance.as_array()?;
    let ok = items.len() >= bound;
    Some(leaf(ctx, "minItems", ok, "instance has fewer items than \"minItems\""))
}

pub(crate) fn eval_unique_items(obj: &Map, ctx: &Ctx, instance: &Value) -> Option<KeywordResult> {
    if obj.get("uniqueItems").as_bool() != Some(true) {
        return None;
    }
    let items = instance.as_array()?;
    let mut ok = true;
    'outer: for (i, a) in items.iter().enumerate() {
        for b in &items[i + 1..] {
            if a == b {
                ok = false;
                break 'outer;
            }
        }
    }
    Some(leaf(ctx, "uniqueItems", ok, "instance's array elements are not all unique"))
}

pub(crate) fn eval_max_contains(_obj: &Map, _ctx: &Ctx, _instance: &Value, _annotations: &Annotations) -> Option<KeywordResult> {
    None
}

pub(crate) fn eval_min_contains(_obj: &Map, _ctx: &Ctx, _instance: &Value, _annotations: &Annotations) -> Option<KeywordResult> {
    None
}

pub(crate) fn eval_max_properties(obj: &Map, ctx: &Ctx, instance: &Value) -> Option<KeywordResult> {
    let bound = obj.get("maxProperties").as_f64()? as usize;
    let members = instance.as_object()?;
    let ok = members.keys().len() <= bound;
    Some(leaf(ctx, "maxProperties", ok, "instance has more members than \"maxProperties\""))
}

pub(crate) fn eval_min_properties(obj: &Map, ctx: &Ctx, instance: &Value) -> Option<KeywordResult> {
    let bound = obj.get("minProperties").as_f64()? as usize;
    let members = instance.as_object()?;
    let ok = members.keys().len() >= bound;
    Some(leaf(ctx, "minProperties", ok, "instance has fewer members than \"minProperties\""))
}

pub(crate) fn eval_required(obj: &Map, ctx: &Ctx, instance: &Value) -> Option<KeywordResult> {
    let value = obj.get("required");
    let names = value.as_array()?;
    let members = instance.as_object()?;
    let missing: Vec<&str> = names.iter().filter_map(Value::as_str).filter(|name| !members.contains(name)).collect();
    let ok = missing.is_empty();
    let message = if ok {
        String::new()
    } else {
        format!("instance is missing required member(s): {}", missing.join(", "))
    };
    Some(leaf(ctx, "required", ok, message))
}

pub(crate) fn eval_dependent_required(obj: &Map, ctx: &Ctx, instance: &Value) -> Option<KeywordResult> {
    let value = obj.get("dependentRequired");
    let dependents = value.as_object()?;
    let members = instance.as_object()?;
    let mut missing = Vec::new();
    for (key, required) in dependents.iter() {
        if !members.contains(&key) {
            continue;
        }
        if let Value::Array(names) = &required {
            for name in names.iter().filter_map(Value::as_str) {
                if !members.contains(name) {
                    missing.push(format!("{name} (required by {key})"));
                }
            }
        }
    }
    let ok = missing.is_empty();
    Some(leaf(
        ctx,
        "dependentRequired",
        ok,
        format!("instance is missing dependent required member(s): {}", missing.join(", ")),
    ))
}
