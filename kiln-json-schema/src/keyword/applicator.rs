/*
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
╔═══════════════════════════════════════════════════════════════════════╗
║                                                                       ║
║                              Applicator                                ║
║                              ¯¯¯¯¯¯¯¯¯¯¯                               ║
╚═══════════════════════════════════════════════════════════════════════╝
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
*/
//! The applicator vocabulary: keywords that apply a subschema to the
//! instance (or part of it) and fold the result back into the parent frame —
//! `allOf`/`anyOf`/`oneOf`/`not`, `if`/`then`/`else`, `dependentSchemas`,
//! `properties`/`patternProperties`/`additionalProperties`, `propertyNames`,
//! `prefixItems`/`items`, and `contains`.

use std::collections::BTreeSet;

use kiln_core::{Map, Value};

use crate::context::{Annotation, Annotations, Ctx, IndexCoverage, ItemCoverage};
use crate::error::SchemaError;
use crate::output::OutputUnit;
use crate::schema::Schema;

use super::KeywordResult;

fn collective(
    schema: &mut Schema,
    branches: &[Value],
    keyword: &'static str,
    ctx: &Ctx,
    instance: &Value,
) -> Result<(Vec<OutputUnit>, Vec<Annotations>), SchemaError> {
    let mut children = Vec::with_capacity(branches.len());
    let mut branch_annotations = Vec::with_capacity(branches.len());
    for (i, branch) in branches.iter().enumerate() {
        let sub_ctx = ctx.keyword(keyword).keyword(i.to_string());
        let (unit, ann) = crate::keyword::evaluate(schema, branch, &sub_ctx, instance)?;
        let ok = unit.valid;
        children.push(unit);
        if ok {
            branch_annotations.push(ann);
        }
        if ctx.fast_fail && keyword == "allOf" && !ok {
            break;
        }
    }
    Ok((children, branch_annotations))
}

pub(crate) fn eval_all_of(
    schema: &mut Schema,
    obj: &Map,
    ctx: &Ctx,
    instance: &Value,
) -> Result<Option<KeywordResult>, SchemaError> {
    let value = obj.get("allOf");
    let Some(branches) = value.as_array().cloned() else {
        return Ok(None);
    };
    let (children, annotations) = collective(schema, &branches, "allOf", ctx, instance)?;
    let unit = OutputUnit::collect(ctx.keyword_location.child("allOf").to_string(), ctx.instance_location.to_string(), children);
    let ok = unit.valid;
    let mut merged = Annotations::new();
    if ok {
        for ann in &annotations {
            merged.merge_in_place(ann);
        }
    }
    Ok(Some(KeywordResult {
        unit,
        annotation: None,
        merge_annotations: ok.then_some(merged),
    }))
}

pub(crate) fn eval_any_of(
    schema: &mut Schema,
    obj: &Map,
    ctx: &Ctx,
    instance: &Value,
) -> Result<Option<KeywordResult>, SchemaError> {
    let value = obj.get("anyOf");
    let Some(branches) = value.as_array().cloned() else {
        return Ok(None);
    };
    let (children, annotations) = collective(schema, &branches, "anyOf", ctx, instance)?;
    let ok = children.iter().any(|c| c.valid);
    let keyword_location = ctx.keyword_location.child("anyOf").to_string();
    let instance_location = ctx.instance_location.to_string();
    let mut unit = if ok {
        OutputUnit::valid(keyword_location, instance_location)
    } else {
        OutputUnit::invalid(keyword_location, instance_location, "instance matched none of anyOf's subschemas")
    };
    let (ann_children, err_children): (Vec<_>, Vec<_>) = children.into_iter().partition(|c| c.valid);
    unit.annotations = ann_children;
    unit.errors = err_children;
    let mut merged = Annotations::new();
    if ok {
        for ann in &annotations {
            merged.merge_in_place(ann);
        }
    }
    Ok(Some(KeywordResult {
        unit,
        annotation: None,
        merge_annotations: ok.then_some(merged),
    }))
}

pub(crate) fn eval_one_of(
    schema: &mut Schema,
    obj: &Map,
    ctx: &Ctx,
    instance: &Value,
) -> Result<Option<KeywordResult>, SchemaError> {
    let value = obj.get("oneOf");
    let Some(branches) = value.as_array().cloned() else {
        return Ok(None);
    };
    let (children, annotations) = collective(schema, &branches, "oneOf", ctx, instance)?;
    let success_count = children.iter().filter(|c| c.valid).count();
    let ok = success_count == 1;
    let keyword_location = ctx.keyword_location.child("oneOf").to_string();
    let instance_location = ctx.instance_location.to_string();
    let mut unit = if ok {
        OutputUnit::valid(keyword_location, instance_location)
    } else if success_count == 0 {
        OutputUnit::invalid(keyword_location, instance_location, "instance matched none of oneOf's subschemas")
    } else {
        OutputUnit::invalid(
            keyword_location,
            instance_location,
            format!("instance matched {success_count} of oneOf's subschemas, expected exactly one"),
        )
    };
    let (ann_children, err_children): (Vec<_>, Vec<_>) = children.into_iter().partition(|c| c.valid);
    unit.annotations = ann_children;
    unit.errors = err_children;
    Ok(Some(KeywordResult {
        unit,
        annotation: None,
        merge_annotations: if ok { annotations.into_iter().next() } else { None },
    }))
}

pub(crate) fn eval_not(
    schema: &mut Schema,
    obj: &Map,
    ctx: &Ctx,
    instance: &Value,
) -> Result<Option<KeywordResult>, SchemaError> {
    if !obj.contains("not") {
        return Ok(None);
    }
    let sub = obj.get("not");
    let sub_ctx = ctx.keyword("not");
    let (child, _) = crate::keyword::evaluate(schema, &sub, &sub_ctx, instance)?;
    let ok = !child.valid;
    let unit = if ok {
        OutputUnit::valid(sub_ctx.keyword_location.to_string(), ctx.instance_location.to_string())
    } else {
        OutputUnit::invalid(
            sub_ctx.keyword_location.to_string(),
            ctx.instance_location.to_string(),
            "instance must not validate against the \"not\" subschema, but it did",
        )
    };
    Ok(Some(KeywordResult {
        unit,
        annotation: None,
        merge_annotations: None,
    }))
}

pub(crate) fn eval_if_then_else(
    schema: &mut Schema,
    obj: &Map,
    ctx: &Ctx,
    instance: &Value,
) -> Result<Option<KeywordResult>, SchemaError> {
    if !obj.contains("if") {
        return Ok(None);
    }
    let if_schema = obj.get("if");
    let if_ctx = ctx.keyword("if");
    let (if_unit, _) = crate::keyword::evaluate(schema, &if_schema, &if_ctx, instance)?;

    let taken = if if_unit.valid { "then" } else { "else" };
    if !obj.contains(taken) {
        return Ok(Some(KeywordResult {
            unit: OutputUnit::valid(ctx.keyword_location.child("if").to_string(), ctx.instance_location.to_string()),
            annotation: None,
            merge_annotations: None,
        }));
    }

    let branch = obj.get(taken);
    let branch_ctx = ctx.keyword(taken);
    let (unit, annotations) = crate::keyword::evaluate(schema, &branch, &branch_ctx, instance)?;
    let ok = unit.valid;
    Ok(Some(KeywordResult {
        unit,
        annotation: None,
        merge_annotations: ok.then_some(annotations),
    }))
}

pub(crate) fn eval_dependent_schemas(
    schema: &mut Schema,
    obj: &Map,
    ctx: &Ctx,
    instance: &Value,
) -> Result<Option<KeywordResult>, SchemaError> {
    let value = obj.get("dependentSchemas");
    let Some(dependents) = value.as_object() else {
        return Ok(None);
    };
    let Some(instance_obj) = instance.as_object() else {
        return Ok(None);
    };
    let present: BTreeSet<String> = instance_obj.keys().into_iter().map(|k| k.to_string()).collect();

    let mut children = Vec::new();
    let mut merged = Annotations::new();
    let mut valid = true;
    for (key, sub) in dependents.iter() {
        let key = key.to_string();
        if !present.contains(&key) {
            continue;
        }
        let sub_ctx = ctx.keyword("dependentSchemas").keyword(key);
        let (unit, ann) = crate::keyword::evaluate(schema, &sub, &sub_ctx, instance)?;
        valid &= unit.valid;
        if unit.valid {
            merged.merge_in_place(&ann);
        }
        children.push(unit);
        if ctx.fast_fail && !valid {
            break;
        }
    }
    if children.is_empty() {
        return Ok(None);
    }
    let unit = OutputUnit::collect(
        ctx.keyword_location.child("dependentSchemas").to_string(),
        ctx.instance_location.to_string(),
        children,
    );
    let ok = unit.valid;
    Ok(Some(KeywordResult {
        unit,
        annotation: None,
        merge_annotations: ok.then_some(merged),
    }))
}

pub(crate) fn eval_property_names(
    schema: &mut Schema,
    obj: &Map,
    ctx: &Ctx,
    instance: &Value,
) -> Result<Option<KeywordResult>, SchemaError> {
    if !obj.contains("propertyNames") {
        return Ok(None);
    }
    let sub = obj.get("propertyNames");
    let Some(instance_obj) = instance.as_object() else {
        return Ok(Some(KeywordResult {
            unit: OutputUnit::valid(ctx.keyword_location.child("propertyNames").to_string(), ctx.instance_location.to_string()),
            annotation: None,
            merge_annotations: None,
        }));
    };
    let sub_ctx = ctx.keyword("propertyNames");
    let mut children = Vec::new();
    let mut valid = true;
    for key in instance_obj.keys() {
        let key_value = Value::from(key.as_ref());
        let (unit, _) = crate::keyword::evaluate(schema, &sub, &sub_ctx, &key_value)?;
        valid &= unit.valid;
        children.push(unit);
        if ctx.fast_fail && !valid {
            break;
        }
    }
    let unit = OutputUnit::collect(sub_ctx.keyword_location.to_string(), ctx.instance_location.to_string(), children);
    Ok(Some(KeywordResult {
        unit,
        annotation: None,
        merge_annotations: None,
    }))
}

pub(crate) fn eval_prefix_items(
    schema: &mut Schema,
    obj: &Map,
    ctx: &Ctx,
    instance: &Value,
) -> Result<Option<KeywordResult>, SchemaError> {
    let value = obj.get("prefixItems");
    let Some(schemas) = value.as_array().cloned() else {
        return Ok(None);
    };
    let Some(items) = instance.as_array() else {
        return Ok(Some(KeywordResult {
            unit: OutputUnit::valid(ctx.keyword_location.child("prefixItems").to_string(), ctx.instance_location.to_string()),
            annotation: None,
            merge_annotations: None,
        }));
    };
    let n = schemas.len().min(items.len());
    let keyword_ctx = ctx.keyword("prefixItems");
    let mut children = Vec::with_capacity(n);
    let mut valid = true;
    for i in 0..n {
        let sub_ctx = keyword_ctx.keyword(i.to_string()).instance_child(i.to_string());
        let (unit, _) = crate::keyword::evaluate(schema, &schemas[i], &sub_ctx, &items[i])?;
        valid &= unit.valid;
        children.push(unit);
        if ctx.fast_fail && !valid {
            break;
        }
    }
    let unit = OutputUnit::collect(keyword_ctx.keyword_location.to_string(), ctx.instance_location.to_string(), children);
    let ok = unit.valid;
    let coverage = if ok { ItemCoverage::Count(n) } else { ItemCoverage::Count(0) };
    Ok(Some(KeywordResult {
        unit,
        annotation: ok.then_some(("prefixItems", Annotation::ItemCount(coverage))),
        merge_annotations: None,
    }))
}

pub(crate) fn eval_items(
    schema: &mut Schema,
    obj: &Map,
    ctx: &Ctx,
    instance: &Value,
    annotations: &Annotations,
) -> Result<Option<KeywordResult>, SchemaError> {
    if !obj.contains("items") {
        return Ok(None);
    }
    let sub = obj.get("items");
    let Some(items) = instance.as_array() else {
        return Ok(Some(KeywordResult {
            unit: OutputUnit::valid(ctx.keyword_location.child("items").to_string(), ctx.instance_location.to_string()),
            annotation: None,
            merge_annotations: None,
        }));
    };
    let already_covered = annotations.item_coverage("prefixItems");
    let keyword_ctx = ctx.keyword("items");
    let mut children = Vec::with_capacity(items.len());
    let mut valid = true;
    let mut any_evaluated = false;
    for (i, item) in items.iter().enumerate() {
        if already_covered.covers(i) {
            continue;
        }
        any_evaluated = true;
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
    let annotation = if ok && any_evaluated {
        Some(("items", Annotation::ItemCount(ItemCoverage::All)))
    } else {
        None
    };
    Ok(Some(KeywordResult {
        unit,
        annotation,
        merge_annotations: None,
    }))
}

pub(crate) fn eval_contains(
    schema: &mut Schema,
    obj: &Map,
    ctx: &Ctx,
    instance: &Value,
) -> Result<Option<KeywordResult>, SchemaError> {
    if !obj.contains("contains") {
        return Ok(None);
    }
    let sub = obj.get("contains");
    let Some(items) = instance.as_array() else {
        return Ok(Some(KeywordResult {
            unit: OutputUnit::valid(ctx.keyword_location.child("contains").to_string(), ctx.instance_location.to_string()),
            annotation: None,
            merge_annotations: None,
        }));
    };
    let min_contains = obj.get("minContains").as_f64().map(|n| n as usize).unwrap_or(1);
    let max_contains = obj.get("maxContains").as_f64().map(|n| n as usize);

    let keyword_ctx = ctx.keyword("contains");
    let mut matched = BTreeSet::new();
    for (i, item) in items.iter().enumerate() {
        let sub_ctx = keyword_ctx.instance_child(i.to_string());
        let (unit, _) = crate::keyword::evaluate(schema, &sub, &sub_ctx, item)?;
        if unit.valid {
            matched.insert(i);
        }
    }
    let count = matched.len();
    let ok = count >= min_contains && max_contains.map_or(true, |max| count <= max);
    let unit = if ok {
        OutputUnit::valid(keyword_ctx.keyword_location.to_string(), ctx.instance_location.to_string())
    } else if count == 0 && min_contains > 0 {
        OutputUnit::invalid(
            keyword_ctx.keyword_location.to_string(),
            ctx.instance_location.to_string(),
            "no item matches the \"contains\" subschema",
        )
    } else {
        OutputUnit::invalid(
            keyword_ctx.keyword_location.to_string(),
            ctx.instance_location.to_string(),
            format!("{count} items match \"contains\", outside the minContains/maxContains bound"),
        )
    };
    let coverage = if !items.is_empty() && count == items.len() {
        IndexCoverage::All
    } else {
        IndexCoverage::Indices(matched)
    };
    Ok(Some(KeywordResult {
        unit,
        annotation: ok.then_some(("contains", Annotation::Indices(coverage))),
        merge_annotations: None,
    }))
}

pub(crate) fn eval_properties(
    schema: &mut Schema,
    obj: &Map,
    ctx: &Ctx,
    instance: &Value,
) -> Result<Option<KeywordResult>, SchemaError> {
    let value = obj.get("properties");
    let Some(schemas) = value.as_object() else {
        return Ok(None);
    };
    let Some(instance_obj) = instance.as_object() else {
        return Ok(Some(KeywordResult {
            unit: OutputUnit::valid(ctx.keyword_location.child("properties").to_string(), ctx.instance_location.to_string()),
            annotation: None,
            merge_annotations: None,
        }));
    };
    let keyword_ctx = ctx.keyword("properties");
    let mut children = Vec::new();
    let mut valid = true;
    let mut covered = BTreeSet::new();
    for (name, sub) in schemas.iter() {
        let name = name.to_string();
        if !instance_obj.contains(&name) {
            continue;
        }
        let sub_ctx = keyword_ctx.keyword(name.clone()).instance_child(name.clone());
        let (unit, _) = crate::keyword::evaluate(schema, &sub, &sub_ctx, &instance_obj.get(&name))?;
        if unit.valid {
            covered.insert(name);
        } else {
            valid = false;
        }
        children.push(unit);
        if ctx.fast_fail && !valid {
            break;
        }
    }
    let unit = OutputUnit::collect(keyword_ctx.keyword_location.to_string(), ctx.instance_location.to_string(), children);
    Ok(Some(KeywordResult {
        unit,
        annotation: Some(("properties", Annotation::PropertyNames(covered))),
        merge_annotations: None,
    }))
}

pub(crate) fn eval_pattern_properties(
    schema: &mut Schema,
    obj: &Map,
    ctx: &Ctx,
    instance: &Value,
) -> Result<Option<KeywordResult>, SchemaError> {
    let value = obj.get("patternProperties");
    let Some(schemas) = value.as_object() else {
        return Ok(None);
    };
    let Some(instance_obj) = instance.as_object() else {
        return Ok(Some(KeywordResult {
            unit: OutputUnit::valid(
                ctx.keyword_location.child("patternProperties").to_string(),
                ctx.instance_location.to_string(),
            ),
            annotation: None,
            merge_annotations: None,
        }));
    };
    let keyword_ctx = ctx.keyword("patternProperties");
    let mut children = Vec::new();
    let mut valid = true;
    let mut covered = BTreeSet::new();
    for (pattern, sub) in schemas.iter() {
        let pattern = pattern.to_string();
        let Ok(re) = fancy_regex::Regex::new(&pattern) else {
            continue;
        };
        for name in instance_obj.keys() {
            let name = name.to_string();
            if !re.is_match(&name).unwrap_or(false) {
                continue;
            }
            let sub_ctx = keyword_ctx.keyword(pattern.clone()).instance_child(name.clone());
            let (unit, _) = crate::keyword::evaluate(schema, &sub, &sub_ctx, &instance_obj.get(&name))?;
            if unit.valid {
                covered.insert(name);
            } else {
                valid = false;
            }
            children.push(unit);
            if ctx.fast_fail && !valid {
                break;
            }
        }
        if ctx.fast_fail && !valid {
            break;
        }
    }
    let unit = OutputUnit::collect(keyword_ctx.keyword_location.to_string(), ctx.instance_location.to_string(), children);
    Ok(Some(KeywordResult {
        unit,
        annotation: Some(("patternProperties", Annotation::PropertyNames(covered))),
        merge_annotations: None,
    }))
}

pub(crate) fn eval_additional_properties(
    schema: &mut Schema,
    obj: &Map,
    ctx: &Ctx,
    instance: &Value,
    annotations: &Annotations,
) -> Result<Option<KeywordResult>, SchemaError> {
    if !obj.contains("additionalProperties") {
        return Ok(None);
    }
    let sub = obj.get("additionalProperties");
    let Some(instance_obj) = instance.as_object() else {
        return Ok(Some(KeywordResult {
            unit: OutputUnit::valid(
                ctx.keyword_location.child("additionalProperties").to_string(),
                ctx.instance_location.to_string(),
            ),
            annotation: None,
            merge_annotations: None,
        }));
    };
    let mut already_covered = annotations.property_names("properties");
    already_covered.extend(annotations.property_names("patternProperties"));

    let keyword_ctx = ctx.keyword("additionalProperties");
    let mut children = Vec::new();
    let mut valid = true;
    let mut covered = BTreeSet::new();
    for name in instance_obj.keys() {
        let name = name.to_string();
        if already_covered.contains(&name) {
            continue;
        }
        let sub_ctx = keyword_ctx.instance_child(name.clone());
        let (unit, _) = crate::keyword::evaluate(schema, &sub, &sub_ctx, &instance_obj.get(&name))?;
        if unit.valid {
            covered.insert(name);
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
        annotation: ok.then_some(("additionalProperties", Annotation::PropertyNames(covered))),
        merge_annotations: None,
    }))
}
