//! JSON Schema 2020-12 evaluation, driven against the public `kiln-json-schema`
//! surface.

use kiln_json_schema::{OutputFormat, Schema};
use tests::json;

#[test]
fn multiple_of_rejects_a_non_multiple_within_range() {
    let schema_doc = json(r#"{"type":"integer","minimum":1,"maximum":10,"multipleOf":3}"#);
    let mut schema = Schema::new(schema_doc, Vec::new()).unwrap();

    let unit = schema.validate(&json("3"), false).unwrap();
    assert!(unit.valid);

    let unit = schema.validate(&json("2"), false).unwrap();
    assert!(!unit.valid);
}

#[test]
fn flag_output_carries_only_the_valid_member() {
    let schema_doc = json(r#"{"type":"string"}"#);
    let mut schema = Schema::new(schema_doc, Vec::new()).unwrap();
    let output = schema
        .validate_to_value(&json("1"), false, OutputFormat::Flag)
        .unwrap();
    assert_eq!(output, json(r#"{"valid":false}"#));
}

#[test]
fn required_lists_every_missing_property() {
    let schema_doc = json(r#"{"type":"object","required":["a","b"]}"#);
    let mut schema = Schema::new(schema_doc, Vec::new()).unwrap();
    let unit = schema.validate(&json(r#"{"a":1}"#), false).unwrap();
    assert!(!unit.valid);
}

#[test]
fn one_of_accepts_exactly_one_matching_branch() {
    let schema_doc = json(
        r#"{"oneOf":[{"type":"integer","multipleOf":5},{"type":"integer","multipleOf":3}]}"#,
    );
    let mut schema = Schema::new(schema_doc, Vec::new()).unwrap();
    assert!(schema.validate(&json("9"), false).unwrap().valid);
    assert!(schema.validate(&json("10"), false).unwrap().valid);
    // divisible by both: no branch is uniquely satisfied
    assert!(!schema.validate(&json("15"), false).unwrap().valid);
    // divisible by neither
    assert!(!schema.validate(&json("7"), false).unwrap().valid);
}

#[test]
fn if_then_else_selects_the_matching_branch() {
    let schema_doc = json(
        r#"{
            "if": {"type":"string"},
            "then": {"minLength":3},
            "else": {"minimum":0}
        }"#,
    );
    let mut schema = Schema::new(schema_doc, Vec::new()).unwrap();
    assert!(schema.validate(&json(r#""abc""#), false).unwrap().valid);
    assert!(!schema.validate(&json(r#""ab""#), false).unwrap().valid);
    assert!(schema.validate(&json("5"), false).unwrap().valid);
    assert!(!schema.validate(&json("-1"), false).unwrap().valid);
}

#[test]
fn unevaluated_properties_false_rejects_anything_not_covered_by_allof() {
    let schema_doc = json(
        r#"{
            "allOf": [{"properties":{"a":{"type":"integer"}}}],
            "unevaluatedProperties": false
        }"#,
    );
    let mut schema = Schema::new(schema_doc, Vec::new()).unwrap();
    assert!(schema.validate(&json(r#"{"a":1}"#), false).unwrap().valid);
    assert!(!schema.validate(&json(r#"{"a":1,"b":2}"#), false).unwrap().valid);
}

#[test]
fn unevaluated_items_false_rejects_items_past_prefix_items() {
    let schema_doc = json(
        r#"{"prefixItems":[{"type":"integer"}],"unevaluatedItems":false}"#,
    );
    let mut schema = Schema::new(schema_doc, Vec::new()).unwrap();
    assert!(schema.validate(&json("[1]"), false).unwrap().valid);
    assert!(!schema.validate(&json("[1,2]"), false).unwrap().valid);
}

#[test]
fn unevaluated_items_treats_a_sparse_contains_match_as_evaluated() {
    let schema_doc = json(
        r#"{"contains":{"type":"string"},"unevaluatedItems":{"type":"number"}}"#,
    );
    let mut schema = Schema::new(schema_doc, Vec::new()).unwrap();
    // index 0 is a number (unevaluatedItems is happy with it directly);
    // index 1 is the string contains matched, at a non-prefix position.
    assert!(schema.validate(&json(r#"[1,"a"]"#), false).unwrap().valid);
    // neither a number nor matched by contains: unevaluatedItems rejects it.
    assert!(!schema.validate(&json(r#"["a",true]"#), false).unwrap().valid);
}

#[test]
fn ref_resolves_against_a_sibling_definition() {
    let schema_doc = json(
        r#"{
            "$defs": {"positiveInt": {"type":"integer","minimum":1}},
            "$ref": "#/$defs/positiveInt"
        }"#,
    );
    let mut schema = Schema::new(schema_doc, Vec::new()).unwrap();
    assert!(schema.validate(&json("1"), false).unwrap().valid);
    assert!(!schema.validate(&json("0"), false).unwrap().valid);
}

#[test]
fn dynamic_ref_resolves_through_the_dynamic_scope() {
    let schema_doc = json(
        r#"{
            "$id": "https://kiln.test/list",
            "$dynamicAnchor": "itemType",
            "type": "array",
            "items": {"$dynamicRef": "#itemType"}
        }"#,
    );
    let mut schema = Schema::new(schema_doc, Vec::new()).unwrap();
    // with no override, the anchor resolves to itself: an array of arrays.
    assert!(schema.validate(&json("[[]]"), false).unwrap().valid);
}

#[test]
fn fast_fail_and_full_evaluation_agree_on_overall_validity() {
    let schema_doc = json(
        r#"{"type":"object","required":["a","b"],"properties":{"a":{"type":"integer"}}}"#,
    );
    let mut schema = Schema::new(schema_doc.clone(), Vec::new()).unwrap();
    let instance = json(r#"{"a":"not an integer"}"#);

    let full = schema.validate(&instance, false).unwrap();
    let fast = schema.validate(&instance, true).unwrap();
    assert_eq!(full.valid, fast.valid);
    assert!(!full.valid);
}
