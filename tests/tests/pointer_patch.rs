//! RFC 6901 pointer navigation and RFC 6902 patch application, driven
//! against the public `kiln-json-pointer` surface.

use kiln_core::Value;
use kiln_json_pointer::{apply_patch, Outcome, Pointer, PointerError};
use tests::json;

#[test]
fn root_pointer_resolves_the_whole_instance() {
    let value = json(r#"{"":"x"}"#);
    let pointer = Pointer::root();
    assert_eq!(pointer.resolve(&value), value);
}

#[test]
fn empty_string_token_navigates_to_the_empty_key_member() {
    let value = json(r#"{"":"x"}"#);
    let pointer = Pointer::parse("/").unwrap();
    assert_eq!(pointer.resolve(&value), Value::from("x"));
}

#[test]
fn pointer_without_leading_slash_is_rejected() {
    let err = Pointer::parse("a/b").unwrap_err();
    assert_eq!(err, PointerError::MissingLeadingSlash);
}

#[test]
fn out_of_range_array_index_resolves_to_invalid() {
    let value = json("[1,2,3]");
    let pointer = Pointer::parse("/5").unwrap();
    assert_eq!(pointer.resolve(&value), Value::Invalid);
}

#[test]
fn leading_zero_array_index_is_not_a_valid_index_token() {
    let token = Pointer::parse("/01").unwrap();
    assert_eq!(token.tokens()[0].as_index(), None);
}

#[test]
fn append_then_test_confirms_the_appended_value() {
    let document = json(r#"{"a":[1,2,3]}"#);
    let patch = json(
        r#"[
            {"op":"add","path":"/a/-","value":4},
            {"op":"test","path":"/a/3","value":4}
        ]"#,
    );
    let (result, report) = apply_patch(&document, &patch);
    assert!(report.all_ok());
    assert_eq!(result, json(r#"{"a":[1,2,3,4]}"#));
}

#[test]
fn add_inserts_before_the_index_rather_than_replacing() {
    let document = json(r#"{"a":[1,2,3]}"#);
    let patch = json(r#"[{"op":"add","path":"/a/1","value":99}]"#);
    let (result, report) = apply_patch(&document, &patch);
    assert!(report.all_ok());
    assert_eq!(result, json(r#"{"a":[1,99,2,3]}"#));
}

#[test]
fn failing_test_op_aborts_the_whole_patch() {
    let document = json(r#"{"a":1}"#);
    let patch = json(r#"[{"op":"test","path":"/a","value":2},{"op":"replace","path":"/a","value":3}]"#);
    let (result, report) = apply_patch(&document, &patch);
    assert!(!report.all_ok());
    assert_eq!(report.failed_at, Some(0));
    assert_eq!(report.outcomes[0], Outcome::Fail);
    // the document is untouched since the aborting op never applied
    assert_eq!(result, document);
}

#[test]
fn move_onto_its_own_path_is_a_no_op() {
    let document = json(r#"{"a":1}"#);
    let patch = json(r#"[{"op":"move","from":"/a","path":"/a"}]"#);
    let (result, report) = apply_patch(&document, &patch);
    assert!(report.all_ok());
    assert_eq!(result, document);
}

#[test]
fn move_into_own_descendant_is_invalid() {
    let document = json(r#"{"a":{"b":1}}"#);
    let patch = json(r#"[{"op":"move","from":"/a","path":"/a/b"}]"#);
    let (_, report) = apply_patch(&document, &patch);
    assert_eq!(report.outcomes[0], Outcome::Invalid);
}

#[test]
fn copy_duplicates_without_removing_the_source() {
    let document = json(r#"{"a":1}"#);
    let patch = json(r#"[{"op":"copy","from":"/a","path":"/b"}]"#);
    let (result, report) = apply_patch(&document, &patch);
    assert!(report.all_ok());
    assert_eq!(result, json(r#"{"a":1,"b":1}"#));
}

#[test]
fn remove_on_a_missing_member_is_no_ent() {
    let document = json(r#"{"a":1}"#);
    let patch = json(r#"[{"op":"remove","path":"/missing"}]"#);
    let (_, report) = apply_patch(&document, &patch);
    assert_eq!(report.outcomes[0], Outcome::NoEnt);
}
