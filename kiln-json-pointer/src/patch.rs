//! RFC 6902 JSON Patch, applied over the immutable [`Value`] tree by
//! rebuilding the chain of containers from the target pointer back to the
//! root — consistent with [`Value`]'s "copying is always deep" contract.

use kiln_core::Value;

use crate::pointer::Pointer;

/// The result of a single patch operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Outcome {
    /// The operation applied successfully.
    Ok,
    /// A `test` operation's comparison was unequal.
    Fail,
    /// A pointer in the operation did not resolve against the instance.
    NoEnt,
    /// The patch operation object itself was malformed.
    Invalid,
}

/// One decoded operation out of a patch document.
#[derive(Debug, Clone)]
enum Op {
    Add { path: Pointer, value: Value },
    Remove { path: Pointer },
    Replace { path: Pointer, value: Value },
    Move { from: Pointer, path: Pointer },
    Copy { from: Pointer, path: Pointer },
    Test { path: Pointer, value: Value },
}

/// Outcome of applying a whole patch document: per-operation outcomes for
/// every operation attempted, and the index of the first non-`Ok` outcome
/// (the point where application aborted), if any.
#[derive(Debug, Clone, Default)]
pub struct Report {
    pub outcomes: Vec<Outcome>,
    pub failed_at: Option<usize>,
}

impl Report {
    #[must_use]
    pub fn all_ok(&self) -> bool {
        self.failed_at.is_none()
    }
}

/// Applies a patch document (an array of RFC 6902 operation objects) to
/// `root`, returning the patched document and a [`Report`]. Application
/// aborts at the first non-`Ok` outcome; the returned document reflects
/// every operation up to and including the last successful one.
pub fn apply_patch(root: &Value, patch: &Value) -> (Value, Report) {
    let mut report = Report::default();
    let Some(ops) = patch.as_array() else {
        report.outcomes.push(Outcome::Invalid);
        report.failed_at = Some(0);
        return (root.clone(), report);
    };

    let mut current = root.clone();
    for (index, raw) in ops.iter().enumerate() {
        let op = match decode_op(raw) {
            Ok(op) => op,
            Err(()) => {
                report.outcomes.push(Outcome::Invalid);
                report.failed_at = Some(index);
                break;
            }
        };
        let outcome = apply_one(&mut current, &op);
        let is_ok = outcome == Outcome::Ok;
        report.outcomes.push(outcome);
        if !is_ok {
            report.failed_at = Some(index);
            break;
        }
    }
    (current, report)
}

fn decode_op(raw: &Value) -> Result<Op, ()> {
    let obj = raw.as_object().ok_or(())?;
    let op_name = obj.get("op");
    let op_name = op_name.as_str().ok_or(())?;
    let path = parse_member_pointer(obj.get("path"))?;
    match op_name {
        "add" => Ok(Op::Add { path, value: non_invalid(obj.get("value"))? }),
        "remove" => Ok(Op::Remove { path }),
        "replace" => Ok(Op::Replace { path, value: non_invalid(obj.get("value"))? }),
        "move" => Ok(Op::Move { from: parse_member_pointer(obj.get("from"))?, path }),
        "copy" => Ok(Op::Copy { from: parse_member_pointer(obj.get("from"))?, path }),
        "test" => Ok(Op::Test { path, value: non_invalid(obj.get("value"))? }),
        _ => Err(()),
    }
}

fn parse_member_pointer(v: Value) -> Result<Pointer, ()> {
    Pointer::parse(v.as_str().ok_or(())?).map_err(|_| ())
}

fn non_invalid(v: Value) -> Result<Value, ()> {
    if v.is_invalid() {
        Err(())
    } else {
        Ok(v)
    }
}

fn apply_one(root: &mut Value, op: &Op) -> Outcome {
    match op {
        Op::Add { path, value } => match set_value(root, path.tokens(), Edit::Add(value.clone())) {
            Ok(new_root) => {
                *root = new_root;
                Outcome::Ok
            }
            Err(outcome) => outcome,
        },
        Op::Remove { path } => match set_value(root, path.tokens(), Edit::Remove) {
            Ok(new_root) => {
                *root = new_root;
                Outcome::Ok
            }
            Err(outcome) => outcome,
        },
        Op::Replace { path, value } => {
            match set_value(root, path.tokens(), Edit::Replace(value.clone())) {
                Ok(new_root) => {
                    *root = new_root;
                    Outcome::Ok
                }
                Err(outcome) => outcome,
            }
        }
        Op::Test { path, value } => {
            if path.resolve(root) == *value {
                Outcome::Ok
            } else {
                Outcome::Fail
            }
        }
        Op::Move { from, path } => {
            if from.is_prefix_of(path) && from.len() < path.len() {
                return Outcome::Invalid;
            }
            let value = from.resolve(root);
            if value.is_invalid() {
                return Outcome::NoEnt;
            }
            let removed = set_value(root, from.tokens(), Edit::Remove);
            let after_remove = match removed {
                Ok(v) => v,
                Err(outcome) => return outcome,
            };
            match set_value(&after_remove, path.tokens(), Edit::Add(value)) {
                Ok(new_root) => {
                    *root = new_root;
                    Outcome::Ok
                }
                Err(outcome) => outcome,
            }
        }
        Op::Copy { from, path } => {
            let value = from.resolve(root);
            if value.is_invalid() {
                return Outcome::NoEnt;
            }
            match set_value(root, path.tokens(), Edit::Add(value)) {
                Ok(new_root) => {
                    *root = new_root;
                    Outcome::Ok
                }
                Err(outcome) => outcome,
            }
        }
    }
}

enum Edit {
    Add(Value),
    Replace(Value),
    Remove,
}

/// Rebuilds the container chain from `root` down to the parent of
/// `tokens`'s last element, applying `edit` there, and returns the new
/// root. Each level is a fresh clone of just that level's container (`Map`
/// clones are shallow-ish copies of the entry list; `Vec` clones are plain
/// deep copies) — siblings outside the path are untouched structurally but
/// still deep-cloned, per `Value`'s clone contract.
fn set_value(root: &Value, tokens: &[crate::pointer::Token], edit: Edit) -> Result<Value, Outcome> {
    if tokens.is_empty() {
        return match edit {
            Edit::Add(v) | Edit::Replace(v) => Ok(v),
            Edit::Remove => Err(Outcome::Invalid),
        };
    }
    let first = &tokens[0];
    let rest = &tokens[1..];
    match root {
        Value::Object(map) => {
            if rest.is_empty() {
                match edit {
                    Edit::Add(v) => {
                        let cloned = map.clone();
                        cloned.set(first.as_str(), v);
                        Ok(Value::Object(cloned))
                    }
                    Edit::Replace(v) => {
                        if !map.contains(first.as_str()) {
                            return Err(Outcome::NoEnt);
                        }
                        let cloned = map.clone();
                        cloned.set(first.as_str(), v);
                        Ok(Value::Object(cloned))
                    }
                    Edit::Remove => {
                        if !map.contains(first.as_str()) {
                            return Err(Outcome::NoEnt);
                        }
                        let cloned = map.clone();
                        cloned.remove(first.as_str());
                        Ok(Value::Object(cloned))
                    }
                }
            } else {
                let child = map.get(first.as_str());
                if child.is_invalid() {
                    return Err(Outcome::NoEnt);
                }
                let new_child = set_value(&child, rest, edit)?;
                let cloned = map.clone();
                cloned.set(first.as_str(), new_child);
                Ok(Value::Object(cloned))
            }
        }
        Value::Array(items) => {
            if rest.is_empty() {
                match edit {
                    Edit::Add(v) => {
                        let mut new_items = items.clone();
                        if first.is_append() {
                            new_items.push(v);
                        } else {
                            let i = first.as_index().ok_or(Outcome::Invalid)?;
                            if i > new_items.len() {
                                return Err(Outcome::NoEnt);
                            }
                            new_items.insert(i, v);
                        }
                        Ok(Value::Array(new_items))
                    }
                    Edit::Replace(v) => {
                        let i = first.as_index().ok_or(Outcome::Invalid)?;
                        if i >= items.len() {
                            return Err(Outcome::NoEnt);
                        }
                        let mut new_items = items.clone();
                        new_items[i] = v;
                        Ok(Value::Array(new_items))
                    }
                    Edit::Remove => {
                        let i = first.as_index().ok_or(Outcome::Invalid)?;
                        if i >= items.len() {
                            return Err(Outcome::NoEnt);
                        }
                        let mut new_items = items.clone();
                        new_items.remove(i);
                        Ok(Value::Array(new_items))
                    }
                }
            } else {
                let i = first.as_index().ok_or(Outcome::Invalid)?;
                let child = items.get(i).ok_or(Outcome::NoEnt)?;
                let new_child = set_value(child, rest, edit)?;
                let mut new_items = items.clone();
                new_items[i] = new_child;
                Ok(Value::Array(new_items))
            }
        }
        _ => Err(Outcome::NoEnt),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_core::parser::{parse, Options};

    fn v(s: &str) -> Value {
        parse(s, Options::default()).unwrap()
    }

    #[test]
    fn add_appends_to_array() {
        let doc = v(r#"{"a":[1,2]}"#);
        let patch = v(r#"[{"op":"add","path":"/a/-","value":3}]"#);
        let (result, report) = apply_patch(&doc, &patch);
        assert!(report.all_ok());
        assert_eq!(result, v(r#"{"a":[1,2,3]}"#));
    }

    #[test]
    fn add_inserts_before_index() {
        let doc = v(r#"{"a":[1,3]}"#);
        let patch = v(r#"[{"op":"add","path":"/a/1","value":2}]"#);
        let (result, report) = apply_patch(&doc, &patch);
        assert!(report.all_ok());
        assert_eq!(result, v(r#"{"a":[1,2,3]}"#));
    }

    #[test]
    fn replace_requires_existing_target() {
        let doc = v(r#"{"a":1}"#);
        let patch = v(r#"[{"op":"replace","path":"/b","value":2}]"#);
        let (_, report) = apply_patch(&doc, &patch);
        assert_eq!(report.outcomes, vec![Outcome::NoEnt]);
        assert_eq!(report.failed_at, Some(0));
    }

    #[test]
    fn remove_drops_all_object_entries_with_key() {
        let doc = v(r#"{"a":1}"#);
        let patch = v(r#"[{"op":"remove","path":"/a"}]"#);
        let (result, report) = apply_patch(&doc, &patch);
        assert!(report.all_ok());
        assert_eq!(result, v("{}"));
    }

    #[test]
    fn move_into_own_descendant_is_invalid() {
        let doc = v(r#"{"a":{"b":1}}"#);
        let patch = v(r#"[{"op":"move","from":"/a","path":"/a/b"}]"#);
        let (_, report) = apply_patch(&doc, &patch);
        assert_eq!(report.outcomes, vec![Outcome::Invalid]);
    }

    #[test]
    fn failing_test_op_aborts_sequence() {
        let doc = v(r#"{"a":1}"#);
        let patch = v(r#"[{"op":"test","path":"/a","value":2},{"op":"remove","path":"/a"}]"#);
        let (result, report) = apply_patch(&doc, &patch);
        assert_eq!(report.outcomes, vec![Outcome::Fail]);
        assert_eq!(report.failed_at, Some(0));
        assert_eq!(result, doc);
    }

    #[test]
    fn copy_duplicates_without_removing_source() {
        let doc = v(r#"{"a":1}"#);
        let patch = v(r#"[{"op":"copy","from":"/a","path":"/b"}]"#);
        let (result, report) = apply_patch(&doc, &patch);
        assert!(report.all_ok());
        assert_eq!(result, v(r#"{"a":1,"b":1}"#));
    }

    #[test]
    fn add_at_root_replaces_whole_document() {
        let doc = v(r#"{"a":1}"#);
        let patch = v(r#"[{"op":"add","path":"","value":{"b":2}}]"#);
        let (result, report) = apply_patch(&doc, &patch);
        assert!(report.all_ok());
        assert_eq!(result, v(r#"{"b":2}"#));
    }
}
