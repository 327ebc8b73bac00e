//! `kiln merge`: merge one or more "slave" documents into a "master".
//! Objects merge deeply member by member; every other type is a straight
//! replacement of the master's value.

use std::process::ExitCode;

use clap::Args;
use kiln_core::format::to_string;
use kiln_core::value::Kind;
use kiln_core::{Map, Value};

use crate::args::{FormatOpts, ParseOpts};
use crate::io::load_document;

#[derive(Args, Debug)]
pub struct MergeArgs {
    /// The document merged values are applied on top of.
    master: String,
    /// One or more documents whose members are merged into `master`, in
    /// order; a later slave wins over an earlier one.
    #[arg(required = true)]
    slaves: Vec<String>,
    /// Only merge a slave value into the master if their JSON types match;
    /// a type mismatch leaves the master's value untouched.
    #[arg(short = 't', long = "type-check")]
    type_check: bool,
    #[command(flatten)]
    parse: ParseOpts,
    #[command(flatten)]
    format: FormatOpts,
}

pub fn run(args: MergeArgs) -> ExitCode {
    let options = args.parse.to_options();
    let Some(mut master) = load_document(Some(&args.master), options) else {
        return ExitCode::FAILURE;
    };
    for slave_path in &args.slaves {
        let Some(slave) = load_document(Some(slave_path), options) else {
            return ExitCode::FAILURE;
        };
        master = merge(&master, &slave, args.type_check);
    }
    println!("{}", to_string(&master, args.format.to_format()));
    ExitCode::SUCCESS
}

/// Merges `slave` on top of `master`. Two objects merge member-by-member,
/// recursively; any other pairing replaces `master` outright (subject to
/// `type_check`, which refuses a replacement across JSON types).
fn merge(master: &Value, slave: &Value, type_check: bool) -> Value {
    match (master, slave) {
        (Value::Object(master_obj), Value::Object(slave_obj)) => {
            let merged = Map::new();
            for (key, value) in master_obj.iter() {
                merged.insert(key, value);
            }
            for (key, slave_value) in slave_obj.iter() {
                let existing = merged.get(&key);
                let next = if existing.is_invalid() {
                    slave_value
                } else {
                    merge(&existing, &slave_value, type_check)
                };
                merged.set(&key, next);
            }
            Value::Object(merged)
        }
        _ => {
            if type_check && kind_of(master) != kind_of(slave) {
                master.clone()
            } else {
                slave.clone()
            }
        }
    }
}

fn kind_of(v: &Value) -> Kind {
    v.kind()
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_core::parser::{parse, Options};

    fn v(s: &str) -> Value {
        parse(s, Options::default()).unwrap()
    }

    #[test]
    fn objects_merge_deeply() {
        let master = v(r#"{"a":1,"b":{"x":1,"y":2}}"#);
        let slave = v(r#"{"b":{"y":3,"z":4},"c":5}"#);
        let merged = merge(&master, &slave, false);
        assert_eq!(merged, v(r#"{"a":1,"b":{"x":1,"y":3,"z":4},"c":5}"#));
    }

    #[test]
    fn non_objects_are_replaced() {
        let master = v(r#"{"a":[1,2]}"#);
        let slave = v(r#"{"a":[3]}"#);
        let merged = merge(&master, &slave, false);
        assert_eq!(merged, v(r#"{"a":[3]}"#));
    }

    #[test]
    fn type_check_refuses_cross_type_replacement() {
        let master = v(r#"{"a":1}"#);
        let slave = v(r#"{"a":"x"}"#);
        let merged = merge(&master, &slave, true);
        assert_eq!(merged, master);
    }
}
