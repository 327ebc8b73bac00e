//! `kiln members`: list an object's member names.

use std::process::ExitCode;

use clap::Args;
use kiln_core::escape::escape;
use kiln_core::Value;

use crate::args::ParseOpts;
use crate::io::load_instance;

#[derive(Args, Debug)]
pub struct MembersArgs {
    /// JSON document to read; standard input if omitted.
    file: Option<String>,
    #[arg(short = 'p', long)]
    pointer: Option<String>,
    /// Print member names JSON-escaped and quoted, one per line.
    #[arg(short = 'm', long = "escape-members")]
    escape_members: bool,
    /// Print member names as a single JSON array. Implies `--escape-members`.
    #[arg(short = 'j', long = "json-array")]
    json_array: bool,
    /// Sort the member names.
    #[arg(long)]
    sort: bool,
    #[command(flatten)]
    parse: ParseOpts,
}

pub fn run(args: MembersArgs) -> ExitCode {
    let Some(instance) = load_instance(
        args.file.as_deref(),
        args.pointer.as_deref().unwrap_or(""),
        args.parse.to_options(),
    ) else {
        return ExitCode::FAILURE;
    };
    let Some(object) = instance.as_object() else {
        eprintln!("Error: Instance is not a JSON object");
        return ExitCode::FAILURE;
    };

    let names: Vec<Box<str>> = if args.sort {
        object.sorted_iter().into_iter().map(|(k, _)| k).collect()
    } else {
        object.keys()
    };

    if args.json_array {
        let array = Value::Array(names.iter().map(|name| Value::from(name.as_ref())).collect());
        println!("{array}");
        return ExitCode::SUCCESS;
    }

    for name in &names {
        if args.escape_members {
            let mut escaped = String::with_capacity(name.len() + 2);
            escaped.push('"');
            escape(name, false, &mut escaped);
            escaped.push('"');
            println!("{escaped}");
        } else {
            println!("{name}");
        }
    }
    ExitCode::SUCCESS
}
