//! `kiln get`: extract a value by JSON pointer.

use std::process::ExitCode;

use clap::Args;
use kiln_core::format::{to_string, Format};

use crate::args::{parse_kind, ParseOpts};
use crate::io::load_instance;

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Either `POINTER` alone (document read from standard input), or
    /// `FILE POINTER`.
    #[arg(value_name = "ARGS", num_args = 1..=2)]
    args: Vec<String>,
    /// Print an object or array result without whitespace.
    #[arg(short = 'c', long)]
    compact: bool,
    /// Require the result to be of this JSON type.
    #[arg(short = 't', long = "type")]
    r#type: Option<String>,
    /// If the result is a JSON string, print its unescaped value with no
    /// enclosing quotes.
    #[arg(short = 'u', long)]
    unescape: bool,
    #[command(flatten)]
    parse: ParseOpts,
}

pub fn run(args: GetArgs) -> ExitCode {
    let (file, pointer) = match args.args.len() {
        1 => (None, args.args[0].clone()),
        2 => (Some(args.args[0].clone()), args.args[1].clone()),
        _ => unreachable!("clap enforces 1..=2 positional arguments"),
    };

    let Some(instance) = load_instance(file.as_deref(), &pointer, args.parse.to_options()) else {
        return ExitCode::FAILURE;
    };

    if let Some(type_name) = &args.r#type {
        let Some(expected) = parse_kind(type_name) else {
            eprintln!("Error: Invalid JSON type in option '--type=TYPE'");
            return ExitCode::FAILURE;
        };
        if instance.kind() != expected {
            eprintln!("Error: Instance is not a JSON {expected}");
            return ExitCode::FAILURE;
        }
    }

    if args.unescape {
        if let Some(s) = instance.as_str() {
            println!("{s}");
            return ExitCode::SUCCESS;
        }
    }
    let format = if args.compact { Format::COMPACT } else { Format::PRETTY };
    println!("{}", to_string(&instance, format));
    ExitCode::SUCCESS
}
