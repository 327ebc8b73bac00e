//! `kiln view`: print an instance, optionally type-checked.

use std::process::ExitCode;

use clap::Args;
use kiln_core::format::to_string;

use crate::args::{parse_kind, FormatOpts, ParseOpts};
use crate::io::load_instance;

#[derive(Args, Debug)]
pub struct ViewArgs {
    /// JSON document to read; standard input if omitted.
    file: Option<String>,
    /// Use the instance at this JSON pointer instead of the document root.
    #[arg(short = 'p', long)]
    pointer: Option<String>,
    /// Require the viewed instance to be of this JSON type.
    #[arg(short = 't', long = "type")]
    r#type: Option<String>,
    /// If the instance is a JSON string, print its unescaped value with no
    /// enclosing quotes.
    #[arg(short = 'u', long)]
    unescape: bool,
    #[command(flatten)]
    parse: ParseOpts,
    #[command(flatten)]
    format: FormatOpts,
}

pub fn run(args: ViewArgs) -> ExitCode {
    let Some(instance) = load_instance(
        args.file.as_deref(),
        args.pointer.as_deref().unwrap_or(""),
        args.parse.to_options(),
    ) else {
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
    println!("{}", to_string(&instance, args.format.to_format()));
    ExitCode::SUCCESS
}
