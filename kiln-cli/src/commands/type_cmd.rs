//! `kiln type`: print or check an instance's JSON type.

use std::process::ExitCode;

use clap::Args;

use crate::args::{parse_kind, ParseOpts};
use crate::io::load_instance;

#[derive(Args, Debug)]
pub struct TypeArgs {
    /// JSON document to read; standard input if omitted.
    file: Option<String>,
    #[arg(short = 'p', long)]
    pointer: Option<String>,
    /// Check whether the instance is of this JSON type instead of printing
    /// its type.
    #[arg(short = 't', long = "type")]
    r#type: Option<String>,
    /// Don't print anything; only the exit code reports the result.
    #[arg(short = 'q', long)]
    quiet: bool,
    #[command(flatten)]
    parse: ParseOpts,
}

pub fn run(args: TypeArgs) -> ExitCode {
    let Some(instance) = load_instance(
        args.file.as_deref(),
        args.pointer.as_deref().unwrap_or(""),
        args.parse.to_options(),
    ) else {
        return ExitCode::FAILURE;
    };

    match &args.r#type {
        Some(type_name) => {
            let Some(expected) = parse_kind(type_name) else {
                eprintln!("Error: Invalid JSON type in option '--type=TYPE'");
                return ExitCode::FAILURE;
            };
            let matches = instance.kind() == expected;
            if !args.quiet {
                println!("{}", if matches { "Yes" } else { "No" });
            }
            if matches {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        None => {
            println!("{}", instance.kind());
            ExitCode::SUCCESS
        }
    }
}
