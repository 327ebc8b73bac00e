//! `kiln size`: the element/member count of a single array or object.

use std::process::ExitCode;

use clap::Args;

use crate::args::ParseOpts;
use crate::io::load_instance;

#[derive(Args, Debug)]
pub struct SizeArgs {
    /// JSON document to read; standard input if omitted.
    file: Option<String>,
    #[arg(short = 'p', long)]
    pointer: Option<String>,
    #[command(flatten)]
    parse: ParseOpts,
}

pub fn run(args: SizeArgs) -> ExitCode {
    let Some(instance) = load_instance(
        args.file.as_deref(),
        args.pointer.as_deref().unwrap_or(""),
        args.parse.to_options(),
    ) else {
        return ExitCode::FAILURE;
    };

    let size = if let Some(array) = instance.as_array() {
        array.len()
    } else if let Some(object) = instance.as_object() {
        object.len()
    } else {
        eprintln!("Error: Instance is not a JSON array or a JSON object");
        return ExitCode::FAILURE;
    };
    println!("{size}");
    ExitCode::SUCCESS
}
