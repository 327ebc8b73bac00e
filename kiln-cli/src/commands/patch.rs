//! `kiln patch`: apply an RFC 6902 patch document.

use std::process::ExitCode;

use clap::Args;
use kiln_core::format::to_string;
use kiln_json_pointer::apply_patch;

use crate::args::{FormatOpts, ParseOpts};
use crate::io::load_document;

#[derive(Args, Debug)]
pub struct PatchArgs {
    /// Document to patch.
    document: String,
    /// Patch document: a JSON array of RFC 6902 operation objects.
    patch: String,
    /// Print each operation's outcome to standard error as it is applied.
    #[arg(short = 'v', long)]
    verbose: bool,
    #[command(flatten)]
    parse: ParseOpts,
    #[command(flatten)]
    format: FormatOpts,
}

pub fn run(args: PatchArgs) -> ExitCode {
    let options = args.parse.to_options();
    let Some(document) = load_document(Some(&args.document), options) else {
        return ExitCode::FAILURE;
    };
    let Some(patch) = load_document(Some(&args.patch), options) else {
        return ExitCode::FAILURE;
    };

    let (result, report) = apply_patch(&document, &patch);

    if args.verbose {
        for (index, outcome) in report.outcomes.iter().enumerate() {
            eprintln!("op {index}: {outcome}");
        }
    }

    if !report.all_ok() {
        eprintln!(
            "Error: patch operation {} failed",
            report.failed_at.unwrap_or(report.outcomes.len())
        );
        return ExitCode::FAILURE;
    }

    println!("{}", to_string(&result, args.format.to_format()));
    ExitCode::SUCCESS
}
